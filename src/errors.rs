//! Error types for pattern parsing and compilation, with error codes and
//! helpful messages.
//!
//! # Error Codes
//!
//! Each error variant has a unique code (E001-E012) for documentation lookup:
//!
//! - E001: `ParseFailure` (Generic parse failure)
//! - E002: `TrailingInput` (Pattern has unparseable trailing input)
//! - E003: `EmptyClass` (Empty character class `[]`)
//! - E004: `UnclosedClass` (Character class missing its `]`)
//! - E005: `InvalidClassRange` (Class range runs backwards, e.g. `z-a`)
//! - E006: `DanglingClassDash` (Class ends with an incomplete range)
//! - E007: `UnclosedGroup` (Group missing its `)`)
//! - E008: `DanglingEscape` (`\` at end of input)
//! - E009: `IllegalChar` (Character outside the puzzle alphabet)
//! - E010: `ReversedRepeat` (Repetition bounds with min > max)
//! - E011: `InvalidRepeat` (Malformed `{m,n}` repetition)
//! - E012: `NomError` (Low-level nom parser error)
//!
//! # Examples
//!
//! ```
//! use rexcross::errors::PatternError;
//!
//! let err = PatternError::InvalidClassRange('z', 'a');
//! println!("Error: {}", err);
//! println!("Code: {}", err.code());
//! if let Some(help) = err.help() {
//!     println!("Help: {}", help);
//! }
//! ```

use nom::error::{ErrorKind, ParseError as NomParseError};
use std::io;

/// Custom error type for pattern parsing and compilation.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern parsing failed: \"{s}\"")]
    ParseFailure { s: String },

    #[error("unexpected input starting at \"{rest}\"")]
    TrailingInput { rest: String },

    #[error("empty character class")]
    EmptyClass,

    #[error("character class is missing its closing ']'")]
    UnclosedClass,

    #[error("invalid range in character class: {0}-{1}")]
    InvalidClassRange(char, char),

    #[error("dangling '-' at end of character class")]
    DanglingClassDash,

    #[error("group is missing its closing ')'")]
    UnclosedGroup,

    #[error("dangling '\\' escape at end of input")]
    DanglingEscape,

    #[error("character '{c}' is outside the puzzle alphabet")]
    IllegalChar { c: char },

    #[error("reversed repetition bounds: {{{min},{max}}}")]
    ReversedRepeat { min: u32, max: u32 },

    #[error("malformed repetition: \"{input}\"")]
    InvalidRepeat { input: String },

    // nom parser error (lowest level)
    #[error("nom parser error: {0:?}")]
    NomError(ErrorKind),
}

impl From<PatternError> for io::Error {
    fn from(pe: PatternError) -> Self {
        // String version is the least fragile (no Send/Sync bounds issues)
        io::Error::new(io::ErrorKind::InvalidInput, pe.to_string())
    }
}

impl<'a> NomParseError<&'a str> for Box<PatternError> {
    fn from_error_kind(_input: &'a str, kind: ErrorKind) -> Self {
        Box::new(PatternError::NomError(kind))
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        // usually just return the existing error unchanged
        other
    }
}

impl PatternError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PatternError::ParseFailure { .. } => "E001",
            PatternError::TrailingInput { .. } => "E002",
            PatternError::EmptyClass => "E003",
            PatternError::UnclosedClass => "E004",
            PatternError::InvalidClassRange(..) => "E005",
            PatternError::DanglingClassDash => "E006",
            PatternError::UnclosedGroup => "E007",
            PatternError::DanglingEscape => "E008",
            PatternError::IllegalChar { .. } => "E009",
            PatternError::ReversedRepeat { .. } => "E010",
            PatternError::InvalidRepeat { .. } => "E011",
            PatternError::NomError(_) => "E012",
        }
    }

    /// Returns a helpful suggestion or example for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            PatternError::TrailingInput { .. } => Some("A stray ')', ']' or a quantifier with nothing to repeat often causes this"),
            PatternError::EmptyClass => Some("A character class must contain at least one character (e.g., '[abc]' or '[a-z]')"),
            PatternError::UnclosedClass => Some("Close the class with ']' (e.g., '[A-Z]')"),
            PatternError::InvalidClassRange(..) => Some("In a class range, the first character must come before the second (e.g., 'a-z' not 'z-a')"),
            PatternError::DanglingClassDash => Some("Remove the trailing '-' or complete the range (e.g., '[abc]' or '[a-c]')"),
            PatternError::UnclosedGroup => Some("Close the group with ')' (e.g., '(AB|CD)')"),
            PatternError::DanglingEscape => Some("A '\\' must be followed by the character to escape (e.g., '\\.')"),
            PatternError::IllegalChar { .. } => Some("Patterns may only use printable ASCII (space through '~')"),
            PatternError::ReversedRepeat { .. } => Some("The repetition minimum cannot exceed the maximum"),
            PatternError::InvalidRepeat { .. } => Some("Expected '{m}', '{m,}' or '{m,n}' with decimal bounds"),
            _ => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
