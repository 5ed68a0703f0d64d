//! nom-based parser from the pattern dialect into a regex AST.
//!
//! Supported syntax: literal characters, `\c` escapes, `.` (any alphabet
//! character), character classes `[...]` / `[^...]` with ranges, alternation
//! `|`, grouping `(...)`, and repetition `*`, `+`, `?`, `{m}`, `{m,}`,
//! `{m,n}`. The alphabet is printable ASCII (see [`crate::alphabet`]); a
//! character outside it is rejected outright rather than silently never
//! matching.

use crate::alphabet::{complement, normalize, GridChar, ALPHABET_MAX, ALPHABET_MIN};
use crate::errors::PatternError;
use nom::bytes::complete::tag;
use nom::character::complete::digit1;
use nom::error::ErrorKind;
use nom::IResult;
use std::str::FromStr;

/// Parser result type: input, output, with our custom `PatternError`
pub type PResult<'a, O> = IResult<&'a str, O, Box<PatternError>>;

/// Characters that cannot appear bare in a pattern.
const METACHARS: &str = "|()[*+?{.\\";

/// Abstract syntax of one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// Matches the empty string (an empty pattern or alternation branch).
    Empty,
    /// A single literal character.
    Literal(char),
    /// Any character in one of the (sorted, disjoint) inclusive ranges.
    /// `.` and `[^...]` desugar to this against the puzzle alphabet.
    Class(Vec<(char, char)>),
    Concat(Vec<Ast>),
    Alternate(Vec<Ast>),
    Repeat {
        inner: Box<Ast>,
        min: u32,
        /// `None` means unbounded (`*`, `+`, `{m,}`).
        max: Option<u32>,
    },
}

impl FromStr for Ast {
    type Err = Box<PatternError>;

    /// Parse a whole pattern string. The empty pattern is legal and denotes
    /// the empty-string language.
    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        match alternation(pattern) {
            Ok(("", ast)) => Ok(ast),
            Ok((rest, _)) => Err(Box::new(PatternError::TrailingInput { rest: rest.to_string() })),
            Err(nom::Err::Failure(e) | nom::Err::Error(e)) => Err(e),
            Err(nom::Err::Incomplete(_)) => {
                Err(Box::new(PatternError::ParseFailure { s: pattern.to_string() }))
            }
        }
    }
}

// === Grammar ===
//
// alternation   := concatenation ('|' concatenation)*
// concatenation := repeated*
// repeated      := atom quantifier*
// atom          := group | class | '.' | escape | literal

fn alternation(input: &str) -> PResult<'_, Ast> {
    let (mut rest, first) = concatenation(input)?;
    let mut branches = vec![first];

    while let Ok((next, _)) = tag::<_, _, Box<PatternError>>("|")(rest) {
        let (next, branch) = concatenation(next)?;
        branches.push(branch);
        rest = next;
    }

    let ast = if branches.len() == 1 {
        branches.swap_remove(0)
    } else {
        Ast::Alternate(branches)
    };
    Ok((rest, ast))
}

/// Zero or more repeated atoms. Always succeeds (an empty concatenation is
/// `Ast::Empty`), but hard parse failures from deeper levels bubble up.
fn concatenation(mut input: &str) -> PResult<'_, Ast> {
    let mut parts = Vec::new();

    loop {
        match repeated(input) {
            Ok((rest, part)) => {
                parts.push(part);
                input = rest;
            }
            Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
            Err(_) => break,
        }
    }

    let ast = match parts.len() {
        0 => Ast::Empty,
        1 => parts.swap_remove(0),
        _ => Ast::Concat(parts),
    };
    Ok((input, ast))
}

/// An atom followed by any number of stacked quantifiers (`a*?`, `a{2}+`, ...).
fn repeated(input: &str) -> PResult<'_, Ast> {
    let (mut rest, mut ast) = atom(input)?;

    loop {
        match quantifier(rest) {
            Ok((next, (min, max))) => {
                ast = Ast::Repeat { inner: Box::new(ast), min, max };
                rest = next;
            }
            Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
            Err(_) => break,
        }
    }

    Ok((rest, ast))
}

fn atom(input: &str) -> PResult<'_, Ast> {
    match input.chars().next() {
        Some('(') => group(input),
        Some('[') => char_class(input),
        Some('.') => Ok((&input[1..], Ast::Class(vec![(ALPHABET_MIN, ALPHABET_MAX)]))),
        Some('\\') => escape(input),
        Some(c) if !METACHARS.contains(c) => {
            if !c.is_grid_char() {
                return Err(nom::Err::Failure(Box::new(PatternError::IllegalChar { c })));
            }
            Ok((&input[c.len_utf8()..], Ast::Literal(c)))
        }
        // ')' / '*' / '{' / ... with nothing to attach to, or end of input:
        // soft failure so the caller stops consuming.
        _ => Err(nom::Err::Error(Box::new(PatternError::NomError(ErrorKind::Char)))),
    }
}

fn group(input: &str) -> PResult<'_, Ast> {
    let (input, _) = tag("(")(input)?;
    let (input, inner) = alternation(input)?;
    match tag::<_, _, Box<PatternError>>(")")(input) {
        Ok((rest, _)) => Ok((rest, inner)),
        Err(_) => Err(nom::Err::Failure(Box::new(PatternError::UnclosedGroup))),
    }
}

/// `\c` makes `c` a literal, whatever it is (as long as it is in the alphabet).
fn escape(input: &str) -> PResult<'_, Ast> {
    let (input, _) = tag("\\")(input)?;
    let Some(c) = input.chars().next() else {
        return Err(nom::Err::Failure(Box::new(PatternError::DanglingEscape)));
    };
    if !c.is_grid_char() {
        return Err(nom::Err::Failure(Box::new(PatternError::IllegalChar { c })));
    }
    Ok((&input[c.len_utf8()..], Ast::Literal(c)))
}

/// Parses a character class token, supporting both positive and negated sets.
///
/// Classes are enclosed in square brackets `[...]`. Supported syntax:
/// - **Positive set**: `[abc]` matches 'a', 'b', or 'c'.
/// - **Negated set**: `[^abc]` matches any alphabet character *except* those.
/// - **Ranges**: `[A-E]` uses inclusive ranges; `\` escapes work inside.
///
/// Negation is always calculated relative to the full printable-ASCII
/// alphabet. Empty classes `[]` are not allowed.
fn char_class(input: &str) -> PResult<'_, Ast> {
    let (rest, _) = tag("[")(input)?;
    let (rest, negated) = match tag::<_, _, Box<PatternError>>("^")(rest) {
        Ok((r, _)) => (r, true),
        Err(_) => (rest, false),
    };

    // Find the closing ']' (escapes may hide one inside the body).
    let mut end = None;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ']' {
            end = Some(i);
            break;
        }
    }
    let Some(end) = end else {
        return Err(nom::Err::Failure(Box::new(PatternError::UnclosedClass)));
    };

    let body = &rest[..end];
    if body.is_empty() {
        return Err(nom::Err::Failure(Box::new(PatternError::EmptyClass)));
    }

    let ranges = expand_class(body).map_err(nom::Err::Failure)?;
    let ranges = if negated { complement(&ranges) } else { normalize(&ranges) };

    Ok((&rest[end + 1..], Ast::Class(ranges)))
}

/// Expands a raw class body (like "abc", "A-E" or "x\-z") into ranges.
///
/// # Errors
/// - `PatternError::InvalidClassRange` if a range start is greater than its end (e.g., "z-a").
/// - `PatternError::DanglingClassDash` if a dash appears at the end without an end character.
/// - `PatternError::IllegalChar` if a member is outside the puzzle alphabet.
fn expand_class(body: &str) -> Result<Vec<(char, char)>, Box<PatternError>> {
    let mut ranges = Vec::new();
    let mut iter = body.chars().peekable();

    while let Some(c) = iter.next() {
        let start = class_member(c, &mut iter)?;
        if iter.peek() == Some(&'-') {
            iter.next(); // consume '-'
            match iter.next() {
                // Found a range like 'A-E'
                Some(c) => {
                    let end = class_member(c, &mut iter)?;
                    if start <= end {
                        ranges.push((start, end));
                    } else {
                        return Err(Box::new(PatternError::InvalidClassRange(start, end)));
                    }
                }
                None => return Err(Box::new(PatternError::DanglingClassDash)),
            }
        } else {
            // Found a single character
            ranges.push((start, start));
        }
    }

    Ok(ranges)
}

/// Resolve one class member, following a `\` escape if present.
fn class_member(
    c: char,
    iter: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<char, Box<PatternError>> {
    let resolved = if c == '\\' {
        iter.next().ok_or_else(|| Box::new(PatternError::DanglingEscape))?
    } else {
        c
    };
    if !resolved.is_grid_char() {
        return Err(Box::new(PatternError::IllegalChar { c: resolved }));
    }
    Ok(resolved)
}

/// One postfix quantifier: `*`, `+`, `?`, `{m}`, `{m,}` or `{m,n}`.
fn quantifier(input: &str) -> PResult<'_, (u32, Option<u32>)> {
    match input.chars().next() {
        Some('*') => Ok((&input[1..], (0, None))),
        Some('+') => Ok((&input[1..], (1, None))),
        Some('?') => Ok((&input[1..], (0, Some(1)))),
        Some('{') => braced_repeat(input),
        _ => Err(nom::Err::Error(Box::new(PatternError::NomError(ErrorKind::Char)))),
    }
}

fn braced_repeat(input: &str) -> PResult<'_, (u32, Option<u32>)> {
    // After '{' we are committed: anything malformed is a hard failure.
    let (rest, _) = tag("{")(input)?;
    let invalid = || {
        nom::Err::Failure(Box::new(PatternError::InvalidRepeat {
            input: input.chars().take(12).collect(),
        }))
    };

    let (rest, min_digits) = digit1::<_, Box<PatternError>>(rest).map_err(|_| invalid())?;
    let min: u32 = min_digits.parse().map_err(|_| invalid())?;

    // '{m}' | '{m,}' | '{m,n}'
    let (rest, max) = match tag::<_, _, Box<PatternError>>(",")(rest) {
        Err(_) => (rest, Some(min)),
        Ok((rest, _)) => match digit1::<_, Box<PatternError>>(rest) {
            Err(_) => (rest, None),
            Ok((rest, max_digits)) => {
                let max: u32 = max_digits.parse().map_err(|_| invalid())?;
                (rest, Some(max))
            }
        },
    };

    let (rest, _) = tag::<_, _, Box<PatternError>>("}")(rest).map_err(|_| invalid())?;

    if let Some(max) = max {
        if min > max {
            return Err(nom::Err::Failure(Box::new(PatternError::ReversedRepeat { min, max })));
        }
    }
    Ok((rest, (min, max)))
}
