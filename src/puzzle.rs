//! Puzzle file parsing.
//!
//! A puzzle file lists the four pattern sides in sections. Section headers
//! are a side name followed by a colon (case-insensitive); each following
//! non-empty line is one pattern. Lines starting with `#` are comments.
//!
//! ```text
//! # a 1x2 warm-up
//! left:
//! [A-GN-Z]+
//! top:
//! [D-HJ-M]
//! [^A-RU-Z]
//! right:
//! [^A-DI-S]+
//! bottom:
//! [^F-KM-Z]
//! [A-KS-V]
//! ```
//!
//! A line ending in `:` is always read as a section header, so a pattern
//! whose last character is a literal colon cannot be written in a puzzle
//! file; construct such a puzzle through the API instead.
//!
//! Sections may appear in any order. Shape checks (paired side lengths,
//! non-empty grid) are deferred to [`Solver::new`](crate::solver::Solver::new);
//! this module only cares about the file's structure.

use crate::solver::{Solver, SolverError};
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Errors in the structure of a puzzle file.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("unknown section header \"{header}\" (expected left:, top:, right:, or bottom:)")]
    UnknownSection { header: String },

    #[error("pattern \"{line}\" appears before any section header")]
    PatternOutsideSection { line: String },

    #[error("missing section(s): {missing}")]
    MissingSections { missing: String },
}

/// The four pattern lists of a puzzle, as read from a file. `left`/`right`
/// constrain the rows, `top`/`bottom` the columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub left: Vec<String>,
    pub top: Vec<String>,
    pub right: Vec<String>,
    pub bottom: Vec<String>,
}

impl Puzzle {
    /// Read and parse a puzzle file.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if the file can't be read or its structure is
    /// invalid (structural problems are wrapped as `InvalidData`).
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            io::Error::new(e.kind(), format!("failed to read {}: {e}", path.display()))
        })?;
        contents
            .parse()
            .map_err(|e: PuzzleError| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Compile the puzzle into a [`Solver`].
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if a pattern fails to compile or the sides
    /// don't describe a rectangular grid.
    pub fn into_solver(&self) -> Result<Solver, SolverError> {
        fn as_strs(side: &[String]) -> Vec<&str> {
            side.iter().map(String::as_str).collect()
        }
        Solver::new(
            &as_strs(&self.left),
            &as_strs(&self.top),
            &as_strs(&self.right),
            &as_strs(&self.bottom),
        )
    }
}

impl FromStr for Puzzle {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[derive(Clone, Copy, PartialEq)]
        enum Side {
            Left,
            Top,
            Right,
            Bottom,
        }

        let mut sides: [(Side, Vec<String>, bool); 4] = [
            (Side::Left, Vec::new(), false),
            (Side::Top, Vec::new(), false),
            (Side::Right, Vec::new(), false),
            (Side::Bottom, Vec::new(), false),
        ];
        let mut current: Option<Side> = None;

        for raw_line in s.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_suffix(':') {
                let side = match header.trim().to_ascii_lowercase().as_str() {
                    "left" => Side::Left,
                    "top" => Side::Top,
                    "right" => Side::Right,
                    "bottom" => Side::Bottom,
                    _ => {
                        return Err(PuzzleError::UnknownSection { header: line.to_string() });
                    }
                };
                sides[side as usize].2 = true;
                current = Some(side);
                continue;
            }

            match current {
                Some(side) => sides[side as usize].1.push(line.to_string()),
                None => {
                    return Err(PuzzleError::PatternOutsideSection { line: line.to_string() });
                }
            }
        }

        let missing: Vec<&str> = sides
            .iter()
            .filter(|(_, _, seen)| !seen)
            .map(|(side, _, _)| match side {
                Side::Left => "left",
                Side::Top => "top",
                Side::Right => "right",
                Side::Bottom => "bottom",
            })
            .collect();
        if !missing.is_empty() {
            return Err(PuzzleError::MissingSections { missing: missing.join(", ") });
        }

        let [(_, left, _), (_, top, _), (_, right, _), (_, bottom, _)] = sides;
        Ok(Puzzle { left, top, right, bottom })
    }
}
