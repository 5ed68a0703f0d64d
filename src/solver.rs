//! The grid solver for regex crossword puzzles.
//!
//! A puzzle is a `rows × columns` grid where every row string must match two
//! patterns (`left` and `right`) and every column string must match two
//! patterns (`top` and `bottom`). Construction intersects each pattern pair
//! into one automaton per row and per column; [`Solver::solve`] then runs a
//! depth-first backtracking search that fills the grid cell by cell while
//! tracking, for every cell, the automaton state reached along its row and
//! along its column.
//!
//! # Error Handling
//!
//! [`SolverError`] covers construction-time failures only:
//!
//! - S001: `BadPattern` (a pattern failed to compile (wraps [`PatternError`]))
//! - S002: `SideMismatch` (the two pattern lists for one axis differ in length)
//! - S003: `EmptyGrid` (zero rows or zero columns)
//!
//! Each error has a `code()`, optional `help()`, and `display_detailed()`
//! method. An unsolvable puzzle is NOT an error: `solve()` reports it as
//! [`SolveOutcome::Unsolvable`].
//!
//! # Examples
//!
//! ```
//! use rexcross::solver::{SolveOutcome, Solver};
//!
//! let solver = Solver::new(&["[A-G]+"], &["A", "B"], &["A."], &[".", "."])?;
//! match solver.solve() {
//!     SolveOutcome::Solved(solution) => println!("{solution}"),
//!     SolveOutcome::Unsolvable => println!("no solution"),
//! }
//! # Ok::<(), rexcross::solver::SolverError>(())
//! ```

use crate::automaton::{Automaton, StateId, Transition};
use crate::errors::PatternError;
use crate::parser::compile;
use log::debug;
use std::fmt;

/// Unified error type for solver construction.
///
/// This consolidates pattern-compilation failures and puzzle-shape
/// problems, so that callers only need to handle a single
/// `Result<_, SolverError>`.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// One of the four pattern lists contained a pattern that does not
    /// compile. These originate from the parser ([`PatternError`]), which we
    /// box to keep the error type size stable.
    #[error("invalid {side} pattern #{index} \"{pattern}\": {source}")]
    BadPattern {
        side: &'static str,
        index: usize,
        pattern: String,
        #[source]
        source: Box<PatternError>,
    },

    /// The two pattern lists constraining one axis differ in length. The
    /// engine refuses to guess a truncation policy.
    #[error("{first_side} has {first_len} patterns but {second_side} has {second_len}")]
    SideMismatch {
        first_side: &'static str,
        first_len: usize,
        second_side: &'static str,
        second_len: usize,
    },

    /// The puzzle has no rows or no columns.
    #[error("puzzle grid is empty ({rows} rows x {columns} columns)")]
    EmptyGrid { rows: usize, columns: usize },
}

impl SolverError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::BadPattern { .. } => "S001",
            SolverError::SideMismatch { .. } => "S002",
            SolverError::EmptyGrid { .. } => "S003",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            SolverError::BadPattern { .. } => None, // PatternError has its own help
            SolverError::SideMismatch { .. } => {
                Some("left/right must have one pattern per row; top/bottom one per column")
            }
            SolverError::EmptyGrid { .. } => {
                Some("Provide at least one row pattern pair and one column pattern pair")
            }
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            SolverError::BadPattern { source, .. } => {
                // delegate to PatternError's detailed display
                format!("{}\n  caused by: {}", self.code(), source.display_detailed())
            }
            _ => crate::errors::format_error_with_code_and_help(
                &self.to_string(),
                self.code(),
                self.help(),
            ),
        }
    }
}

/// A completed grid, one string per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    rows: Vec<String>,
}

impl Solution {
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }

    /// Column `c` read top to bottom. Handy for checking column constraints.
    #[must_use]
    pub fn column(&self, c: usize) -> String {
        self.rows.iter().filter_map(|row| row.chars().nth(c)).collect()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Outcome of a solver run. An unsolvable puzzle is an answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The first solution found under the fixed search order.
    Solved(Solution),
    /// The search exhausted every candidate without completing the grid.
    Unsolvable,
}

impl SolveOutcome {
    #[must_use]
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::Unsolvable => None,
        }
    }
}

/// The backtracking engine. Immutable once constructed; each [`Self::solve`]
/// call owns its working tables, so repeated calls return identical results
/// and independent solvers never share mutable state.
#[derive(Debug)]
pub struct Solver {
    /// One automaton per row: intersection of the row's left and right patterns.
    row_automata: Vec<Automaton>,
    /// One automaton per column: intersection of the column's top and bottom patterns.
    column_automata: Vec<Automaton>,
    rows: usize,
    columns: usize,
}

impl Solver {
    /// Build a solver from the four pattern lists. `left`/`right` constrain
    /// the rows (one pattern pair per row), `top`/`bottom` the columns.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the paired lists differ in length, the
    /// grid would be empty, or any pattern fails to compile. No search has
    /// begun by the time an error is returned.
    pub fn new(
        left: &[&str],
        top: &[&str],
        right: &[&str],
        bottom: &[&str],
    ) -> Result<Self, SolverError> {
        if left.len() != right.len() {
            return Err(SolverError::SideMismatch {
                first_side: "left",
                first_len: left.len(),
                second_side: "right",
                second_len: right.len(),
            });
        }
        if top.len() != bottom.len() {
            return Err(SolverError::SideMismatch {
                first_side: "top",
                first_len: top.len(),
                second_side: "bottom",
                second_len: bottom.len(),
            });
        }
        if left.is_empty() || top.is_empty() {
            return Err(SolverError::EmptyGrid { rows: left.len(), columns: top.len() });
        }

        let row_automata = intersect_side("left", left, "right", right)?;
        let column_automata = intersect_side("top", top, "bottom", bottom)?;

        Ok(Solver {
            rows: left.len(),
            columns: top.len(),
            row_automata,
            column_automata,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Run the search. Deterministic: the same solver instance always
    /// returns the same outcome.
    #[must_use]
    pub fn solve(&self) -> SolveOutcome {
        let mut chars = CharTable::new(self.rows, self.columns);
        let mut states = PositionTable::new(
            self.rows,
            self.columns,
            &self.row_automata,
            &self.column_automata,
        );

        if self.try_cell(0, &mut states, &mut chars) {
            let solution = chars.into_solution();
            debug!("solved:\n{solution}");
            SolveOutcome::Solved(solution)
        } else {
            debug!("search exhausted with no solution");
            SolveOutcome::Unsolvable
        }
    }

    /// Try to fill cell `cell` (row-major flat index) and everything after it.
    ///
    /// Candidates come from joining the predecessor row state's transitions
    /// (outer loop) with the predecessor column state's transitions (inner
    /// loop); that fixed order plus the sorted transition lists determines
    /// which solution is returned when several exist. Failed trials need no
    /// rollback: a cell's table entries are always rewritten before they are
    /// read again, because the search only ever reads entries at or before
    /// the cell it is filling.
    fn try_cell(&self, cell: usize, states: &mut PositionTable, chars: &mut CharTable) -> bool {
        let row = cell / self.columns;
        let column = cell % self.columns;

        let row_automaton = &self.row_automata[row];
        let column_automaton = &self.column_automata[column];
        let row_state = states.row_state_before(row, column);
        let column_state = states.column_state_above(row, column);

        for t1 in row_automaton.transitions(row_state) {
            for t2 in column_automaton.transitions(column_state) {
                let Some(c) = join_transitions(t1, t2) else {
                    continue;
                };

                states.set(row, column, t1.dest, t2.dest);
                chars.set(row, column, c);

                // Boundary acceptance: the last cell of a column must leave
                // the column automaton accepting; likewise for rows.
                if row + 1 == self.rows && !column_automaton.is_accept(t2.dest) {
                    continue;
                }
                if column + 1 == self.columns && !row_automaton.is_accept(t1.dest) {
                    continue;
                }

                if cell + 1 == self.rows * self.columns {
                    return true;
                }
                if self.try_cell(cell + 1, states, chars) {
                    return true;
                }
            }
        }
        false
    }
}

/// Join two transitions: a candidate exists iff their character ranges
/// overlap. The representative character is the smallest overlap member;
/// both automata treat the whole overlap as one edge, so any member reaches
/// the same pair of destination states.
fn join_transitions(t1: &Transition, t2: &Transition) -> Option<char> {
    let min = if t1.min < t2.min { t2.min } else { t1.min };
    let max = if t1.max < t2.max { t1.max } else { t2.max };
    (min <= max).then_some(min)
}

/// Compile and intersect one axis worth of pattern pairs.
fn intersect_side(
    side_a: &'static str,
    patterns_a: &[&str],
    side_b: &'static str,
    patterns_b: &[&str],
) -> Result<Vec<Automaton>, SolverError> {
    let compile_one = |side, index, pattern: &str| {
        compile(pattern).map_err(|source| SolverError::BadPattern {
            side,
            index,
            pattern: pattern.to_string(),
            source,
        })
    };

    patterns_a
        .iter()
        .zip(patterns_b)
        .enumerate()
        .map(|(index, (a, b))| {
            let automaton_a = compile_one(side_a, index, a)?;
            let automaton_b = compile_one(side_b, index, b)?;
            let product = automaton_a.intersect(&automaton_b);
            debug!(
                "{side_a}/{side_b} {index}: {} x {} -> {} states",
                automaton_a.state_count(),
                automaton_b.state_count(),
                product.state_count()
            );
            Ok(product)
        })
        .collect()
}

/// The tentatively placed characters, row-major. Each trial at a cell
/// overwrites the previous trial; the table is only read out after the whole
/// search succeeds.
struct CharTable {
    rows: usize,
    columns: usize,
    cells: Vec<char>,
}

impl CharTable {
    fn new(rows: usize, columns: usize) -> Self {
        // '\0' is a placeholder; the search writes every cell before the
        // table is ever read.
        CharTable { rows, columns, cells: vec!['\0'; rows * columns] }
    }

    fn set(&mut self, row: usize, column: usize, value: char) {
        self.cells[row * self.columns + column] = value;
    }

    fn into_solution(self) -> Solution {
        let rows = (0..self.rows)
            .map(|row| {
                self.cells[row * self.columns..(row + 1) * self.columns]
                    .iter()
                    .collect()
            })
            .collect();
        Solution { rows }
    }
}

/// Per-cell record of automaton progress: entry `(row, column)` holds the
/// row-automaton state after consuming the row prefix ending at `column`,
/// and the column-automaton state after consuming the column prefix ending
/// at `row`. Padded by one border row and column holding the initial states,
/// which are never mutated; the off-axis half of a border entry is never
/// read.
struct PositionTable {
    columns: usize,
    entries: Vec<(StateId, StateId)>,
}

impl PositionTable {
    fn new(
        rows: usize,
        columns: usize,
        row_automata: &[Automaton],
        column_automata: &[Automaton],
    ) -> Self {
        let mut table = PositionTable {
            columns,
            entries: vec![(0, 0); (rows + 1) * (columns + 1)],
        };
        for (row, automaton) in row_automata.iter().enumerate() {
            let index = table.index(row + 1, 0);
            table.entries[index].0 = automaton.initial();
        }
        for (column, automaton) in column_automata.iter().enumerate() {
            let index = table.index(0, column + 1);
            table.entries[index].1 = automaton.initial();
        }
        table
    }

    /// Index in padded coordinates (grid cell `(r, c)` lives at `(r+1, c+1)`).
    fn index(&self, padded_row: usize, padded_column: usize) -> usize {
        padded_row * (self.columns + 1) + padded_column
    }

    /// Row-automaton state reached just before `(row, column)`: the entry at
    /// `(row, column - 1)`, which for `column == 0` is the border holding
    /// the row automaton's initial state.
    fn row_state_before(&self, row: usize, column: usize) -> StateId {
        self.entries[self.index(row + 1, column)].0
    }

    /// Column-automaton state reached just above `(row, column)`.
    fn column_state_above(&self, row: usize, column: usize) -> StateId {
        self.entries[self.index(row, column + 1)].1
    }

    fn set(&mut self, row: usize, column: usize, row_state: StateId, column_state: StateId) {
        let index = self.index(row + 1, column + 1);
        self.entries[index] = (row_state, column_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(left: &[&str], top: &[&str], right: &[&str], bottom: &[&str]) -> SolveOutcome {
        Solver::new(left, top, right, bottom).unwrap().solve()
    }

    fn solved_rows(outcome: &SolveOutcome) -> Vec<String> {
        outcome.solution().expect("expected a solution").rows().to_vec()
    }

    #[test]
    fn test_single_cell_forced() {
        let outcome = solve(&["A"], &["A"], &["A"], &["A"]);
        assert_eq!(solved_rows(&outcome), vec!["A"]);
    }

    #[test]
    fn test_single_cell_contradiction() {
        // left wants A, right wants B: the row intersection is empty
        let outcome = solve(&["A"], &["."], &["B"], &["."]);
        assert_eq!(outcome, SolveOutcome::Unsolvable);
    }

    #[test]
    fn test_one_by_two_forced() {
        let outcome = solve(&["A."], &["A", "B"], &[".B"], &[".", "."]);
        assert_eq!(solved_rows(&outcome), vec!["AB"]);
    }

    #[test]
    fn test_fully_permissive_grid() {
        // Every pattern matches everything: a solution must still exist and
        // have the right shape.
        let outcome = solve(&[".*", ".*"], &[".+", ".+"], &[".+", ".+"], &[".*", ".*"]);
        let rows = solved_rows(&outcome);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.chars().count() == 2));
    }

    #[test]
    fn test_class_intersection_puzzle() {
        // 1x2 grid where every cell is forced through range arithmetic:
        // row: [A-GN-Z]+ ∩ [^A-DI-S]+ per cell -> {E,F,G} ∪ {T..Z}
        // col 0: [D-HJ-M] ∩ [^F-KM-Z] -> {D,E,L}; with the row: E
        // col 1: [^A-RU-Z] ∩ [A-KS-V] -> {S,T}; with the row: T
        let outcome = solve(
            &["[A-GN-Z]+"],
            &["[D-HJ-M]", "[^A-RU-Z]"],
            &["[^A-DI-S]+"],
            &["[^F-KM-Z]", "[A-KS-V]"],
        );
        assert_eq!(solved_rows(&outcome), vec!["ET"]);
    }

    #[test]
    fn test_backtracking_across_rows() {
        // Column patterns only admit "AB" read downward; the permissive row
        // patterns force the search to backtrack through row choices.
        let outcome = solve(
            &["[AB]", "[AB]"],
            &["AB|BA"],
            &["[AB]", "[AB]"],
            &["A."],
        );
        assert_eq!(solved_rows(&outcome), vec!["A", "B"]);
    }

    #[test]
    fn test_row_boundary_rejection() {
        // Row automaton accepts only after 2 chars; column constraints would
        // happily stop after 1. The grid is 1x2 so the row must accept at
        // the last column.
        let outcome = solve(&["AB"], &["A", "B"], &[".."], &[".", "."]);
        assert_eq!(solved_rows(&outcome), vec!["AB"]);

        let outcome = solve(&["ABC"], &["A", "B"], &["..."], &[".", "."]);
        assert_eq!(outcome, SolveOutcome::Unsolvable, "3-char row cannot fit 2 columns");
    }

    #[test]
    fn test_column_boundary_rejection() {
        let outcome = solve(&["A", "B", "C"], &["ABC"], &[".", ".", "."], &["..."]);
        assert_eq!(solved_rows(&outcome), vec!["A", "B", "C"]);

        let outcome = solve(&["A", "B"], &["ABC"], &[".", "."], &["..."]);
        assert_eq!(outcome, SolveOutcome::Unsolvable, "3-char column cannot fit 2 rows");
    }

    #[test]
    fn test_alternation_puzzle() {
        // 2x3 grid with alternations and repeats on both axes; the
        // constraints pin down exactly one grid.
        let left = ["HE[XY]", "LOW|OWL"];
        let top = ["[HL]+", "E[OU]", "[WY]{2}"];
        let right = ["[A-Z]+", ".O."];
        let bottom = ["H.", ".*", "Y."];
        let outcome = solve(&left, &top, &right, &bottom);
        let rows = solved_rows(&outcome);
        assert_eq!(rows, vec!["HEY", "LOW"]);

        // Verify the grid against the automata directly.
        let solver = Solver::new(&left, &top, &right, &bottom).unwrap();
        for (r, row) in rows.iter().enumerate() {
            assert!(solver.row_automata[r].accepts(row), "row {r} \"{row}\" rejected");
        }
        for (c, automaton) in solver.column_automata.iter().enumerate() {
            let column: String = rows.iter().map(|row| row.chars().nth(c).unwrap()).collect();
            assert!(automaton.accepts(&column), "column {c} \"{column}\" rejected");
        }
    }

    #[test]
    fn test_deterministic_repeated_solves() {
        let solver = Solver::new(
            &[".*", ".*"],
            &["[A-Z]+", "[A-Z]+"],
            &[".*", ".*"],
            &[".+", ".+"],
        )
        .unwrap();
        let first = solver.solve();
        let second = solver.solve();
        assert_eq!(first, second);
        assert!(first.solution().is_some());
    }

    #[test]
    fn test_empty_pattern_makes_puzzle_unsolvable() {
        // "" denotes the empty-string language; no 1-char row can match it.
        let outcome = solve(&[""], &["."], &[".*"], &["."]);
        assert_eq!(outcome, SolveOutcome::Unsolvable);
    }

    mod join {
        use super::*;

        fn t(min: char, max: char) -> Transition {
            Transition { min, max, dest: 0 }
        }

        #[test]
        fn test_join_overlap_yields_smallest_common_char() {
            assert_eq!(join_transitions(&t('a', 'f'), &t('c', 'z')), Some('c'));
            assert_eq!(join_transitions(&t('c', 'z'), &t('a', 'f')), Some('c'));
        }

        #[test]
        fn test_join_containment() {
            assert_eq!(join_transitions(&t('a', 'z'), &t('m', 'p')), Some('m'));
        }

        #[test]
        fn test_join_single_char_overlap() {
            assert_eq!(join_transitions(&t('a', 'm'), &t('m', 'z')), Some('m'));
        }

        #[test]
        fn test_join_disjoint_is_none() {
            assert_eq!(join_transitions(&t('a', 'c'), &t('d', 'z')), None);
            assert_eq!(join_transitions(&t('x', 'z'), &t('a', 'b')), None);
        }

        #[test]
        fn test_join_identical_ranges() {
            assert_eq!(join_transitions(&t('p', 'p'), &t('p', 'p')), Some('p'));
        }
    }

    mod construction_errors {
        use super::*;

        #[test]
        fn test_side_mismatch_left_right() {
            let err = Solver::new(&["A", "B"], &["A"], &["A"], &["A"]).unwrap_err();
            assert!(matches!(
                err,
                SolverError::SideMismatch { first_side: "left", first_len: 2, second_len: 1, .. }
            ));
            assert_eq!(err.code(), "S002");
        }

        #[test]
        fn test_side_mismatch_top_bottom() {
            let err = Solver::new(&["A"], &["A", "B"], &["A"], &["A"]).unwrap_err();
            assert!(matches!(err, SolverError::SideMismatch { first_side: "top", .. }));
        }

        #[test]
        fn test_empty_grid_rejected() {
            let err = Solver::new(&[], &["A"], &[], &["A"]).unwrap_err();
            assert!(matches!(err, SolverError::EmptyGrid { rows: 0, columns: 1 }));
            assert_eq!(err.code(), "S003");
        }

        #[test]
        fn test_bad_pattern_carries_side_and_index() {
            let err = Solver::new(&["A", "(B"], &["A", "B"], &["A", "B"], &["A", "B"]).unwrap_err();
            match &err {
                SolverError::BadPattern { side, index, pattern, source } => {
                    assert_eq!(*side, "left");
                    assert_eq!(*index, 1);
                    assert_eq!(pattern, "(B");
                    assert!(matches!(**source, PatternError::UnclosedGroup));
                }
                other => panic!("expected BadPattern, got {other:?}"),
            }
            assert_eq!(err.code(), "S001");
            assert!(err.display_detailed().contains("caused by"));
        }

        #[test]
        fn test_error_codes_are_unique_and_help_is_present() {
            let errors = [
                Solver::new(&["("], &["A"], &["("], &["A"]).unwrap_err(),
                Solver::new(&["A"], &["A"], &[], &["A"]).unwrap_err(),
                Solver::new(&[], &[], &[], &[]).unwrap_err(),
            ];
            let codes: std::collections::HashSet<_> =
                errors.iter().map(SolverError::code).collect();
            assert_eq!(codes.len(), 3);
            for err in &errors {
                let detailed = err.display_detailed();
                assert!(detailed.contains("S0"), "detailed display must carry the code");
            }
        }
    }

    mod solution_type {
        use super::*;

        #[test]
        fn test_display_joins_rows_with_newlines() {
            let solution = Solution { rows: vec!["AB".to_string(), "CD".to_string()] };
            assert_eq!(solution.to_string(), "AB\nCD");
        }

        #[test]
        fn test_column_readout() {
            let solution = Solution { rows: vec!["AB".to_string(), "CD".to_string()] };
            assert_eq!(solution.column(0), "AC");
            assert_eq!(solution.column(1), "BD");
        }
    }
}
