//! Integration tests for the regex crossword solver.
//!
//! These tests verify the complete pipeline from puzzle-file parsing through
//! pattern compilation and grid search, cross-checking solved grids against
//! an independent regex engine (fancy-regex).

use fancy_regex::Regex;
use rexcross::puzzle::Puzzle;
use rexcross::solver::{SolveOutcome, Solution, Solver};
use std::path::PathBuf;

/// Load a puzzle fixture by file name
fn load_fixture(name: &str) -> Puzzle {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    Puzzle::load_from_path(&path).expect("failed to load fixture")
}

/// Rewrite a dialect pattern into fancy-regex syntax. The dialect treats
/// `[` and `&` inside a character class as plain members, while fancy-regex
/// reads them as nested-class and intersection syntax, so they must be
/// escaped before handing the pattern to the verifier.
fn to_verifier_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut in_class = false;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push('[');
            }
            '[' | '&' if in_class => {
                out.push('\\');
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Whole-string match against an independent regex engine
fn whole_match(pattern: &str, text: &str) -> bool {
    let translated = to_verifier_pattern(pattern);
    let re = Regex::new(&format!("^(?:{translated})$")).expect("fixture pattern must be valid");
    re.is_match(text).expect("match must not error")
}

/// Check a solved grid against all four pattern lists
fn assert_grid_satisfies(puzzle: &Puzzle, solution: &Solution) {
    for (r, row) in solution.rows().iter().enumerate() {
        assert!(
            whole_match(&puzzle.left[r], row),
            "row {r} \"{row}\" fails left pattern \"{}\"",
            puzzle.left[r]
        );
        assert!(
            whole_match(&puzzle.right[r], row),
            "row {r} \"{row}\" fails right pattern \"{}\"",
            puzzle.right[r]
        );
    }
    for c in 0..puzzle.top.len() {
        let column = solution.column(c);
        assert!(
            whole_match(&puzzle.top[c], &column),
            "column {c} \"{column}\" fails top pattern \"{}\"",
            puzzle.top[c]
        );
        assert!(
            whole_match(&puzzle.bottom[c], &column),
            "column {c} \"{column}\" fails bottom pattern \"{}\"",
            puzzle.bottom[c]
        );
    }
}

#[cfg(test)]
mod verifier_translation {
    use super::*;

    #[test]
    fn test_bracket_class_member_is_escaped_for_the_verifier() {
        // '[' needs no escape inside a dialect class, but the verifier
        // would read '[[' as a nested class.
        assert_eq!(to_verifier_pattern("[[HEL ]+P.+"), "[\\[HEL ]+P.+");
        assert!(whole_match("[[HEL ]+P.+", "HELP ME"));
        assert!(whole_match("[[HEL ]+P.+", "[LEHP!"));
        assert!(!whole_match("[[HEL ]+P.+", "HELP"));
    }

    #[test]
    fn test_class_ampersand_is_escaped_for_the_verifier() {
        assert_eq!(to_verifier_pattern("[a&b]"), "[a\\&b]");
        assert!(whole_match("[a&b]", "&"));
    }

    #[test]
    fn test_escapes_and_plain_patterns_pass_through() {
        assert_eq!(to_verifier_pattern("a\\[b"), "a\\[b");
        assert_eq!(to_verifier_pattern("[A-Z]+[0-9]"), "[A-Z]+[0-9]");
        assert_eq!(to_verifier_pattern("[^AINED]+"), "[^AINED]+");
    }
}

#[cfg(test)]
mod fixture_puzzles {
    use super::*;

    #[test]
    fn test_et_puzzle_has_unique_forced_solution() {
        let puzzle = load_fixture("et.txt");
        let outcome = puzzle.into_solver().unwrap().solve();
        let solution = outcome.solution().expect("ET puzzle is solvable");
        assert_eq!(solution.rows(), ["ET"]);
        assert_grid_satisfies(&puzzle, solution);
    }

    #[test]
    fn test_help_puzzle_solves_and_satisfies_all_patterns() {
        let puzzle = load_fixture("help.txt");
        let solver = puzzle.into_solver().unwrap();
        assert_eq!(solver.rows(), 4);
        assert_eq!(solver.columns(), 7);

        let outcome = solver.solve();
        let solution = outcome.solution().expect("4x7 puzzle is solvable");
        assert_eq!(solution.rows().len(), 4);
        for row in solution.rows() {
            assert_eq!(row.chars().count(), 7);
        }
        assert_grid_satisfies(&puzzle, solution);
    }
}

#[cfg(test)]
mod search_order {
    use super::*;

    #[test]
    fn test_unconstrained_cell_gets_smallest_printable_char() {
        // Every pattern admits everything; the search takes the smallest
        // character of the first transition overlap, which is a space.
        let solver = Solver::new(&["."], &["."], &["."], &["."]).unwrap();
        assert_eq!(solver.solve().solution().unwrap().rows(), [" "]);
    }

    #[test]
    fn test_first_of_several_solutions_is_stable() {
        // [AB] x [AB] admits both A and B; the sorted transition order
        // makes A the first candidate.
        let solver = Solver::new(&["[AB]"], &["[AB]"], &["."], &["."]).unwrap();
        assert_eq!(solver.solve().solution().unwrap().rows(), ["A"]);
    }

    #[test]
    fn test_independent_solvers_agree() {
        let build = || {
            Solver::new(
                &["[A-Z]+", "[A-Z]+"],
                &[".*", ".*"],
                &["..", ".."],
                &[".+", ".+"],
            )
            .unwrap()
        };
        assert_eq!(build().solve(), build().solve());
    }
}

#[cfg(test)]
mod unsolvable_puzzles {
    use super::*;

    /// Brute-force check over the whole printable alphabet: a 1x1 puzzle is
    /// solvable iff some character satisfies all four patterns.
    fn brute_force_1x1(left: &str, top: &str, right: &str, bottom: &str) -> bool {
        (' '..='~').any(|c| {
            let s = c.to_string();
            whole_match(left, &s)
                && whole_match(top, &s)
                && whole_match(right, &s)
                && whole_match(bottom, &s)
        })
    }

    #[test]
    fn test_unsolvable_agrees_with_brute_force() {
        let cases = [
            ("[A-C]", "[X-Z]", ".", "."),
            ("[^ -~]", ".", ".", "."),
            ("A", "A", "A", "B"),
            ("[0-9]", "[a-z]", ".", "."),
        ];
        for (left, top, right, bottom) in cases {
            assert!(!brute_force_1x1(left, top, right, bottom), "case is solvable after all");
            let outcome = Solver::new(&[left], &[top], &[right], &[bottom])
                .unwrap()
                .solve();
            assert_eq!(outcome, SolveOutcome::Unsolvable, "{left}/{top}/{right}/{bottom}");
        }
    }

    #[test]
    fn test_solvable_1x1_agrees_with_brute_force() {
        let cases = [
            ("[A-C]", "[B-D]", ".", "."),
            ("\\.", ".", "[.!?]", "."),
            (" ", ".", ". ?", " *"),
        ];
        for (left, top, right, bottom) in cases {
            assert!(brute_force_1x1(left, top, right, bottom), "case is not solvable");
            let solver = Solver::new(&[left], &[top], &[right], &[bottom]).unwrap();
            let outcome = solver.solve();
            let solution = outcome.solution().expect("solver must find the witness");
            assert_grid_satisfies(
                &Puzzle {
                    left: vec![left.to_string()],
                    top: vec![top.to_string()],
                    right: vec![right.to_string()],
                    bottom: vec![bottom.to_string()],
                },
                solution,
            );
        }
    }

    #[test]
    fn test_length_conflict_is_unsolvable() {
        // Rows demand 3 characters but the grid only has 2 columns.
        let outcome = Solver::new(&["..."], &[".", "."], &[".*"], &[".*", ".*"])
            .unwrap()
            .solve();
        assert_eq!(outcome, SolveOutcome::Unsolvable);
    }
}

#[cfg(test)]
mod puzzle_files {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_missing_file_reports_path() {
        let err = Puzzle::load_from_path("tests/fixtures/no_such_puzzle.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("no_such_puzzle.txt"));
    }

    #[test]
    fn test_structurally_invalid_file_is_invalid_data() {
        let dir = std::env::temp_dir().join("rexcross_test_bad_puzzle");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.txt");
        std::fs::write(&path, "left:\nA\nsideways:\nB\n").unwrap();

        let err = Puzzle::load_from_path(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("sideways"));
    }
}
