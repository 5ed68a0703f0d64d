use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;

use rexcross::puzzle::Puzzle;
use rexcross::solver::{SolveOutcome, SolverError};

/// Regex crossword solver
#[derive(Parser, Debug)]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about,
    long_about = None
)]
struct Cli {
    /// Path to the puzzle file (left:/top:/right:/bottom: sections)
    puzzle: String,
}

/// Entry point of the rexcross CLI.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// in a user-friendly way before exiting with code 1.
fn main() -> ExitCode {
    // Set up logging
    let debug_enabled = std::env::var("REXCROSS_DEBUG").is_ok();
    rexcross::log::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        // Print the error message to stderr, with detailed formatting if it's a SolverError
        if let Some(solver_err) = e.downcast_ref::<SolverError>() {
            eprintln!("Error: {}", solver_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        // Exit explicitly with a nonzero code so scripts can detect failure
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Core application logic for the rexcross CLI.
///
/// Steps:
/// 1. Parse CLI arguments with Clap.
/// 2. Load the puzzle file from disk.
/// 3. Compile the four pattern lists into row/column automata.
/// 4. Run the grid search and print the solution (or "no solution") on stdout.
/// 5. Print timings on stderr.
///
/// An unsolvable puzzle is a successful run; only I/O, parse, and
/// compilation failures bubble up to [`main`].
fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 1. Load and parse the puzzle file
    let t_load = Instant::now();
    let puzzle = Puzzle::load_from_path(&cli.puzzle)?;
    let load_secs = t_load.elapsed().as_secs_f64();

    // 2. Compile patterns and intersect each pair into one automaton
    let t_compile = Instant::now();
    let solver = puzzle.into_solver()?;
    let compile_secs = t_compile.elapsed().as_secs_f64();

    // 3. Solve
    let t_solve = Instant::now();
    let outcome = solver.solve();
    let solve_secs = t_solve.elapsed().as_secs_f64();

    match outcome {
        SolveOutcome::Solved(solution) => println!("{solution}"),
        SolveOutcome::Unsolvable => println!("no solution"),
    }

    // 4. Diagnostics (grid shape, timings) to stderr
    eprintln!(
        "{}x{} grid: loaded in {load_secs:.3}s, compiled in {compile_secs:.3}s, solved in {solve_secs:.3}s",
        solver.rows(),
        solver.columns(),
    );

    Ok(())
}
