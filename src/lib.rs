// Reusable library API for the regex-crossword solver
mod alphabet;
pub mod automaton;
pub mod errors;
pub mod log;
pub mod parser;
pub mod puzzle;
pub mod solver;
