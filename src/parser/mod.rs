mod nfa;
pub mod syntax;

pub use syntax::Ast;

use crate::automaton::Automaton;
use crate::errors::PatternError;

/// Compile a pattern string into a deterministic automaton.
///
/// # Errors
///
/// Returns `Box<PatternError>` if the pattern is not valid in the dialect
/// (see [`syntax`] for the supported syntax).
pub fn compile(pattern: &str) -> Result<Automaton, Box<PatternError>> {
    let ast: Ast = pattern.parse()?;
    Ok(nfa::build(&ast))
}
