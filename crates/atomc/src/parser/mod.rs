//! Parser and inline semantic analyzer

mod const_eval;
mod expr;
#[allow(clippy::module_inception)]
mod parser;

pub use parser::{Parser, Program};

use crate::common::CompileResult;
use crate::lexer::Token;

/// Validate a scanned token sequence, ending in `Eof`, as an AtomC program
pub fn analyze(tokens: &[Token]) -> CompileResult<Program> {
    Parser::new(tokens)?.parse()
}
