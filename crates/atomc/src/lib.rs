//! AtomC front end
//!
//! Turns the source text of one AtomC compilation unit into either a
//! validated program or the first diagnostic found.
//!
//! ## Architecture
//!
//! - **Lexer** (`lexer/`): classification-ordered scanner producing tokens with line numbers
//! - **Parser** (`parser/`): recursive descent over the tokens, running every semantic check inline
//! - **Sema** (`sema/`): types, cast and promotion rules, the symbol table and predefined externals
//! - **Common** (`common/`): errors, spans and diagnostic rendering
//! - **Driver** (`driver/`): the scan then analyze pipeline used by the `atomc` binary

pub mod common;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod sema;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticKind, DiagnosticReporter, Span};
pub use driver::{CompileContext, Frontend, FrontendConfig};
pub use lexer::{tokenize, Token, TokenClass, TokenKind};
pub use parser::{analyze, Program};
