//! Lexer module for tokenizing AtomC source code

mod token;
mod scanner;
pub mod literal;

pub use token::{LexError, LineTracker, Token, TokenClass, TokenKind};
pub use scanner::{tokenize, Lexer};
