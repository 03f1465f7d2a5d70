//! Lexer implementation using logos

use super::token::{LexError, Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for AtomC source code
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            at_eof: false,
        }
    }

    /// Get the next token. Whitespace and comments never reach the caller.
    pub fn next_token(&mut self) -> CompileResult<Token> {
        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len), self.line()));
        }

        // Token line is taken after the preceding trivia has been skipped
        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::from(span), self.line()))
            }
            Some(Err(err)) => {
                let span = self.inner.span();
                let slice = self.inner.slice();
                let message = match err {
                    LexError::UnrecognizedCharacter => {
                        let c = slice.chars().next().unwrap_or('\0');
                        format!("unrecognized character '{}'", c.escape_default())
                    }
                    LexError::InvalidOctalLiteral => {
                        format!("invalid digit in octal literal '{}'", slice)
                    }
                    LexError::MalformedNumber => {
                        let rest: String = self
                            .inner
                            .remainder()
                            .chars()
                            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                            .collect();
                        format!("malformed number '{}{}'", slice, rest)
                    }
                };
                Err(CompileError::lexical(
                    message,
                    slice,
                    Span::from(span),
                    self.line(),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len), self.line()))
            }
        }
    }

    /// Tokenize the entire source and return all tokens, ending with `Eof`
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        log::debug!("scanned {} tokens", tokens.len());
        Ok(tokens)
    }

    /// Current 1-based line
    pub fn line(&self) -> u32 {
        self.inner.extras.line()
    }

}

/// Turn source text into its token sequence, terminated by one `Eof` token
pub fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
    Lexer::new(source).tokenize_all()
}
