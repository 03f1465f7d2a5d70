//! Restricted evaluator for array sizes
//!
//! Only integer literals, `+ - * / %` and parentheses may appear between the
//! brackets of an array declaration. The value is computed on the spot, with
//! overflow and division by zero reported as errors.

use crate::common::{CompileError, CompileResult};
use crate::lexer::literal::parse_int;
use crate::lexer::{Token, TokenKind};

pub(super) struct ConstEvaluator<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> ConstEvaluator<'t> {
    /// Evaluate starting at the first token of `tokens`, which must contain
    /// a trailing `Eof`
    pub(super) fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Returns the value and the number of tokens it spans
    pub(super) fn evaluate(mut self) -> CompileResult<(i64, usize)> {
        let value = self.expr()?;
        Ok((value, self.pos))
    }

    fn current(&self) -> CompileResult<&'t Token> {
        self.tokens
            .get(self.pos)
            .ok_or_else(|| CompileError::syntax("']'", "end of input", Default::default(), 0))
    }

    fn peek_kind(&self) -> Option<&'t TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    /// `expr := term (('+' | '-') term)*`
    fn expr(&mut self) -> CompileResult<i64> {
        let mut value = self.term()?;
        while let Some(op @ (TokenKind::Plus | TokenKind::Minus)) = self.peek_kind() {
            let token = self.current()?;
            self.pos += 1;
            let rhs = self.term()?;
            let result = match op {
                TokenKind::Plus => value.checked_add(rhs),
                _ => value.checked_sub(rhs),
            };
            value = result.ok_or_else(|| overflow(token))?;
        }
        Ok(value)
    }

    /// `term := unary (('*' | '/' | '%') unary)*`
    fn term(&mut self) -> CompileResult<i64> {
        let mut value = self.unary()?;
        while let Some(op @ (TokenKind::Star | TokenKind::Slash | TokenKind::Percent)) = self.peek_kind() {
            let token = self.current()?;
            self.pos += 1;
            let rhs = self.unary()?;
            if rhs == 0 && !matches!(op, TokenKind::Star) {
                return Err(CompileError::semantic("division by zero in array size", token.span, token.line));
            }
            let result = match op {
                TokenKind::Star => value.checked_mul(rhs),
                TokenKind::Slash => value.checked_div(rhs),
                _ => value.checked_rem(rhs),
            };
            value = result.ok_or_else(|| overflow(token))?;
        }
        Ok(value)
    }

    /// `unary := ('-' | '+') unary | primary`
    fn unary(&mut self) -> CompileResult<i64> {
        match self.peek_kind() {
            Some(TokenKind::Minus) => {
                let token = self.current()?;
                self.pos += 1;
                self.unary()?.checked_neg().ok_or_else(|| overflow(token))
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    /// `primary := INT | '(' expr ')'`
    fn primary(&mut self) -> CompileResult<i64> {
        let token = self.current()?;
        match &token.kind {
            TokenKind::IntLiteral(text) => {
                self.pos += 1;
                parse_int(text).map_err(|e| CompileError::lexical(e.to_string(), text.as_str(), token.span, token.line))
            }
            TokenKind::LParen => {
                self.pos += 1;
                let value = self.expr()?;
                let close = self.current()?;
                if !matches!(close.kind, TokenKind::RParen) {
                    return Err(CompileError::syntax("')'", close.kind.to_string(), close.span, close.line));
                }
                self.pos += 1;
                Ok(value)
            }
            other => Err(CompileError::semantic(
                format!("array size must be a constant integer expression, found {}", other),
                token.span,
                token.line,
            )),
        }
    }
}

fn overflow(token: &Token) -> CompileError {
    CompileError::semantic("array size overflows", token.span, token.line)
}
