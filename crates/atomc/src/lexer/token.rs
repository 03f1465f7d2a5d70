//! Token definitions for the AtomC scanner

use crate::common::Span;
use logos::{Lexer as LogosLexer, Logos, Skip};

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of the first character of the lexeme
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, line: u32) -> Self {
        Self { kind, span, line }
    }

    /// Exact source text of the token (empty for end of input)
    pub fn text(&self) -> &str {
        self.kind.lexeme()
    }

    pub fn class(&self) -> TokenClass {
        self.kind.class()
    }
}

/// Line bookkeeping carried by the logos lexer
#[derive(Debug, Clone, Copy, Default)]
pub struct LineTracker {
    /// Newlines consumed so far inside whitespace and comments
    pub newlines: u32,
}

impl LineTracker {
    pub fn line(&self) -> u32 {
        self.newlines + 1
    }
}

/// Reason a lexeme was rejected
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    #[default]
    UnrecognizedCharacter,
    InvalidOctalLiteral,
    /// A number running straight into letters, digits or `_` (`123abc`)
    MalformedNumber,
}

fn count_newlines(lex: &mut LogosLexer<TokenKind>) -> Skip {
    let newlines = lex.slice().bytes().filter(|&b| b == b'\n').count();
    lex.extras.newlines += newlines as u32;
    Skip
}

fn lexeme(lex: &mut LogosLexer<TokenKind>) -> String {
    lex.slice().to_string()
}

fn runs_into_word(lex: &LogosLexer<TokenKind>) -> bool {
    lex.remainder()
        .bytes()
        .next()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn real_lexeme(lex: &mut LogosLexer<TokenKind>) -> Result<String, LexError> {
    if runs_into_word(lex) {
        return Err(LexError::MalformedNumber);
    }
    Ok(lex.slice().to_string())
}

/// Hex is always valid here; a leading zero selects octal, so every
/// following digit must be 0-7.
fn int_lexeme(lex: &mut LogosLexer<TokenKind>) -> Result<String, LexError> {
    if runs_into_word(lex) {
        return Err(LexError::MalformedNumber);
    }
    let s = lex.slice();
    let is_hex = s.starts_with("0x") || s.starts_with("0X");
    if !is_hex && s.starts_with('0') && s.bytes().any(|b| b > b'7') {
        return Err(LexError::InvalidOctalLiteral);
    }
    Ok(s.to_string())
}

/// All token kinds in AtomC
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = LineTracker)]
#[logos(error = LexError)]
pub enum TokenKind {
    // Consumed silently; only their newlines survive, in the line counter
    #[regex(r"//[^\n]*", count_newlines)]
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/", count_newlines)]
    #[regex(r"[ \t\r\n\f\v]+", count_newlines)]
    Trivia,

    // === Keywords ===
    #[token("break")]
    Break,
    #[token("char")]
    Char,
    #[token("double")]
    Double,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("int")]
    Int,
    #[token("return")]
    Return,
    #[token("struct")]
    Struct,
    #[token("void")]
    Void,
    #[token("while")]
    While,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", lexeme)]
    Identifier(String),

    // === Literals ===
    // A fraction or an exponent is required, so plain digits stay integers
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", real_lexeme)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", real_lexeme)]
    RealLiteral(String),

    #[regex(r"0[xX][0-9a-fA-F]+", int_lexeme)]
    #[regex(r"[0-9]+", int_lexeme)]
    IntLiteral(String),

    #[regex(r#"'(\\[abfnrtv'"\\0]|[^'\\\n])'"#, lexeme)]
    CharLiteral(String),

    #[regex(r#""(\\[abfnrtv'"\\0]|[^"\\\n])*""#, lexeme)]
    StringLiteral(String),

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Eq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Special
    Eof,
}

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Identifier,
    IntLiteral,
    RealLiteral,
    CharLiteral,
    StringLiteral,
    Operator,
    Delimiter,
    EndOfInput,
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenClass::Keyword => "KEYWORD",
            TokenClass::Identifier => "IDENTIFIER",
            TokenClass::IntLiteral => "INT_LITERAL",
            TokenClass::RealLiteral => "REAL_LITERAL",
            TokenClass::CharLiteral => "CHAR_LITERAL",
            TokenClass::StringLiteral => "STRING_LITERAL",
            TokenClass::Operator => "OPERATOR",
            TokenClass::Delimiter => "DELIMITER",
            TokenClass::EndOfInput => "END_OF_INPUT",
        };
        f.write_str(name)
    }
}

impl TokenKind {
    pub fn class(&self) -> TokenClass {
        match self {
            TokenKind::Break
            | TokenKind::Char
            | TokenKind::Double
            | TokenKind::Else
            | TokenKind::For
            | TokenKind::If
            | TokenKind::Int
            | TokenKind::Return
            | TokenKind::Struct
            | TokenKind::Void
            | TokenKind::While => TokenClass::Keyword,
            TokenKind::Identifier(_) => TokenClass::Identifier,
            TokenKind::IntLiteral(_) => TokenClass::IntLiteral,
            TokenKind::RealLiteral(_) => TokenClass::RealLiteral,
            TokenKind::CharLiteral(_) => TokenClass::CharLiteral,
            TokenKind::StringLiteral(_) => TokenClass::StringLiteral,
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::Eq
            | TokenKind::AmpAmp
            | TokenKind::PipePipe
            | TokenKind::Bang
            | TokenKind::Dot => TokenClass::Operator,
            TokenKind::Semi
            | TokenKind::Comma
            | TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::LBrace
            | TokenKind::RBrace => TokenClass::Delimiter,
            TokenKind::Trivia | TokenKind::Eof => TokenClass::EndOfInput,
        }
    }

    /// Source text of this token kind
    pub fn lexeme(&self) -> &str {
        match self {
            TokenKind::Identifier(s)
            | TokenKind::IntLiteral(s)
            | TokenKind::RealLiteral(s)
            | TokenKind::CharLiteral(s)
            | TokenKind::StringLiteral(s) => s,
            TokenKind::Break => "break",
            TokenKind::Char => "char",
            TokenKind::Double => "double",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Int => "int",
            TokenKind::Return => "return",
            TokenKind::Struct => "struct",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Eq => "=",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Dot => ".",
            TokenKind::Semi => ";",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Trivia | TokenKind::Eof => "",
        }
    }

    /// Check if this token can start a base type (`int`, `double`, `char`, `struct`)
    pub fn is_type_base(&self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Double | TokenKind::Char | TokenKind::Struct
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::IntLiteral(s) => write!(f, "integer '{}'", s),
            TokenKind::RealLiteral(s) => write!(f, "real '{}'", s),
            TokenKind::CharLiteral(s) => write!(f, "char {}", s),
            TokenKind::StringLiteral(s) => write!(f, "string {}", s),
            TokenKind::Eof | TokenKind::Trivia => write!(f, "end of input"),
            other => write!(f, "'{}'", other.lexeme()),
        }
    }
}
