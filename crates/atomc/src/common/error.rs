//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream};
use thiserror::Error;
use super::Span;

/// Category of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Semantic,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "lexical error"),
            DiagnosticKind::Syntax => write!(f, "syntax error"),
            DiagnosticKind::Semantic => write!(f, "semantic error"),
        }
    }
}

/// Fatal compile error. The first one raised aborts the run.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("line {line}: {message}")]
    Lexical {
        message: String,
        lexeme: String,
        span: Span,
        line: u32,
    },

    #[error("line {line}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        span: Span,
        line: u32,
    },

    #[error("line {line}: {message}")]
    Semantic {
        message: String,
        span: Span,
        line: u32,
    },
}

impl CompileError {
    pub fn lexical(message: impl Into<String>, lexeme: impl Into<String>, span: Span, line: u32) -> Self {
        Self::Lexical {
            message: message.into(),
            lexeme: lexeme.into(),
            span,
            line,
        }
    }

    pub fn syntax(expected: impl Into<String>, found: impl Into<String>, span: Span, line: u32) -> Self {
        Self::Syntax {
            expected: expected.into(),
            found: found.into(),
            span,
            line,
        }
    }

    pub fn semantic(message: impl Into<String>, span: Span, line: u32) -> Self {
        Self::Semantic {
            message: message.into(),
            span,
            line,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            CompileError::Lexical { .. } => DiagnosticKind::Lexical,
            CompileError::Syntax { .. } => DiagnosticKind::Syntax,
            CompileError::Semantic { .. } => DiagnosticKind::Semantic,
        }
    }

    /// 1-based line of the offending token
    pub fn line(&self) -> u32 {
        match self {
            CompileError::Lexical { line, .. }
            | CompileError::Syntax { line, .. }
            | CompileError::Semantic { line, .. } => *line,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CompileError::Lexical { span, .. }
            | CompileError::Syntax { span, .. }
            | CompileError::Semantic { span, .. } => *span,
        }
    }

    /// Human-readable message without the line prefix
    pub fn message(&self) -> String {
        match self {
            CompileError::Lexical { message, .. } | CompileError::Semantic { message, .. } => {
                message.clone()
            }
            CompileError::Syntax { expected, found, .. } => {
                format!("expected {}, found {}", expected, found)
            }
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    fn diagnostic(&self, file_id: usize, error: &CompileError) -> Diagnostic<usize> {
        match error {
            CompileError::Lexical { message, span, .. } => Diagnostic::error()
                .with_message("Lexical error")
                .with_labels(vec![
                    Label::primary(file_id, *span).with_message(message)
                ]),

            CompileError::Syntax { expected, found, span, .. } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, *span)
                        .with_message(format!("expected {}", expected))
                ])
                .with_notes(vec![format!("found {}", found)]),

            CompileError::Semantic { message, span, .. } => Diagnostic::error()
                .with_message("Semantic error")
                .with_labels(vec![
                    Label::primary(file_id, *span).with_message(message)
                ]),
        }
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = self.diagnostic(file_id, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }

    /// Render a diagnostic without colors, for logs and tests
    pub fn render(&self, file_id: usize, error: &CompileError) -> String {
        let diagnostic = self.diagnostic(file_id, error);
        let mut buffer = NoColor::new(Vec::new());
        if term::emit(&mut buffer, &self.config, &self.files, &diagnostic).is_err() {
            return error.to_string();
        }
        String::from_utf8_lossy(&buffer.into_inner()).into_owned()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
