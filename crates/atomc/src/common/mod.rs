//! Common infrastructure shared by the scanner, parser and driver

mod error;
mod span;

pub use error::{CompileError, CompileResult, DiagnosticKind, DiagnosticReporter};
pub use span::Span;
