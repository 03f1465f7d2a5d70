//! Front-end pipeline: scan, analyze and report

use crate::common::{CompileResult, DiagnosticReporter};
use crate::lexer::{tokenize, Token};
use crate::parser::{analyze, Program};
use crate::sema::{Storage, SymbolClass, SymbolTable};
use std::fmt::Write as _;

/// Options passed from the command line to the pipeline
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_symbols: bool,
    pub verbose: bool,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// AtomC front end
pub struct Frontend;

impl Frontend {
    pub fn new() -> Self {
        Self
    }

    /// Run the whole front end over one compilation unit.
    ///
    /// The first diagnostic is reported through the context's reporter and
    /// returned; nothing after it runs.
    pub fn compile(&self, source: &str, ctx: &CompileContext, config: &FrontendConfig) -> CompileResult<Program> {
        // Phase 1: Scanning
        if config.verbose {
            eprintln!("Scanning {}...", ctx.filename);
        }
        let tokens = match tokenize(source) {
            Ok(tokens) => tokens,
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };
        log::debug!("{}: scanned {} tokens", ctx.filename, tokens.len());

        if config.dump_tokens {
            eprintln!("=== Tokens ===");
            eprint!("{}", dump_tokens(&tokens));
            eprintln!("=== End Tokens ===\n");
        }

        // Phase 2: Parsing and analysis
        if config.verbose {
            eprintln!("Analyzing {} tokens...", tokens.len());
        }
        let program = match analyze(&tokens) {
            Ok(program) => program,
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };
        log::debug!("{}: analysis succeeded", ctx.filename);

        if config.dump_symbols {
            eprintln!("=== Symbols ===");
            eprint!("{}", dump_symbols(&program.symbols));
            eprintln!("=== End Symbols ===\n");
        }

        Ok(program)
    }
}

impl Default for Frontend {
    fn default() -> Self {
        Self::new()
    }
}

/// One token per line: `line class lexeme`
pub fn dump_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{} {} {}", token.line, token.class(), token.text());
    }
    out
}

/// Every symbol left in the table, one per line, with members and parameters indented
pub fn dump_symbols(table: &SymbolTable) -> String {
    let mut out = String::new();
    for symbol in table.iter() {
        let class = match symbol.class {
            SymbolClass::Variable => "var",
            SymbolClass::Function => "fn",
            SymbolClass::ExternFunction => "extern fn",
            SymbolClass::Struct => "struct",
        };
        match symbol.class {
            SymbolClass::Struct => {
                let _ = writeln!(out, "{} {}", class, table.name_of(symbol));
            }
            _ => {
                let _ = writeln!(out, "{} {}: {}", class, table.name_of(symbol), table.type_name(&symbol.ty));
            }
        }
        for inner in symbol.members.iter().chain(symbol.args.iter()) {
            let role = if inner.storage == Storage::Argument { "arg" } else { "member" };
            let _ = writeln!(out, "    {} {}: {}", role, table.name_of(inner), table.type_name(&inner.ty));
        }
    }
    out
}
