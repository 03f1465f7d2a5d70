//! AtomC front end
//!
//! Usage: atomc [OPTIONS] <input>

use anyhow::Context;
use atomc::common::DiagnosticReporter;
use atomc::driver::{CompileContext, Frontend, FrontendConfig};
use clap::Parser as ClapParser;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "atomc")]
#[command(author = "AtomC Team")]
#[command(version = "0.1.0")]
#[command(about = "Scanner and semantic analyzer for the AtomC language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Print the token sequence (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Print the global symbol table after a successful analysis
    #[arg(long)]
    dump_symbols: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_symbols: args.dump_symbols,
        verbose: args.verbose,
    };

    log::info!("analyzing {}", filename);
    let ctx = CompileContext::new(filename.clone(), file_id, &reporter);
    let program = Frontend::new().compile(&source, &ctx, &config)?;

    if args.verbose {
        eprintln!("{}: ok ({} tokens)", filename, program.cursor + 1);
    }

    Ok(())
}
