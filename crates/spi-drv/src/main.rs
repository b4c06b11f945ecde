//! `spi` — a thin driver that lexes, parses, analyzes, and interprets a
//! single Pascal-subset source file. All real work happens in the four
//! library crates this binary only orchestrates.

mod config;
mod error;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::{fmt, EnvFilter};

use config::Config;
use error::{PascalError, Result};
use spi_interp::Interpreter;
use spi_par::Parser as PascalParser;
use spi_sem::SemanticAnalyzer;

/// SPI — a tree-walking interpreter for a small Pascal subset.
#[derive(ClapParser, Debug)]
#[command(name = "spi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a Pascal-subset source file", long_about = None)]
struct Cli {
    /// Pascal source file to run
    inputfile: PathBuf,

    /// Print scope-resolution tracing
    #[arg(long)]
    scope: bool,

    /// Print call-stack tracing
    #[arg(long)]
    stack: bool,

    /// Enable verbose (debug-level) logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(config: &Config) {
    let mut filter = EnvFilter::new(if config.verbose { "debug" } else { "warn" });
    if config.print_scope {
        filter = filter.add_directive("pascal::scope=trace".parse().expect("valid directive"));
    }
    if config.print_stack {
        filter = filter.add_directive("pascal::stack=trace".parse().expect("valid directive"));
    }
    fmt().with_env_filter(filter).with_target(false).init();
}

fn run(config: &Config) -> Result<()> {
    let source = fs::read_to_string(&config.input_file).map_err(|source| PascalError::Io {
        path: config.input_file.clone(),
        source,
    })?;

    let program = PascalParser::new(&source)?.parse()?;
    let symbols = SemanticAnalyzer::new().analyze(&program)?;
    let mut interpreter = Interpreter::new(&symbols);
    interpreter.interpret(&program)?;

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config {
        input_file: cli.inputfile,
        print_scope: cli.scope,
        print_stack: cli.stack,
        verbose: cli.verbose,
    };
    init_logging(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
