use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use oberon2c::compiler::CompilerOptions;
use oberon2c::driver::compile_file;
use oberon2c::lexer::tokenize;
use oberon2c::symbol::{DEFAULT_MAX_SYMBOLS, DEFAULT_NAME_BUFFER_SIZE};

#[derive(ClapParser)]
#[command(name = "oberon2c")]
#[command(about = "Translate Oberon-family modules to C", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile each module to a .c/.h pair next to its source
    Compile {
        /// Module source files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Symbol table entry capacity
        #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_SYMBOLS)]
        max_symbols: usize,

        /// Symbol name buffer capacity in bytes
        #[arg(long = "name-buffer", value_name = "N", default_value_t = DEFAULT_NAME_BUFFER_SIZE)]
        name_buffer_size: usize,

        /// Log each compiled module
        #[arg(short, long)]
        verbose: bool,
    },
    /// Tokenize the input file and print tokens
    Lex {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            files,
            max_symbols,
            name_buffer_size,
            verbose,
        } => {
            init_logging(verbose);
            let options = CompilerOptions {
                max_symbols,
                name_buffer_size,
            };
            compile_all(&files, &options)
        }
        Commands::Lex { file } => {
            init_logging(false);
            lex_file(&file)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Modules are compiled in order; the first failure stops the run.
fn compile_all(files: &[PathBuf], options: &CompilerOptions) -> Result<()> {
    for file in files {
        compile_file(file, options)?;
    }
    Ok(())
}

fn lex_file(path: &PathBuf) -> Result<()> {
    let input = fs::read_to_string(path).with_context(|| format!("failed to read file '{}'", path.display()))?;

    let tokens = tokenize(&input).with_context(|| format!("failed to tokenize '{}'", path.display()))?;

    for token in &tokens {
        println!(
            "{}:{}:{} {:?} {}",
            path.display(),
            token.pos.line,
            token.pos.column,
            token.kind,
            token.lexeme
        );
    }

    println!("\nTotal tokens: {}", tokens.len());

    Ok(())
}
