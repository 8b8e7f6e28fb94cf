use thiserror::Error;

use crate::codegen::{ModuleOutput, TextEmitter};
use crate::parser::{Parser, ParserError};
use crate::symbol::{DEFAULT_MAX_SYMBOLS, DEFAULT_NAME_BUFFER_SIZE};

/// Capacities for one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerOptions {
    pub max_symbols: usize,
    pub name_buffer_size: usize,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            max_symbols: DEFAULT_MAX_SYMBOLS,
            name_buffer_size: DEFAULT_NAME_BUFFER_SIZE,
        }
    }
}

/// The first error hit while compiling a module, with where it happened.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source_name}:{line}: {error}")]
pub struct CompileError {
    pub source_name: String,
    pub line: usize,
    pub error: ParserError,
}

/// Translate one module held in memory.
///
/// `source_name` only labels diagnostics; `header_name` is what the
/// implementation unit `#include`s to reach its own interface.
///
/// # Errors
/// The first lexical, declaration or type error, tagged with its line
pub fn compile_module(
    source_name: &str,
    source: &str,
    header_name: &str,
    options: &CompilerOptions,
) -> Result<ModuleOutput, CompileError> {
    let fail = |line: usize, error: ParserError| CompileError {
        source_name: source_name.to_string(),
        line,
        error,
    };

    let mut parser = Parser::new(source, options, TextEmitter::new()).map_err(|error| fail(1, error))?;
    if let Err(error) = parser.parse_module(header_name) {
        let line = parser.line();
        tracing::debug!(source = source_name, line, %error, "compilation failed");
        return Err(fail(line, error));
    }

    tracing::info!(
        source = source_name,
        symbols = parser.symbol_table().len(),
        types = parser.type_registry().len(),
        "compiled module"
    );
    Ok(parser.into_emitter().finish())
}
