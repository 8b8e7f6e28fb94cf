//! oberon2c
//!
//! A single-pass translator from a small Oberon-family language to C. Each
//! module becomes an implementation unit (`.c`) and an interface unit (`.h`).

pub mod codegen;
pub mod compiler;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod symbol;
pub mod types;

pub use codegen::{Emitter, ModuleOutput, TextEmitter};
pub use compiler::{compile_module, CompileError, CompilerOptions};
pub use driver::{compile_file, output_paths};
pub use lexer::{tokenize, LexerError, Token, TokenKind};
pub use parser::{Parser, ParserError};
