use thiserror::Error;

use crate::lexer::LexerError;
use crate::symbol::SymbolError;
use crate::types::TypeError;

/// Parser error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    #[error("{0} expected, found '{1}'")]
    ExpectedToken(String, String),

    #[error("Duplicate identifier '{0}'")]
    DuplicateIdentifier(String),

    #[error("Undeclared identifier '{0}'")]
    UndeclaredIdentifier(String),

    #[error("'{0}' cannot be used here")]
    IllKinded(String),

    #[error("Cannot assign to '{0}'")]
    NotAssignable(String),

    #[error("Factor expected, found '{0}'")]
    FactorExpected(String),

    #[error("Statement expected, found '{0}'")]
    StatementExpected(String),

    #[error("Type expected, found '{0}'")]
    TypeExpected(String),

    #[error("Array size expected")]
    ArraySizeExpected,

    #[error("Constant value expected")]
    ConstantExpected,

    #[error("VAR parameters not supported")]
    VarParameter,

    #[error("Multi-dimensional array declarators are not supported")]
    MultiDimensionalArray,

    #[error("Local variable '{0}' cannot be exported")]
    ExportedLocal(String),

    #[error("END {found} does not match '{expected}'")]
    NameMismatch { expected: String, found: String },

    #[error("'{name}' expects {expected} arguments but got {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    Type(#[from] TypeError),
}
