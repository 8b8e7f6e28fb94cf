use thiserror::Error;

/// Symbol table error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("Symbol table full")]
    TableFull,

    #[error("Symbol table name buffer full")]
    NameBufferFull,
}
