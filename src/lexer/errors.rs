use thiserror::Error;

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("Unknown character '{0}'")]
    UnexpectedChar(char),

    #[error("Digit expected after exponent")]
    MissingExponentDigits,

    #[error("Invalid number format '{0}'")]
    InvalidNumber(String),
}
