//! Tokens and the on-demand scanner.

pub mod errors;
pub mod scanner;
pub mod tokens;

pub use errors::*;
pub use scanner::{tokenize, Scanner};
pub use tokens::*;
