pub mod declarations;
pub mod errors;
pub mod expressions;
pub mod statements;

pub use declarations::TypeSpec;
pub use errors::*;
pub use expressions::{DefinitionScope, Designator, Parser};
