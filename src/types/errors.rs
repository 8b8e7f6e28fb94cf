use thiserror::Error;

use crate::types::TypeId;

/// Type checking error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("Type mismatch: {0} != {1}")]
    Mismatch(TypeId, TypeId),

    #[error("Array expected")]
    ArrayExpected,
}
