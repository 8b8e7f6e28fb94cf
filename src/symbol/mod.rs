pub mod errors;
pub mod table;

pub use errors::*;
pub use table::*;
