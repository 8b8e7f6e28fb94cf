pub mod c;
pub mod emitter;

pub use emitter::*;
