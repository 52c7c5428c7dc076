//! Engine entry points: normalization, validation and totals, plus the
//! crate error types.

mod context;
mod error;
mod pipeline;

pub use context::*;
pub use error::*;
pub use pipeline::*;
