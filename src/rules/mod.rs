//! Validation composer: a small rule DSL that builds path-qualified
//! error trees.

mod rule;
mod tree;

pub use rule::*;
pub use tree::*;
