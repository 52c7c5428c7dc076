//! Parties, items and document references.

mod document_ref;
mod item;
mod party;

pub use document_ref::*;
pub use item::*;
pub use party::*;
