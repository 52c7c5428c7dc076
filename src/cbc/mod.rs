//! Common basic components: keys, codes, definitions, notes and stamps.

mod code;
mod definition;
pub mod i18n;
mod key;
mod note;

pub use code::*;
pub use definition::*;
pub use i18n::I18n;
pub use key::*;
pub use note::*;
