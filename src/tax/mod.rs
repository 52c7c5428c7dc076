//! Tax model: extensions, tags, identities, categories and rates, and the
//! plug-in registry that brings them together per country.

mod category;
mod combo;
mod correction;
mod extensions;
mod identity;
pub mod keys;
mod keymap;
mod plugin;
mod registry;
mod scenario;
mod tags;
mod total;
mod zone;

pub use category::*;
pub use combo::*;
pub use correction::*;
pub use extensions::*;
pub use identity::*;
pub use keymap::*;
pub use keys::{CATEGORY_IGIC, CATEGORY_IPSI, CATEGORY_IRPF, CATEGORY_VAT, KeyDef, vat_keys};
pub use plugin::*;
pub use registry::*;
pub use scenario::*;
pub use tags::*;
pub use total::*;
pub use zone::*;
