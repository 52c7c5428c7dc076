//! Localization: country codes.

mod countries;

pub use countries::*;
