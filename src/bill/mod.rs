//! Invoices, their lines, discounts, charges and totals.

mod calculate;
mod correct;
mod discounts;
mod invoice;
mod line;
mod totals;
mod validate;

pub use calculate::*;
pub use correct::*;
pub use discounts::*;
pub use invoice::*;
pub use line::*;
pub use totals::*;
