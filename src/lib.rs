//! # tributa
//!
//! Country-aware e-invoicing engine. A canonical invoice is resolved to
//! its tax regime, addons and catalogues, normalized (derived fields,
//! official codes, legal notes), validated into a path-qualified error
//! tree, and corrected into credit notes, debit notes or corrective
//! invoices.
//!
//! All monetary values use [`rust_decimal::Decimal`]. Percentages are in
//! percentage points: `21` means 21%.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use tributa::bill::{Invoice, Line};
//! use tributa::org::{Item, Party};
//! use tributa::tax::Combo;
//!
//! let mut invoice = Invoice::new(
//!     "SAMPLE-001",
//!     NaiveDate::from_ymd_opt(2024, 6, 13).unwrap(),
//!     Party::new("Provide One S.L.").tax_id("ES", "B98602642"),
//! )
//! .customer(Party::new("Sample Consumer").tax_id("ES", "54387763P"))
//! .line(
//!     Line::new(dec!(10), Item::new("Development services", dec!(90)))
//!         .tax(Combo::new("VAT").rate("general")),
//! );
//!
//! tributa::calculate(&mut invoice);
//! assert!(tributa::validate(&invoice).is_ok());
//! assert_eq!(invoice.totals.unwrap().payable, dec!(1089.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Document model, registry, pipeline, validation and corrections |
//! | `regimes` | Spain, Portugal and Andorra tax regimes |
//! | `catalogues` | UNTDID and CEF code lists |
//! | `addons` | SII, VERI*FACTU, FacturaE, SAF-T and EN 16931 |
//! | `json` | `serde_json` helpers |
//! | `all` (default) | Everything |

#[cfg(feature = "core")]
pub mod bill;
#[cfg(feature = "core")]
pub mod cbc;
#[cfg(feature = "core")]
pub mod core;
#[cfg(feature = "core")]
pub mod l10n;
#[cfg(feature = "core")]
pub mod org;
#[cfg(feature = "core")]
pub mod pay;
#[cfg(feature = "core")]
pub mod rules;
#[cfg(feature = "core")]
pub mod tax;

#[cfg(feature = "regimes")]
pub mod regimes;

#[cfg(feature = "catalogues")]
pub mod catalogues;

#[cfg(feature = "addons")]
pub mod addons;

// Re-export the entry points at crate root for convenience
#[cfg(feature = "core")]
pub use crate::bill::{CorrectionOptions, correct, correct_with};
#[cfg(feature = "core")]
pub use crate::core::*;
#[cfg(feature = "core")]
pub use crate::tax::{Registry, registry};
