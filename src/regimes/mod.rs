//! Country tax regimes: Spain, Portugal and Andorra.
//!
//! Each regime is plain data (categories, rates, zones, tags, scenarios
//! and correction rules) plus a normalizer and validator hook for the
//! nodes it cares about.

pub mod ad;
pub mod es;
pub mod pt;

use crate::tax::RegimeDef;

/// Every regime in this crate.
pub fn all() -> Vec<RegimeDef> {
    vec![es::new(), pt::new(), ad::new()]
}
