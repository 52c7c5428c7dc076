//! Administrative zones inside a regime.

use crate::cbc::{Code, I18n};

use super::Extensions;

/// A province, district or autonomous region.
///
/// Postal prefixes are not unique: several legacy codes may share one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneDef {
    pub code: Code,
    pub name: I18n,
    pub region: I18n,
    /// Leading digits of the postal codes in the zone.
    pub postal_prefix: Option<&'static str>,
    /// Extensions implied by the zone, e.g. the tax region.
    pub ext: Extensions,
}

impl ZoneDef {
    pub fn new(code: &str, name: I18n) -> Self {
        Self {
            code: Code::new(code),
            name,
            ..Default::default()
        }
    }

    pub fn postal_prefix(mut self, prefix: &'static str) -> Self {
        self.postal_prefix = Some(prefix);
        self
    }

    pub fn region(mut self, region: I18n) -> Self {
        self.region = region;
        self
    }

    pub fn ext(mut self, ext: Extensions) -> Self {
        self.ext = ext;
        self
    }
}

/// Zone with the given code.
pub fn zone_def<'a>(zones: &'a [ZoneDef], code: &Code) -> Option<&'a ZoneDef> {
    zones.iter().find(|z| &z.code == code)
}

/// Every zone whose postal prefix starts the given postal code.
pub fn zones_for_post_code<'a>(zones: &'a [ZoneDef], post_code: &str) -> Vec<&'a ZoneDef> {
    zones
        .iter()
        .filter(|z| z.postal_prefix.is_some_and(|p| post_code.starts_with(p)))
        .collect()
}
