//! Tax categories, their rates and the dated values of each rate.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::cbc::{Code, I18n, Key, Source};

use super::Extensions;
use super::keys::KeyDef;

/// A tax category such as VAT or IRPF inside a regime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDef {
    pub code: Code,
    pub name: I18n,
    pub title: I18n,
    pub desc: I18n,
    /// Withheld from the payable amount instead of added to it.
    pub retained: bool,
    /// Reported but not included in totals.
    pub informative: bool,
    pub keys: Vec<KeyDef>,
    pub rates: Vec<RateDef>,
    /// Extension keys combos of this category may carry.
    pub extensions: Vec<Key>,
    pub sources: Vec<Source>,
}

impl CategoryDef {
    pub fn new(code: &str, name: I18n, title: I18n) -> Self {
        Self {
            code: Code::new(code),
            name,
            title,
            ..Default::default()
        }
    }

    pub fn retained(mut self) -> Self {
        self.retained = true;
        self
    }

    pub fn keys(mut self, keys: Vec<KeyDef>) -> Self {
        self.keys = keys;
        self
    }

    pub fn rates(mut self, rates: Vec<RateDef>) -> Self {
        self.rates = rates;
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn key_def(&self, key: &Key) -> Option<&KeyDef> {
        self.keys.iter().find(|k| &k.key == key)
    }

    /// Rate for a tax key. An exact rate match wins; otherwise the first
    /// rate whose key is a prefix of `rate` (e.g. `general` for
    /// `general+eqs`).
    pub fn rate_def(&self, key: &Key, rate: &Key) -> Option<&RateDef> {
        let mut fallback = None;
        for r in self.rates.iter().filter(|r| r.has_key(key)) {
            if &r.rate == rate {
                return Some(r);
            }
            if fallback.is_none() && rate.has_prefix(&r.rate) {
                fallback = Some(r);
            }
        }
        fallback
    }
}

/// A named rate within a category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateDef {
    pub rate: Key,
    /// Tax keys the rate applies to; empty applies to combos without a key
    /// or with the standard key.
    pub keys: Vec<Key>,
    pub name: I18n,
    pub desc: I18n,
    /// Values newest first.
    pub values: Vec<RateValueDef>,
}

impl RateDef {
    pub fn new(rate: &str, name: I18n) -> Self {
        Self {
            rate: Key::new(rate),
            name,
            ..Default::default()
        }
    }

    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.keys = keys.iter().map(Key::new).collect();
        self
    }

    pub fn values(mut self, values: Vec<RateValueDef>) -> Self {
        self.values = values;
        self
    }

    pub fn has_key(&self, key: &Key) -> bool {
        if self.keys.is_empty() {
            return key.is_empty() || key.as_str() == super::keys::KEY_STANDARD;
        }
        self.keys.contains(key)
    }

    /// Value applicable on `date` in `zone`.
    ///
    /// Values dated after `date` or disabled are ignored, as are values
    /// restricted to other zones. Zone specific values win over general
    /// ones; among equals the latest `since` wins, ties going to the value
    /// declared first.
    pub fn value(&self, date: NaiveDate, zone: Option<&Code>) -> Option<&RateValueDef> {
        let mut best: Option<&RateValueDef> = None;
        for v in &self.values {
            if v.disabled || v.since > date {
                continue;
            }
            let zoned = !v.zones.is_empty();
            if zoned && !zone.is_some_and(|z| v.zones.contains(z)) {
                continue;
            }
            best = match best {
                None => Some(v),
                Some(b) => {
                    let b_zoned = !b.zones.is_empty();
                    if (zoned && !b_zoned) || (zoned == b_zoned && v.since > b.since) {
                        Some(v)
                    } else {
                        Some(b)
                    }
                }
            };
        }
        best
    }
}

/// Percent of a rate from a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct RateValueDef {
    pub since: NaiveDate,
    pub percent: Decimal,
    /// Equivalence surcharge applied on top of the percent.
    pub surcharge: Option<Decimal>,
    pub zones: Vec<Code>,
    /// Extensions copied to combos using this value.
    pub ext: Extensions,
    pub disabled: bool,
}

impl RateValueDef {
    pub fn new(since: NaiveDate, percent: Decimal) -> Self {
        Self {
            since,
            percent,
            surcharge: None,
            zones: Vec::new(),
            ext: Extensions::new(),
            disabled: false,
        }
    }

    pub fn surcharge(mut self, surcharge: Decimal) -> Self {
        self.surcharge = Some(surcharge);
        self
    }

    pub fn zones(mut self, zones: &[&str]) -> Self {
        self.zones = zones.iter().map(|z| Code::new(*z)).collect();
        self
    }

    pub fn ext(mut self, ext: Extensions) -> Self {
        self.ext = ext;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Shorthand for building rate tables from literal dates.
pub(crate) fn since(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn general() -> RateDef {
        RateDef::new("general", I18n::en("General")).values(vec![
            RateValueDef::new(date(2011, 1, 1), dec!(16)).zones(&["PT-AC"]),
            RateValueDef::new(date(2011, 1, 1), dec!(23)),
            RateValueDef::new(date(2010, 7, 1), dec!(21)),
            RateValueDef::new(date(2008, 7, 1), dec!(20)),
        ])
    }

    #[test]
    fn latest_value_by_date() {
        let r = general();
        assert_eq!(r.value(date(2009, 1, 1), None).unwrap().percent, dec!(20));
        assert_eq!(r.value(date(2010, 7, 1), None).unwrap().percent, dec!(21));
        assert_eq!(r.value(date(2024, 3, 1), None).unwrap().percent, dec!(23));
        assert!(r.value(date(2000, 1, 1), None).is_none());
    }

    #[test]
    fn zone_override() {
        let r = general();
        let azores = Code::new("PT-AC");
        let madeira = Code::new("PT-MA");
        assert_eq!(r.value(date(2024, 3, 1), Some(&azores)).unwrap().percent, dec!(16));
        assert_eq!(r.value(date(2024, 3, 1), Some(&madeira)).unwrap().percent, dec!(23));
        // zone value not yet in force
        assert_eq!(r.value(date(2010, 8, 1), Some(&azores)).unwrap().percent, dec!(21));
    }

    #[test]
    fn disabled_values_skipped() {
        let r = RateDef::new("reduced", I18n::en("Reduced")).values(vec![
            RateValueDef::new(date(2022, 1, 1), dec!(5)).disabled(),
            RateValueDef::new(date(2012, 9, 1), dec!(10)),
        ]);
        assert_eq!(r.value(date(2023, 1, 1), None).unwrap().percent, dec!(10));
    }

    #[test]
    fn rate_def_prefix_fallback() {
        let cat = CategoryDef::new("VAT", I18n::en("VAT"), I18n::en("Value Added Tax")).rates(vec![
            general(),
            RateDef::new("reduced", I18n::en("Reduced")),
            RateDef::new("zero", I18n::en("Zero")).keys(&["zero"]),
        ]);
        let standard = Key::new("standard");
        assert_eq!(cat.rate_def(&standard, &Key::new("general")).unwrap().rate.as_str(), "general");
        assert_eq!(cat.rate_def(&standard, &Key::new("general+eqs")).unwrap().rate.as_str(), "general");
        assert!(cat.rate_def(&standard, &Key::new("zero")).is_none());
        assert!(cat.rate_def(&Key::new("zero"), &Key::new("zero")).is_some());
        assert!(cat.rate_def(&standard, &Key::new("super-reduced")).is_none());
    }
}
