//! Tax combos: the category, key and rate applied to a line, discount or
//! charge, with the percent resolved from the regime's rate tables.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key};
use crate::l10n::CountryCode;
use crate::rules::{ErrorTree, Fields, Issue, by, empty, required};

use super::Extensions;
use super::keys::*;
use super::plugin::RegimeDef;

/// Category, key and rate of a taxed amount. Percents are expressed in
/// percentage points, `21.0` meaning 21%.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    /// Country whose regime provides the rates when taxed abroad.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryCode>,
    #[serde(rename = "cat")]
    pub category: Code,
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub rate: Key,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surcharge: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl Combo {
    pub fn new(category: &str) -> Self {
        Self {
            category: Code::new(category),
            ..Default::default()
        }
    }

    pub fn key(mut self, key: &str) -> Self {
        self.key = Key::new(key);
        self
    }

    pub fn rate(mut self, rate: &str) -> Self {
        self.rate = Key::new(rate);
        self
    }

    pub fn percent(mut self, percent: Decimal) -> Self {
        self.percent = Some(percent);
        self
    }

    pub fn country(mut self, country: &str) -> Self {
        self.country = Some(CountryCode::new(country));
        self
    }

    pub fn ext(mut self, key: &str, code: &str) -> Self {
        self.ext.set(key, code);
        self
    }

    pub fn is_category(&self, code: &str) -> bool {
        self.category.as_str() == code
    }

    /// Country the combo is taxed in when different from `home`.
    pub fn foreign_country(&self, home: &CountryCode) -> Option<&CountryCode> {
        self.country.as_ref().filter(|c| !c.is_empty() && !c.same_country(home))
    }
}

/// Rewrite legacy rate keys into tax keys.
///
/// `exempt+reverse-charge` becomes the `reverse-charge` key, `standard`
/// rates become `general`, and a bare zero percent gets the `zero` key.
pub fn migrate_combo(c: &mut Combo) {
    if c.is_category(CATEGORY_VAT) {
        let to_key = match c.rate.as_str() {
            KEY_ZERO => Some(KEY_ZERO),
            KEY_EXEMPT => Some(KEY_EXEMPT),
            "exempt+reverse-charge" => Some(KEY_REVERSE_CHARGE),
            "exempt+export" => Some(KEY_EXPORT),
            "exempt+eea" | "exempt+export+eea" => Some(KEY_INTRA_COMMUNITY),
            _ => None,
        };
        match to_key {
            Some(k) => {
                c.key = Key::new(k);
                c.rate = Key::empty();
                if k == KEY_ZERO && c.percent.is_none() {
                    c.percent = Some(Decimal::ZERO);
                }
                if k != KEY_ZERO {
                    c.percent = None;
                }
            }
            None => {
                let standard = Key::new(KEY_STANDARD);
                if c.rate.has_prefix(&standard) {
                    c.rate = c.rate.replace_prefix(&standard, &Key::new(RATE_GENERAL));
                }
            }
        }
        if c.key.is_empty() && c.percent.is_some_and(|p| p.is_zero()) {
            c.key = Key::new(KEY_ZERO);
        }
    }
    c.ext.clean();
}

/// Fill the key default and the percent and surcharge from the regime's
/// rate tables for `date`.
///
/// Combos without a known category or rate are left untouched; validation
/// reports them.
pub fn resolve_combo(c: &mut Combo, regime: &RegimeDef, date: NaiveDate) {
    let Some(cat) = regime.category_def(&c.category) else {
        return;
    };
    if !cat.keys.is_empty() && c.key.is_empty() {
        c.key = Key::new(KEY_STANDARD);
    }
    if cat.key_def(&c.key).is_some_and(|kd| kd.no_percent) {
        c.percent = None;
        c.surcharge = None;
        return;
    }
    if c.rate.is_empty() {
        return;
    }
    let Some(rate) = cat.rate_def(&c.key, &c.rate) else {
        return;
    };
    let zone = regime.zone_ext_key.as_ref().and_then(|k| c.ext.get(k.as_str()));
    if let Some(value) = rate.value(date, zone) {
        c.percent = Some(value.percent);
        c.surcharge = value.surcharge;
        c.ext.merge(&value.ext);
    }
}

/// Structural checks of a combo against its regime.
pub fn validate_combo(c: &Combo, regime: Option<&RegimeDef>) -> Result<(), ErrorTree> {
    let cat = regime.and_then(|r| r.category_def(&c.category));
    let no_percent = cat.and_then(|cd| cd.key_def(&c.key)).is_some_and(|kd| kd.no_percent);
    let mut fields = Fields::new();
    fields.field(
        "cat",
        &c.category,
        [
            required(),
            by(|code: &Code| match regime {
                Some(r) if !r.in_categories(code) => {
                    Err(Issue::invalid(format!("'{code}' not defined in regime")).into())
                }
                _ => Ok(()),
            }),
        ],
    );
    if let Some(cd) = cat {
        fields.field(
            "key",
            &c.key,
            [by(|k: &Key| {
                if cd.keys.is_empty() || k.is_empty() || cd.key_def(k).is_some() {
                    Ok(())
                } else {
                    Err(Issue::new(crate::core::ErrorKind::InvalidEnum, "must be a valid value").into())
                }
            })],
        );
        fields.field(
            "rate",
            &c.rate,
            [by(|r: &Key| {
                if r.is_empty() || cd.rates.is_empty() || cd.rate_def(&c.key, r).is_some() {
                    Ok(())
                } else {
                    Err(Issue::invalid(format!("'{r}' rate not defined for key '{}'", c.key)).into())
                }
            })],
        );
        if no_percent {
            fields.field("percent", &c.percent, [empty()]);
        } else if c.rate.is_empty() {
            fields.field("percent", &c.percent, [required()]);
        }
    }
    if c.percent.is_none() {
        fields.field("surcharge", &c.surcharge, [by(|s: &Option<Decimal>| {
            if s.is_some() { Err(Issue::invalid("required with percent").into()) } else { Ok(()) }
        })]);
    }
    fields.finish()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn legacy_rate_keys() {
        let cases = [
            ("zero", "zero", ""),
            ("exempt", "exempt", ""),
            ("exempt+reverse-charge", "reverse-charge", ""),
            ("exempt+export", "export", ""),
            ("exempt+eea", "intra-community", ""),
            ("standard", "", "general"),
            ("standard+eqs", "", "general+eqs"),
            ("reduced", "", "reduced"),
        ];
        for (rate, key, new_rate) in cases {
            let mut c = Combo::new("VAT").rate(rate);
            migrate_combo(&mut c);
            assert_eq!(c.key.as_str(), key, "key for {rate}");
            assert_eq!(c.rate.as_str(), new_rate, "rate for {rate}");
        }
    }

    #[test]
    fn zero_percent_gets_zero_key() {
        let mut c = Combo::new("VAT").percent(dec!(0));
        migrate_combo(&mut c);
        assert_eq!(c.key.as_str(), "zero");
    }

    #[test]
    fn migration_is_idempotent() {
        let mut c = Combo::new("VAT").rate("exempt+reverse-charge");
        migrate_combo(&mut c);
        let once = c.clone();
        migrate_combo(&mut c);
        assert_eq!(c, once);
    }

    #[test]
    fn other_categories_untouched() {
        let mut c = Combo::new("IRPF").rate("standard");
        migrate_combo(&mut c);
        assert_eq!(c.rate.as_str(), "standard");
    }
}
