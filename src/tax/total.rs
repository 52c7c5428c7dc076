//! Tax totals grouped by category and rate.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key};
use crate::l10n::CountryCode;

use super::{Combo, Extensions};

/// Totals of one rate inside a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTotal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryCode>,
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
    pub base: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surcharge: Option<Decimal>,
    pub amount: Decimal,
}

/// Totals of one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub code: Code,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retained: bool,
    pub rates: Vec<RateTotal>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surcharge: Option<Decimal>,
}

/// Every category total plus the net tax sum, retained taxes subtracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Total {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryTotal>,
    pub sum: Decimal,
}

/// Round half away from zero to exactly `dp` places, padding with zeros.
pub fn round(value: Decimal, dp: u32) -> Decimal {
    let mut r = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    r.rescale(dp);
    r
}

impl Total {
    /// Add a taxable amount under the combo's category and rate.
    pub fn add(&mut self, combo: &Combo, base: Decimal, retained: bool) {
        let cat = match self.categories.iter_mut().position(|c| c.code == combo.category) {
            Some(i) => &mut self.categories[i],
            None => {
                self.categories.push(CategoryTotal {
                    code: combo.category.clone(),
                    retained,
                    ..Default::default()
                });
                let last = self.categories.len() - 1;
                &mut self.categories[last]
            }
        };
        let same_rate = |r: &&mut RateTotal| {
            r.key == combo.key
                && r.percent == combo.percent
                && r.surcharge == combo.surcharge
                && r.ext == combo.ext
                && r.country == combo.country
        };
        match cat.rates.iter_mut().find(same_rate) {
            Some(r) => r.base += base,
            None => cat.rates.push(RateTotal {
                country: combo.country.clone(),
                key: combo.key.clone(),
                ext: combo.ext.clone(),
                base,
                percent: combo.percent,
                surcharge: combo.surcharge,
                amount: Decimal::ZERO,
            }),
        }
    }

    /// Compute rate, category and overall amounts at two decimal places.
    pub fn calculate(&mut self) {
        let zero = Decimal::new(0, 2);
        self.sum = zero;
        for cat in &mut self.categories {
            cat.amount = zero;
            let mut surcharge = None;
            for r in &mut cat.rates {
                let percent = r.percent.unwrap_or_default();
                r.amount = round(r.base * percent / Decimal::ONE_HUNDRED, 2);
                cat.amount += r.amount;
                if let Some(s) = r.surcharge {
                    let amount = round(r.base * s / Decimal::ONE_HUNDRED, 2);
                    *surcharge.get_or_insert(zero) += amount;
                }
            }
            cat.surcharge = surcharge;
            let full = cat.amount + cat.surcharge.unwrap_or_default();
            if cat.retained {
                self.sum -= full;
            } else {
                self.sum += full;
            }
        }
    }

    pub fn category(&self, code: &str) -> Option<&CategoryTotal> {
        self.categories.iter().find(|c| c.code.as_str() == code)
    }
}
