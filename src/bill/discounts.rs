use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key};
use crate::tax::{Combo, Extensions};

pub const DISCOUNT_KEY_EARLY_COMPLETION: &str = "early-completion";
pub const DISCOUNT_KEY_MILITARY: &str = "military";
pub const DISCOUNT_KEY_WORK_ACCIDENT: &str = "work-accident";
pub const DISCOUNT_KEY_SPECIAL_AGREEMENT: &str = "special-agreement";
pub const DISCOUNT_KEY_PRODUCTION_ERROR: &str = "production-error";
pub const DISCOUNT_KEY_NEW_OUTLET: &str = "new-outlet";
pub const DISCOUNT_KEY_SAMPLE: &str = "sample";
pub const DISCOUNT_KEY_END_OF_RANGE: &str = "end-of-range";
pub const DISCOUNT_KEY_INCOTERM: &str = "incoterm";
pub const DISCOUNT_KEY_POS_THRESHOLD: &str = "pos-threshold";
pub const DISCOUNT_KEY_SPECIAL_REBATE: &str = "special-rebate";
pub const DISCOUNT_KEY_TEMPORARY: &str = "temporary";
pub const DISCOUNT_KEY_STANDARD: &str = "standard";
pub const DISCOUNT_KEY_YEARLY_TURNOVER: &str = "yearly-turnover";

pub const CHARGE_KEY_STAMP_DUTY: &str = "stamp-duty";
pub const CHARGE_KEY_OUTLAY: &str = "outlay";
pub const CHARGE_KEY_TAX: &str = "tax";
pub const CHARGE_KEY_CUSTOMS: &str = "customs";
pub const CHARGE_KEY_DELIVERY: &str = "delivery";
pub const CHARGE_KEY_PACKING: &str = "packing";
pub const CHARGE_KEY_HANDLING: &str = "handling";
pub const CHARGE_KEY_INSURANCE: &str = "insurance";
pub const CHARGE_KEY_STORAGE: &str = "storage";
pub const CHARGE_KEY_ADMIN: &str = "admin";
pub const CHARGE_KEY_CLEANING: &str = "cleaning";

/// Document level reduction of the taxable base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(rename = "i", default)]
    pub index: usize,
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub code: Code,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// Percentage of the line sum; the amount is derived from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taxes: Vec<Combo>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl Discount {
    pub fn new(reason: &str, amount: Decimal) -> Self {
        Self {
            reason: reason.to_string(),
            amount,
            ..Default::default()
        }
    }

    pub fn key(mut self, key: &str) -> Self {
        self.key = Key::new(key);
        self
    }

    pub fn percent(mut self, percent: Decimal) -> Self {
        self.percent = Some(percent);
        self
    }

    pub fn tax(mut self, combo: Combo) -> Self {
        self.taxes.push(combo);
        self
    }
}

/// Document level addition to the taxable base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    #[serde(rename = "i", default)]
    pub index: usize,
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub code: Code,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taxes: Vec<Combo>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl Charge {
    pub fn new(reason: &str, amount: Decimal) -> Self {
        Self {
            reason: reason.to_string(),
            amount,
            ..Default::default()
        }
    }

    pub fn key(mut self, key: &str) -> Self {
        self.key = Key::new(key);
        self
    }

    pub fn percent(mut self, percent: Decimal) -> Self {
        self.percent = Some(percent);
        self
    }

    pub fn tax(mut self, combo: Combo) -> Self {
        self.taxes.push(combo);
        self
    }
}
