use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key, Note};
use crate::org::Item;
use crate::tax::{Combo, Extensions};

/// One invoice line: a quantity of an item with its taxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Position starting at 1, assigned during normalization.
    #[serde(rename = "i", default)]
    pub index: usize,
    pub quantity: Decimal,
    pub item: Item,
    /// Quantity times price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discounts: Vec<LineDiscount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charges: Vec<LineCharge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taxes: Vec<Combo>,
    /// Sum less discounts plus charges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

impl Line {
    pub fn new(quantity: Decimal, item: Item) -> Self {
        Self {
            quantity,
            item,
            ..Default::default()
        }
    }

    pub fn tax(mut self, combo: Combo) -> Self {
        self.taxes.push(combo);
        self
    }

    pub fn discount(mut self, discount: LineDiscount) -> Self {
        self.discounts.push(discount);
        self
    }

    pub fn charge(mut self, charge: LineCharge) -> Self {
        self.charges.push(charge);
        self
    }

    pub fn note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// First combo of the category, if any.
    pub fn combo(&self, category: &str) -> Option<&Combo> {
        self.taxes.iter().find(|c| c.is_category(category))
    }

    pub fn combo_mut(&mut self, category: &str) -> Option<&mut Combo> {
        self.taxes.iter_mut().find(|c| c.is_category(category))
    }
}

/// Reduction applied to a single line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineDiscount {
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
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl LineDiscount {
    pub fn amount(amount: Decimal) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    pub fn percent(percent: Decimal) -> Self {
        Self {
            percent: Some(percent),
            ..Default::default()
        }
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = reason.to_string();
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.key = Key::new(key);
        self
    }
}

/// Surcharge applied to a single line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineCharge {
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub code: Code,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl LineCharge {
    pub fn amount(amount: Decimal) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = reason.to_string();
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.key = Key::new(key);
        self
    }
}
