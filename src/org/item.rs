use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key};
use crate::tax::Extensions;

pub const ITEM_KEY_GOODS: &str = "goods";
pub const ITEM_KEY_SERVICES: &str = "services";

/// Product or service being sold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Seller's reference.
    #[serde(default, rename = "ref", skip_serializing_if = "Code::is_empty")]
    pub reference: Code,
    /// `goods` or `services`.
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Unit price before discounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Unit of measure, UN/ECE recommendation 20 code or a plain key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl Item {
    pub fn new(name: &str, price: Decimal) -> Self {
        Self {
            name: name.to_string(),
            price: Some(price),
            ..Default::default()
        }
    }

    pub fn key(mut self, key: &str) -> Self {
        self.key = Key::new(key);
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn ext(mut self, key: &str, code: &str) -> Self {
        self.ext.set(key, code);
        self
    }
}
