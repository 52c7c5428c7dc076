//! Payment terms, instructions and advances.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key};
use crate::tax::Extensions;

pub const MEANS_KEY_CASH: &str = "cash";
pub const MEANS_KEY_CARD: &str = "card";
pub const MEANS_KEY_CREDIT_TRANSFER: &str = "credit-transfer";
pub const MEANS_KEY_DEBIT_TRANSFER: &str = "debit-transfer";
pub const MEANS_KEY_DIRECT_DEBIT: &str = "direct-debit";
pub const MEANS_KEY_SEPA: &str = "sepa";
pub const MEANS_KEY_CHEQUE: &str = "cheque";
pub const MEANS_KEY_BANK_DRAFT: &str = "bank-draft";
pub const MEANS_KEY_PROMISSORY_NOTE: &str = "promissory-note";
pub const MEANS_KEY_ONLINE: &str = "online";
pub const MEANS_KEY_NETTING: &str = "netting";
pub const MEANS_KEY_ANY: &str = "any";
pub const MEANS_KEY_OTHER: &str = "other";

/// Payment details of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Terms>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Instructions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advances: Vec<Advance>,
}

/// When payment is due.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terms {
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub due_dates: Vec<DueDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DueDate {
    pub date: Option<NaiveDate>,
    pub amount: Decimal,
}

/// How the customer is expected to pay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instructions {
    /// Payment means key, e.g. `credit-transfer` or `card`, optionally
    /// refined with `+`.
    pub key: Key,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub detail: Code,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credit_transfer: Vec<CreditTransfer>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl Instructions {
    pub fn new(key: &str) -> Self {
        Self {
            key: Key::new(key),
            ..Default::default()
        }
    }

    pub fn credit_transfer(mut self, iban: &str) -> Self {
        self.credit_transfer.push(CreditTransfer {
            iban: iban.to_string(),
            ..Default::default()
        });
        self
    }
}

/// Bank account for a credit transfer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditTransfer {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub iban: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bic: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Amount already paid before the document was issued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Advance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    pub description: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl Advance {
    pub fn new(description: &str, amount: Decimal) -> Self {
        Self {
            description: description.to_string(),
            amount,
            ..Default::default()
        }
    }
}
