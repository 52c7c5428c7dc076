use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key, Stamp};
use crate::tax::{Extensions, Total};

use super::Party;

/// Reference to another document, typically the invoice a corrective
/// document amends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Key::is_empty")]
    pub kind: Key,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub series: Code,
    pub code: Code,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stamps: Vec<Stamp>,
    /// Tax totals of the referenced document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Total>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl DocumentRef {
    pub fn new(code: &str) -> Self {
        Self {
            code: Code::new(code),
            ..Default::default()
        }
    }
}

/// Purchase order details and any third party issuing on behalf of the
/// supplier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub code: Code,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Party>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub purchases: Vec<DocumentRef>,
}
