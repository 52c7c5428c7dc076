use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tax::Total;

/// Document totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of line totals.
    pub sum: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<Decimal>,
    /// Sum less discounts plus charges: the taxable amount.
    pub total: Decimal,
    #[serde(default)]
    pub taxes: Total,
    /// Net tax, retained taxes subtracted.
    pub tax: Decimal,
    pub total_with_tax: Decimal,
    pub payable: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advances: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<Decimal>,
}
