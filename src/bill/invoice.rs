use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key, Note};
use crate::l10n::CountryCode;
use crate::org::{DocumentRef, Ordering, Party};
use crate::pay::PaymentDetails;
use crate::tax::{Combo, Extensions, Tags};

use super::{Charge, Discount, Line, Totals};

/// Kind of invoice document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvoiceType {
    #[default]
    Standard,
    Proforma,
    /// Replaces the preceding document.
    Corrective,
    /// Reduces or cancels the amounts of the preceding document.
    CreditNote,
    /// Increases the amounts of the preceding document.
    DebitNote,
}

impl InvoiceType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Proforma => "proforma",
            Self::Corrective => "corrective",
            Self::CreditNote => "credit-note",
            Self::DebitNote => "debit-note",
        }
    }

    pub fn key(&self) -> Key {
        Key::new(self.as_str())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "standard" => Some(Self::Standard),
            "proforma" => Some(Self::Proforma),
            "corrective" => Some(Self::Corrective),
            "credit-note" => Some(Self::CreditNote),
            "debit-note" => Some(Self::DebitNote),
            _ => None,
        }
    }

    /// Corrective, credit and debit notes amend a preceding document.
    pub fn is_correction(&self) -> bool {
        matches!(self, Self::Corrective | Self::CreditNote | Self::DebitNote)
    }

    pub fn is_in(&self, types: &[InvoiceType]) -> bool {
        types.contains(self)
    }
}

impl std::fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document level tax options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    /// Category whose tax is already included in item prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices_include: Option<Code>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

/// A commercial invoice: the `bill/invoice` schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Country of the tax regime; taken from the supplier when empty.
    #[serde(default, rename = "$regime", skip_serializing_if = "CountryCode::is_empty")]
    pub regime: CountryCode,
    #[serde(default, rename = "$addons", skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<Key>,
    #[serde(default, rename = "$tags", skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: InvoiceType,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub series: Code,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub code: Code,
    pub issue_date: Option<NaiveDate>,
    /// Date the supply took place, when different from the issue date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Tax>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preceding: Vec<DocumentRef>,
    pub supplier: Party,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<Ordering>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<Line>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discounts: Vec<Discount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charges: Vec<Charge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

impl Invoice {
    pub fn new(code: &str, issue_date: NaiveDate, supplier: Party) -> Self {
        Self {
            code: Code::new(code),
            issue_date: Some(issue_date),
            supplier,
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: InvoiceType) -> Self {
        self.kind = kind;
        self
    }

    pub fn regime(mut self, country: &str) -> Self {
        self.regime = CountryCode::new(country);
        self
    }

    pub fn addon(mut self, key: &str) -> Self {
        let key = Key::new(key);
        if !self.addons.contains(&key) {
            self.addons.push(key);
        }
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.add(tag);
        self
    }

    pub fn series(mut self, series: &str) -> Self {
        self.series = Code::new(series);
        self
    }

    pub fn operation_date(mut self, date: NaiveDate) -> Self {
        self.operation_date = Some(date);
        self
    }

    pub fn currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn customer(mut self, customer: Party) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn discount(mut self, discount: Discount) -> Self {
        self.discounts.push(discount);
        self
    }

    pub fn charge(mut self, charge: Charge) -> Self {
        self.charges.push(charge);
        self
    }

    pub fn preceding(mut self, doc: DocumentRef) -> Self {
        self.preceding.push(doc);
        self
    }

    pub fn note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn payment(mut self, payment: PaymentDetails) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Set an extension on the document tax options.
    pub fn tax_ext(mut self, key: &str, code: &str) -> Self {
        self.tax.get_or_insert_with(Default::default).ext.set(key, code);
        self
    }

    /// Date used to pick tax rates: the operation date, else the issue
    /// date.
    pub fn value_date(&self) -> Option<NaiveDate> {
        self.operation_date.or(self.issue_date)
    }

    /// Document tax extensions, empty when there are no tax options.
    pub fn tax_ext_ref(&self) -> Option<&Extensions> {
        self.tax.as_ref().map(|t| &t.ext)
    }

    /// Every extension map scenarios look at: the document tax options and
    /// each line tax combo.
    pub fn scenario_extensions(&self) -> Vec<&Extensions> {
        let mut out: Vec<&Extensions> = Vec::new();
        if let Some(t) = &self.tax {
            out.push(&t.ext);
        }
        out.extend(self.lines.iter().flat_map(|l| l.taxes.iter().map(|c| &c.ext)));
        out
    }

    /// Every tax combo in the document: lines, then discounts and charges.
    pub fn combos(&self) -> impl Iterator<Item = &Combo> {
        self.lines
            .iter()
            .flat_map(|l| l.taxes.iter())
            .chain(self.discounts.iter().flat_map(|d| d.taxes.iter()))
            .chain(self.charges.iter().flat_map(|c| c.taxes.iter()))
    }

    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> crate::core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> crate::core::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::org::Item;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn type_keys() {
        assert_eq!(InvoiceType::CreditNote.key(), "credit-note");
        assert_eq!(InvoiceType::from_key("debit-note"), Some(InvoiceType::DebitNote));
        assert!(InvoiceType::Corrective.is_correction());
        assert!(!InvoiceType::Proforma.is_correction());
    }

    #[test]
    fn scenario_extensions_cover_lines() {
        let inv = Invoice::new("1", date(2024, 1, 1), Party::new("Seller"))
            .tax_ext("es-sii-doc-type", "F1")
            .line(
                Line::new(dec!(1), Item::new("A", dec!(10)))
                    .tax(Combo::new("VAT").rate("general").ext("pt-saft-tax-rate", "NOR")),
            );
        let exts = inv.scenario_extensions();
        assert_eq!(exts.len(), 2);
        assert!(exts[1].is("pt-saft-tax-rate", "NOR"));
    }

    #[test]
    fn value_date_prefers_operation() {
        let inv = Invoice::new("1", date(2024, 3, 1), Party::new("Seller"))
            .operation_date(date(2024, 2, 28));
        assert_eq!(inv.value_date(), Some(date(2024, 2, 28)));
    }
}
