//! Corrective documents: credit notes, debit notes and corrective
//! invoices built from a previously issued invoice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cbc::{Code, Stamp};
use crate::core::{Context, Error, Result, calculate_with, validate_with};
use crate::org::DocumentRef;
use crate::tax::{Extensions, Registry, SCHEMA_INVOICE, registry};

use super::{Invoice, InvoiceType};

/// What the caller wants from a correction. Field names follow the JSON
/// accepted by [`CorrectionOptions::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionOptions {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<InvoiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Code>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stamps: Vec<Stamp>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
    /// Copy the tax totals of the original into the preceding reference.
    #[serde(default)]
    pub copy_tax: bool,
    /// Invert line quantities so the new document cancels the amounts of
    /// the original.
    #[serde(default)]
    pub refund: bool,
}

impl CorrectionOptions {
    pub fn new(kind: InvoiceType) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn credit() -> Self {
        Self::new(InvoiceType::CreditNote)
    }

    pub fn corrective() -> Self {
        Self::new(InvoiceType::Corrective)
    }

    pub fn debit() -> Self {
        Self::new(InvoiceType::DebitNote)
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    pub fn series(mut self, series: &str) -> Self {
        self.series = Some(Code::new(series));
        self
    }

    pub fn stamp(mut self, provider: &str, value: &str) -> Self {
        self.stamps.push(Stamp::new(provider, value));
        self
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = reason.to_string();
        self
    }

    pub fn ext(mut self, key: &str, code: &str) -> Self {
        self.ext.set(key, code);
        self
    }

    pub fn copy_tax(mut self) -> Self {
        self.copy_tax = true;
        self
    }

    pub fn refund(mut self) -> Self {
        self.refund = true;
        self
    }

    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Correct with the built-in registry.
pub fn correct(inv: &Invoice, opts: &CorrectionOptions) -> Result<Invoice> {
    correct_with(registry(), inv, opts)
}

/// Build a corrective document for `inv`.
///
/// The regime and addons of the original must allow the requested type
/// and the options must carry every required extension, stamp and
/// reason. The new document is normalized, totalled and validated before
/// it is returned.
pub fn correct_with(registry: &Registry, inv: &Invoice, opts: &CorrectionOptions) -> Result<Invoice> {
    let kind = opts.kind.ok_or_else(|| Error::Required("correction type".into()))?;
    if inv.code.is_empty() {
        return Err(Error::Required("code of the invoice to correct".into()));
    }

    let ctx = Context::for_invoice(registry, inv);
    let def = ctx.correction_definition(SCHEMA_INVOICE).ok_or_else(|| {
        Error::CorrectionNotAllowed(format!("no correction definition for {SCHEMA_INVOICE}"))
    })?;
    // Credit notes fall back to a negated corrective invoice where only
    // corrective invoices are modelled.
    let (kind, invert) = if def.has_type(&kind.key()) {
        (kind, opts.refund)
    } else if kind == InvoiceType::CreditNote && def.has_type(&InvoiceType::Corrective.key()) {
        (InvoiceType::Corrective, true)
    } else {
        return Err(Error::CorrectionNotAllowed(format!("invalid correction type: {kind}")));
    };
    if let Some(missing) = def.required_extensions.iter().find(|k| !opts.ext.has(k.as_str())) {
        return Err(Error::MissingExtension(missing.clone()));
    }
    let mut stamps = Vec::new();
    for provider in &def.stamps {
        match opts.stamps.iter().find(|s| &s.provider == provider) {
            Some(s) => stamps.push(s.clone()),
            None => return Err(Error::MissingStamp(provider.clone())),
        }
    }
    if def.reason_required && opts.reason.trim().is_empty() {
        return Err(Error::Required("corrective reason".into()));
    }
    debug!(kind = %kind, original = %inv.code, "correcting invoice");

    let preceding = DocumentRef {
        uuid: inv.uuid.clone(),
        kind: inv.kind.key(),
        issue_date: inv.issue_date,
        series: inv.series.clone(),
        code: inv.code.clone(),
        reason: opts.reason.clone(),
        stamps,
        tax: if opts.copy_tax || def.copy_tax {
            inv.totals.as_ref().map(|t| t.taxes.clone())
        } else {
            None
        },
        ext: opts.ext.clone(),
    };

    let mut out = inv.clone();
    out.uuid = None;
    out.code = Code::default();
    out.kind = kind;
    if let Some(series) = &opts.series {
        out.series = series.clone();
    }
    out.issue_date = Some(
        opts.issue_date.unwrap_or_else(|| chrono::Local::now().date_naive()),
    );
    out.operation_date = None;
    out.preceding = vec![preceding];
    out.totals = None;
    if invert {
        for line in &mut out.lines {
            line.quantity = -line.quantity;
        }
    }

    calculate_with(registry, &mut out);
    validate_with(registry, &out).map_err(Error::Validation)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::Line;
    use crate::cbc::{I18n, Key};
    use crate::l10n::CountryCode;
    use crate::org::{Item, Party};
    use crate::tax::{CorrectionDefinition, RegimeDef};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register_regime(RegimeDef {
            key: Key::new("xx"),
            country: CountryCode::new("XX"),
            name: I18n::en("Test"),
            currency: "EUR",
            corrections: vec![
                CorrectionDefinition::new(SCHEMA_INVOICE)
                    .types(&["credit-note"])
                    .stamps(&["xx-hash"])
                    .reason_required(),
            ],
            ..Default::default()
        })
        .unwrap();
        reg
    }

    fn original() -> Invoice {
        Invoice::new("INV-1", date(2024, 3, 1), Party::new("Seller").tax_id("XX", "1"))
            .series("A")
            .line(Line::new(dec!(2), Item::new("Thing", dec!(10))))
    }

    fn opts() -> CorrectionOptions {
        CorrectionOptions::credit()
            .issue_date(date(2024, 3, 10))
            .reason("Returned")
            .stamp("xx-hash", "abc")
    }

    #[test]
    fn builds_credit_note() {
        let out = correct_with(&registry(), &original(), &opts().refund()).unwrap();
        assert_eq!(out.kind, InvoiceType::CreditNote);
        assert!(out.code.is_empty());
        assert_eq!(out.issue_date, Some(date(2024, 3, 10)));
        let pre = &out.preceding[0];
        assert_eq!(pre.code.as_str(), "INV-1");
        assert_eq!(pre.series.as_str(), "A");
        assert_eq!(pre.issue_date, Some(date(2024, 3, 1)));
        assert_eq!(pre.reason, "Returned");
        assert_eq!(pre.stamps.len(), 1);
        assert_eq!(out.lines[0].quantity, dec!(-2));
        assert_eq!(out.totals.unwrap().payable, dec!(-20.00));
    }

    #[test]
    fn credit_falls_back_to_corrective() {
        let mut reg = Registry::new();
        reg.register_regime(RegimeDef {
            key: Key::new("yy"),
            country: CountryCode::new("YY"),
            name: I18n::en("Test"),
            currency: "EUR",
            corrections: vec![CorrectionDefinition::new(SCHEMA_INVOICE).types(&["corrective"])],
            ..Default::default()
        })
        .unwrap();
        let inv = Invoice::new("INV-1", date(2024, 3, 1), Party::new("Seller").tax_id("YY", "1"))
            .line(Line::new(dec!(2), Item::new("Thing", dec!(10))));
        let out = correct_with(&reg, &inv, &CorrectionOptions::credit().issue_date(date(2024, 3, 10))).unwrap();
        assert_eq!(out.kind, InvoiceType::Corrective);
        assert_eq!(out.lines[0].quantity, dec!(-2));
    }

    #[test]
    fn type_not_allowed() {
        let err = correct_with(&registry(), &original(), &CorrectionOptions::debit()).unwrap_err();
        assert!(matches!(err, Error::CorrectionNotAllowed(_)));
    }

    #[test]
    fn missing_stamp_and_reason() {
        let no_stamp = CorrectionOptions::credit().reason("x");
        let err = correct_with(&registry(), &original(), &no_stamp).unwrap_err();
        assert!(matches!(err, Error::MissingStamp(k) if k == "xx-hash"));

        let no_reason = CorrectionOptions::credit().stamp("xx-hash", "abc");
        let err = correct_with(&registry(), &original(), &no_reason).unwrap_err();
        assert!(matches!(err, Error::Required(_)));
    }

    #[test]
    fn no_definition() {
        let reg = Registry::new();
        let err = correct_with(&reg, &original(), &opts()).unwrap_err();
        assert!(matches!(err, Error::CorrectionNotAllowed(_)));
    }

    #[test]
    fn needs_code() {
        let mut inv = original();
        inv.code = Code::default();
        let err = correct_with(&registry(), &inv, &opts()).unwrap_err();
        assert!(matches!(err, Error::Required(_)));
    }
}
