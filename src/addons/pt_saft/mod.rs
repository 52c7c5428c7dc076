//! Portuguese SAF-T (PT) reporting.
//!
//! Sets the AT document type from the invoice type and tags, maps VAT
//! combos to tax rate codes and exemption reasons, classifies items as
//! goods or services and prints the legal text of each exemption on the
//! line it applies to.

mod extensions;
mod invoices;
mod line;
mod scenarios;
mod tax_combo;

pub use crate::regimes::pt::EXT_KEY_EXEMPTION;

use crate::bill::InvoiceType;
use crate::cbc::{I18n, Key, Source};
use crate::rules::ErrorTree;
use crate::tax::{AddonDef, CorrectionDefinition, Node, NodeRef, SCHEMA_INVOICE};

pub const KEY: &str = "pt-saft-v1";

pub const EXT_KEY_INVOICE_TYPE: &str = "pt-saft-invoice-type";
pub const EXT_KEY_WORK_TYPE: &str = "pt-saft-work-type";
pub const EXT_KEY_TAX_RATE: &str = "pt-saft-tax-rate";
pub const EXT_KEY_PRODUCT_TYPE: &str = "pt-saft-product-type";
pub const EXT_KEY_PAYMENT_MEANS: &str = "pt-saft-payment-means";
pub const EXT_KEY_SOURCE: &str = "pt-saft-source";
pub const EXT_KEY_SOURCE_REF: &str = "pt-saft-source-ref";

pub const INVOICE_TYPE_STANDARD: &str = "FT";
pub const INVOICE_TYPE_SIMPLIFIED: &str = "FS";
pub const INVOICE_TYPE_INVOICE_RECEIPT: &str = "FR";
pub const INVOICE_TYPE_DEBIT_NOTE: &str = "ND";
pub const INVOICE_TYPE_CREDIT_NOTE: &str = "NC";

pub const WORK_TYPE_PROFORMA: &str = "PF";
pub const WORK_TYPE_CONSIGNMENT_INVOICE: &str = "FC";
pub const WORK_TYPE_CONSIGNMENT_CREDIT: &str = "CC";

pub const TAX_RATE_REDUCED: &str = "RED";
pub const TAX_RATE_INTERMEDIATE: &str = "INT";
pub const TAX_RATE_NORMAL: &str = "NOR";
pub const TAX_RATE_EXEMPT: &str = "ISE";
pub const TAX_RATE_OTHER: &str = "OUT";

pub const PRODUCT_TYPE_GOODS: &str = "P";
pub const PRODUCT_TYPE_SERVICE: &str = "S";
pub const PRODUCT_TYPE_OTHER: &str = "O";
pub const PRODUCT_TYPE_EXCISE: &str = "E";
pub const PRODUCT_TYPE_FEE: &str = "I";

pub const SOURCE_PRODUCED: &str = "P";
pub const SOURCE_INTEGRATED: &str = "I";
pub const SOURCE_MANUAL: &str = "M";

/// Invoice already paid at issue: reported as an invoice-receipt.
pub const TAG_INVOICE_RECEIPT: &str = "invoice-receipt";

pub fn new() -> AddonDef {
    AddonDef {
        key: Key::new(KEY),
        name: I18n::en("Portugal SAF-T").with("pt", "SAF-T Portugal"),
        description: I18n::en(
            "Standard Audit File for Tax Purposes as required by the Portuguese tax \
             authority (AT) for invoicing software.",
        ),
        sources: vec![Source::new(
            "Portaria n.o 302/2016",
            "https://info.portaldasfinancas.gov.pt/pt/apoio_contribuinte/SAFT_PT/Paginas/news-saf-t-pt.aspx",
        )],
        extensions: extensions::extensions(),
        tags: vec![scenarios::invoice_tags()],
        scenarios: vec![scenarios::invoice_scenarios()],
        key_maps: vec![invoices::PAYMENT_MEANS.clone()],
        normalizer: Some(normalize),
        validator: Some(validate),
        corrections: vec![
            CorrectionDefinition::new(SCHEMA_INVOICE)
                .types(&[InvoiceType::CreditNote.as_str(), InvoiceType::DebitNote.as_str()])
                .reason_required(),
        ],
        ..Default::default()
    }
}

fn normalize(node: Node<'_>) {
    match node {
        Node::Invoice(inv) => invoices::normalize_invoice(inv),
        Node::Combo(c) => tax_combo::normalize_tax_combo(c),
        Node::Item(item) => invoices::normalize_item(item),
        Node::Line(line) => line::normalize_line(line),
        Node::Instructions(instr) => invoices::normalize_instructions(instr),
        _ => {}
    }
}

fn validate(node: NodeRef<'_>) -> Result<(), ErrorTree> {
    match node {
        NodeRef::Invoice(inv) => invoices::validate_invoice(inv),
        NodeRef::Combo(c) => tax_combo::validate_tax_combo(c),
        NodeRef::Item(item) => invoices::validate_item(item),
        NodeRef::Line(line) => line::validate_line(line),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::{Invoice, Line};
    use crate::org::{Item, Party};
    use crate::pay::{Advance, Instructions, PaymentDetails};
    use crate::tax::{Combo, Registry};

    fn invoice() -> Invoice {
        Invoice::new("FT SERIES-A/123", NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), Party::new("Test Supplier").tax_id("PT", "545259045"))
            .addon(KEY)
            .customer(Party::new("Test Customer").tax_id("PT", "514329874"))
            .line(Line::new(dec!(1), Item::new("Test Item", dec!(100)).unit("kg")).tax(Combo::new("VAT").rate("general")))
    }

    #[test]
    fn standard_invoice() {
        let reg = Registry::builtin().unwrap();
        let mut inv = invoice();
        crate::calculate_with(&reg, &mut inv);
        let ext = &inv.tax.as_ref().unwrap().ext;
        assert!(ext.is(EXT_KEY_INVOICE_TYPE, "FT"));
        assert!(ext.is(EXT_KEY_SOURCE, "P"));
        let vat = inv.lines[0].combo("VAT").unwrap();
        assert!(vat.ext.is(EXT_KEY_TAX_RATE, "NOR"));
        assert_eq!(vat.percent, Some(dec!(23.0)));
        assert!(inv.lines[0].item.ext.is(EXT_KEY_PRODUCT_TYPE, "P"));
        assert!(crate::validate_with(&reg, &inv).is_ok());
    }

    #[test]
    fn simplified_invoice() {
        let reg = Registry::builtin().unwrap();
        let mut inv = invoice().tag("simplified");
        inv.code = crate::cbc::Code::new("FS SERIES-A/123");
        crate::calculate_with(&reg, &mut inv);
        assert!(inv.tax.as_ref().unwrap().ext.is(EXT_KEY_INVOICE_TYPE, "FS"));
        assert!(crate::validate_with(&reg, &inv).is_ok());
    }

    #[test]
    fn paid_in_advance_is_invoice_receipt() {
        let reg = Registry::builtin().unwrap();
        let mut inv = invoice().payment(PaymentDetails {
            advances: vec![Advance::new("Deposit", dec!(123.00))],
            ..Default::default()
        });
        inv.code = crate::cbc::Code::new("FR SERIES-A/123");
        crate::calculate_with(&reg, &mut inv);
        assert_eq!(inv.totals.as_ref().unwrap().due, Some(dec!(0)));
        assert!(inv.tax.as_ref().unwrap().ext.is(EXT_KEY_INVOICE_TYPE, "FR"));

        let mut again = inv.clone();
        crate::calculate_with(&reg, &mut again);
        assert_eq!(again, inv);
    }

    #[test]
    fn split_series_and_code() {
        let reg = Registry::builtin().unwrap();
        let mut inv = invoice().tag("simplified");
        inv.series = crate::cbc::Code::new("FS SERIES-A");
        inv.code = crate::cbc::Code::new("123");
        crate::calculate_with(&reg, &mut inv);
        assert!(inv.tax.as_ref().unwrap().ext.is(EXT_KEY_INVOICE_TYPE, "FS"));
        assert!(crate::validate_with(&reg, &inv).is_ok());
    }

    #[test]
    fn exempt_line_gets_legal_note() {
        let reg = Registry::builtin().unwrap();
        let mut inv = invoice();
        inv.lines[0].taxes = vec![Combo::new("VAT").key("exempt").ext(EXT_KEY_EXEMPTION, "M07")];
        crate::calculate_with(&reg, &mut inv);
        let line = &inv.lines[0];
        assert!(line.combo("VAT").unwrap().ext.is(EXT_KEY_TAX_RATE, "ISE"));
        assert_eq!(line.notes.len(), 1);
        assert_eq!(line.notes[0].code.as_str(), "M07");
        assert!(crate::validate_with(&reg, &inv).is_ok());
    }

    #[test]
    fn payment_means_mapped() {
        let reg = Registry::builtin().unwrap();
        let mut inv = invoice().payment(PaymentDetails {
            instructions: Some(Instructions::new("credit-transfer")),
            ..Default::default()
        });
        crate::calculate_with(&reg, &mut inv);
        let instr = inv.payment.as_ref().unwrap().instructions.as_ref().unwrap();
        assert!(instr.ext.is(EXT_KEY_PAYMENT_MEANS, "TB"));
        let means = reg.payment_means_extensions();
        assert!(means.iter().any(|d| d.key.as_ref().is_some_and(|k| k.as_str() == EXT_KEY_PAYMENT_MEANS)));
    }

    #[test]
    fn credit_note_needs_reason() {
        let reg = Registry::builtin().unwrap();
        let addon = reg.addon_for_key(&Key::new(KEY)).unwrap();
        let def = addon.correction_definition(SCHEMA_INVOICE).unwrap();
        assert!(def.reason_required);
        assert!(def.has_type(&Key::new("credit-note")));
        assert!(!def.has_type(&Key::new("corrective")));
    }
}
