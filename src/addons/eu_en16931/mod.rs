//! European standard EN 16931-1:2017 for the semantic data model of an
//! electronic invoice.
//!
//! Maps tax combos to UNTDID 5305 tax categories, discounts and charges
//! to the 5189 and 7161 code lists, payment instructions to 4461 means
//! and picks the UNTDID 1001 document type from the invoice type. The
//! business rules covered here are the ones that can be checked on the
//! document model itself; syntax specific rules belong to the formats.

mod bill;
mod tax_combo;

use crate::bill::InvoiceType;
use crate::catalogues::{cef, untdid};
use crate::cbc::{I18n, Key, Source};
use crate::rules::ErrorTree;
use crate::tax::keys::TAG_SELF_BILLED;
use crate::tax::{AddonDef, Extensions, Node, NodeRef, SCHEMA_INVOICE, Scenario, ScenarioSet};

pub const KEY: &str = "eu-en16931-v2017";

pub const TAX_CATEGORY_STANDARD: &str = "S";
pub const TAX_CATEGORY_ZERO: &str = "Z";
pub const TAX_CATEGORY_EXEMPT: &str = "E";
pub const TAX_CATEGORY_REVERSE_CHARGE: &str = "AE";
pub const TAX_CATEGORY_INTRA_COMMUNITY: &str = "K";
pub const TAX_CATEGORY_EXPORT: &str = "G";
pub const TAX_CATEGORY_OUTSIDE_SCOPE: &str = "O";
/// Canary Islands general indirect tax.
pub const TAX_CATEGORY_IGIC: &str = "L";
/// Ceuta and Melilla production, services and import tax.
pub const TAX_CATEGORY_IPSI: &str = "M";

pub fn new() -> AddonDef {
    AddonDef {
        key: Key::new(KEY),
        name: I18n::en("EN 16931-1:2017"),
        description: I18n::en(
            "Semantic data model of the core elements of an electronic invoice, the \
             common base of the European e-invoicing formats.",
        ),
        sources: vec![Source::new(
            "EN 16931-1:2017",
            "https://ec.europa.eu/digital-building-blocks/sites/display/DIGITAL/Obtaining+a+copy+of+the+European+standard+on+eInvoicing",
        )],
        catalogues: vec![Key::new(untdid::KEY), Key::new(cef::KEY)],
        scenarios: vec![invoice_scenarios()],
        key_maps: vec![
            tax_combo::VAT_CATEGORIES.clone(),
            bill::DISCOUNTS.clone(),
            bill::CHARGES.clone(),
            bill::PAYMENT_MEANS.clone(),
        ],
        normalizer: Some(normalize),
        validator: Some(validate),
        ..Default::default()
    }
}

fn invoice_scenarios() -> ScenarioSet {
    let doc_type = |code: &str| Extensions::new().with(untdid::EXT_KEY_DOCUMENT_TYPE, code);
    let scenario = |name: &str, kind: InvoiceType, code: &str| {
        Scenario::new(I18n::en(name)).types(&[kind.as_str()]).ext(doc_type(code))
    };
    ScenarioSet::new(
        SCHEMA_INVOICE,
        vec![
            scenario("Commercial invoice", InvoiceType::Standard, "380"),
            scenario("Pro forma invoice", InvoiceType::Proforma, "325"),
            scenario("Corrected invoice", InvoiceType::Corrective, "384"),
            scenario("Credit note", InvoiceType::CreditNote, "381"),
            scenario("Debit note", InvoiceType::DebitNote, "383"),
            scenario("Self-billed invoice", InvoiceType::Standard, "389").tags(&[TAG_SELF_BILLED]),
            scenario("Self-billed credit note", InvoiceType::CreditNote, "261").tags(&[TAG_SELF_BILLED]),
        ],
    )
}

fn normalize(node: Node<'_>) {
    match node {
        Node::Invoice(inv) => bill::normalize_invoice(inv),
        Node::Combo(c) => tax_combo::normalize_tax_combo(c),
        Node::Discount(d) => bill::normalize_discount(d),
        Node::LineDiscount(d) => bill::normalize_line_discount(d),
        Node::Charge(c) => bill::normalize_charge(c),
        Node::LineCharge(c) => bill::normalize_line_charge(c),
        Node::Instructions(instr) => bill::normalize_instructions(instr),
        _ => {}
    }
}

fn validate(node: NodeRef<'_>) -> Result<(), ErrorTree> {
    match node {
        NodeRef::Invoice(inv) => bill::validate_invoice(inv),
        NodeRef::Combo(c) => tax_combo::validate_tax_combo(c),
        NodeRef::Line(line) => bill::validate_line(line),
        NodeRef::Discount(d) => bill::validate_discount(d),
        NodeRef::Charge(c) => bill::validate_charge(c),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::{Invoice, Line};
    use crate::org::{Address, Item, Party};
    use crate::tax::{Combo, Registry};

    fn invoice() -> Invoice {
        Invoice::new(
            "INV-2024-001",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Party::new("Provide One S.L.")
                .tax_id("ES", "B98602642")
                .address(Address::new("Calle Pradillo 42", "Madrid", "28002", "ES")),
        )
        .addon(KEY)
        .customer(
            Party::new("Sample Consumer")
                .tax_id("ES", "54387763P")
                .address(Address::new("Calle Mayor 1", "Madrid", "28013", "ES")),
        )
        .line(Line::new(dec!(2), Item::new("Consulting", dec!(100))).tax(Combo::new("VAT").rate("general")))
    }

    fn doc_type(inv: &Invoice) -> String {
        inv.tax.as_ref().unwrap().ext.code(untdid::EXT_KEY_DOCUMENT_TYPE).to_string()
    }

    #[test]
    fn document_types() {
        let reg = Registry::builtin().unwrap();
        let cases = [
            (InvoiceType::Standard, None, "380"),
            (InvoiceType::Standard, Some(TAG_SELF_BILLED), "389"),
            (InvoiceType::CreditNote, None, "381"),
            (InvoiceType::CreditNote, Some(TAG_SELF_BILLED), "261"),
            (InvoiceType::DebitNote, None, "383"),
            (InvoiceType::Corrective, None, "384"),
            (InvoiceType::Proforma, None, "325"),
        ];
        for (kind, tag, code) in cases {
            let mut inv = invoice().kind(kind);
            if let Some(tag) = tag {
                inv = inv.tag(tag);
            }
            crate::calculate_with(&reg, &mut inv);
            assert_eq!(doc_type(&inv), code, "{kind:?} {tag:?}");
        }
    }

    #[test]
    fn standard_invoice() {
        let reg = Registry::builtin().unwrap();
        let mut inv = invoice();
        crate::calculate_with(&reg, &mut inv);
        let vat = inv.lines[0].combo("VAT").unwrap();
        assert!(vat.ext.is(untdid::EXT_KEY_TAX_CATEGORY, TAX_CATEGORY_STANDARD));
        // Still due, so payment terms are needed.
        let err = crate::validate_with(&reg, &inv).unwrap_err();
        assert!(err.to_string().contains("BR-CO-25"));
    }

    #[test]
    fn registered_catalogues() {
        let reg = Registry::builtin().unwrap();
        let addon = reg.addon_for_key(&Key::new(KEY)).unwrap();
        assert_eq!(addon.catalogues, vec![Key::new("untdid"), Key::new("cef")]);
        assert_eq!(addon.key_maps.len(), 4);
    }
}
