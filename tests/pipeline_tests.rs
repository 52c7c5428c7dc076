//! End-to-end tests: normalize, total, validate and correct documents
//! through the built-in registry.
//!
//! Run with: `cargo test --features all --test pipeline_tests`

#![cfg(feature = "all")]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tributa::addons::{es_sii, es_verifactu, eu_en16931, pt_saft};
use tributa::bill::{Invoice, InvoiceType, Line};
use tributa::catalogues::untdid;
use tributa::org::{Address, Item, Party};
use tributa::pay::{Advance, PaymentDetails, Terms};
use tributa::tax::{Combo, Registry};
use tributa::{CorrectionOptions, calculate_with, correct_with, validate_with};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn registry() -> Registry {
    Registry::builtin().unwrap()
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn spanish_invoice(addon: &str) -> Invoice {
    Invoice::new("SAMPLE-001", date(2024, 6, 13), Party::new("Provide One S.L.").tax_id("ES", "B98602642"))
        .addon(addon)
        .customer(Party::new("Sample Consumer").tax_id("ES", "54387763P"))
        .line(
            Line::new(dec!(10), Item::new("Development services", dec!(90)))
                .tax(Combo::new("VAT").rate("general")),
        )
}

fn portuguese_invoice() -> Invoice {
    Invoice::new(
        "FT SERIES-A/123",
        date(2023, 1, 1),
        Party::new("Test Supplier").tax_id("PT", "545259045"),
    )
    .addon(pt_saft::KEY)
    .customer(Party::new("Test Customer").tax_id("PT", "514329874"))
    .line(Line::new(dec!(1), Item::new("Test Item", dec!(100)).unit("kg")).tax(Combo::new("VAT").rate("general")))
}

fn en16931_invoice() -> Invoice {
    Invoice::new(
        "INV-2024-001",
        date(2024, 3, 1),
        Party::new("Provide One S.L.")
            .tax_id("ES", "B98602642")
            .address(Address::new("Calle Pradillo 42", "Madrid", "28002", "ES")),
    )
    .addon(eu_en16931::KEY)
    .customer(
        Party::new("Sample Consumer")
            .tax_id("ES", "54387763P")
            .address(Address::new("Calle Mayor 1", "Madrid", "28013", "ES")),
    )
    .line(Line::new(dec!(2), Item::new("Consulting", dec!(100))).tax(Combo::new("VAT").rate("general")))
    .payment(PaymentDetails {
        terms: Some(Terms::default()),
        ..Default::default()
    })
}

fn tax_code(inv: &Invoice, key: &str) -> String {
    inv.tax.as_ref().map(|t| t.ext.code(key).to_string()).unwrap_or_default()
}

// ── Spain: SII ───────────────────────────────────────────────────────────────

#[test]
fn sii_standard_invoice() {
    let reg = registry();
    let mut inv = spanish_invoice(es_sii::KEY);
    calculate_with(&reg, &mut inv);

    assert_eq!(inv.regime.as_str(), "ES");
    assert_eq!(inv.currency, "EUR");
    assert_eq!(tax_code(&inv, es_sii::EXT_KEY_DOC_TYPE), "F1");
    let vat = inv.lines[0].combo("VAT").unwrap();
    assert_eq!(vat.percent, Some(dec!(21.0)));
    assert!(vat.ext.is(es_sii::EXT_KEY_REGIME, "01"));
    assert!(vat.ext.is(es_sii::EXT_KEY_NOT_EXEMPT, "S1"));

    let totals = inv.totals.as_ref().unwrap();
    assert_eq!(totals.sum, dec!(900.00));
    assert_eq!(totals.tax, dec!(189.00));
    assert_eq!(totals.payable, dec!(1089.00));
    assert!(validate_with(&reg, &inv).is_ok());
}

#[test]
fn sii_credit_note() {
    let reg = registry();
    let mut inv = spanish_invoice(es_sii::KEY);
    calculate_with(&reg, &mut inv);

    let opts = CorrectionOptions::credit().issue_date(date(2024, 6, 20)).reason("Returned goods").refund();
    let credit = correct_with(&reg, &inv, &opts).unwrap();

    assert_eq!(credit.kind, InvoiceType::CreditNote);
    assert_eq!(tax_code(&credit, es_sii::EXT_KEY_DOC_TYPE), "R1");
    assert_eq!(tax_code(&credit, es_sii::EXT_KEY_CORRECTION_TYPE), "I");
    assert_eq!(credit.preceding.len(), 1);
    assert_eq!(credit.preceding[0].code.as_str(), "SAMPLE-001");
    assert_eq!(credit.totals.as_ref().unwrap().payable, dec!(-1089.00));
}

#[test]
fn sii_credit_note_with_chosen_doc_type() {
    let reg = registry();
    let mut inv = spanish_invoice(es_sii::KEY);
    calculate_with(&reg, &mut inv);

    let opts = CorrectionOptions::credit()
        .issue_date(date(2024, 6, 20))
        .reason("Price adjustment")
        .ext(es_sii::EXT_KEY_DOC_TYPE, "R1");
    let credit = correct_with(&reg, &inv, &opts).unwrap();

    assert_eq!(tax_code(&credit, es_sii::EXT_KEY_DOC_TYPE), "R1");
    assert_eq!(tax_code(&credit, es_sii::EXT_KEY_CORRECTION_TYPE), "I");
    assert_eq!(credit.preceding.len(), 1);
    assert!(credit.preceding[0].ext.is_empty());
}

#[test]
fn normalize_is_idempotent() {
    let reg = registry();
    let mut once = spanish_invoice(es_sii::KEY).tag("simplified");
    calculate_with(&reg, &mut once);
    let mut twice = once.clone();
    calculate_with(&reg, &mut twice);
    assert_eq!(once, twice);
}

// ── Spain: VERI*FACTU ────────────────────────────────────────────────────────

#[test]
fn verifactu_rejects_forbidden_characters() {
    let reg = registry();
    let mut inv = spanish_invoice(es_verifactu::KEY);
    inv.supplier.name = "Provide <One> S.L.".into();
    calculate_with(&reg, &mut inv);

    let err = validate_with(&reg, &inv).unwrap_err();
    let fault = err.at("supplier.name").unwrap();
    assert_eq!(fault.to_string(), "contains forbidden character: <");
}

#[test]
fn verifactu_standard_invoice() {
    let reg = registry();
    let mut inv = spanish_invoice(es_verifactu::KEY);
    calculate_with(&reg, &mut inv);
    assert_eq!(tax_code(&inv, es_verifactu::EXT_KEY_DOC_TYPE), "F1");
    assert!(validate_with(&reg, &inv).is_ok());
}

// ── Portugal: SAF-T ──────────────────────────────────────────────────────────

#[test]
fn saft_simplified_invoice() {
    let reg = registry();
    let mut inv = portuguese_invoice().tag("simplified");
    inv.code = "FS SERIES-A/123".into();
    calculate_with(&reg, &mut inv);

    assert_eq!(tax_code(&inv, pt_saft::EXT_KEY_INVOICE_TYPE), "FS");
    let vat = inv.lines[0].combo("VAT").unwrap();
    assert!(vat.ext.is(pt_saft::EXT_KEY_TAX_RATE, "NOR"));
    assert!(validate_with(&reg, &inv).is_ok());
}

#[test]
fn saft_split_series_and_code() {
    let reg = registry();
    let mut inv = portuguese_invoice().tag("simplified");
    inv.series = "FS SERIES-A".into();
    inv.code = "123".into();
    calculate_with(&reg, &mut inv);

    assert_eq!(tax_code(&inv, pt_saft::EXT_KEY_INVOICE_TYPE), "FS");
    assert!(validate_with(&reg, &inv).is_ok());
}

#[test]
fn saft_paid_in_advance_is_stable() {
    let reg = registry();
    let mut once = portuguese_invoice().payment(PaymentDetails {
        advances: vec![Advance::new("Deposit", dec!(123.00))],
        ..Default::default()
    });
    once.code = "FR SERIES-A/123".into();
    calculate_with(&reg, &mut once);
    assert_eq!(tax_code(&once, pt_saft::EXT_KEY_INVOICE_TYPE), "FR");
    assert_eq!(once.totals.as_ref().unwrap().due, Some(dec!(0.00)));

    let mut twice = once.clone();
    calculate_with(&reg, &mut twice);
    assert_eq!(once, twice);
}

#[test]
fn saft_exemption_note() {
    let reg = registry();
    let mut inv = portuguese_invoice();
    inv.lines[0].taxes = vec![Combo::new("VAT").key("exempt").ext(pt_saft::EXT_KEY_EXEMPTION, "M07")];
    calculate_with(&reg, &mut inv);

    let line = &inv.lines[0];
    assert!(line.combo("VAT").unwrap().ext.is(pt_saft::EXT_KEY_TAX_RATE, "ISE"));
    assert_eq!(line.notes.len(), 1);
    assert_eq!(line.notes[0].code.as_str(), "M07");
    assert!(line.notes[0].text.starts_with("Isento"));
    assert!(validate_with(&reg, &inv).is_ok());
}

#[test]
fn saft_missing_exemption_code() {
    let reg = registry();
    let mut inv = portuguese_invoice();
    inv.lines[0].taxes = vec![Combo::new("VAT").key("exempt")];
    calculate_with(&reg, &mut inv);

    let err = validate_with(&reg, &inv).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"lines: (0: (taxes: (0: (ext: (pt-saft-exemption: required.).).).).)."
    );
}

// ── EU: EN 16931 ─────────────────────────────────────────────────────────────

#[test]
fn en16931_commercial_invoice() {
    let reg = registry();
    let mut inv = en16931_invoice();
    calculate_with(&reg, &mut inv);

    assert_eq!(tax_code(&inv, untdid::EXT_KEY_DOCUMENT_TYPE), "380");
    let vat = inv.lines[0].combo("VAT").unwrap();
    assert!(vat.ext.is(untdid::EXT_KEY_TAX_CATEGORY, "S"));
    assert!(validate_with(&reg, &inv).is_ok());
}

#[test]
fn en16931_self_billing() {
    let reg = registry();
    let mut inv = en16931_invoice().tag("self-billed");
    calculate_with(&reg, &mut inv);
    assert_eq!(tax_code(&inv, untdid::EXT_KEY_DOCUMENT_TYPE), "389");

    let opts = CorrectionOptions::credit().issue_date(date(2024, 3, 15)).refund();
    let credit = correct_with(&reg, &inv, &opts).unwrap();
    assert_eq!(tax_code(&credit, untdid::EXT_KEY_DOCUMENT_TYPE), "261");
}

#[test]
fn en16931_business_rules() {
    let reg = registry();
    let mut inv = en16931_invoice();
    inv.payment = None;
    inv.lines[0].taxes = vec![Combo::new("VAT").key("exempt")];
    calculate_with(&reg, &mut inv);

    let err = validate_with(&reg, &inv).unwrap_err();
    assert!(err.at("lines.0.taxes.0.ext.cef-vatex").is_some());
    let rules: Vec<String> = err.flatten().into_iter().filter_map(|e| e.rule).collect();
    assert_eq!(rules, vec!["BR-CO-25".to_string()]);
}

// ── Rendering ────────────────────────────────────────────────────────────────

#[test]
fn flattened_errors() {
    let reg = registry();
    let mut inv = spanish_invoice(es_sii::KEY);
    inv.customer = None;
    inv.lines[0].item.name.clear();
    calculate_with(&reg, &mut inv);

    let err = validate_with(&reg, &inv).unwrap_err();
    let fields: Vec<String> = err.flatten().into_iter().map(|e| e.field).collect();
    assert!(fields.contains(&"customer".to_string()));
    assert!(fields.contains(&"lines.0.item.name".to_string()));
    assert_eq!(err.at("customer").unwrap().to_string(), "cannot be blank");
}

#[cfg(feature = "json")]
#[test]
fn json_round_trip() {
    let reg = registry();
    let mut inv = portuguese_invoice();
    calculate_with(&reg, &mut inv);

    let json = inv.to_json().unwrap();
    let parsed = Invoice::from_json(&json).unwrap();
    assert_eq!(parsed, inv);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tax"]["ext"]["pt-saft-invoice-type"], "FT");
    assert_eq!(value["totals"]["payable"], "123.00");
}
