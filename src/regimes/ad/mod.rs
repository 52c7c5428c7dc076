//! Andorra: the general indirect tax (IGI) and NRT identities.

mod tax_categories;
mod tax_identity;

pub use tax_categories::RATE_INCREASED;
pub use tax_identity::check_code;

use crate::bill::{Invoice, InvoiceType};
use crate::cbc::{Code, I18n, Key, Source};
use crate::l10n::CountryCode;
use crate::org::Party;
use crate::rules::{ErrorTree, Fields};
use crate::tax::{
    CATEGORY_VAT, CorrectionDefinition, NodeRef, RegimeDef, SCHEMA_INVOICE, require_identity_code,
};

pub fn new() -> RegimeDef {
    RegimeDef {
        key: Key::new("ad"),
        country: CountryCode::new("AD"),
        name: I18n::en("Andorra").with("ca", "Andorra").with("es", "Andorra"),
        description: I18n::en(
            "The main indirect tax in Andorra is the Impost General Indirecte (IGI), \
             enforced since 1st of January 2013. Companies are identified by their NRT.",
        ),
        sources: vec![Source::new(
            "Departament de Tributs i de Fronteres - Andorra",
            "https://www.impostos.ad",
        )],
        currency: "EUR",
        tax_scheme: Some(Code::new(CATEGORY_VAT)),
        time_zone: "Europe/Andorra",
        categories: tax_categories::categories(),
        corrections: vec![
            // Nota d'Abonament and Nota de Càrrec
            CorrectionDefinition::new(SCHEMA_INVOICE)
                .types(&[InvoiceType::CreditNote.as_str(), InvoiceType::DebitNote.as_str()]),
        ],
        validator: Some(validate),
        ..Default::default()
    }
}

fn validate(node: NodeRef<'_>) -> Result<(), ErrorTree> {
    match node {
        NodeRef::Invoice(inv) => validate_invoice(inv),
        NodeRef::TaxIdentity(id) => tax_identity::validate_tax_identity(id),
        _ => Ok(()),
    }
}

fn validate_invoice(inv: &Invoice) -> Result<(), ErrorTree> {
    Fields::new().nested("supplier", &inv.supplier, [], validate_supplier).finish()
}

/// A supplier tax identity, when given, must carry its NRT.
fn validate_supplier(party: &Party) -> Result<(), ErrorTree> {
    match &party.tax_id {
        Some(id) => Fields::new().field("tax_id", id, [require_identity_code()]).finish(),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::Line;
    use crate::org::Item;
    use crate::tax::{Combo, Registry};

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register_regime(new()).unwrap();
        reg
    }

    fn invoice(combo: Combo) -> Invoice {
        Invoice::new(
            "123",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            Party::new("Test Supplier").tax_id("AD", "L123456A"),
        )
        .customer(Party::new("Test Customer").tax_id("AD", "F121212B"))
        .line(Line::new(dec!(1), Item::new("Test Item", dec!(100.00))).tax(combo))
    }

    #[test]
    fn calculates_general_rate() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("general"));
        crate::calculate_with(&reg, &mut inv);
        assert_eq!(inv.currency, "EUR");
        assert_eq!(inv.lines[0].combo("VAT").unwrap().percent, Some(dec!(4.5)));
        assert_eq!(inv.totals.as_ref().unwrap().tax, dec!(4.50));
        assert!(crate::validate_with(&reg, &inv).is_ok());
    }

    #[test]
    fn increased_and_zero_rates() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate(RATE_INCREASED));
        crate::normalize_with(&reg, &mut inv);
        assert_eq!(inv.lines[0].combo("VAT").unwrap().percent, Some(dec!(9.5)));

        let mut inv = invoice(Combo::new("VAT").key("zero").rate("super-reduced"));
        crate::normalize_with(&reg, &mut inv);
        assert_eq!(inv.lines[0].combo("VAT").unwrap().percent, Some(dec!(0.0)));
    }

    #[test]
    fn normalizes_and_checks_nrt() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("general"));
        inv.supplier.tax_id = Some(crate::tax::Identity::new("AD", " l-123456-a "));
        crate::normalize_with(&reg, &mut inv);
        assert_eq!(inv.supplier.tax_id.as_ref().unwrap().code.as_str(), "L123456A");
        assert!(crate::validate_with(&reg, &inv).is_ok());

        inv.supplier.tax_id = Some(crate::tax::Identity::new("AD", "X123456A"));
        let err = crate::validate_with(&reg, &inv).unwrap_err();
        assert!(err.at("supplier.tax_id.code").is_some());
    }

    #[test]
    fn supplier_identity_needs_code() {
        let inv = invoice(Combo::new("VAT").rate("general"));
        let mut supplier = inv.supplier.clone();
        supplier.tax_id = Some(crate::tax::Identity::new("AD", ""));
        assert!(validate_supplier(&supplier).is_err());
        supplier.tax_id = None;
        assert!(validate_supplier(&supplier).is_ok());
    }
}
