//! Portugal: VAT with regional rates for the Azores and Madeira.

mod exemptions;
mod invoices;
mod migrations;
mod tax_categories;
mod tax_identity;
mod zones;

pub use exemptions::{EXEMPTIONS, EXT_KEY_EXEMPTION, Exemption, exemption};
pub use tax_identity::check_code;
pub use zones::{ZONE_AZORES, ZONE_MADEIRA, region_for_zone};

use crate::bill::InvoiceType;
use crate::cbc::{Definition, I18n, Key, Source};
use crate::l10n::CountryCode;
use crate::rules::ErrorTree;
use crate::tax::{CorrectionDefinition, NodeRef, RegimeDef, SCHEMA_INVOICE};

/// Extension carrying the AT tax region of a VAT combo.
pub const EXT_KEY_REGION: &str = "pt-region";

pub const REGION_MAINLAND: &str = "PT";
pub const REGION_AZORES: &str = "PT-AC";
pub const REGION_MADEIRA: &str = "PT-MA";

pub fn new() -> RegimeDef {
    RegimeDef {
        key: Key::new("pt"),
        country: CountryCode::new("PT"),
        name: I18n::en("Portugal").with("pt", "Portugal"),
        sources: vec![Source::new(
            "Portal das Finanças",
            "https://info.portaldasfinancas.gov.pt",
        )],
        currency: "EUR",
        time_zone: "Europe/Lisbon",
        extensions: vec![region_extension(), exemptions::exemption_extension()],
        categories: tax_categories::categories(),
        zones: zones::zones(),
        zone_ext_key: Some(Key::new(EXT_KEY_REGION)),
        corrections: vec![
            CorrectionDefinition::new(SCHEMA_INVOICE)
                .types(&[InvoiceType::CreditNote.as_str(), InvoiceType::DebitNote.as_str()]),
        ],
        migrations: vec![migrations::migrate_exempt_rates, migrations::migrate_identity_zone],
        validator: Some(validate),
        ..Default::default()
    }
}

fn validate(node: NodeRef<'_>) -> Result<(), ErrorTree> {
    match node {
        NodeRef::Invoice(inv) => invoices::validate_invoice(inv),
        NodeRef::TaxIdentity(id) => tax_identity::validate_tax_identity(id),
        _ => Ok(()),
    }
}

fn region_extension() -> Definition {
    Definition::key(EXT_KEY_REGION, I18n::en("Tax Region").with("pt", "Região Fiscal"))
        .desc(I18n::en("Region of the tax authority the rates of a combo apply in."))
        .values(vec![
            Definition::code(REGION_MAINLAND, I18n::en("Mainland").with("pt", "Continente")),
            Definition::code(
                REGION_AZORES,
                I18n::en("Azores").with("pt", "Região Autónoma dos Açores"),
            ),
            Definition::code(
                REGION_MADEIRA,
                I18n::en("Madeira").with("pt", "Região Autónoma da Madeira"),
            ),
        ])
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::{Invoice, Line};
    use crate::cbc::Code;
    use crate::org::{DocumentRef, Item, Party};
    use crate::tax::{Combo, Registry};

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register_regime(new()).unwrap();
        reg
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(combo: Combo) -> Invoice {
        Invoice::new("INV/1", date(2023, 1, 1), Party::new("Test Supplier").tax_id("PT", "545259045"))
            .currency("EUR")
            .customer(Party::new("Test Customer"))
            .line(Line::new(dec!(1), Item::new("Test Item", dec!(100))).tax(combo))
    }

    #[test]
    fn regional_rates() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("standard"));
        crate::normalize_with(&reg, &mut inv);
        assert_eq!(inv.lines[0].combo("VAT").unwrap().percent, Some(dec!(23.0)));

        let mut inv = invoice(Combo::new("VAT").rate("general").ext(EXT_KEY_REGION, REGION_AZORES));
        crate::normalize_with(&reg, &mut inv);
        assert_eq!(inv.lines[0].combo("VAT").unwrap().percent, Some(dec!(16.0)));

        let mut inv = invoice(Combo::new("VAT").rate("reduced").ext(EXT_KEY_REGION, REGION_MADEIRA));
        crate::normalize_with(&reg, &mut inv);
        assert_eq!(inv.lines[0].combo("VAT").unwrap().percent, Some(dec!(5.0)));
    }

    #[test]
    fn legacy_zone_selects_region() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("intermediate"));
        inv.supplier.tax_id.as_mut().unwrap().zone = Code::new(ZONE_AZORES);
        crate::normalize_with(&reg, &mut inv);
        let vat = inv.lines[0].combo("VAT").unwrap();
        assert!(vat.ext.is(EXT_KEY_REGION, REGION_AZORES));
        assert_eq!(vat.percent, Some(dec!(9.0)));
        assert!(crate::validate_with(&reg, &inv).is_ok());
    }

    #[test]
    fn legacy_exempt_rate() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("exempt+exports"));
        crate::calculate_with(&reg, &mut inv);
        let vat = inv.lines[0].combo("VAT").unwrap();
        assert_eq!(vat.key.as_str(), "exempt");
        assert!(vat.ext.is(EXT_KEY_EXEMPTION, "M05"));
        assert_eq!(vat.percent, None);
        assert!(crate::validate_with(&reg, &inv).is_ok());
    }

    #[test]
    fn dates_not_after_issue() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("general")).operation_date(date(2023, 1, 2));
        crate::normalize_with(&reg, &mut inv);
        let err = crate::validate_with(&reg, &inv).unwrap_err();
        assert!(err.to_string().contains("operation_date: too late"));

        let mut inv = invoice(Combo::new("VAT").rate("general"));
        let mut doc = DocumentRef::new("INV/0");
        doc.issue_date = Some(date(2023, 1, 2));
        inv.preceding.push(doc);
        crate::normalize_with(&reg, &mut inv);
        let err = crate::validate_with(&reg, &inv).unwrap_err();
        assert!(err.at("preceding.0.issue_date").is_some());
    }

    #[test]
    fn credit_note_needs_preceding() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("general")).kind(InvoiceType::CreditNote);
        crate::normalize_with(&reg, &mut inv);
        let err = crate::validate_with(&reg, &inv).unwrap_err();
        assert!(err.to_string().contains("preceding: cannot be blank"));
    }

    #[test]
    fn advances_within_payable() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("general"));
        crate::calculate_with(&reg, &mut inv);
        let totals = inv.totals.as_mut().unwrap();
        totals.advances = Some(totals.payable);
        totals.due = Some(dec!(1.00));
        let err = crate::validate_with(&reg, &inv).unwrap_err();
        assert!(err.at("totals.advances").is_some());
        assert!(err.at("totals.due").is_some());
    }

    #[test]
    fn rejects_bad_nif() {
        let reg = registry();
        let mut inv = invoice(Combo::new("VAT").rate("general"));
        inv.supplier.tax_id = Some(crate::tax::Identity::new("PT", "545259046"));
        crate::normalize_with(&reg, &mut inv);
        let err = crate::validate_with(&reg, &inv).unwrap_err();
        assert!(err.at("supplier.tax_id.code").is_some());
    }
}
