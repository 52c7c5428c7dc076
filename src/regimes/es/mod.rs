//! Spain: VAT, IGIC, IPSI and IRPF.

mod invoices;
mod scenarios;
mod tax_categories;
mod tax_identity;
mod zones;

pub use tax_categories::{RATE_CAPITAL, RATE_MODULES, RATE_PRO, RATE_PRO_START};
pub use tax_identity::{TaxIdentityType, check_code, tax_identity_type};
pub use zones::ZONES_FORAL;

use crate::bill::InvoiceType;
use crate::cbc::{Definition, I18n, Key, Source};
use crate::l10n::CountryCode;
use crate::rules::ErrorTree;
use crate::tax::{CorrectionDefinition, Node, NodeRef, RegimeDef, SCHEMA_INVOICE, TagSet};

pub const TAG_COPY: &str = "copy";
pub const TAG_SUMMARY: &str = "summary";
pub const TAG_SIMPLIFIED_SCHEME: &str = "simplified-scheme";
pub const TAG_CUSTOMER_ISSUED: &str = "customer-issued";
pub const TAG_TRAVEL_AGENCY: &str = "travel-agency";
pub const TAG_SECOND_HAND_GOODS: &str = "second-hand-goods";
pub const TAG_ART: &str = "art";
pub const TAG_ANTIQUES: &str = "antiques";
pub const TAG_CASH_BASIS: &str = "cash-basis";

pub fn new() -> RegimeDef {
    RegimeDef {
        key: Key::new("es"),
        country: CountryCode::new("ES"),
        name: I18n::en("Spain").with("es", "España"),
        sources: vec![Source::new(
            "Agencia Tributaria",
            "https://sede.agenciatributaria.gob.es",
        )],
        currency: "EUR",
        time_zone: "Europe/Madrid",
        tags: vec![invoice_tags()],
        scenarios: vec![scenarios::invoice_scenarios()],
        categories: tax_categories::categories(),
        zones: zones::zones(),
        corrections: vec![
            CorrectionDefinition::new(SCHEMA_INVOICE).types(&[
                InvoiceType::CreditNote.as_str(),
                InvoiceType::Corrective.as_str(),
                InvoiceType::DebitNote.as_str(),
            ]),
        ],
        normalizer: Some(normalize),
        validator: Some(validate),
        ..Default::default()
    }
}

fn normalize(node: Node<'_>) {
    if let Node::TaxIdentity(id) = node {
        tax_identity::normalize_tax_identity(id);
    }
}

fn validate(node: NodeRef<'_>) -> Result<(), ErrorTree> {
    match node {
        NodeRef::Invoice(inv) => invoices::validate_invoice(inv),
        NodeRef::TaxIdentity(id) => tax_identity::validate_tax_identity(id),
        _ => Ok(()),
    }
}

fn invoice_tags() -> TagSet {
    let tag = |key: &str, en: &str, es: &str| Definition::key(key, I18n::en(en).with("es", es));
    TagSet::new(
        SCHEMA_INVOICE,
        vec![
            tag(TAG_COPY, "Copy", "Copia"),
            tag(TAG_SUMMARY, "Summary", "Recapitulativa"),
            tag(TAG_SIMPLIFIED_SCHEME, "Simplified tax scheme", "Contribuyente en régimen simplificado"),
            tag(TAG_CUSTOMER_ISSUED, "Customer issued invoice", "Facturación por el destinatario"),
            tag(TAG_TRAVEL_AGENCY, "Special scheme for travel agencies", "Régimen especial de las agencias de viajes"),
            tag(TAG_SECOND_HAND_GOODS, "Special scheme for second-hand goods", "Régimen especial de los bienes usados"),
            tag(TAG_ART, "Special scheme of works of art", "Régimen especial de los objetos de arte"),
            tag(
                TAG_ANTIQUES,
                "Special scheme of antiques and collectables",
                "Régimen especial de las antigüedades y objetos de colección",
            ),
            tag(TAG_CASH_BASIS, "Special scheme on cash basis", "Régimen especial del criterio de caja"),
        ],
    )
}
