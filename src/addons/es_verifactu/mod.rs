//! Spanish VERI*FACTU invoice records.
//!
//! Shares the AEAT code tables with SII but classifies each VAT combo
//! with a single operation class or exemption code, and rejects the
//! characters the submission service cannot carry in names and notes.

mod invoices;
mod tax_combo;

use crate::addons::aeat::{self, CodeRow};
use crate::bill::InvoiceType;
use crate::cbc::{Definition, I18n, Key, Source};
use crate::rules::ErrorTree;
use crate::tax::keys::TAG_SIMPLIFIED;
use crate::tax::{AddonDef, CorrectionDefinition, Extensions, Node, NodeRef, SCHEMA_INVOICE, Scenario, ScenarioSet};

pub const KEY: &str = "es-verifactu-v1";

pub const EXT_KEY_DOC_TYPE: &str = "es-verifactu-doc-type";
pub const EXT_KEY_CORRECTION_TYPE: &str = "es-verifactu-correction-type";
pub const EXT_KEY_OP_CLASS: &str = "es-verifactu-op-class";
pub const EXT_KEY_EXEMPT: &str = "es-verifactu-exempt";
pub const EXT_KEY_REGIME: &str = "es-verifactu-regime";
pub const EXT_KEY_IDENTITY_TYPE: &str = "es-verifactu-identity-type";
pub const EXT_KEY_ISSUER_TYPE: &str = "es-verifactu-issuer-type";

pub const REGIME_GENERAL: &str = "01";
pub const REGIME_EXPORT: &str = "02";
pub const REGIME_FOREIGN: &str = "08";
pub const REGIME_SURCHARGE: &str = "18";

pub const ISSUER_TYPE_THIRD_PARTY: &str = "T";
pub const ISSUER_TYPE_CUSTOMER: &str = "D";

const OP_CLASSES: &[CodeRow] = &[
    ("S1", "Subject and not exempt - without reverse charge", "Sujeta y no exenta - sin inversión del sujeto pasivo"),
    ("S2", "Subject and not exempt - with reverse charge", "Sujeta y no exenta - con inversión del sujeto pasivo"),
    ("N1", "Not subject - articles 7, 14 and others", "No sujeta - artículos 7, 14 y otros"),
    ("N2", "Not subject - due to location rules", "No sujeta - por reglas de localización"),
];

const EXTRA_REGIMES: &[CodeRow] = &[
    ("18", "Equivalence surcharge", "Recargo de equivalencia"),
    (
        "19",
        "Special regime for agriculture, livestock and fishing",
        "Régimen especial de la agricultura, ganadería y pesca",
    ),
    ("20", "Simplified regime", "Régimen simplificado"),
];

const ISSUER_TYPES: &[CodeRow] = &[
    (ISSUER_TYPE_THIRD_PARTY, "Issued by a third party", "Emitida por tercero"),
    (ISSUER_TYPE_CUSTOMER, "Issued by the customer", "Emitida por el destinatario"),
];

pub fn new() -> AddonDef {
    AddonDef {
        key: Key::new(KEY),
        name: I18n::en("Spain VERI*FACTU").with("es", "VERI*FACTU España"),
        description: I18n::en(
            "Verifiable invoice records submitted to the Spanish tax agency by invoicing systems.",
        ),
        sources: vec![Source::new(
            "Orden HAC/1177/2024, de 17 de octubre",
            "https://www.boe.es/buscar/act.php?id=BOE-A-2024-22138",
        )],
        extensions: extensions(),
        scenarios: vec![invoice_scenarios()],
        normalizer: Some(normalize),
        validator: Some(validate),
        corrections: vec![
            CorrectionDefinition::new(SCHEMA_INVOICE)
                .extensions(&[EXT_KEY_DOC_TYPE])
                .copy_tax(),
        ],
        ..Default::default()
    }
}

fn extensions() -> Vec<Definition> {
    let regimes: Vec<CodeRow> = aeat::REGIME_CODES.iter().chain(EXTRA_REGIMES).copied().collect();
    vec![
        aeat::code_list(EXT_KEY_DOC_TYPE, "Invoice Type Code", "Código de Tipo de Factura", aeat::DOC_TYPES),
        aeat::code_list(
            EXT_KEY_CORRECTION_TYPE,
            "Correction Type Code",
            "Código de Tipo de Rectificativa",
            aeat::CORRECTION_TYPES,
        ),
        aeat::code_list(EXT_KEY_OP_CLASS, "Operation Classification", "Calificación de la Operación", OP_CLASSES)
            .desc(I18n::en("Set for taxed and not subject operations; exclusive with the exemption code.")),
        aeat::code_list(EXT_KEY_EXEMPT, "Exemption Code", "Código de Exención", aeat::EXEMPT_CODES),
        aeat::code_list(EXT_KEY_REGIME, "Tax Regime Code", "Clave de Régimen", &regimes),
        aeat::code_list(
            EXT_KEY_IDENTITY_TYPE,
            "Identity Type Code",
            "Código de Tipo de Identificación",
            aeat::IDENTITY_TYPES,
        ),
        aeat::code_list(EXT_KEY_ISSUER_TYPE, "Issuer Type Code", "Emitida por Tercero o Destinatario", ISSUER_TYPES),
    ]
}

fn invoice_scenarios() -> ScenarioSet {
    let standard = InvoiceType::Standard.as_str();
    let doc_type = |code: &str| Extensions::new().with(EXT_KEY_DOC_TYPE, code);
    ScenarioSet::new(
        SCHEMA_INVOICE,
        vec![
            Scenario::new(I18n::en("Standard invoice"))
                .types(&[standard])
                .ext(doc_type("F1")),
            Scenario::new(I18n::en("Simplified invoice"))
                .types(&[standard])
                .tags(&[TAG_SIMPLIFIED])
                .ext(doc_type("F2")),
        ],
    )
}

fn normalize(node: Node<'_>) {
    match node {
        Node::Invoice(inv) => invoices::normalize_invoice(inv),
        Node::Combo(c) => tax_combo::normalize_tax_combo(c),
        Node::Identity(id) => invoices::normalize_identity(id),
        _ => {}
    }
}

fn validate(node: NodeRef<'_>) -> Result<(), ErrorTree> {
    match node {
        NodeRef::Invoice(inv) => invoices::validate_invoice(inv),
        NodeRef::Combo(c) => tax_combo::validate_tax_combo(c),
        _ => Ok(()),
    }
}
