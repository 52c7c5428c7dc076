//! Spanish SII (Suministro Inmediato de Información) reporting.
//!
//! Every VAT or IGIC combo carries the operation type and the special
//! regime key reported to the AEAT. Document types come from scenarios,
//! except for rectifying documents whose type depends on the legal
//! ground of the correction and defaults to `R1`.

mod invoices;
mod tax_combo;

use crate::addons::aeat::{self, CodeRow};
use crate::bill::InvoiceType;
use crate::cbc::{Definition, I18n, Key};
use crate::rules::ErrorTree;
use crate::tax::keys::TAG_SIMPLIFIED;
use crate::tax::{AddonDef, CorrectionDefinition, Extensions, Node, NodeRef, SCHEMA_INVOICE, Scenario, ScenarioSet};

pub const KEY: &str = "es-sii-v1";

pub const EXT_KEY_DOC_TYPE: &str = "es-sii-doc-type";
pub const EXT_KEY_CORRECTION_TYPE: &str = "es-sii-correction-type";
pub const EXT_KEY_NOT_EXEMPT: &str = "es-sii-not-exempt";
pub const EXT_KEY_NOT_SUBJECT: &str = "es-sii-not-subject";
pub const EXT_KEY_EXEMPT: &str = "es-sii-exempt";
pub const EXT_KEY_REGIME: &str = "es-sii-regime";
pub const EXT_KEY_IDENTITY_TYPE: &str = "es-sii-identity-type";
pub const EXT_KEY_SIMPLIFIED_ART7273: &str = "es-sii-simplified-art7273";
pub const EXT_KEY_NON_SUPPLIER_ISSUER: &str = "es-sii-non-supplier-issuer";
pub const EXT_KEY_PRODUCT: &str = "es-sii-product";

pub const PRODUCT_GOODS: &str = "goods";
pub const PRODUCT_SERVICES: &str = "services";

const NOT_EXEMPT_CODES: &[CodeRow] = &[
    ("S1", "Non-exempt - Without reverse charge", "No exenta - Sin inversión sujeto pasivo"),
    ("S2", "Non-exempt - With reverse charge", "No exenta - Con Inversión sujeto pasivo"),
    (
        "S3",
        "Non-exempt - Without reverse charge and with reverse charge",
        "No exenta - Sin inversión sujeto pasivo y con inversión sujeto pasivo",
    ),
];

const NOT_SUBJECT_CODES: &[CodeRow] = &[
    ("N1", "Not Subject - Articles 7, 14, others", "No sujeta - Artículos 7, 14, otros"),
    ("N2", "Not Subject - Due to location rules", "No sujeta - Por reglas de localización"),
];

const YES_NO: &[CodeRow] = &[("S", "Yes", "Sí"), ("N", "No", "No")];

pub fn new() -> AddonDef {
    AddonDef {
        key: Key::new(KEY),
        name: I18n::en("Spain SII").with("es", "SII España"),
        description: I18n::en(
            "Immediate Supply of Information: invoice records sent to the Spanish tax agency \
             within four days of issue.",
        ),
        sources: vec![aeat::source()],
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
    let code = |code: &str, en: &str, es: &str| Definition::code(code, I18n::en(en).with("es", es));
    vec![
        aeat::code_list(EXT_KEY_DOC_TYPE, "Invoice Type Code", "Código de Tipo de Factura", aeat::DOC_TYPES),
        aeat::code_list(
            EXT_KEY_CORRECTION_TYPE,
            "Correction Type Code",
            "Código de Tipo de Rectificativa",
            aeat::CORRECTION_TYPES,
        ),
        aeat::code_list(
            EXT_KEY_NOT_EXEMPT,
            "Type of Operation Subject and Not Exempt",
            "Tipo de Operación Sujeta y No Exenta",
            NOT_EXEMPT_CODES,
        ),
        aeat::code_list(
            EXT_KEY_NOT_SUBJECT,
            "Type of Operation Not Subject",
            "Tipo de Operación No Sujeta",
            NOT_SUBJECT_CODES,
        ),
        aeat::code_list(EXT_KEY_EXEMPT, "Exemption code", "Código de Exención", aeat::EXEMPT_CODES),
        aeat::code_list(
            EXT_KEY_REGIME,
            "Special Regime or Relevance Key",
            "Clave de Régimen Especial o Transcendencia",
            aeat::REGIME_CODES,
        ),
        aeat::code_list(
            EXT_KEY_IDENTITY_TYPE,
            "Identity Type Code",
            "Código de Tipo de Identificación",
            aeat::IDENTITY_TYPES,
        ),
        aeat::code_list(
            EXT_KEY_SIMPLIFIED_ART7273,
            "Simplified Invoice Art. 7.2 and 7.3, RD 1619/2012",
            "Factura Simplificada Articulo 7,2 y 7,3 RD 1619/2012",
            YES_NO,
        )
        .desc(I18n::en(
            "Customer asked for their fiscal details on the invoice without being registered for tax.",
        )),
        aeat::code_list(
            EXT_KEY_NON_SUPPLIER_ISSUER,
            "Issued by Third Party or Recipient",
            "Emitida por Tercero o Destinatario",
            YES_NO,
        )
        .desc(I18n::en(
            "Set to `S` for self-billed invoices and when the ordering section names an issuer.",
        )),
        Definition::key(EXT_KEY_PRODUCT, I18n::en("Product Type").with("es", "Tipo de Producto"))
            .desc(I18n::en(
                "Splits the reported breakdown between delivery of goods and provision of services.",
            ))
            .values(vec![
                code(PRODUCT_GOODS, "Delivery of goods", "Entrega de bienes"),
                code(PRODUCT_SERVICES, "Provision of services", "Prestación de servicios"),
            ]),
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
        Node::Line(line) => invoices::normalize_line(line),
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
