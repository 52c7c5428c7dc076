//! Spanish FacturaE v3.2.x, the XML format required for invoices sent to
//! the public administration through FACe.
//!
//! Only the document level codes are handled here: the document type,
//! the invoice class and, for rectifying invoices, the reason code of
//! each preceding document.

use crate::bill::{Invoice, InvoiceType, Tax};
use crate::cbc::{Definition, I18n, Key, Source};
use crate::org::DocumentRef;
use crate::rules::{ErrorTree, Fields, each_validate, required, when};
use crate::tax::keys::{TAG_SELF_BILLED, TAG_SIMPLIFIED};
use crate::tax::{
    AddonDef, CorrectionDefinition, Extensions, NodeRef, SCHEMA_INVOICE, Scenario, ScenarioSet, ext_requires,
};

pub const KEY: &str = "es-facturae-v3";

pub const EXT_KEY_DOC_TYPE: &str = "es-facturae-doc-type";
pub const EXT_KEY_INVOICE_CLASS: &str = "es-facturae-invoice-class";
pub const EXT_KEY_CORRECTION: &str = "es-facturae-correction";

pub const DOC_TYPE_COMMERCIAL: &str = "FC";
pub const DOC_TYPE_SIMPLIFIED: &str = "FA";
pub const DOC_TYPE_SELF_BILLED: &str = "AF";

pub const INVOICE_CLASS_ORIGINAL: &str = "OO";
pub const INVOICE_CLASS_CORRECTIVE: &str = "OR";
pub const INVOICE_CLASS_SUMMARY: &str = "OC";

type CodeRow = (&'static str, &'static str, &'static str);

const DOC_TYPES: &[CodeRow] = &[
    (DOC_TYPE_COMMERCIAL, "Commercial Invoice", "Factura Comercial"),
    (DOC_TYPE_SIMPLIFIED, "Simplified Invoice", "Factura Simplificada"),
    (DOC_TYPE_SELF_BILLED, "Self-billed Invoice", "Auto-Factura"),
];

const INVOICE_CLASSES: &[CodeRow] = &[
    (INVOICE_CLASS_ORIGINAL, "Original", "Original"),
    (INVOICE_CLASS_CORRECTIVE, "Corrective Original", "Original Rectificativa"),
    (INVOICE_CLASS_SUMMARY, "Summary Original", "Original Recapitulativa"),
    ("CO", "Copy of the Original", "Duplicado Original"),
    ("CR", "Copy of the Corrective", "Duplicado Rectificativa"),
    ("CC", "Copy of the Summary", "Duplicado Recapitulativa"),
];

const CORRECTIONS: &[CodeRow] = &[
    ("01", "Invoice code", "Número de la factura"),
    ("02", "Invoice series", "Serie de la factura"),
    ("03", "Issue date", "Fecha expedición"),
    ("04", "Name and surnames/Corporate name - Issuer (Sender)", "Nombre y apellidos/Razón Social-Emisor"),
    ("05", "Name and surnames/Corporate name - Receiver", "Nombre y apellidos/Razón Social-Receptor"),
    ("06", "Issuer's Tax Identification Number", "Identificación fiscal Emisor/obligado"),
    ("07", "Receiver's Tax Identification Number", "Identificación fiscal Receptor"),
    ("08", "Supplier's address", "Domicilio Emisor/Obligado"),
    ("09", "Customer's address", "Domicilio Receptor"),
    ("10", "Item line", "Detalle Operación"),
    ("11", "Applicable Tax Rate", "Porcentaje impositivo a aplicar"),
    ("12", "Applicable Tax Amount", "Cuota tributaria a aplicar"),
    ("13", "Applicable Date/Period", "Fecha/Periodo a aplicar"),
    ("14", "Invoice Class", "Clase de factura"),
    ("15", "Legal literals", "Literales legales"),
    ("16", "Taxable Base", "Base imponible"),
    ("80", "Calculation of tax outputs", "Cálculo de cuotas repercutidas"),
    ("81", "Calculation of tax inputs", "Cálculo de cuotas retenidas"),
    (
        "82",
        "Taxable Base modified due to return of packages and packaging materials",
        "Base imponible modificada por devolución de envases / embalajes",
    ),
    (
        "83",
        "Taxable Base modified due to discounts and rebates",
        "Base imponible modificada por descuentos y bonificaciones",
    ),
    (
        "84",
        "Taxable Base modified due to firm court ruling or administrative decision",
        "Base imponible modificada por resolución firme, judicial o administrativa",
    ),
    (
        "85",
        "Taxable Base modified due to unpaid outputs where there is a judgement opening insolvency proceedings",
        "Base imponible modificada cuotas repercutidas no satisfechas. Auto de declaración de concurso",
    ),
];

fn source() -> Source {
    Source::new("FacturaE 3.2.2", "https://www.facturae.gob.es/formato/Paginas/version-3-2.aspx")
}

pub fn new() -> AddonDef {
    AddonDef {
        key: Key::new(KEY),
        name: I18n::en("Spain FacturaE").with("es", "FacturaE España"),
        description: I18n::en(
            "Electronic invoice format mandated for suppliers of the Spanish public administration.",
        ),
        sources: vec![source()],
        extensions: extensions(),
        scenarios: vec![invoice_scenarios()],
        validator: Some(validate),
        corrections: vec![
            CorrectionDefinition::new(SCHEMA_INVOICE)
                .types(&[InvoiceType::CreditNote.as_str(), InvoiceType::Corrective.as_str()])
                .extensions(&[EXT_KEY_CORRECTION])
                .required_extensions(&[EXT_KEY_CORRECTION])
                .reason_required(),
        ],
        ..Default::default()
    }
}

fn code_list(key: &str, en: &str, es: &str, codes: &[CodeRow]) -> Definition {
    Definition::key(key, I18n::en(en).with("es", es))
        .source(source())
        .values(
            codes
                .iter()
                .map(|(code, en, es)| Definition::code(*code, I18n::en(*en).with("es", *es)))
                .collect(),
        )
}

fn extensions() -> Vec<Definition> {
    vec![
        code_list(EXT_KEY_DOC_TYPE, "Document Type", "Tipo de Documento", DOC_TYPES),
        code_list(EXT_KEY_INVOICE_CLASS, "Invoice Class", "Clase de Factura", INVOICE_CLASSES),
        code_list(EXT_KEY_CORRECTION, "Correction Method", "Método de Rectificación", CORRECTIONS).desc(
            I18n::en("Reason code of a rectifying invoice, set on each preceding document."),
        ),
    ]
}

fn invoice_scenarios() -> ScenarioSet {
    let doc_type = |code: &str| Extensions::new().with(EXT_KEY_DOC_TYPE, code);
    let class = |code: &str| Extensions::new().with(EXT_KEY_INVOICE_CLASS, code);
    let corrections = [
        InvoiceType::Corrective.as_str(),
        InvoiceType::CreditNote.as_str(),
        InvoiceType::DebitNote.as_str(),
    ];
    ScenarioSet::new(
        SCHEMA_INVOICE,
        vec![
            Scenario::new(I18n::en("Commercial invoice")).ext(doc_type(DOC_TYPE_COMMERCIAL)),
            Scenario::new(I18n::en("Simplified invoice"))
                .tags(&[TAG_SIMPLIFIED])
                .ext(doc_type(DOC_TYPE_SIMPLIFIED)),
            Scenario::new(I18n::en("Self-billed invoice"))
                .tags(&[TAG_SELF_BILLED])
                .ext(doc_type(DOC_TYPE_SELF_BILLED)),
            Scenario::new(I18n::en("Original"))
                .types(&[InvoiceType::Standard.as_str()])
                .ext(class(INVOICE_CLASS_ORIGINAL)),
            Scenario::new(I18n::en("Corrective original"))
                .types(&corrections)
                .ext(class(INVOICE_CLASS_CORRECTIVE)),
        ],
    )
}

fn validate(node: NodeRef<'_>) -> Result<(), ErrorTree> {
    match node {
        NodeRef::Invoice(inv) => validate_invoice(inv),
        _ => Ok(()),
    }
}

fn validate_invoice(inv: &Invoice) -> Result<(), ErrorTree> {
    let rectifying = inv.kind.is_in(&[InvoiceType::CreditNote, InvoiceType::Corrective]);
    Fields::new()
        .nested("tax", &inv.tax, [required()], |tax| tax.as_ref().map_or(Ok(()), validate_tax))
        .nested("preceding", &inv.preceding, [when(rectifying, vec![required()])], |list| {
            if rectifying { each_validate(list, validate_preceding) } else { Ok(()) }
        })
        .finish()
}

fn validate_tax(tax: &Tax) -> Result<(), ErrorTree> {
    Fields::new()
        .field("ext", &tax.ext, [ext_requires(&[EXT_KEY_DOC_TYPE, EXT_KEY_INVOICE_CLASS])])
        .finish()
}

fn validate_preceding(doc: &DocumentRef) -> Result<(), ErrorTree> {
    Fields::new()
        .field("ext", &doc.ext, [ext_requires(&[EXT_KEY_CORRECTION])])
        .finish()
}
