//! Code tables and rules shared by the reporting formats of the Spanish
//! tax agency (AEAT): SII and VERI*FACTU.

use crate::bill::{Invoice, InvoiceType};
use crate::cbc::{Definition, I18n, Key, Source};
use crate::org::{IDENTITY_KEY_FOREIGN, IDENTITY_KEY_OTHER, IDENTITY_KEY_PASSPORT, IDENTITY_KEY_RESIDENT, Party};
use crate::rules::{Fields, Issue, Rule, by};
use crate::tax::require_identity_code;

/// Document types of invoices that rectify another one.
pub(crate) const RECTIFYING_DOC_TYPES: &[&str] = &["R1", "R2", "R3", "R4", "R5"];

pub(crate) const DOC_TYPE_RECTIFIED: &str = "R1";
pub(crate) const CORRECTION_TYPE_DIFFERENCES: &str = "I";
pub(crate) const CORRECTION_TYPE_SUBSTITUTION: &str = "S";

pub(crate) type CodeRow = (&'static str, &'static str, &'static str);

pub(crate) const DOC_TYPES: &[CodeRow] = &[
    ("F1", "Invoice (Article 6, 7.2 and 7.3 of RD 1619/2012)", "Factura (Art. 6, 7.2 y 7.3 del RD 1619/2012)"),
    ("F2", "Simplified invoice (Article 6.1.d) of RD 1619/2012)", "Factura Simplificada (Art. 6.1.d) del RD 1619/2012)"),
    ("F3", "Invoice issued as replacement of simplified invoice", "Factura emitida en sustitución de facturas simplificadas"),
    ("R1", "Rectified invoice: articles 80.1, 80.2, and 80.6", "Factura rectificativa: art. 80 Uno, Dos y Seis LIVA"),
    ("R2", "Rectified invoice: article 80.3", "Factura rectificativa: artículo 80.3"),
    ("R3", "Rectified invoice: article 80.4", "Factura rectificativa: artículo 80.4"),
    ("R4", "Rectified invoice: other", "Factura rectificativa: resto"),
    ("R5", "Rectified invoice: simplified invoices", "Factura rectificativa: facturas simplificadas"),
];

pub(crate) const CORRECTION_TYPES: &[CodeRow] = &[
    (CORRECTION_TYPE_SUBSTITUTION, "Substitution", "Por Sustitución"),
    (CORRECTION_TYPE_DIFFERENCES, "Differences", "Por Diferencias"),
];

pub(crate) const EXEMPT_CODES: &[CodeRow] = &[
    ("E1", "Exempt pursuant to Art. 20 (internal operations).", "Exenta por el art. 20 (operaciones interiores)."),
    ("E2", "Exempt pursuant to Art. 21 (exports of goods).", "Exenta por el art. 21 (exportaciones de bienes)."),
    (
        "E3",
        "Exempt pursuant to Art. 22 (operations asimilated to exports).",
        "Exenta por el art. 22 (operaciones asimiladas a las exportaciones).",
    ),
    (
        "E4",
        "Exempt pursuant to Art. 23 and 24 (temporary deposit, customs and fiscal regimes, and other situations).",
        "Exenta por los art. 23 y 24 (situaciones de depósito temporal, regímenes aduaneros y fiscales, y otras situaciones).",
    ),
    (
        "E5",
        "Exempt pursuant to Art. 25 (delivery of goods destined to another Member State).",
        "Exenta por el art. 25 (entregas de bienes destinados a otro Estado miembro).",
    ),
    ("E6", "Exempt pursuant to other reasons", "Exenta por otra causa"),
];

pub(crate) const REGIME_CODES: &[CodeRow] = &[
    ("01", "General regime operation", "Operación de régimen general"),
    ("02", "Export", "Exportación"),
    (
        "03",
        "Special regime for used goods, art objects, antiques and collectibles",
        "Operaciones a las que se aplique el régimen especial de bienes usados, objetos de arte, antigüedades y objetos de colección",
    ),
    ("04", "Special regime for investment gold", "Régimen especial del oro de inversión"),
    ("05", "Special regime for travel agencies", "Régimen especial de las agencias de viajes"),
    (
        "06",
        "Special regime for VAT/IGIC groups (Advanced Level)",
        "Régimen especial grupo de entidades en IVA/IGIC (Nivel Avanzado)",
    ),
    ("07", "Special cash accounting regime", "Régimen especial del criterio de caja"),
    ("08", "Operations subject to IPSI / IGIC", "Operaciones sujetas al IPSI / IGIC"),
    (
        "09",
        "Billing of travel agency services acting as mediators in name and on behalf of others",
        "Facturación de las prestaciones de servicios de agencias de viaje que actúan como mediadoras en nombre y por cuenta ajena",
    ),
    (
        "10",
        "Collection of professional fees or rights on behalf of third parties",
        "Cobros por cuenta de terceros de honorarios profesionales o de derechos derivados de la propiedad industrial",
    ),
    ("11", "Business premises rental operations", "Operaciones de arrendamiento de local de negocio"),
    (
        "14",
        "Invoice with pending VAT/IGIC accrual in work certifications for Public Administration",
        "Factura con IVA pendiente de devengo en certificaciones de obra cuyo destinatario sea una Administración Pública",
    ),
    (
        "15",
        "Invoice with pending VAT/IGIC accrual in successive tract operations",
        "Factura con IVA/IGIC pendiente de devengo en operaciones de tracto sucesivo",
    ),
    (
        "17",
        "Operation covered by one of the regimes provided for in Chapter XI of Title IX (OSS and IOSS)",
        "Operación acogida a alguno de los regímenes previstos en el Capítulo XI del Título IX (OSS e IOSS)",
    ),
];

pub(crate) const IDENTITY_TYPES: &[CodeRow] = &[
    ("02", "NIF-VAT Identity (VIES)", "NIF-IVA"),
    ("03", "Passport", "Pasaporte"),
    ("04", "Foreign Identity Document", "Documento oficial de identificación expedido por el país o territorio de residencia"),
    ("05", "Residential Certificate", "Certificado de residencia"),
    ("06", "Other Identity Document", "Otro documento probatorio"),
    ("07", "Not registered in census", "No censado"),
];

pub(crate) fn source() -> Source {
    Source::new(
        "Orden Ministerial HFP/417/2017, de 12 de Mayo",
        "https://www.boe.es/buscar/act.php?id=BOE-A-2017-5312",
    )
}

/// Extension definition over `(code, english, spanish)` rows.
pub(crate) fn code_list(key: &str, en: &str, es: &str, codes: &[CodeRow]) -> Definition {
    Definition::key(key, I18n::en(en).with("es", es))
        .source(source())
        .values(
            codes
                .iter()
                .map(|(code, en, es)| Definition::code(*code, I18n::en(*en).with("es", *es)))
                .collect(),
        )
}

/// AEAT code for a personal identity that is not a Spanish tax code.
pub(crate) fn identity_type_code(key: &Key) -> Option<&'static str> {
    match key.as_str() {
        IDENTITY_KEY_PASSPORT => Some("03"),
        IDENTITY_KEY_FOREIGN => Some("04"),
        IDENTITY_KEY_RESIDENT => Some("05"),
        IDENTITY_KEY_OTHER => Some("06"),
        _ => None,
    }
}

/// Correction type from the invoice type, `I` for credit and debit notes
/// and `S` for corrective invoices. Rectifying documents default to `R1`
/// unless the caller already chose one of `keep`.
pub(crate) fn normalize_correction(inv: &mut Invoice, doc_type_key: &str, correction_key: &str, keep: &[&str]) {
    let code = match inv.kind {
        InvoiceType::CreditNote | InvoiceType::DebitNote => CORRECTION_TYPE_DIFFERENCES,
        InvoiceType::Corrective => CORRECTION_TYPE_SUBSTITUTION,
        _ => {
            if let Some(tax) = &mut inv.tax {
                tax.ext.delete(correction_key);
            }
            return;
        }
    };
    let ext = &mut inv.tax.get_or_insert_with(Default::default).ext;
    ext.set(correction_key, code);
    if !keep.iter().any(|c| ext.is(doc_type_key, c)) {
        ext.set(doc_type_key, DOC_TYPE_RECTIFIED);
    }
}

/// Customers are identified either by a tax ID with a code or by an
/// identity typed for the tax agency.
pub(crate) fn customer_identified<'r>(identity_ext: &'r str) -> Rule<'r, Option<Party>> {
    by(move |party: &Option<Party>| {
        let Some(party) = party else {
            return Ok(());
        };
        if party.tax_id.is_none() && party.identity_for_ext(identity_ext).is_none() {
            return Err(Issue::invalid(format!(
                "must have a tax_id, or an identity with ext '{identity_ext}'"
            ))
            .into());
        }
        match &party.tax_id {
            Some(id) => Fields::new()
                .field("tax_id", id, [require_identity_code()])
                .finish()
                .map_err(Into::into),
            None => Ok(()),
        }
    })
}
