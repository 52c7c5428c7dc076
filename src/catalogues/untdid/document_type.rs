//! UNTDID 1001 document name codes, limited to the EN 16931 invoice and payment subset.

use crate::catalogues::code_list;
use crate::cbc::{Definition, I18n};

/// Kind of commercial document.
pub const EXT_KEY_DOCUMENT_TYPE: &str = "untdid-document-type";

const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("71", "Request for payment"),
    ("80", "Debit note related to goods or services"),
    ("81", "Credit note related to goods or services"),
    ("82", "Metered services invoice"),
    ("83", "Credit note related to financial adjustments"),
    ("84", "Debit note related to financial adjustments"),
    ("102", "Tax notification"),
    ("130", "Invoicing data sheet"),
    ("202", "Direct payment valuation"),
    ("203", "Provisional payment valuation"),
    ("204", "Payment valuation"),
    ("211", "Interim application for payment"),
    ("218", "Final payment request based on completion of work"),
    ("219", "Payment request for completed units"),
    ("261", "Self billed credit note"),
    ("262", "Consolidated credit note - goods and services"),
    ("295", "Price variation invoice"),
    ("296", "Credit note for price variation"),
    ("308", "Delcredere credit note"),
    ("325", "Proforma invoice"),
    ("326", "Partial invoice"),
    ("380", "Standard Invoice"),
    ("381", "Credit note"),
    ("382", "Commission note"),
    ("383", "Debit note"),
    ("384", "Corrected invoice"),
    ("385", "Consolidated invoice"),
    ("386", "Prepayment invoice"),
    ("387", "Hire invoice"),
    ("388", "Tax invoice"),
    ("389", "Self-billed invoice"),
    ("390", "Delcredere invoice"),
    ("393", "Factored invoice"),
    ("394", "Lease invoice"),
    ("395", "Consignment invoice"),
    ("396", "Factored credit note"),
    ("420", "Optical Character Reading (OCR) payment credit note"),
    ("456", "Debit advice"),
    ("457", "Reversal of debit"),
    ("458", "Reversal of credit"),
    ("527", "Self billed debit note"),
    ("532", "Forwarder's credit note"),
    ("553", "Forwarder's invoice discrepancy report"),
    ("575", "Insurer's invoice"),
    ("623", "Forwarder's invoice"),
    ("633", "Port charges documents"),
    ("751", "Invoice information for accounting purposes"),
    ("780", "Freight invoice"),
    ("817", "Claim notification"),
    ("870", "Consular invoice"),
    ("875", "Partial construction invoice"),
    ("876", "Partial final construction invoice"),
    ("877", "Final construction invoice"),
    ("935", "Customs invoice"),
];

pub(super) fn extension() -> Definition {
    code_list(
        EXT_KEY_DOCUMENT_TYPE,
        I18n::en("UNTDID 1001 Document Type"),
        I18n::en(
            "UNTDID 1001 code used to describe the type of document. Regimes and addons may use their own subset of codes.",
        ),
        DOCUMENT_TYPES,
    )
}
