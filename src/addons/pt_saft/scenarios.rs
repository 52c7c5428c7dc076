use rust_decimal::Decimal;

use crate::bill::{Invoice, InvoiceType};
use crate::cbc::{Definition, I18n};
use crate::tax::keys::TAG_SIMPLIFIED;
use crate::tax::{Extensions, SCHEMA_INVOICE, Scenario, ScenarioSet, TagSet};

use super::*;

pub(super) fn invoice_tags() -> TagSet {
    TagSet::new(
        SCHEMA_INVOICE,
        vec![Definition::key(
            TAG_INVOICE_RECEIPT,
            I18n::en("Invoice-receipt").with("pt", "Fatura-recibo"),
        )],
    )
}

/// Document types from the invoice type and tags. More specific
/// scenarios come later so their code wins.
pub(super) fn invoice_scenarios() -> ScenarioSet {
    let standard = InvoiceType::Standard.as_str();
    let invoice_type = |code: &str| Extensions::new().with(EXT_KEY_INVOICE_TYPE, code);
    ScenarioSet::new(
        SCHEMA_INVOICE,
        vec![
            Scenario::new(I18n::en("Standard invoice"))
                .types(&[standard])
                .ext(invoice_type(INVOICE_TYPE_STANDARD)),
            Scenario::new(I18n::en("Simplified invoice"))
                .types(&[standard])
                .tags(&[TAG_SIMPLIFIED])
                .ext(invoice_type(INVOICE_TYPE_SIMPLIFIED)),
            Scenario::new(I18n::en("Invoice-receipt"))
                .types(&[standard])
                .filter(is_invoice_receipt)
                .ext(invoice_type(INVOICE_TYPE_INVOICE_RECEIPT)),
            Scenario::new(I18n::en("Debit note"))
                .types(&[InvoiceType::DebitNote.as_str()])
                .ext(invoice_type(INVOICE_TYPE_DEBIT_NOTE)),
            Scenario::new(I18n::en("Credit note"))
                .types(&[InvoiceType::CreditNote.as_str()])
                .ext(invoice_type(INVOICE_TYPE_CREDIT_NOTE)),
            Scenario::new(I18n::en("Pro forma"))
                .types(&[InvoiceType::Proforma.as_str()])
                .ext(Extensions::new().with(EXT_KEY_WORK_TYPE, WORK_TYPE_PROFORMA)),
        ],
    )
}

/// Tagged as an invoice-receipt, or already paid in full by advances.
fn is_invoice_receipt(inv: &Invoice) -> bool {
    if inv.tags.has(TAG_INVOICE_RECEIPT) {
        return true;
    }
    inv.totals
        .as_ref()
        .is_some_and(|t| t.advances.is_some() && t.due == Some(Decimal::ZERO))
}
