use crate::addons::{aeat, lift_preceding_ext};
use crate::bill::{Invoice, InvoiceType, Tax};
use crate::cbc::{NOTE_KEY_GENERAL, Note};
use crate::org::{DocumentRef, Identity, Ordering, Party};
use crate::rules::{ErrorTree, Fault, Fields, Issue, Rule, by, each_validate, length, required, when};
use crate::tax::keys::TAG_SELF_BILLED;
use crate::tax::{ext_has_codes, ext_requires};

use super::*;

const FORBIDDEN_CHARS: &[char] = &['<', '>', '"', '\'', '='];
const MAX_NOTE_LENGTH: usize = 500;

const RECTIFYING_KEEP: &[&str] = &["R2", "R3", "R4", "R5"];
const CORRECTIVE_KEEP: &[&str] = &["F3", "R2", "R3", "R4", "R5"];
const STANDARD_DOC_TYPES: &[&str] = &["F1", "F2"];
const CORRECTIVE_DOC_TYPES: &[&str] = &["F3", "R1", "R2", "R3", "R4", "R5"];
const SIMPLIFIED_DOC_TYPES: &[&str] = &["F2", "R5"];

pub(super) fn normalize_invoice(inv: &mut Invoice) {
    lift_preceding_ext(inv, EXT_KEY_DOC_TYPE);
    let keep = if inv.kind == InvoiceType::Corrective { CORRECTIVE_KEEP } else { RECTIFYING_KEEP };
    aeat::normalize_correction(inv, EXT_KEY_DOC_TYPE, EXT_KEY_CORRECTION_TYPE, keep);

    let issuer = if inv.ordering.as_ref().is_some_and(|o| o.issuer.is_some()) {
        Some(ISSUER_TYPE_THIRD_PARTY)
    } else if inv.tags.has(TAG_SELF_BILLED) {
        Some(ISSUER_TYPE_CUSTOMER)
    } else {
        None
    };
    if let Some(code) = issuer {
        inv.tax.get_or_insert_with(Default::default).ext.set(EXT_KEY_ISSUER_TYPE, code);
    }
}

pub(super) fn normalize_identity(id: &mut Identity) {
    if let Some(code) = aeat::identity_type_code(&id.key) {
        id.ext.set(EXT_KEY_IDENTITY_TYPE, code);
    }
}

pub(super) fn validate_invoice(inv: &Invoice) -> Result<(), ErrorTree> {
    let simplified = inv
        .tax_ext_ref()
        .is_some_and(|ext| SIMPLIFIED_DOC_TYPES.iter().any(|c| ext.is(EXT_KEY_DOC_TYPE, c)));
    let corrective = inv.kind == InvoiceType::Corrective;

    Fields::new()
        .nested("preceding", &inv.preceding, [when(corrective, vec![required()])], |list| {
            each_validate(list, |p| validate_preceding(p, corrective))
        })
        .nested("supplier", &inv.supplier, [], validate_party_name)
        .nested(
            "customer",
            &inv.customer,
            [
                when(!simplified, vec![required()]),
                aeat::customer_identified(EXT_KEY_IDENTITY_TYPE),
            ],
            |p| p.as_ref().map_or(Ok(()), validate_party_name),
        )
        .nested("ordering", &inv.ordering, [], |o| o.as_ref().map_or(Ok(()), validate_ordering))
        .nested("tax", &inv.tax, [required()], |tax| match tax {
            Some(tax) => validate_tax(tax, inv.kind),
            None => Ok(()),
        })
        .tree("notes", each_validate(&inv.notes, validate_note))
        .finish()
}

fn validate_tax(tax: &Tax, kind: InvoiceType) -> Result<(), ErrorTree> {
    let allowed = match kind {
        InvoiceType::Standard => Some(STANDARD_DOC_TYPES),
        InvoiceType::CreditNote | InvoiceType::DebitNote => Some(aeat::RECTIFYING_DOC_TYPES),
        InvoiceType::Corrective => Some(CORRECTIVE_DOC_TYPES),
        InvoiceType::Proforma => None,
    };
    let rectifying = aeat::RECTIFYING_DOC_TYPES.iter().any(|c| tax.ext.is(EXT_KEY_DOC_TYPE, c));
    Fields::new()
        .field(
            "ext",
            &tax.ext,
            [
                ext_requires(&[EXT_KEY_DOC_TYPE]),
                when(allowed.is_some(), vec![ext_has_codes(EXT_KEY_DOC_TYPE, allowed.unwrap_or_default())]),
                when(rectifying, vec![ext_requires(&[EXT_KEY_CORRECTION_TYPE])]),
            ],
        )
        .finish()
}

fn validate_preceding(doc: &DocumentRef, corrective: bool) -> Result<(), ErrorTree> {
    Fields::new()
        .field("issue_date", &doc.issue_date, [required()])
        .field("tax", &doc.tax, [when(corrective, vec![required()])])
        .finish()
}

fn validate_party_name(party: &Party) -> Result<(), ErrorTree> {
    Fields::new().field("name", &party.name, [no_forbidden_chars()]).finish()
}

fn validate_ordering(ordering: &Ordering) -> Result<(), ErrorTree> {
    Fields::new()
        .nested("issuer", &ordering.issuer, [], |p| p.as_ref().map_or(Ok(()), validate_party_name))
        .finish()
}

fn validate_note(note: &Note) -> Result<(), ErrorTree> {
    if note.key.as_str() != NOTE_KEY_GENERAL {
        return Ok(());
    }
    Fields::new()
        .field("text", &note.text, [no_forbidden_chars(), length(0, MAX_NOTE_LENGTH)])
        .finish()
}

/// Characters the AEAT service rejects in free text.
fn no_forbidden_chars<'r>() -> Rule<'r, String> {
    by(|s: &String| match s.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        Some(c) => Err(Fault::from(Issue::invalid(format!("contains forbidden character: {c}")))),
        None => Ok(()),
    })
}
