use crate::addons::{aeat, lift_preceding_ext};
use crate::bill::{Invoice, InvoiceType, Line, Tax};
use crate::cbc::{NOTE_KEY_GENERAL, Note};
use crate::org::{DocumentRef, ITEM_KEY_GOODS, ITEM_KEY_SERVICES, Identity};
use crate::rules::{ErrorTree, Fault, Fields, Issue, by, each_validate, length, required, when};
use crate::tax::keys::TAG_SELF_BILLED;
use crate::tax::{CATEGORY_VAT, ext_has_codes, ext_requires};

use super::tax_combo::is_reported;
use super::*;

/// Rectifying types chosen by the caller; anything else becomes `R1`.
const CHOSEN_DOC_TYPES: &[&str] = &["R2", "R3", "R4", "R5"];
const STANDARD_DOC_TYPES: &[&str] = &["F1", "F2", "F3"];
/// Document types that may omit the customer.
const SIMPLIFIED_DOC_TYPES: &[&str] = &["F2", "R5"];
const MAX_NOTE_LENGTH: usize = 500;

pub(super) fn normalize_invoice(inv: &mut Invoice) {
    lift_preceding_ext(inv, EXT_KEY_DOC_TYPE);
    aeat::normalize_correction(inv, EXT_KEY_DOC_TYPE, EXT_KEY_CORRECTION_TYPE, CHOSEN_DOC_TYPES);

    let third_party = inv.tags.has(TAG_SELF_BILLED) || inv.ordering.as_ref().is_some_and(|o| o.issuer.is_some());
    if third_party {
        inv.tax
            .get_or_insert_with(Default::default)
            .ext
            .set(EXT_KEY_NON_SUPPLIER_ISSUER, "S");
    }
}

pub(super) fn normalize_line(line: &mut Line) {
    let code = match line.item.key.as_str() {
        ITEM_KEY_GOODS => PRODUCT_GOODS,
        ITEM_KEY_SERVICES => PRODUCT_SERVICES,
        _ => return,
    };
    if let Some(vat) = line.combo_mut(CATEGORY_VAT) {
        vat.ext.set(EXT_KEY_PRODUCT, code);
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
        .field(
            "customer",
            &inv.customer,
            [
                when(!simplified, vec![required()]),
                aeat::customer_identified(EXT_KEY_IDENTITY_TYPE),
            ],
        )
        .nested("tax", &inv.tax, [required()], |tax| match tax {
            Some(tax) => validate_tax(tax, inv.kind),
            None => Ok(()),
        })
        .field("lines", &inv.lines, [by(|lines: &Vec<Line>| consistent_combos(lines))])
        .tree("notes", each_validate(&inv.notes, validate_note))
        .finish()
}

fn validate_tax(tax: &Tax, kind: InvoiceType) -> Result<(), ErrorTree> {
    let rectifying = aeat::RECTIFYING_DOC_TYPES.iter().any(|c| tax.ext.is(EXT_KEY_DOC_TYPE, c));
    Fields::new()
        .field(
            "ext",
            &tax.ext,
            [
                ext_requires(&[EXT_KEY_DOC_TYPE]),
                when(kind == InvoiceType::Standard, vec![ext_has_codes(EXT_KEY_DOC_TYPE, STANDARD_DOC_TYPES)]),
                when(kind.is_correction(), vec![ext_has_codes(EXT_KEY_DOC_TYPE, aeat::RECTIFYING_DOC_TYPES)]),
                when(rectifying, vec![ext_requires(&[EXT_KEY_CORRECTION_TYPE])]),
            ],
        )
        .finish()
}

/// Substitutions report the amounts of the document they replace.
fn validate_preceding(doc: &DocumentRef, corrective: bool) -> Result<(), ErrorTree> {
    Fields::new()
        .field("issue_date", &doc.issue_date, [required()])
        .field("tax", &doc.tax, [when(corrective, vec![required()])])
        .finish()
}

/// All reported combos share one regime key, and either all or none
/// carry a product type.
fn consistent_combos(lines: &[Line]) -> Result<(), Fault> {
    let mut combos = lines.iter().flat_map(|l| l.taxes.iter()).filter(|c| is_reported(c));
    let Some(first) = combos.next() else {
        return Ok(());
    };
    for c in combos {
        if first.ext.has(EXT_KEY_PRODUCT) != c.ext.has(EXT_KEY_PRODUCT) {
            return Err(Issue::invalid(format!("`{EXT_KEY_PRODUCT}` must be present in all tax combos or none")).into());
        }
        if first.ext.get(EXT_KEY_REGIME) != c.ext.get(EXT_KEY_REGIME) {
            return Err(Issue::invalid(format!("`{EXT_KEY_REGIME}` must be the same in all tax combos")).into());
        }
    }
    Ok(())
}

fn validate_note(note: &Note) -> Result<(), ErrorTree> {
    if note.key.as_str() != NOTE_KEY_GENERAL {
        return Ok(());
    }
    Fields::new().field("text", &note.text, [length(0, MAX_NOTE_LENGTH)]).finish()
}
