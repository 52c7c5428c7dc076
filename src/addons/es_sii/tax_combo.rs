use crate::cbc::Key;
use crate::l10n::CountryCode;
use crate::rules::{ErrorTree, Fields, when};
use crate::tax::keys::{
    KEY_EXEMPT, KEY_EXPORT, KEY_INTRA_COMMUNITY, KEY_OUTSIDE_SCOPE, KEY_REVERSE_CHARGE, KEY_STANDARD, KEY_ZERO,
};
use crate::tax::{
    CATEGORY_IGIC, CATEGORY_VAT, Combo, ext_exclude_codes, ext_one_of_required, ext_only_one_of, ext_requires,
};

use super::*;
use crate::addons::is_bare_standard;

const OPERATION_KEYS: &[&str] = &[EXT_KEY_NOT_SUBJECT, EXT_KEY_EXEMPT, EXT_KEY_NOT_EXEMPT];
const SUBJECT_KEYS: &[&str] = &[EXT_KEY_NOT_SUBJECT, EXT_KEY_NOT_EXEMPT];

pub(super) fn is_reported(c: &Combo) -> bool {
    c.is_category(CATEGORY_VAT) || c.is_category(CATEGORY_IGIC)
}

/// Key implied by the operation codes of a combo given without a rate.
fn key_from_codes(c: &Combo) -> Option<&'static str> {
    let not_subject = c.ext.code(EXT_KEY_NOT_SUBJECT);
    let not_exempt = c.ext.code(EXT_KEY_NOT_EXEMPT);
    let exempt = c.ext.code(EXT_KEY_EXEMPT);
    match (not_subject.as_str(), not_exempt.as_str(), exempt.as_str()) {
        ("N1" | "N2", _, _) => Some(KEY_OUTSIDE_SCOPE),
        (_, "S1", _) => Some(KEY_STANDARD),
        (_, "S2", _) => Some(KEY_REVERSE_CHARGE),
        (_, _, "E1" | "E6") => Some(KEY_EXEMPT),
        (_, _, "E2" | "E3" | "E4") => Some(KEY_EXPORT),
        (_, _, "E5") => Some(KEY_INTRA_COMMUNITY),
        _ => None,
    }
}

pub(super) fn normalize_tax_combo(c: &mut Combo) {
    if !is_reported(c) {
        return;
    }
    if c.foreign_country(&CountryCode::new("ES")).is_some() {
        c.ext.set(EXT_KEY_NOT_SUBJECT, "N2");
        c.ext.set_one_of(EXT_KEY_REGIME, "01", &["01", "17"]);
        c.ext.delete_all(&[EXT_KEY_EXEMPT, EXT_KEY_NOT_EXEMPT]);
        return;
    }
    if is_bare_standard(c) {
        if let Some(key) = key_from_codes(c) {
            c.key = Key::new(key);
        }
    }

    if c.key.as_str() == KEY_EXPORT {
        c.ext.set_if_empty(EXT_KEY_REGIME, "02");
    }
    c.ext.set_if_empty(EXT_KEY_REGIME, "01");

    match c.key.as_str() {
        "" | KEY_STANDARD | KEY_ZERO => {
            c.ext.set(EXT_KEY_NOT_EXEMPT, "S1");
            c.ext.delete_all(&[EXT_KEY_EXEMPT, EXT_KEY_NOT_SUBJECT]);
        }
        KEY_REVERSE_CHARGE => {
            c.ext.set(EXT_KEY_NOT_EXEMPT, "S2");
            c.ext.delete_all(&[EXT_KEY_EXEMPT, EXT_KEY_NOT_SUBJECT]);
        }
        KEY_OUTSIDE_SCOPE => {
            c.ext.set_one_of(EXT_KEY_NOT_SUBJECT, "N2", &["N1", "N2"]);
            c.ext.delete_all(&[EXT_KEY_EXEMPT, EXT_KEY_NOT_EXEMPT]);
        }
        KEY_EXEMPT => {
            c.ext.set_one_of(EXT_KEY_EXEMPT, "E1", &["E1", "E6"]);
            c.ext.delete_all(&[EXT_KEY_NOT_EXEMPT, EXT_KEY_NOT_SUBJECT]);
        }
        KEY_EXPORT => {
            c.ext.set_one_of(EXT_KEY_EXEMPT, "E2", &["E2", "E3", "E4"]);
            c.ext.delete_all(&[EXT_KEY_NOT_EXEMPT, EXT_KEY_NOT_SUBJECT]);
        }
        KEY_INTRA_COMMUNITY => {
            c.ext.set(EXT_KEY_EXEMPT, "E5");
            c.ext.delete_all(&[EXT_KEY_NOT_EXEMPT, EXT_KEY_NOT_SUBJECT]);
        }
        _ => {}
    }
}

pub(super) fn validate_tax_combo(c: &Combo) -> Result<(), ErrorTree> {
    if !is_reported(c) {
        return Ok(());
    }
    let general = c.ext.is(EXT_KEY_REGIME, "01");
    Fields::new()
        .field(
            "ext",
            &c.ext,
            [
                ext_requires(&[EXT_KEY_REGIME]),
                ext_only_one_of(OPERATION_KEYS),
                ext_one_of_required(OPERATION_KEYS),
                when(c.percent.is_some(), vec![ext_one_of_required(SUBJECT_KEYS)]),
                // S3 is only produced when S1 and S2 lines are merged for reporting.
                ext_exclude_codes(EXT_KEY_NOT_EXEMPT, &["S3"]),
                when(general, vec![ext_exclude_codes(EXT_KEY_EXEMPT, &["E2", "E3"])]),
            ],
        )
        .finish()
}
