use crate::cbc::Key;
use crate::l10n::CountryCode;
use crate::rules::{ErrorTree, Fields, when};
use crate::tax::keys::{
    KEY_EXEMPT, KEY_EXPORT, KEY_INTRA_COMMUNITY, KEY_OUTSIDE_SCOPE, KEY_REVERSE_CHARGE, KEY_STANDARD,
    RATE_GENERAL, RATE_INTERMEDIATE, RATE_REDUCED,
};
use crate::tax::{CATEGORY_VAT, Combo, ext_requires};

use super::*;
use crate::addons::is_bare_standard;

const RATE_CODES: &[(&str, &str)] = &[
    (RATE_REDUCED, TAX_RATE_REDUCED),
    (RATE_INTERMEDIATE, TAX_RATE_INTERMEDIATE),
    (RATE_GENERAL, TAX_RATE_NORMAL),
];

const REVERSE_CHARGE_EXEMPTIONS: &[&str] = &["M30", "M31", "M32", "M33", "M40", "M41", "M42", "M43"];

/// Tax key implied by an AT exemption code.
fn key_for_exemption(code: &str) -> &'static str {
    match code {
        c if REVERSE_CHARGE_EXEMPTIONS.contains(&c) => KEY_REVERSE_CHARGE,
        "M05" => KEY_EXPORT,
        "M16" => KEY_INTRA_COMMUNITY,
        "M99" => KEY_OUTSIDE_SCOPE,
        _ => KEY_EXEMPT,
    }
}

/// Default exemption code for keys that are always exempt in SAF-T.
fn exemption_for_key(key: &str) -> Option<&'static str> {
    match key {
        KEY_REVERSE_CHARGE => Some("M40"),
        KEY_OUTSIDE_SCOPE => Some("M99"),
        KEY_INTRA_COMMUNITY => Some("M16"),
        KEY_EXPORT => Some("M05"),
        _ => None,
    }
}

pub(super) fn normalize_tax_combo(c: &mut Combo) {
    if !c.is_category(CATEGORY_VAT) {
        return;
    }
    if c.foreign_country(&CountryCode::new("PT")).is_some() {
        c.ext.set(EXT_KEY_TAX_RATE, TAX_RATE_OTHER);
        c.ext.delete(EXT_KEY_EXEMPTION);
        return;
    }
    if is_bare_standard(c) {
        if let Some(code) = c.ext.get(EXT_KEY_EXEMPTION) {
            c.key = Key::new(key_for_exemption(code.as_str()));
        }
    }
    let key = if c.key.is_empty() { KEY_STANDARD } else { c.key.as_str() };
    if key == KEY_STANDARD && c.rate.is_empty() && c.percent.is_none() {
        let from_ext = RATE_CODES.iter().find(|(_, code)| c.ext.is(EXT_KEY_TAX_RATE, code));
        if let Some((rate, _)) = from_ext {
            c.rate = Key::new(rate);
        }
    }

    match key {
        KEY_STANDARD => {
            if let Some((_, code)) = RATE_CODES.iter().find(|(rate, _)| c.rate.as_str() == *rate) {
                c.ext.set(EXT_KEY_TAX_RATE, *code);
                c.ext.delete(EXT_KEY_EXEMPTION);
            }
        }
        KEY_EXEMPT => c.ext.set(EXT_KEY_TAX_RATE, TAX_RATE_EXEMPT),
        other => {
            if let Some(code) = exemption_for_key(other) {
                c.ext.set(EXT_KEY_TAX_RATE, TAX_RATE_EXEMPT);
                c.ext.set_if_empty(EXT_KEY_EXEMPTION, code);
            }
        }
    }
}

pub(super) fn validate_tax_combo(c: &Combo) -> Result<(), ErrorTree> {
    if !c.is_category(CATEGORY_VAT) {
        return Ok(());
    }
    let exempt = c.ext.is(EXT_KEY_TAX_RATE, TAX_RATE_EXEMPT);
    Fields::new()
        .field(
            "ext",
            &c.ext,
            [
                ext_requires(&[EXT_KEY_TAX_RATE]),
                when(exempt, vec![ext_requires(&[EXT_KEY_EXEMPTION])]),
            ],
        )
        .finish()
}
