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

const CLASS_KEYS: &[&str] = &[EXT_KEY_OP_CLASS, EXT_KEY_EXEMPT];

fn is_reported(c: &Combo) -> bool {
    c.is_category(CATEGORY_VAT) || c.is_category(CATEGORY_IGIC)
}

fn key_from_codes(c: &Combo) -> Option<&'static str> {
    match (c.ext.code(EXT_KEY_OP_CLASS).as_str(), c.ext.code(EXT_KEY_EXEMPT).as_str()) {
        ("S1", _) => Some(KEY_STANDARD),
        ("S2", _) => Some(KEY_REVERSE_CHARGE),
        ("N1" | "N2", _) => Some(KEY_OUTSIDE_SCOPE),
        (_, "E1" | "E6") => Some(KEY_EXEMPT),
        (_, "E2" | "E3" | "E4") => Some(KEY_EXPORT),
        (_, "E5") => Some(KEY_INTRA_COMMUNITY),
        _ => None,
    }
}

pub(super) fn normalize_tax_combo(c: &mut Combo) {
    if !is_reported(c) {
        return;
    }
    if c.foreign_country(&CountryCode::new("ES")).is_some() {
        c.ext.set(EXT_KEY_OP_CLASS, "N2");
        c.ext.set_if_empty(EXT_KEY_REGIME, REGIME_FOREIGN);
        c.ext.delete(EXT_KEY_EXEMPT);
        return;
    }
    if is_bare_standard(c) {
        if let Some(key) = key_from_codes(c) {
            c.key = Key::new(key);
        }
    }

    if c.surcharge.is_some() {
        c.ext.set_if_empty(EXT_KEY_REGIME, REGIME_SURCHARGE);
    }
    if matches!(c.key.as_str(), KEY_EXPORT | KEY_INTRA_COMMUNITY) {
        c.ext.set_if_empty(EXT_KEY_REGIME, REGIME_EXPORT);
    }
    c.ext.set_if_empty(EXT_KEY_REGIME, REGIME_GENERAL);

    match c.key.as_str() {
        "" | KEY_STANDARD | KEY_ZERO => set_op_class(c, "S1"),
        KEY_REVERSE_CHARGE => set_op_class(c, "S2"),
        KEY_OUTSIDE_SCOPE => {
            c.ext.set_one_of(EXT_KEY_OP_CLASS, "N2", &["N1", "N2"]);
            c.ext.delete(EXT_KEY_EXEMPT);
        }
        KEY_EXEMPT => set_exempt(c, "E1", &["E1", "E6"]),
        KEY_EXPORT => set_exempt(c, "E2", &["E2", "E3", "E4"]),
        KEY_INTRA_COMMUNITY => set_exempt(c, "E5", &[]),
        _ => {}
    }
}

fn set_op_class(c: &mut Combo, code: &str) {
    c.ext.set(EXT_KEY_OP_CLASS, code);
    c.ext.delete(EXT_KEY_EXEMPT);
}

fn set_exempt(c: &mut Combo, default: &str, allowed: &[&str]) {
    c.ext.set_one_of(EXT_KEY_EXEMPT, default, allowed);
    c.ext.delete(EXT_KEY_OP_CLASS);
}

pub(super) fn validate_tax_combo(c: &Combo) -> Result<(), ErrorTree> {
    if !is_reported(c) {
        return Ok(());
    }
    let general = c.ext.is(EXT_KEY_REGIME, REGIME_GENERAL);
    Fields::new()
        .field(
            "ext",
            &c.ext,
            [
                ext_requires(&[EXT_KEY_REGIME]),
                ext_only_one_of(CLASS_KEYS),
                ext_one_of_required(CLASS_KEYS),
                when(general, vec![ext_exclude_codes(EXT_KEY_EXEMPT, &["E2", "E3"])]),
            ],
        )
        .finish()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn normalized(mut c: Combo) -> Combo {
        normalize_tax_combo(&mut c);
        c
    }

    #[test]
    fn classification_by_key() {
        let cases = [
            ("standard", EXT_KEY_OP_CLASS, "S1", "01"),
            ("zero", EXT_KEY_OP_CLASS, "S1", "01"),
            ("reverse-charge", EXT_KEY_OP_CLASS, "S2", "01"),
            ("outside-scope", EXT_KEY_OP_CLASS, "N2", "01"),
            ("exempt", EXT_KEY_EXEMPT, "E1", "01"),
            ("export", EXT_KEY_EXEMPT, "E2", "02"),
            ("intra-community", EXT_KEY_EXEMPT, "E5", "02"),
        ];
        for (key, ext_key, code, regime) in cases {
            let c = normalized(Combo::new("VAT").key(key));
            assert!(c.ext.is(ext_key, code), "{key}");
            assert!(c.ext.is(EXT_KEY_REGIME, regime), "{key}");
            assert_eq!(c.ext.len(), 2, "{key}");
            assert!(validate_tax_combo(&c).is_ok(), "{key}");
        }
    }

    #[test]
    fn surcharge_regime() {
        let mut c = Combo::new("VAT").rate("general").percent(dec!(21));
        c.surcharge = Some(dec!(5.2));
        let c = normalized(c);
        assert!(c.ext.is(EXT_KEY_REGIME, "18"));
        assert!(c.ext.is(EXT_KEY_OP_CLASS, "S1"));
    }

    #[test]
    fn keeps_given_codes() {
        let c = normalized(Combo::new("VAT").rate("general").ext(EXT_KEY_REGIME, "03"));
        assert!(c.ext.is(EXT_KEY_REGIME, "03"));
        let c = normalized(Combo::new("VAT").key("export").ext(EXT_KEY_EXEMPT, "E3"));
        assert!(c.ext.is(EXT_KEY_EXEMPT, "E3"));
        let c = normalized(Combo::new("VAT").ext(EXT_KEY_OP_CLASS, "S2"));
        assert_eq!(c.key.as_str(), "reverse-charge");
    }

    #[test]
    fn foreign_vat() {
        let c = normalized(Combo::new("VAT").country("PT").key("standard").ext(EXT_KEY_OP_CLASS, "S1"));
        assert!(c.ext.is(EXT_KEY_OP_CLASS, "N2"));
        assert!(c.ext.is(EXT_KEY_REGIME, "08"));
    }

    #[test]
    fn one_classification() {
        let c = Combo::new("VAT")
            .ext(EXT_KEY_REGIME, "01")
            .ext(EXT_KEY_OP_CLASS, "S1")
            .ext(EXT_KEY_EXEMPT, "E1");
        assert_eq!(
            validate_tax_combo(&c).unwrap_err().to_string(),
            "ext: only one of es-verifactu-op-class, es-verifactu-exempt is allowed."
        );

        let c = Combo::new("VAT").ext(EXT_KEY_REGIME, "01");
        assert_eq!(
            validate_tax_combo(&c).unwrap_err().to_string(),
            "ext: one of es-verifactu-op-class, es-verifactu-exempt is required."
        );

        let c = Combo::new("VAT").ext(EXT_KEY_REGIME, "01").ext(EXT_KEY_EXEMPT, "E2");
        assert!(validate_tax_combo(&c).unwrap_err().to_string().contains("value 'E2' not allowed"));
        assert!(validate_tax_combo(&Combo::new("IRPF")).is_ok());
    }
}
