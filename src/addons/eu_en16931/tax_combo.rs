use std::sync::LazyLock;

use crate::addons::is_bare_standard;
use crate::catalogues::cef::EXT_KEY_VATEX;
use crate::catalogues::untdid::EXT_KEY_TAX_CATEGORY;
use crate::cbc::{Code, Key};
use crate::rules::{ErrorTree, Fields, when};
use crate::tax::keys::{
    KEY_EXEMPT, KEY_EXPORT, KEY_INTRA_COMMUNITY, KEY_OUTSIDE_SCOPE, KEY_REVERSE_CHARGE, KEY_STANDARD, KEY_ZERO,
};
use crate::tax::{CATEGORY_IGIC, CATEGORY_IPSI, CATEGORY_VAT, Combo, KeyMap, KeyScope, ext_has_codes, ext_requires};

use super::*;

pub(super) static VAT_CATEGORIES: LazyLock<KeyMap> = LazyLock::new(|| {
    KeyMap::new(
        KeyScope::TaxCombo,
        EXT_KEY_TAX_CATEGORY,
        &[
            (KEY_STANDARD, TAX_CATEGORY_STANDARD),
            (KEY_ZERO, TAX_CATEGORY_ZERO),
            (KEY_EXEMPT, TAX_CATEGORY_EXEMPT),
            (KEY_REVERSE_CHARGE, TAX_CATEGORY_REVERSE_CHARGE),
            (KEY_INTRA_COMMUNITY, TAX_CATEGORY_INTRA_COMMUNITY),
            (KEY_EXPORT, TAX_CATEGORY_EXPORT),
            (KEY_OUTSIDE_SCOPE, TAX_CATEGORY_OUTSIDE_SCOPE),
        ],
    )
});

/// A bare VAT combo takes its key from a tax category code given by the
/// caller; the category code is then always derived from the key.
pub(super) fn normalize_tax_combo(c: &mut Combo) {
    let code = if c.is_category(CATEGORY_VAT) {
        if is_bare_standard(c) {
            let key = c
                .ext
                .get(EXT_KEY_TAX_CATEGORY)
                .and_then(|code| VAT_CATEGORIES.key_for(code))
                .map_or(KEY_STANDARD, Key::as_str);
            c.key = Key::new(key);
        }
        match VAT_CATEGORIES.code_for(&c.key) {
            Some(code) => code.clone(),
            None => return,
        }
    } else if c.is_category(CATEGORY_IGIC) {
        Code::new(TAX_CATEGORY_IGIC)
    } else if c.is_category(CATEGORY_IPSI) {
        Code::new(TAX_CATEGORY_IPSI)
    } else {
        Code::new(TAX_CATEGORY_OUTSIDE_SCOPE)
    };
    c.ext.set(EXT_KEY_TAX_CATEGORY, code);
}

pub(super) fn validate_tax_combo(c: &Combo) -> Result<(), ErrorTree> {
    let vat_codes: Vec<&str> = VAT_CATEGORIES.map.iter().map(|(_, code)| code.as_str()).collect();
    let allowed: &[&str] = if c.is_category(CATEGORY_VAT) {
        &vat_codes
    } else if c.is_category(CATEGORY_IGIC) {
        &[TAX_CATEGORY_IGIC]
    } else if c.is_category(CATEGORY_IPSI) {
        &[TAX_CATEGORY_IPSI]
    } else {
        &[TAX_CATEGORY_OUTSIDE_SCOPE]
    };
    let exempt = c.ext.is(EXT_KEY_TAX_CATEGORY, TAX_CATEGORY_EXEMPT);
    Fields::new()
        .field(
            "ext",
            &c.ext,
            [
                ext_requires(&[EXT_KEY_TAX_CATEGORY]),
                ext_has_codes(EXT_KEY_TAX_CATEGORY, allowed),
                when(exempt, vec![ext_requires(&[EXT_KEY_VATEX])]),
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
    fn category_from_key() {
        let cases = [
            ("standard", "S"),
            ("zero", "Z"),
            ("exempt", "E"),
            ("reverse-charge", "AE"),
            ("intra-community", "K"),
            ("export", "G"),
            ("outside-scope", "O"),
        ];
        for (key, code) in cases {
            let c = normalized(Combo::new("VAT").key(key));
            assert!(c.ext.is(EXT_KEY_TAX_CATEGORY, code), "{key}");
        }
    }

    #[test]
    fn key_from_category() {
        let c = normalized(Combo::new("VAT").ext(EXT_KEY_TAX_CATEGORY, "AE"));
        assert_eq!(c.key.as_str(), "reverse-charge");
        assert!(c.ext.is(EXT_KEY_TAX_CATEGORY, "AE"));

        let c = normalized(Combo::new("VAT"));
        assert_eq!(c.key.as_str(), "standard");
        assert!(c.ext.is(EXT_KEY_TAX_CATEGORY, "S"));

        // A rate already fixes the key.
        let c = normalized(Combo::new("VAT").percent(dec!(21)).key("standard").ext(EXT_KEY_TAX_CATEGORY, "E"));
        assert!(c.ext.is(EXT_KEY_TAX_CATEGORY, "S"));
    }

    #[test]
    fn other_categories() {
        assert!(normalized(Combo::new("IGIC")).ext.is(EXT_KEY_TAX_CATEGORY, "L"));
        assert!(normalized(Combo::new("IPSI")).ext.is(EXT_KEY_TAX_CATEGORY, "M"));
        assert!(normalized(Combo::new("IRPF")).ext.is(EXT_KEY_TAX_CATEGORY, "O"));
    }

    #[test]
    fn validation() {
        let c = normalized(Combo::new("VAT").key("standard"));
        assert!(validate_tax_combo(&c).is_ok());

        assert_eq!(
            validate_tax_combo(&Combo::new("VAT")).unwrap_err().to_string(),
            "ext: (untdid-tax-category: required.)."
        );

        let c = Combo::new("IGIC").ext(EXT_KEY_TAX_CATEGORY, "S");
        assert_eq!(
            validate_tax_combo(&c).unwrap_err().to_string(),
            "ext: (untdid-tax-category: value 'S' invalid.)."
        );

        let c = normalized(Combo::new("VAT").key("exempt"));
        assert_eq!(
            validate_tax_combo(&c).unwrap_err().to_string(),
            "ext: (cef-vatex: required.)."
        );
        let c = c.ext(EXT_KEY_VATEX, "VATEX-EU-132");
        assert!(validate_tax_combo(&c).is_ok());
    }
}
