//! Addons: reporting formats layered on top of a regime.
//!
//! Each addon brings its own extensions, scenarios and hooks. Key maps
//! are listed on the addon for introspection and applied by the addon's
//! own normalizer.

pub(crate) mod aeat;
pub mod es_facturae;
pub mod es_sii;
pub mod es_verifactu;
pub mod eu_en16931;
pub mod pt_saft;

use crate::bill::Invoice;
use crate::tax::keys::KEY_STANDARD;
use crate::tax::{AddonDef, Combo};

/// Every addon in this crate.
pub fn all() -> Vec<AddonDef> {
    vec![
        eu_en16931::new(),
        es_facturae::new(),
        es_sii::new(),
        es_verifactu::new(),
        pt_saft::new(),
    ]
}

/// A combo whose key is only the pipeline default: no rate and no
/// percent were given, so an extension code may still choose the key.
pub(crate) fn is_bare_standard(c: &Combo) -> bool {
    (c.key.is_empty() || c.key.as_str() == KEY_STANDARD) && c.rate.is_empty() && c.percent.is_none()
}

/// Move an extension from the preceding references onto the document's
/// tax options, replacing any code already there. The first reference
/// carrying it wins.
pub(crate) fn lift_preceding_ext(inv: &mut Invoice, key: &str) {
    let mut found = None;
    for doc in &mut inv.preceding {
        if let Some(code) = doc.ext.get(key).cloned() {
            found.get_or_insert(code);
            doc.ext.delete(key);
        }
    }
    if let Some(code) = found {
        inv.tax.get_or_insert_with(Default::default).ext.set(key, code);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::org::{DocumentRef, Party};
    use crate::tax::Registry;

    #[test]
    fn addons_register() {
        let mut reg = Registry::new();
        for addon in all() {
            reg.register_addon(addon).unwrap();
        }
        assert_eq!(reg.all_addons().len(), 5);
        for addon in reg.all_addons() {
            for def in &addon.extensions {
                assert!(def.problems().is_empty(), "{}: {:?}", addon.key, def.problems());
            }
        }
    }

    #[test]
    fn bare_standard() {
        assert!(is_bare_standard(&Combo::new("VAT")));
        assert!(is_bare_standard(&Combo::new("VAT").key("standard")));
        assert!(!is_bare_standard(&Combo::new("VAT").rate("general")));
        assert!(!is_bare_standard(&Combo::new("VAT").percent(dec!(21))));
        assert!(!is_bare_standard(&Combo::new("VAT").key("exempt")));
    }

    #[test]
    fn lifts_first_preceding_ext() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut first = DocumentRef::new("1");
        first.ext.set("es-sii-doc-type", "R2");
        let mut second = DocumentRef::new("2");
        second.ext.set("es-sii-doc-type", "R4");
        let mut inv = Invoice::new("3", date, Party::new("S"))
            .tax_ext("es-sii-doc-type", "F1")
            .preceding(first)
            .preceding(second);
        lift_preceding_ext(&mut inv, "es-sii-doc-type");
        assert!(inv.tax.as_ref().unwrap().ext.is("es-sii-doc-type", "R2"));
        assert!(inv.preceding.iter().all(|d| d.ext.is_empty()));
    }
}
