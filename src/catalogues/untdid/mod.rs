//! UN/EDIFACT data element code lists.

mod allowance;
mod charge;
mod document_type;
mod payment_means;
mod tax_category;

pub use allowance::EXT_KEY_ALLOWANCE;
pub use charge::EXT_KEY_CHARGE;
pub use document_type::EXT_KEY_DOCUMENT_TYPE;
pub use payment_means::EXT_KEY_PAYMENT_MEANS;
pub use tax_category::EXT_KEY_TAX_CATEGORY;

use crate::cbc::{I18n, Key, Source};
use crate::tax::CatalogueDef;

pub const KEY: &str = "untdid";

pub fn new() -> CatalogueDef {
    CatalogueDef {
        key: Key::new(KEY),
        name: I18n::en("UN/EDIFACT Data Elements"),
        description: I18n::en(
            "Codes from the United Nations Trade Data Interchange Directory used across \
             electronic invoicing formats.",
        ),
        sources: vec![Source::new(
            "UNTDID Code Lists",
            "https://unece.org/trade/uncefact/unedifact/data-element-directory",
        )],
        extensions: vec![
            document_type::extension(),
            payment_means::extension(),
            allowance::extension(),
            charge::extension(),
            tax_category::extension(),
        ],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbc::Code;

    #[test]
    fn code_lists() {
        let cat = new();
        let keys: Vec<&str> = cat.extensions.iter().filter_map(|d| d.key.as_ref()).map(Key::as_str).collect();
        assert_eq!(
            keys,
            vec![
                EXT_KEY_DOCUMENT_TYPE,
                EXT_KEY_PAYMENT_MEANS,
                EXT_KEY_ALLOWANCE,
                EXT_KEY_CHARGE,
                EXT_KEY_TAX_CATEGORY,
            ]
        );
        let doc_types = &cat.extensions[0];
        assert!(doc_types.has_code(&Code::new("380")));
        assert!(doc_types.has_code(&Code::new("381")));
        assert!(!doc_types.has_code(&Code::new("999")));
        assert!(cat.extensions[4].has_code(&Code::new("AE")));
        assert!(cat.extensions[1].has_code(&Code::new("58")));
    }

    #[test]
    fn definitions_are_well_formed() {
        for def in new().extensions {
            assert!(def.problems().is_empty(), "{:?}", def.problems());
        }
    }
}
