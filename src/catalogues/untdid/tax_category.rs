//! UNTDID 5305 duty, tax or fee category codes.

use crate::catalogues::code_list;
use crate::cbc::{Definition, I18n};

/// Duty, tax or fee category of a tax combo.
pub const EXT_KEY_TAX_CATEGORY: &str = "untdid-tax-category";

const TAX_CATEGORIES: &[(&str, &str)] = &[
    ("A", "Mixed tax rate"),
    ("AA", "Lower rate"),
    ("AB", "Exempt for resale"),
    ("AC", "Exempt for resale"),
    ("AD", "Value Added Tax (VAT) due from a previous invoice"),
    ("AE", "VAT Reverse Charge"),
    ("B", "Transferred (VAT)"),
    ("C", "Duty paid by supplier"),
    ("D", "Value Added Tax (VAT) margin scheme - travel agents"),
    ("E", "Exempt from tax"),
    ("F", "Value Added Tax (VAT) margin scheme - second-hand goods"),
    ("G", "Free export item, tax not charged"),
    ("H", "Higher rate"),
    ("I", "Value Added Tax (VAT) margin scheme - works of art"),
    ("J", "Value Added Tax (VAT) margin scheme - collector's items and antiques"),
    ("K", "VAT exempt for EEA intra-community supply of goods and services"),
    ("L", "Canary Islands general indirect tax"),
    ("M", "Tax for production, services and importation in Ceuta and Melilla"),
    ("O", "Services outside scope of tax"),
    ("S", "Standard Rate"),
    ("Z", "Zero rated goods"),
];

pub(super) fn extension() -> Definition {
    code_list(
        EXT_KEY_TAX_CATEGORY,
        I18n::en("UNTDID 5305 Tax Category"),
        I18n::en(
            "UNTDID 5305 code used to describe the applicable duty, tax or fee category. Regimes and addons may filter the options to a specific subset.",
        ),
        TAX_CATEGORIES,
    )
}
