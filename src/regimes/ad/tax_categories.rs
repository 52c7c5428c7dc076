use rust_decimal_macros::dec;

use crate::cbc::{I18n, Source};
use crate::tax::keys::{KEY_ZERO, RATE_GENERAL, RATE_REDUCED, RATE_SPECIAL, RATE_SUPER_REDUCED};
use crate::tax::{CATEGORY_VAT, CategoryDef, RateDef, RateValueDef, since, vat_keys};

/// Luxury goods and services.
pub const RATE_INCREASED: &str = "increased";

/// IGI, reported under the VAT category code. Rates unchanged since it
/// came into force in 2013.
pub(super) fn categories() -> Vec<CategoryDef> {
    let rate = |key: &str, en: &str, ca: &str, percent| {
        RateDef::new(key, I18n::en(en).with("ca", ca))
            .values(vec![RateValueDef::new(since(2013, 1, 1), percent)])
    };
    vec![
        CategoryDef::new(
            CATEGORY_VAT,
            I18n::en("VAT").with("ca", "IGI").with("es", "IGI"),
            I18n::en("General Indirect Tax")
                .with("ca", "Impost General Indirecte")
                .with("es", "Impuesto General Indirecto"),
        )
        .keys(vat_keys())
        .source(Source::new(
            "Departament de Tributs i de Fronteres",
            "https://www.e-tramits.ad/tramits/ca/impostos/igi",
        ))
        .rates(vec![
            rate(RATE_GENERAL, "General Rate", "Tipus general", dec!(4.5)),
            rate(RATE_REDUCED, "Reduced Rate", "Tipus reduït", dec!(1.0)),
            rate(RATE_SUPER_REDUCED, "Super-Reduced Rate", "Tipus superreduït", dec!(0.0))
                .keys(&[KEY_ZERO]),
            rate(RATE_SPECIAL, "Special Rate", "Tipus especial", dec!(2.5)),
            rate(RATE_INCREASED, "Increased Rate", "Tipus incrementat", dec!(9.5)),
        ]),
    ]
}
