use rust_decimal_macros::dec;

use crate::cbc::{I18n, Source};
use crate::tax::keys::{RATE_GENERAL, RATE_INTERMEDIATE, RATE_REDUCED};
use crate::tax::{CATEGORY_VAT, CategoryDef, RateDef, RateValueDef, since, vat_keys};

use super::{REGION_AZORES, REGION_MADEIRA};

pub(super) fn categories() -> Vec<CategoryDef> {
    vec![vat()]
}

/// Mainland rates with the autonomous region overrides, all in force
/// since 2011.
fn vat() -> CategoryDef {
    let values = |mainland, azores, madeira| {
        vec![
            RateValueDef::new(since(2011, 1, 1), azores).zones(&[REGION_AZORES]),
            RateValueDef::new(since(2011, 1, 1), madeira).zones(&[REGION_MADEIRA]),
            RateValueDef::new(since(2011, 1, 1), mainland),
        ]
    };
    CategoryDef::new(
        CATEGORY_VAT,
        I18n::en("VAT").with("pt", "IVA"),
        I18n::en("Value Added Tax").with("pt", "Imposto sobre o Valor Acrescentado"),
    )
    .keys(vat_keys())
    .source(Source::new(
        "Código do Imposto sobre o Valor Acrescentado",
        "https://info.portaldasfinancas.gov.pt/pt/informacao_fiscal/codigos_tributarios/civa_rep/Pages/codigo-do-iva-indice.aspx",
    ))
    .rates(vec![
        RateDef::new(RATE_GENERAL, I18n::en("General Rate").with("pt", "Taxa Normal"))
            .values(values(dec!(23.0), dec!(16.0), dec!(22.0))),
        RateDef::new(RATE_INTERMEDIATE, I18n::en("Intermediate Rate").with("pt", "Taxa Intermédia"))
            .values(values(dec!(13.0), dec!(9.0), dec!(12.0))),
        RateDef::new(RATE_REDUCED, I18n::en("Reduced Rate").with("pt", "Taxa Reduzida"))
            .values(values(dec!(6.0), dec!(4.0), dec!(5.0))),
    ])
}
