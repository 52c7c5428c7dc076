use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::cbc::{I18n, Source};
use crate::tax::keys::{RATE_GENERAL, RATE_REDUCED, RATE_SUPER_REDUCED};
use crate::tax::{
    CATEGORY_IGIC, CATEGORY_IPSI, CATEGORY_IRPF, CATEGORY_VAT, CategoryDef, RateDef, RateValueDef,
    since, vat_keys,
};

/// Professional services withholding.
pub const RATE_PRO: &str = "pro";
/// Professional services in the first years of activity.
pub const RATE_PRO_START: &str = "pro-start";
pub const RATE_CAPITAL: &str = "capital";
/// Activities taxed under the objective estimation modules.
pub const RATE_MODULES: &str = "modules";

pub(super) fn categories() -> Vec<CategoryDef> {
    vec![vat(), igic(), ipsi(), irpf()]
}

fn vat() -> CategoryDef {
    CategoryDef::new(
        CATEGORY_VAT,
        I18n::en("VAT").with("es", "IVA"),
        I18n::en("Value Added Tax").with("es", "Impuesto sobre el Valor Añadido"),
    )
    .keys(vat_keys())
    .source(Source::new(
        "Ley 37/1992 del Impuesto sobre el Valor Añadido",
        "https://www.boe.es/buscar/act.php?id=BOE-A-1992-28740",
    ))
    .rates(vec![
        RateDef::new(RATE_GENERAL, I18n::en("General Rate").with("es", "Tipo General")).values(vec![
            RateValueDef::new(since(2012, 9, 1), dec!(21.0)),
            RateValueDef::new(since(2010, 7, 1), dec!(18.0)),
            RateValueDef::new(since(1995, 1, 1), dec!(16.0)),
            RateValueDef::new(since(1993, 1, 1), dec!(15.0)),
        ]),
        RateDef::new(
            "general+eqs",
            I18n::en("General Rate with Equivalence Surcharge")
                .with("es", "Tipo General con Recargo de Equivalencia"),
        )
        .values(vec![
            RateValueDef::new(since(2012, 9, 1), dec!(21.0)).surcharge(dec!(5.2)),
            RateValueDef::new(since(2010, 7, 1), dec!(18.0)).surcharge(dec!(4.0)),
        ]),
        RateDef::new(RATE_REDUCED, I18n::en("Reduced Rate").with("es", "Tipo Reducido")).values(vec![
            RateValueDef::new(since(2012, 9, 1), dec!(10.0)),
            RateValueDef::new(since(2010, 7, 1), dec!(8.0)),
            RateValueDef::new(since(1995, 1, 1), dec!(7.0)),
            RateValueDef::new(since(1993, 1, 1), dec!(6.0)),
        ]),
        RateDef::new(
            "reduced+eqs",
            I18n::en("Reduced Rate with Equivalence Surcharge")
                .with("es", "Tipo Reducido con Recargo de Equivalencia"),
        )
        .values(vec![
            RateValueDef::new(since(2012, 9, 1), dec!(10.0)).surcharge(dec!(1.4)),
            RateValueDef::new(since(2010, 7, 1), dec!(8.0)).surcharge(dec!(1.0)),
        ]),
        RateDef::new(
            RATE_SUPER_REDUCED,
            I18n::en("Super-Reduced Rate").with("es", "Tipo Superreducido"),
        )
        .values(vec![
            RateValueDef::new(since(1995, 1, 1), dec!(4.0)),
            RateValueDef::new(since(1993, 1, 1), dec!(3.0)),
        ]),
        RateDef::new(
            "super-reduced+eqs",
            I18n::en("Super-Reduced Rate with Equivalence Surcharge")
                .with("es", "Tipo Superreducido con Recargo de Equivalencia"),
        )
        .values(vec![RateValueDef::new(since(1995, 1, 1), dec!(4.0)).surcharge(dec!(0.5))]),
    ])
}

fn igic() -> CategoryDef {
    CategoryDef::new(
        CATEGORY_IGIC,
        I18n::en("IGIC"),
        I18n::en("Canary Island General Indirect Tax").with("es", "Impuesto General Indirecto Canario"),
    )
    .keys(vat_keys())
    .rates(vec![
        RateDef::new(RATE_GENERAL, I18n::en("General Rate").with("es", "Tipo General"))
            .values(vec![RateValueDef::new(NaiveDate::MIN, dec!(7.0))]),
        RateDef::new(RATE_REDUCED, I18n::en("Reduced Rate").with("es", "Tipo Reducido"))
            .values(vec![RateValueDef::new(NaiveDate::MIN, dec!(3.0))]),
    ])
}

fn ipsi() -> CategoryDef {
    CategoryDef::new(
        CATEGORY_IPSI,
        I18n::en("IPSI"),
        I18n::en("Production, Services, and Import Tax")
            .with("es", "Impuesto sobre la Producción, los Servicios y la Importación"),
    )
}

fn irpf() -> CategoryDef {
    CategoryDef::new(
        CATEGORY_IRPF,
        I18n::en("IRPF"),
        I18n::en("Personal income tax.").with("es", "Impuesto sobre la renta de las personas físicas."),
    )
    .retained()
    .rates(vec![
        RateDef::new(RATE_PRO, I18n::en("Professional Rate").with("es", "Profesionales")).values(vec![
            RateValueDef::new(since(2015, 7, 12), dec!(15.0)),
            RateValueDef::new(since(2015, 1, 1), dec!(19.0)),
            RateValueDef::new(since(2012, 9, 1), dec!(21.0)),
            RateValueDef::new(since(2007, 1, 1), dec!(15.0)),
        ]),
        RateDef::new(
            RATE_PRO_START,
            I18n::en("Professional Starting Rate").with("es", "Profesionales Inicio"),
        )
        .values(vec![RateValueDef::new(since(2007, 1, 1), dec!(7.0))]),
        RateDef::new(RATE_CAPITAL, I18n::en("Rental or Interest").with("es", "Alquileres o Intereses"))
            .values(vec![RateValueDef::new(since(2007, 1, 1), dec!(19.0))]),
        RateDef::new(RATE_MODULES, I18n::en("Modules Rate").with("es", "Tipo Modulos"))
            .values(vec![RateValueDef::new(since(2007, 1, 1), dec!(1.0))]),
    ])
}
