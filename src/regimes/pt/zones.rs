use crate::cbc::I18n;
use crate::tax::{Extensions, ZoneDef};

use super::{EXT_KEY_REGION, REGION_AZORES, REGION_MADEIRA, REGION_MAINLAND};

pub const ZONE_AZORES: &str = "20";
pub const ZONE_MADEIRA: &str = "30";

/// Districts and autonomous regions, ISO 3166-2:PT.
pub(super) fn zones() -> Vec<ZoneDef> {
    let district = |code: &str, name: &str| zone(code, name, REGION_MAINLAND);
    vec![
        district("01", "Aveiro"),
        district("02", "Beja"),
        district("03", "Braga"),
        district("04", "Bragança"),
        district("05", "Castelo Branco"),
        district("06", "Coimbra"),
        district("07", "Évora"),
        district("08", "Faro"),
        district("09", "Guarda"),
        district("10", "Leiria"),
        district("11", "Lisboa"),
        district("12", "Portalegre"),
        district("13", "Porto"),
        district("14", "Santarém"),
        district("15", "Setúbal"),
        district("16", "Viana do Castelo"),
        district("17", "Vila Real"),
        district("18", "Viseu"),
        zone(ZONE_AZORES, "Região Autónoma dos Açores", REGION_AZORES),
        zone(ZONE_MADEIRA, "Região Autónoma da Madeira", REGION_MADEIRA),
    ]
}

fn zone(code: &str, name: &str, region: &str) -> ZoneDef {
    ZoneDef::new(code, I18n::en(name).with("pt", name))
        .region(I18n::en(name).with("pt", name))
        .ext(Extensions::new().with(EXT_KEY_REGION, region))
}

/// Tax region of a legacy identity zone. Unknown zones are mainland.
pub fn region_for_zone(zone: &str) -> &'static str {
    match zone {
        ZONE_AZORES => REGION_AZORES,
        ZONE_MADEIRA => REGION_MADEIRA,
        _ => REGION_MAINLAND,
    }
}
