use crate::cbc::I18n;
use crate::tax::ZoneDef;

/// Provinces under the Basque and Navarre foral tax systems.
pub const ZONES_FORAL: &[&str] = &["VI", "SS", "BI", "NA"];

/// Provinces with their two digit postal prefixes. The legacy codes
/// `PM`, `GE` and `OR` share a prefix with their current ones.
pub(super) fn zones() -> Vec<ZoneDef> {
    vec![
        zone("VI", "Álava", "01"),
        zone("AB", "Albacete", "02"),
        zone("A", "Alicante", "03"),
        zone("AL", "Almería", "04"),
        zone("AV", "Ávila", "05"),
        zone("BA", "Badajoz", "06"),
        zone("PM", "Baleares", "07"),
        zone("IB", "Baleares", "07"),
        zone("B", "Barcelona", "08"),
        zone("BU", "Burgos", "09"),
        zone("CC", "Cáceres", "10"),
        zone("CA", "Cádiz", "11"),
        zone("CS", "Castellón", "12"),
        zone("CR", "Ciudad Real", "13"),
        zone("CO", "Córdoba", "14"),
        zone("C", "La Coruña", "15"),
        zone("CU", "Cuenca", "16"),
        zone("GE", "Gerona", "17"),
        zone("GI", "Girona", "17"),
        zone("GR", "Granada", "18"),
        zone("GU", "Guadalajara", "19"),
        zone("SS", "Guipúzcoa", "20"),
        zone("H", "Huelva", "21"),
        zone("HU", "Huesca", "22"),
        zone("J", "Jaén", "23"),
        zone("LE", "León", "24"),
        zone("L", "Lérida / Lleida", "25"),
        zone("LO", "La Rioja", "26"),
        zone("LU", "Lugo", "27"),
        zone("M", "Madrid", "28"),
        zone("MA", "Málaga", "29"),
        zone("MU", "Murcia", "30"),
        zone("NA", "Navarra", "31"),
        zone("OR", "Orense", "32"),
        zone("OU", "Orense", "32"),
        zone("O", "Asturias", "33"),
        zone("P", "Palencia", "34"),
        zone("GC", "Las Palmas", "35"),
        zone("PO", "Pontevedra", "36"),
        zone("SA", "Salamanca", "37"),
        zone("TF", "Santa Cruz de Tenerife", "38"),
        zone("S", "Cantabria", "39"),
        zone("SG", "Segovia", "40"),
        zone("SE", "Sevilla", "41"),
        zone("SO", "Soria", "42"),
        zone("T", "Tarragona", "43"),
        zone("TE", "Teruel", "44"),
        zone("TO", "Toledo", "45"),
        zone("V", "Valencia", "46"),
        zone("VA", "Valladolid", "47"),
        zone("BI", "Vizcaya", "48"),
        zone("ZA", "Zamora", "49"),
        zone("Z", "Zaragoza", "50"),
        zone("CE", "Ceuta", "51"),
        zone("ML", "Melilla", "52"),
    ]
}

fn zone(code: &str, name: &str, prefix: &'static str) -> ZoneDef {
    ZoneDef::new(code, I18n::en(name).with("es", name)).postal_prefix(prefix)
}
