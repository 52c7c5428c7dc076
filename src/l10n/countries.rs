//! ISO 3166-1 alpha-2 country codes and the tax pseudo-codes used by
//! VAT systems (`EL` for Greece, `XI` for Northern Ireland).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Country code as used by tax identities and regimes. Always upper-case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        CountryCode(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Assigned ISO 3166-1 alpha-2 code.
    pub fn is_iso(&self) -> bool {
        is_known_country_code(&self.0)
    }

    /// Valid as a tax country: ISO codes plus the VAT pseudo-codes.
    pub fn is_tax(&self) -> bool {
        self.is_iso() || TAX_PSEUDO_CODES.iter().any(|(c, _)| *c == self.0)
    }

    /// The ISO country a tax pseudo-code stands for (`EL` → `GR`).
    pub fn iso(&self) -> CountryCode {
        TAX_PSEUDO_CODES
            .iter()
            .find(|(c, _)| *c == self.0)
            .map(|(_, iso)| CountryCode::new(iso))
            .unwrap_or_else(|| self.clone())
    }

    /// Alternative tax code for an ISO country (`GR` → `EL`), if any.
    pub fn alt_code(&self) -> Option<CountryCode> {
        TAX_PSEUDO_CODES
            .iter()
            .find(|(_, iso)| *iso == self.0)
            .map(|(c, _)| CountryCode::new(c))
    }

    /// Both codes equal once pseudo-codes are mapped to their ISO country.
    pub fn same_country(&self, other: &CountryCode) -> bool {
        self.iso() == other.iso()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(value: &str) -> Self {
        CountryCode::new(value)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(CountryCode::new(s))
    }
}

/// Check whether `code` is a known ISO 3166-1 alpha-2 country code.
pub fn is_known_country_code(code: &str) -> bool {
    COUNTRY_CODES.binary_search(&code).is_ok()
}

/// EU member states by tax code.
pub fn is_eu_member(code: &CountryCode) -> bool {
    EU_TAX_CODES.binary_search(&code.as_str()).is_ok()
}

/// Tax pseudo-code and the ISO country it stands for.
static TAX_PSEUDO_CODES: &[(&str, &str)] = &[("EL", "GR"), ("XI", "GB")];

/// Sorted for binary search.
static EU_TAX_CODES: &[&str] = &[
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "EL", "ES", "FI", "FR", "HR", "HU", "IE", "IT",
    "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// Complete list of ISO 3166-1 alpha-2 country codes (249 entries).
/// Sorted for binary search.
static COUNTRY_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_countries() {
        assert!(is_known_country_code("ES"));
        assert!(is_known_country_code("PT"));
        assert!(is_known_country_code("AD"));
        assert!(!is_known_country_code("EL"));
        assert!(!is_known_country_code("es"));
    }

    #[test]
    fn tax_pseudo_codes() {
        let el = CountryCode::new("el");
        assert!(!el.is_iso());
        assert!(el.is_tax());
        assert_eq!(el.iso().as_str(), "GR");
        assert_eq!(CountryCode::new("GR").alt_code(), Some(CountryCode::new("EL")));
        assert!(el.same_country(&CountryCode::new("GR")));
        assert_eq!(CountryCode::new("ES").alt_code(), None);
        assert!(!CountryCode::new("QQ").is_tax());
    }

    #[test]
    fn eu_members() {
        assert!(is_eu_member(&CountryCode::new("EL")));
        assert!(is_eu_member(&CountryCode::new("PT")));
        assert!(!is_eu_member(&CountryCode::new("AD")));
        assert!(!is_eu_member(&CountryCode::new("GB")));
    }

    #[test]
    fn lists_are_sorted() {
        for list in [COUNTRY_CODES, EU_TAX_CODES] {
            for window in list.windows(2) {
                assert!(
                    window[0] < window[1],
                    "codes not sorted: {} >= {}",
                    window[0],
                    window[1]
                );
            }
        }
    }

    #[test]
    fn list_count() {
        assert_eq!(COUNTRY_CODES.len(), 249);
        assert_eq!(EU_TAX_CODES.len(), 27);
    }
}
