//! Well-known tax category codes, tax keys, rate keys and tags shared by
//! every regime.

use crate::cbc::{I18n, Key};

/// Value added tax.
pub const CATEGORY_VAT: &str = "VAT";
/// Canary Islands general indirect tax.
pub const CATEGORY_IGIC: &str = "IGIC";
/// Ceuta and Melilla production, services and import tax.
pub const CATEGORY_IPSI: &str = "IPSI";
/// Spanish personal income tax withholding.
pub const CATEGORY_IRPF: &str = "IRPF";

pub const KEY_STANDARD: &str = "standard";
pub const KEY_ZERO: &str = "zero";
pub const KEY_EXEMPT: &str = "exempt";
pub const KEY_REVERSE_CHARGE: &str = "reverse-charge";
pub const KEY_INTRA_COMMUNITY: &str = "intra-community";
pub const KEY_EXPORT: &str = "export";
pub const KEY_OUTSIDE_SCOPE: &str = "outside-scope";

pub const RATE_GENERAL: &str = "general";
pub const RATE_INTERMEDIATE: &str = "intermediate";
pub const RATE_REDUCED: &str = "reduced";
pub const RATE_SUPER_REDUCED: &str = "super-reduced";
pub const RATE_SPECIAL: &str = "special";

pub const TAG_SIMPLIFIED: &str = "simplified";
pub const TAG_REVERSE_CHARGE: &str = "reverse-charge";
pub const TAG_SELF_BILLED: &str = "self-billed";
pub const TAG_CUSTOMER_RATES: &str = "customer-rates";
pub const TAG_PARTIAL: &str = "partial";
pub const TAG_B2G: &str = "b2g";
pub const TAG_EXPORT: &str = "export";
pub const TAG_EEA: &str = "eea";
pub const TAG_BYPASS: &str = "bypass";

/// Tax key definition inside a category.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDef {
    pub key: Key,
    pub name: I18n,
    pub desc: I18n,
    /// Combos using this key carry no percent.
    pub no_percent: bool,
}

impl KeyDef {
    pub fn new(key: &str, name: I18n) -> Self {
        Self {
            key: Key::new(key),
            name,
            desc: I18n::new(),
            no_percent: false,
        }
    }

    pub fn no_percent(mut self) -> Self {
        self.no_percent = true;
        self
    }
}

/// Standard set of VAT keys used by every regime that defines a VAT
/// category.
pub fn vat_keys() -> Vec<KeyDef> {
    vec![
        KeyDef::new(KEY_STANDARD, I18n::en("Standard").with("es", "Estándar").with("pt", "Normal")),
        KeyDef::new(KEY_ZERO, I18n::en("Zero").with("es", "Tipo cero").with("pt", "Taxa zero")),
        KeyDef::new(KEY_REVERSE_CHARGE, I18n::en("Reverse Charge").with("es", "Inversión del sujeto pasivo"))
            .no_percent(),
        KeyDef::new(KEY_INTRA_COMMUNITY, I18n::en("Intra-community").with("es", "Intracomunitario"))
            .no_percent(),
        KeyDef::new(KEY_EXPORT, I18n::en("Export").with("es", "Exportación")).no_percent(),
        KeyDef::new(KEY_OUTSIDE_SCOPE, I18n::en("Outside Scope").with("es", "No sujeto")).no_percent(),
        KeyDef::new(KEY_EXEMPT, I18n::en("Exempt").with("es", "Exenta").with("pt", "Isento")).no_percent(),
    ]
}
