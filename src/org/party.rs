use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Key};
use crate::l10n::CountryCode;
use crate::tax::{self, Extensions};

/// Supplier, customer or any other party on a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Trading name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<tax::Identity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<Identity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl Party {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn tax_id(mut self, country: &str, code: &str) -> Self {
        self.tax_id = Some(tax::Identity::new(country, code));
        self
    }

    pub fn identity(mut self, identity: Identity) -> Self {
        self.identities.push(identity);
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.addresses.push(address);
        self
    }

    pub fn ext(mut self, key: &str, code: &str) -> Self {
        self.ext.set(key, code);
        self
    }

    /// Country of the tax identity, if any.
    pub fn tax_country(&self) -> Option<&CountryCode> {
        self.tax_id.as_ref().map(|id| &id.country).filter(|c| !c.is_empty())
    }

    /// First identity carrying the extension key.
    pub fn identity_for_ext(&self, key: &str) -> Option<&Identity> {
        self.identities.iter().find(|id| id.ext.has(key))
    }
}

pub const IDENTITY_KEY_PASSPORT: &str = "passport";
pub const IDENTITY_KEY_FOREIGN: &str = "foreign";
pub const IDENTITY_KEY_RESIDENT: &str = "resident";
pub const IDENTITY_KEY_OTHER: &str = "other";

/// Non-tax identification such as a passport or a national ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    #[serde(default, rename = "type", skip_serializing_if = "Code::is_empty")]
    pub kind: Code,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryCode>,
    pub code: Code,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub ext: Extensions,
}

impl Identity {
    pub fn new(key: &str, code: &str) -> Self {
        Self {
            key: Key::new(key),
            code: Code::new(code),
            ..Default::default()
        }
    }
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub street: String,
    #[serde(default, rename = "num", skip_serializing_if = "String::is_empty")]
    pub number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub locality: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub code: Code,
    #[serde(default, skip_serializing_if = "CountryCode::is_empty")]
    pub country: CountryCode,
}

impl Address {
    pub fn new(street: &str, locality: &str, code: &str, country: &str) -> Self {
        Self {
            street: street.to_string(),
            locality: locality.to_string(),
            code: Code::new(code),
            country: CountryCode::new(country),
            ..Default::default()
        }
    }
}
