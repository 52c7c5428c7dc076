//! Tax identities and the normalization every country shares.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cbc::Code;
use crate::core::ErrorKind;
use crate::l10n::CountryCode;
use crate::rules::{Fields, Issue, Rule, required};

static TAX_CODE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s.\-/_:,]+").expect("separator regex is valid"));

/// Tax identification of a party in a country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub country: CountryCode,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub code: Code,
    /// Deprecated; regimes migrate it to extensions.
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub zone: Code,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Code>,
}

impl Identity {
    pub fn new(country: &str, code: &str) -> Self {
        Self {
            country: CountryCode::new(country),
            code: Code::new(code),
            ..Default::default()
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.country, self.code)
    }
}

/// Upper-case the code, strip separators and any leading country prefix
/// (the identity's own country or one of `alt_countries`).
pub fn normalize_identity(id: &mut Identity, alt_countries: &[&str]) {
    if id.code.is_empty() {
        return;
    }
    let upper = id.code.as_str().to_uppercase();
    let mut code = TAX_CODE_SEPARATORS.replace_all(&upper, "").into_owned();
    let prefixes = std::iter::once(id.country.as_str()).chain(alt_countries.iter().copied());
    for prefix in prefixes {
        if !prefix.is_empty() && code.len() > prefix.len() && code.starts_with(prefix) {
            code = code[prefix.len()..].to_string();
            break;
        }
    }
    id.code = Code::new(code);
}

/// Failure of a country specific code check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityCodeError {
    Format,
    Checksum,
    UnknownType,
}

impl IdentityCodeError {
    pub fn issue(self) -> Issue {
        match self {
            IdentityCodeError::Format => Issue::new(ErrorKind::InvalidFormat, "invalid format"),
            IdentityCodeError::Checksum => Issue::new(ErrorKind::InvalidCheck, "checksum mismatch"),
            IdentityCodeError::UnknownType => Issue::new(ErrorKind::UnknownType, "unknown type"),
        }
    }
}

/// Run a country specific code check and report failures under `code`.
pub fn validate_identity_code(
    id: &Identity,
    check: impl Fn(&str) -> Result<(), IdentityCodeError>,
) -> Result<(), crate::rules::ErrorTree> {
    let mut fields = Fields::new();
    if !id.code.is_empty() {
        if let Err(e) = check(id.code.as_str()) {
            fields.fault("code", e.issue());
        }
    }
    fields.finish()
}

/// Identity must carry a code.
pub fn require_identity_code<'r>() -> Rule<'r, Identity> {
    Rule::new(|id: &Identity| {
        Fields::new()
            .field("code", &id.code, [required()])
            .finish()
            .map_err(Into::into)
    })
}

/// Structural checks shared by every identity.
pub fn validate_identity(id: &Identity) -> Result<(), crate::rules::ErrorTree> {
    Fields::new().field("country", &id.country, [required()]).finish()
}
