use thiserror::Error;

use crate::cbc::Key;
use crate::rules::ErrorTree;

/// Errors returned by registry construction and imperative operations
/// such as corrections.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The document failed validation.
    #[error("validation failed: {0}")]
    Validation(ErrorTree),

    /// A regime, addon or catalogue with the same key is already registered.
    #[error("duplicate key: {0}")]
    DuplicateKey(Key),

    /// Another regime already covers the country.
    #[error("duplicate regime country: {0}")]
    DuplicateCountry(String),

    /// The addon's `requires` list leads back to itself.
    #[error("dependency cycle through addon '{0}'")]
    DependencyCycle(Key),

    /// The key does not refer to a registered addon.
    #[error("addon '{0}' not registered")]
    UnknownAddon(Key),

    /// No correction definition allows the requested correction.
    #[error("correction not allowed: {0}")]
    CorrectionNotAllowed(String),

    /// A correction requires an extension the caller did not supply.
    #[error("missing extension: {0}")]
    MissingExtension(Key),

    /// A correction requires a stamp the caller did not supply.
    #[error("missing stamp: {0}")]
    MissingStamp(Key),

    /// A required value is absent.
    #[error("{0} is required")]
    Required(String),

    /// A key does not match the identifier rules.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// JSON (de)serialization failed.
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a single validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Generic rule failure.
    Invalid,
    /// Value does not match the declared pattern or length.
    InvalidFormat,
    /// Required value is absent.
    Required,
    /// Code is not among the definition's values.
    InvalidEnum,
    /// Tax identity checksum mismatch.
    InvalidCheck,
    /// Tax identity matches no known classifier.
    UnknownType,
    /// An addon requires another one that the document does not declare.
    MissingDependency,
    /// Registry collision.
    DuplicateKey,
    /// No correction definition matches.
    CorrectionNotAllowed,
    /// Correction requires an extension the caller did not supply.
    MissingExtension,
    /// Two mutually exclusive values are both present.
    MutualExclusion,
    /// A country or standard specific business rule failed.
    RegimeRuleViolation,
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "lines.0.taxes.0.ext").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    pub kind: ErrorKind,
    /// Business rule ID if applicable (e.g. "BR-16").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
            rule: None,
        }
    }

    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ErrorKind::RegimeRuleViolation,
            rule: Some(rule.into()),
        }
    }
}
