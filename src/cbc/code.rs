//! Codes: opaque tokens carrying official values such as `F1`, `M07` or `380`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of a code.
pub const CODE_MAX_LENGTH: usize = 64;

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-.:/,_ ]?[A-Za-z0-9]+(?:[-.:/,_ ]?[A-Za-z0-9]+)*$").expect("code regex is valid")
});

static CODE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([-.:/,_ ])[-.:/,_ ]+").expect("separator regex is valid"));

/// Opaque, case-sensitive token used for external and official values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    pub fn new(value: impl Into<String>) -> Self {
        Code(value.into())
    }

    pub const fn empty() -> Self {
        Code(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the code matches the printable token pattern.
    pub fn is_valid(&self) -> bool {
        self.0.len() <= CODE_MAX_LENGTH && CODE_PATTERN.is_match(&self.0)
    }

    pub fn is_in(&self, codes: &[Code]) -> bool {
        codes.contains(self)
    }

    /// Trim whitespace and collapse runs of separators into the first one.
    pub fn normalize(&self) -> Code {
        let trimmed = self.0.trim();
        Code(CODE_SEPARATORS.replace_all(trimmed, "$1").into_owned())
    }

    /// Upper-case and drop everything that is not `A-Z` or `0-9`.
    pub fn normalize_alphanumerical(&self) -> Code {
        Code(
            self.0
                .to_uppercase()
                .chars()
                .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                .collect(),
        )
    }

    /// Keep only ASCII digits.
    pub fn normalize_numerical(&self) -> Code {
        Code(self.0.chars().filter(|c| c.is_ascii_digit()).collect())
    }

    /// Join two codes with a separator, skipping empty parts.
    pub fn join_with(&self, other: &Code, sep: &str) -> Code {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other.clone(),
            (_, true) => self.clone(),
            _ => Code(format!("{}{}{}", self.0, sep, other.0)),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Code {
    fn from(value: &str) -> Self {
        Code(value.to_string())
    }
}

impl From<String> for Code {
    fn from(value: String) -> Self {
        Code(value)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Code {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Code {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        for c in ["F1", "R5", "M07", "380", "FS SERIES-A", "B-98602642", "A/123", "x"] {
            assert!(Code::from(c).is_valid(), "{c} should be valid");
        }
    }

    #[test]
    fn invalid_codes() {
        for c in ["", "F1-", "--A", "a  b", "ñ"] {
            assert!(!Code::from(c).is_valid(), "{c} should be invalid");
        }
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert_ne!(Code::from("f1"), Code::from("F1"));
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(Code::from("  AB--12 ").normalize().as_str(), "AB-12");
        assert_eq!(Code::from("A. -B").normalize().as_str(), "A.B");
    }

    #[test]
    fn alphanumerical() {
        assert_eq!(Code::from(" es-93 471 790-c ").normalize_alphanumerical().as_str(), "ES93471790C");
        assert_eq!(Code::from("12.34-5").normalize_numerical().as_str(), "12345");
    }

    #[test]
    fn join() {
        let a = Code::from("FT SERIES-A");
        assert_eq!(a.join_with(&Code::from("1"), "/").as_str(), "FT SERIES-A/1");
        assert_eq!(Code::empty().join_with(&Code::from("1"), "/").as_str(), "1");
    }
}
