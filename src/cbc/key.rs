//! Keys: lower-case identifiers that can be composed with `+`.
//!
//! A key such as `exempt+reverse-charge` is made of segments. The first
//! segment is the "prefix" used for loose matching of rate and tax keys.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::{Error, Result};

/// Separator used when composing keys with [`Key::with`].
pub const KEY_SEPARATOR: char = '+';

/// Maximum length of a key, separators included.
pub const KEY_MAX_LENGTH: usize = 64;

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z]|[a-z0-9][a-z0-9\-+.]*[a-z0-9])$").expect("key regex is valid")
});

/// Short lower-case identifier, e.g. `standard`, `es-sii-v1` or
/// `exempt+reverse-charge`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Build a key, lower-casing the input. No validation is performed.
    pub fn new(value: impl AsRef<str>) -> Self {
        Key(value.as_ref().trim().to_lowercase())
    }

    /// The empty key.
    pub const fn empty() -> Self {
        Key(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the key against the identifier pattern and length limit.
    pub fn validate(&self) -> Result<()> {
        if self.0.len() > KEY_MAX_LENGTH {
            return Err(Error::InvalidKey(format!(
                "'{}' exceeds {} characters",
                self.0, KEY_MAX_LENGTH
            )));
        }
        if !KEY_PATTERN.is_match(&self.0) {
            return Err(Error::InvalidKey(format!("'{}' must be in a valid format", self.0)));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Compose a new key `self+sub`. Fails if `sub` is not a valid key.
    pub fn with(&self, sub: impl Into<Key>) -> Result<Key> {
        let sub = sub.into();
        sub.validate()?;
        if self.is_empty() {
            return Ok(sub);
        }
        Ok(Key(format!("{}{}{}", self.0, KEY_SEPARATOR, sub.0)))
    }

    /// Segments of the key split on `+`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_SEPARATOR).filter(|s| !s.is_empty())
    }

    /// True when any segment of the key equals `sub`.
    pub fn has(&self, sub: &Key) -> bool {
        self.segments().any(|s| s == sub.as_str())
    }

    /// True when the first segment of the key equals `prefix`.
    pub fn has_prefix(&self, prefix: &Key) -> bool {
        self.segments().next() == Some(prefix.as_str())
    }

    /// Remove the last segment, returning the parent key.
    pub fn pop(&self) -> Key {
        match self.0.rfind(KEY_SEPARATOR) {
            Some(pos) => Key(self.0[..pos].to_string()),
            None => Key::empty(),
        }
    }

    /// Replace the leading segment `from` with `to`, keeping any suffix.
    pub fn replace_prefix(&self, from: &Key, to: &Key) -> Key {
        if !self.has_prefix(from) {
            return self.clone();
        }
        let rest = &self.0[from.0.len()..];
        Key(format!("{}{}", to.0, rest))
    }

    pub fn is_in(&self, keys: &[Key]) -> bool {
        keys.contains(self)
    }
}

/// Append each key not already present, preserving order.
pub fn append_unique_keys(list: &mut Vec<Key>, keys: impl IntoIterator<Item = Key>) {
    for k in keys {
        if !list.contains(&k) {
            list.push(k);
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::new(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::new(value)
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Key::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_keys() {
        for k in ["a", "standard", "es-sii-v1", "exempt+reverse-charge", "general+eqs", "v2.1"] {
            assert!(Key::new(k).is_valid(), "{k} should be valid");
        }
    }

    #[test]
    fn invalid_keys() {
        for k in ["", "-bad", "bad-", "with space", "under_score", "ünicode"] {
            assert!(!Key::from(k).is_valid(), "{k} should be invalid");
        }
        let long = "a".repeat(65);
        assert!(Key::new(long).validate().is_err());
    }

    #[test]
    fn keys_are_lower_cased() {
        assert_eq!(Key::new("Standard"), Key::new("standard"));
        assert_eq!(Key::new(" REVERSE-Charge ").as_str(), "reverse-charge");
    }

    #[test]
    fn with_composes() {
        let k = Key::new("exempt").with("reverse-charge").unwrap();
        assert_eq!(k.as_str(), "exempt+reverse-charge");
        assert!(Key::new("exempt").with("not valid").is_err());
        assert_eq!(Key::empty().with("zero").unwrap().as_str(), "zero");
    }

    #[test]
    fn has_and_prefix() {
        let k = Key::new("exempt+margin-scheme+travel");
        assert!(k.has(&Key::new("margin-scheme")));
        assert!(!k.has(&Key::new("margin")));
        assert!(k.has_prefix(&Key::new("exempt")));
        assert!(!k.has_prefix(&Key::new("travel")));
        assert_eq!(k.pop().as_str(), "exempt+margin-scheme");
        assert_eq!(Key::new("zero").pop(), Key::empty());
    }

    #[test]
    fn replace_prefix_keeps_suffix() {
        let k = Key::new("standard+eqs");
        let general = k.replace_prefix(&Key::new("standard"), &Key::new("general"));
        assert_eq!(general.as_str(), "general+eqs");
        assert_eq!(Key::new("reduced").replace_prefix(&Key::new("standard"), &Key::new("general")).as_str(), "reduced");
    }

    #[test]
    fn append_unique() {
        let mut list = vec![Key::new("a")];
        append_unique_keys(&mut list, [Key::new("b"), Key::new("a"), Key::new("c")]);
        assert_eq!(list, vec![Key::new("a"), Key::new("b"), Key::new("c")]);
    }

    #[test]
    fn deserialize_lowercases() {
        let k: Key = serde_json::from_str("\"Credit-Note\"").unwrap();
        assert_eq!(k.as_str(), "credit-note");
    }
}
