use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// English language code, the final fallback for [`I18n::in_langs`].
pub const EN: &str = "en";
pub const ES: &str = "es";
pub const PT: &str = "pt";
pub const CA: &str = "ca";

/// Map of language code to text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct I18n(BTreeMap<String, String>);

impl I18n {
    pub fn new() -> Self {
        Self::default()
    }

    /// English-only text.
    pub fn en(text: impl Into<String>) -> Self {
        Self::new().with(EN, text)
    }

    pub fn with(mut self, lang: &str, text: impl Into<String>) -> Self {
        self.0.insert(lang.to_string(), text.into());
        self
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pick the first available text following the locale chain, then
    /// English, then any language.
    pub fn in_langs(&self, chain: &[&str]) -> &str {
        chain
            .iter()
            .find_map(|l| self.get(l))
            .or_else(|| self.get(EN))
            .or_else(|| self.0.values().next().map(String::as_str))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.in_langs(&[]))
    }
}
