//! Definitions describe enumerations: extension keys and their allowed
//! codes, tags, note keys, identity types and so on.

use serde::{Deserialize, Serialize};

use super::{Code, I18n, Key};

/// Reference to an external document backing a definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: I18n,
    pub url: String,
}

impl Source {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: I18n::en(title),
            url: url.to_string(),
        }
    }
}

/// A key or code with its names, descriptions and optional child values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
    pub name: I18n,
    #[serde(default, skip_serializing_if = "I18n::is_empty")]
    pub desc: I18n,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    /// Allowed child values, ordered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Definition>,
    /// Regular expression codes must match when no values are listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Definition {
    /// Definition identified by key.
    pub fn key(key: impl Into<Key>, name: I18n) -> Self {
        Self {
            key: Some(key.into()),
            name,
            ..Default::default()
        }
    }

    /// Definition identified by code.
    pub fn code(code: impl Into<Code>, name: I18n) -> Self {
        Self {
            code: Some(code.into()),
            name,
            ..Default::default()
        }
    }

    pub fn desc(mut self, desc: I18n) -> Self {
        self.desc = desc;
        self
    }

    pub fn values(mut self, values: Vec<Definition>) -> Self {
        self.values = values;
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    /// Child value with the given code.
    pub fn code_def(&self, code: &Code) -> Option<&Definition> {
        self.values.iter().find(|v| v.code.as_ref() == Some(code))
    }

    /// Child value with the given key.
    pub fn key_def(&self, key: &Key) -> Option<&Definition> {
        self.values.iter().find(|v| v.key.as_ref() == Some(key))
    }

    /// Child value whose code or key equals `value`.
    pub fn lookup(&self, value: &str) -> Option<&Definition> {
        self.values.iter().find(|v| {
            v.code.as_ref().is_some_and(|c| c.as_str() == value)
                || v.key.as_ref().is_some_and(|k| k.as_str() == value)
        })
    }

    pub fn has_code(&self, code: &Code) -> bool {
        self.code_def(code).is_some()
    }

    pub fn has_key(&self, key: &Key) -> bool {
        self.key_def(key).is_some()
    }

    pub fn codes(&self) -> Vec<&Code> {
        self.values.iter().filter_map(|v| v.code.as_ref()).collect()
    }

    pub fn keys(&self) -> Vec<&Key> {
        self.values.iter().filter_map(|v| v.key.as_ref()).collect()
    }

    /// Structural problems with the definition: key/code exclusivity at
    /// every level and uniqueness of child values.
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_problems("", &mut out);
        out
    }

    fn collect_problems(&self, path: &str, out: &mut Vec<String>) {
        let label = self.label();
        let here = if path.is_empty() { label.clone() } else { format!("{path}.{label}") };
        match (&self.key, &self.code) {
            (None, None) => out.push(format!("{here}: key or code is required")),
            (Some(_), Some(_)) => out.push(format!("{here}: code must be empty when key is set")),
            _ => {}
        }
        if let Some(k) = &self.key {
            if !k.is_valid() {
                out.push(format!("{here}: key must be in a valid format"));
            }
        }
        for (i, v) in self.values.iter().enumerate() {
            let label = v.label();
            if self.values[..i].iter().any(|w| w.label() == label) {
                out.push(format!("{here}: duplicate value '{label}'"));
            }
            v.collect_problems(&here, out);
        }
    }

    fn label(&self) -> String {
        self.key
            .as_ref()
            .map(ToString::to_string)
            .or_else(|| self.code.as_ref().map(ToString::to_string))
            .unwrap_or_default()
    }
}

/// Find a definition by key in a list.
pub fn definition_for_key<'a>(list: &'a [Definition], key: &Key) -> Option<&'a Definition> {
    list.iter().find(|d| d.key.as_ref() == Some(key))
}
