use serde::{Deserialize, Serialize};

use super::{Code, Key};

/// Note key for legal texts that must be printed on the document.
pub const NOTE_KEY_LEGAL: &str = "legal";
/// Note key for general remarks.
pub const NOTE_KEY_GENERAL: &str = "general";

/// Free text attached to a document or line.
///
/// `src` records what produced the note (usually an extension key), which
/// together with `key` identifies notes added by scenarios.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub key: Key,
    #[serde(default, skip_serializing_if = "Code::is_empty")]
    pub code: Code,
    #[serde(default, skip_serializing_if = "Key::is_empty")]
    pub src: Key,
    pub text: String,
}

impl Note {
    pub fn new(key: &str, text: impl Into<String>) -> Self {
        Self {
            key: Key::new(key),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn legal(text: impl Into<String>) -> Self {
        Self::new(NOTE_KEY_LEGAL, text)
    }

    pub fn src(mut self, src: &str) -> Self {
        self.src = Key::new(src);
        self
    }

    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = code.into();
        self
    }

    /// Same `key` and `src`, used to de-duplicate scenario notes.
    pub fn same_as(&self, other: &Note) -> bool {
        self.key == other.key && self.src == other.src
    }
}

/// Provider-issued value such as a signature hash or a QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    #[serde(rename = "prv")]
    pub provider: Key,
    #[serde(rename = "val")]
    pub value: String,
}

impl Stamp {
    pub fn new(provider: &str, value: impl Into<String>) -> Self {
        Self {
            provider: Key::new(provider),
            value: value.into(),
        }
    }
}
