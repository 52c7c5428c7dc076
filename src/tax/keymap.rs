//! Key maps: tables translating user-friendly keys into the codes of an
//! extension, used both for normalization and for introspection.

use crate::cbc::{Code, Key};

/// Where the key being mapped comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyScope {
    /// The `key` of a tax combo.
    TaxCombo,
    /// The `key` of payment instructions.
    PaymentMeans,
    /// The `key` of a discount.
    Discount,
    /// The `key` of a charge.
    Charge,
}

/// Ordered key → code table for one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub scope: KeyScope,
    pub ext_key: Key,
    pub map: Vec<(Key, Code)>,
}

impl KeyMap {
    pub fn new(scope: KeyScope, ext_key: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            scope,
            ext_key: Key::new(ext_key),
            map: pairs.iter().map(|(k, c)| (Key::new(k), Code::new(*c))).collect(),
        }
    }

    /// Code for a key. Composite keys fall back to their first segment,
    /// so `card+debit` maps like `card` unless listed itself.
    pub fn code_for(&self, key: &Key) -> Option<&Code> {
        self.exact(key).or_else(|| {
            let prefix = Key::new(key.segments().next()?);
            self.exact(&prefix)
        })
    }

    fn exact(&self, key: &Key) -> Option<&Code> {
        self.map.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// First key mapped to a code.
    pub fn key_for(&self, code: &Code) -> Option<&Key> {
        self.map.iter().find(|(_, c)| c == code).map(|(k, _)| k)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.map.iter().map(|(k, _)| k)
    }
}
