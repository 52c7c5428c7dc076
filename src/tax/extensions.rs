//! Extensions: key → code maps carrying regime and addon specific values
//! on document nodes.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cbc::{Code, Definition, Key};
use crate::core::ErrorKind;
use crate::rules::{ErrorTree, Issue, Presence, Rule};

/// Ordered key → code map. Ordering follows the key so serialized output
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions(BTreeMap<Key, Code>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Extensions::set`].
    pub fn with(mut self, key: &str, code: impl Into<Code>) -> Self {
        self.set(key, code);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Code> {
        self.0.get(key)
    }

    /// Code for the key, or an empty code.
    pub fn code(&self, key: &str) -> Code {
        self.get(key).cloned().unwrap_or_default()
    }

    /// True when the key holds exactly this code.
    pub fn is(&self, key: &str, code: &str) -> bool {
        self.get(key).is_some_and(|c| c.as_str() == code)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.has(k))
    }

    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.has(k))
    }

    /// Set a code. An empty code removes the key.
    pub fn set(&mut self, key: &str, code: impl Into<Code>) {
        let code = code.into();
        if code.is_empty() {
            self.0.remove(key);
        } else {
            self.0.insert(Key::new(key), code);
        }
    }

    /// Set the code only if the key is absent.
    pub fn set_if_empty(&mut self, key: &str, code: impl Into<Code>) {
        if !self.has(key) {
            self.set(key, code);
        }
    }

    /// Keep the current code if it is one of `allowed`, otherwise set
    /// `default`.
    pub fn set_one_of(&mut self, key: &str, default: &str, allowed: &[&str]) {
        let keep = self.get(key).is_some_and(|c| c.as_str() == default || allowed.contains(&c.as_str()));
        if !keep {
            self.set(key, default);
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn delete_all(&mut self, keys: &[&str]) {
        for k in keys {
            self.0.remove(*k);
        }
    }

    /// Copy every entry of `other`, overwriting existing keys.
    pub fn merge(&mut self, other: &Extensions) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Copy entries of `other` whose keys are absent here.
    pub fn merge_missing(&mut self, other: &Extensions) {
        for (k, v) in &other.0 {
            self.0.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }

    /// True when every entry of `other` is present with the same code.
    pub fn contains(&self, other: &Extensions) -> bool {
        other.0.iter().all(|(k, v)| self.0.get(k) == Some(v))
    }

    /// First key mapped to `code`; used for reverse lookups in key maps.
    pub fn lookup(&self, code: &str) -> Option<&Key> {
        self.0.iter().find(|(_, v)| v.as_str() == code).map(|(k, _)| k)
    }

    /// Drop entries with empty codes.
    pub fn clean(&mut self) {
        self.0.retain(|_, v| !v.is_empty());
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Code)> {
        self.0.iter()
    }
}

/// Returns `a` with any key absent in `a` taken from `b`; `b` when `a` is
/// absent.
pub fn merge_extensions(a: Option<&Extensions>, b: &Extensions) -> Extensions {
    match a {
        None => b.clone(),
        Some(a) => {
            let mut out = a.clone();
            out.merge_missing(b);
            out
        }
    }
}

impl Presence for Extensions {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Extensions {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut ext = Extensions::new();
        for (k, v) in pairs {
            ext.set(k, v);
        }
        ext
    }
}

/// Check every entry against the definitions in scope: the key must be
/// defined, and the code must be one of the listed values or match the
/// definition's pattern.
pub fn validate_extensions<'d>(
    ext: &Extensions,
    def_for: impl Fn(&Key) -> Option<&'d Definition>,
) -> Result<(), ErrorTree> {
    let mut tree = ErrorTree::new();
    for (k, code) in ext.iter() {
        let Some(def) = def_for(k) else {
            tree.insert(k.as_str(), Issue::invalid("undefined"));
            continue;
        };
        if !def.values.is_empty() {
            if !def.has_code(code) {
                tree.insert(
                    k.as_str(),
                    Issue::new(ErrorKind::InvalidEnum, format!("value '{code}' invalid")),
                );
            }
        } else if let Some(pattern) = &def.pattern {
            let ok = Regex::new(pattern).map(|re| re.is_match(code.as_str())).unwrap_or(false);
            if !ok {
                tree.insert(
                    k.as_str(),
                    Issue::new(ErrorKind::InvalidFormat, format!("must match the pattern {pattern}")),
                );
            }
        }
    }
    tree.into_result()
}

/// Each listed key must be present.
pub fn ext_requires<'r>(keys: &'r [&'r str]) -> Rule<'r, Extensions> {
    Rule::new(move |ext: &Extensions| {
        let mut tree = ErrorTree::new();
        for k in keys {
            if !ext.has(k) {
                tree.insert(*k, Issue::required());
            }
        }
        tree.into_result().map_err(Into::into)
    })
}

/// If present, the key's code must be one of `codes`.
pub fn ext_has_codes<'r>(key: &'r str, codes: &'r [&'r str]) -> Rule<'r, Extensions> {
    Rule::new(move |ext: &Extensions| match ext.get(key) {
        Some(c) if !codes.contains(&c.as_str()) => Err(ErrorTree::new()
            .with(key, Issue::new(ErrorKind::InvalidEnum, format!("value '{c}' invalid")))
            .into()),
        _ => Ok(()),
    })
}

/// If present, the key's code must not be one of `codes`.
pub fn ext_exclude_codes<'r>(key: &'r str, codes: &'r [&'r str]) -> Rule<'r, Extensions> {
    Rule::new(move |ext: &Extensions| match ext.get(key) {
        Some(c) if codes.contains(&c.as_str()) => Err(ErrorTree::new()
            .with(key, Issue::new(ErrorKind::InvalidEnum, format!("value '{c}' not allowed")))
            .into()),
        _ => Ok(()),
    })
}

/// At most one of the keys may be present.
pub fn ext_only_one_of<'r>(keys: &'r [&'r str]) -> Rule<'r, Extensions> {
    Rule::new(move |ext: &Extensions| {
        if keys.iter().filter(|k| ext.has(k)).count() > 1 {
            Err(Issue::new(
                ErrorKind::MutualExclusion,
                format!("only one of {} is allowed", keys.join(", ")),
            )
            .into())
        } else {
            Ok(())
        }
    })
}

/// At least one of the keys must be present.
pub fn ext_one_of_required<'r>(keys: &'r [&'r str]) -> Rule<'r, Extensions> {
    Rule::new(move |ext: &Extensions| {
        if ext.has_any(keys) {
            Ok(())
        } else {
            Err(Issue::new(ErrorKind::Required, format!("one of {} is required", keys.join(", ")))
                .into())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbc::I18n;
    use crate::rules::check;

    #[test]
    fn set_and_get() {
        let mut ext = Extensions::new().with("es-sii-doc-type", "F1");
        assert!(ext.is("es-sii-doc-type", "F1"));
        ext.set("es-sii-doc-type", "");
        assert!(ext.is_empty());
    }

    #[test]
    fn set_if_empty_keeps_existing() {
        let mut ext = Extensions::from([("es-sii-regime", "02")]);
        ext.set_if_empty("es-sii-regime", "01");
        assert_eq!(ext.code("es-sii-regime").as_str(), "02");
    }

    #[test]
    fn set_one_of() {
        let mut ext = Extensions::from([("es-sii-regime", "17")]);
        ext.set_one_of("es-sii-regime", "01", &["17"]);
        assert!(ext.is("es-sii-regime", "17"));
        ext.set("es-sii-regime", "05");
        ext.set_one_of("es-sii-regime", "01", &["17"]);
        assert!(ext.is("es-sii-regime", "01"));
        let mut empty = Extensions::new();
        empty.set_one_of("es-sii-exempt", "E1", &["E6"]);
        assert!(empty.is("es-sii-exempt", "E1"));
    }

    #[test]
    fn merge_rules() {
        let a = Extensions::from([("x", "1")]);
        let b = Extensions::from([("x", "2"), ("y", "3")]);
        let merged = merge_extensions(Some(&a), &b);
        assert!(merged.is("x", "1"));
        assert!(merged.is("y", "3"));
        assert_eq!(merge_extensions(None, &b), b);
        let mut over = a.clone();
        over.merge(&b);
        assert!(over.is("x", "2"));
        assert!(over.contains(&a.clone().with("x", "2")));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = Extensions::from([("x", "1"), ("y", "2")]);
        let b = Extensions::from([("y", "2"), ("x", "1")]);
        assert_eq!(a, b);
    }

    #[test]
    fn reverse_lookup() {
        let map = Extensions::from([("standard", "S"), ("zero", "Z")]);
        assert_eq!(map.lookup("Z").map(Key::as_str), Some("zero"));
        assert!(map.lookup("Q").is_none());
    }

    #[test]
    fn requires_rule() {
        let ext = Extensions::from([("a", "1")]);
        let err = check(&ext, [ext_requires(&["a", "b"])]).unwrap_err();
        assert_eq!(err.to_string(), "b: required.");
    }

    #[test]
    fn exclusivity_rule() {
        let keys = ["es-sii-exempt", "es-sii-not-exempt"];
        let ext = Extensions::from([("es-sii-exempt", "E1"), ("es-sii-not-exempt", "S1")]);
        let err = check(&ext, [ext_only_one_of(&keys)]).unwrap_err();
        assert_eq!(err.to_string(), "only one of es-sii-exempt, es-sii-not-exempt is allowed");
        assert!(check(&Extensions::new(), [ext_one_of_required(&keys)]).is_err());
    }

    #[test]
    fn codes_rules() {
        let ext = Extensions::from([("es-sii-exempt", "E2")]);
        assert!(check(&ext, [ext_has_codes("es-sii-exempt", &["E1", "E2"])]).is_ok());
        let err = check(&ext, [ext_exclude_codes("es-sii-exempt", &["E2", "E3"])]).unwrap_err();
        assert_eq!(err.to_string(), "es-sii-exempt: value 'E2' not allowed.");
    }

    #[test]
    fn validate_against_definitions() {
        let defs = vec![
            Definition::key("doc", I18n::en("Doc"))
                .values(vec![Definition::code("F1", I18n::en("Invoice"))]),
            Definition::key("ref", I18n::en("Ref")).pattern(r"^[0-9]{3}$"),
        ];
        let lookup = |k: &Key| defs.iter().find(|d| d.key.as_ref() == Some(k));
        let ok = Extensions::from([("doc", "F1"), ("ref", "123")]);
        assert!(validate_extensions(&ok, lookup).is_ok());
        let bad = Extensions::from([("doc", "F9"), ("ref", "12"), ("other", "x")]);
        let err = validate_extensions(&bad, lookup).unwrap_err();
        assert_eq!(
            err.to_string(),
            "doc: value 'F9' invalid; other: undefined; ref: must match the pattern ^[0-9]{3}$."
        );
    }
}
