//! Path-qualified error trees.
//!
//! Rendering follows the nested form `lines: (0: (taxes: (0: (ext:
//! (pt-saft-exemption: required.).).).).)`: entries are joined with `; `,
//! nested trees are wrapped in parentheses and every tree ends with a `.`.
//! Entries keep insertion order so output is stable for golden tests.

use std::fmt;

use crate::core::{ErrorKind, ValidationError};

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: ErrorKind,
    pub message: String,
    /// Business rule code, e.g. `BR-16`.
    pub rule: Option<String>,
}

impl Issue {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            rule: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, message)
    }

    pub fn required() -> Self {
        Self::new(ErrorKind::Required, "required")
    }

    pub fn blank() -> Self {
        Self::new(ErrorKind::Required, "cannot be blank")
    }

    pub fn format() -> Self {
        Self::new(ErrorKind::InvalidFormat, "must be in a valid format")
    }

    /// Attach a business rule code. The kind becomes a rule violation
    /// unless it is more specific already.
    pub fn rule(mut self, rule: &str) -> Self {
        if self.kind == ErrorKind::Invalid {
            self.kind = ErrorKind::RegimeRuleViolation;
        }
        self.rule = Some(rule.to_string());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            Some(rule) => write!(f, "{} ({})", self.message, rule),
            None => f.write_str(&self.message),
        }
    }
}

/// A failed rule: either a single issue or a nested tree of issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    Issue(Issue),
    Tree(ErrorTree),
}

impl From<Issue> for Fault {
    fn from(issue: Issue) -> Self {
        Fault::Issue(issue)
    }
}

impl From<ErrorTree> for Fault {
    fn from(tree: ErrorTree) -> Self {
        Fault::Tree(tree)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Issue(i) => i.fmt(f),
            Fault::Tree(t) => t.fmt(f),
        }
    }
}

/// Ordered map of field name to fault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
    entries: Vec<(String, Fault)>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Builder form of [`ErrorTree::insert`].
    pub fn with(mut self, key: impl Into<String>, fault: impl Into<Fault>) -> Self {
        self.insert(key, fault);
        self
    }

    /// Add a fault under `key`. Trees under the same key are merged; an
    /// issue already recorded for a key is kept.
    pub fn insert(&mut self, key: impl Into<String>, fault: impl Into<Fault>) {
        let key = key.into();
        let fault = fault.into();
        if let Fault::Tree(t) = &fault {
            if t.is_empty() {
                return;
            }
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                if let Fault::Tree(t) = fault {
                    match existing {
                        Fault::Tree(e) => e.merge(t),
                        // nested breakdown replaces a flat message
                        Fault::Issue(_) => *existing = Fault::Tree(t),
                    }
                }
            }
            None => self.entries.push((key, fault)),
        }
    }

    /// Merge every entry of `other` into this tree.
    pub fn merge(&mut self, other: ErrorTree) {
        for (k, f) in other.entries {
            self.insert(k, f);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Fault> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    /// Look up a dotted path such as `lines.0.taxes.0.ext`.
    pub fn at(&self, path: &str) -> Option<&Fault> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.get(first)?;
        for part in parts {
            match current {
                Fault::Tree(t) => current = t.get(part)?,
                Fault::Issue(_) => return None,
            }
        }
        Some(current)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fault)> {
        self.entries.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Ok when empty, the tree itself otherwise.
    pub fn into_result(self) -> Result<(), ErrorTree> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Every issue with its dotted path, in tree order.
    pub fn flatten(&self) -> Vec<ValidationError> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<ValidationError>) {
        for (k, f) in &self.entries {
            let path = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
            match f {
                Fault::Issue(i) => out.push(ValidationError {
                    field: path,
                    message: i.message.clone(),
                    kind: i.kind,
                    rule: i.rule.clone(),
                }),
                Fault::Tree(t) => t.flatten_into(&path, out),
            }
        }
    }

    /// True when any issue in the tree has the given kind.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.flatten().iter().any(|e| e.kind == kind)
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return Ok(());
        }
        for (i, (k, fault)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match fault {
                Fault::Tree(t) => write!(f, "{k}: ({t})")?,
                Fault::Issue(issue) => write!(f, "{k}: {issue}")?,
            }
        }
        f.write_str(".")
    }
}

impl std::error::Error for ErrorTree {}

#[cfg(test)]
mod tests {
    use super::*;

    fn exemption_tree() -> ErrorTree {
        let ext = ErrorTree::new().with("pt-saft-exemption", Issue::required());
        let combo = ErrorTree::new().with("ext", ext);
        let taxes = ErrorTree::new().with("0", combo);
        let line = ErrorTree::new().with("taxes", taxes);
        ErrorTree::new().with("lines", ErrorTree::new().with("0", line))
    }

    #[test]
    fn nested_rendering() {
        assert_eq!(
            exemption_tree().to_string(),
            "lines: (0: (taxes: (0: (ext: (pt-saft-exemption: required.).).).).)."
        );
    }

    #[test]
    fn siblings_joined() {
        let t = ErrorTree::new()
            .with("code", Issue::blank())
            .with("currency", Issue::invalid("must be EUR").rule("ES-01"));
        assert_eq!(t.to_string(), "code: cannot be blank; currency: must be EUR (ES-01).");
    }

    #[test]
    fn merge_combines_subtrees() {
        let mut a = ErrorTree::new().with("tax", ErrorTree::new().with("ext", Issue::required()));
        let b = ErrorTree::new().with("tax", ErrorTree::new().with("prices_include", Issue::blank()));
        a.merge(b);
        assert_eq!(a.len(), 1);
        assert!(a.at("tax.ext").is_some());
        assert!(a.at("tax.prices_include").is_some());
    }

    #[test]
    fn empty_subtrees_ignored() {
        let t = ErrorTree::new().with("lines", ErrorTree::new());
        assert!(t.is_empty());
        assert!(t.into_result().is_ok());
    }

    #[test]
    fn flatten_paths() {
        let flat = exemption_tree().flatten();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].field, "lines.0.taxes.0.ext.pt-saft-exemption");
        assert_eq!(flat[0].kind, ErrorKind::Required);
        assert_eq!(flat[0].to_string(), "lines.0.taxes.0.ext.pt-saft-exemption: required");
    }
}
