//! Document tags and the tag definitions regimes and addons provide.

use serde::{Deserialize, Serialize};

use crate::cbc::{Definition, I18n, Key};
use crate::rules::{ErrorTree, Issue, Presence};

use super::keys::*;

/// Ordered, duplicate-free list of tag keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(Vec<Key>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Tags::add`].
    pub fn with(mut self, tag: &str) -> Self {
        self.add(tag);
        self
    }

    pub fn add(&mut self, tag: &str) {
        let key = Key::new(tag);
        if !self.0.contains(&key) {
            self.0.push(key);
        }
    }

    /// Replace the whole list, dropping duplicates.
    pub fn set(&mut self, tags: &[&str]) {
        self.0.clear();
        for t in tags {
            self.add(t);
        }
    }

    pub fn has(&self, tag: &str) -> bool {
        self.0.iter().any(|k| k.as_str() == tag)
    }

    pub fn has_all(&self, tags: &[Key]) -> bool {
        tags.iter().all(|t| self.0.contains(t))
    }

    pub fn remove(&mut self, tag: &str) {
        self.0.retain(|k| k.as_str() != tag);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Key] {
        &self.0
    }
}

impl Presence for Tags {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<const N: usize> From<[&str; N]> for Tags {
    fn from(tags: [&str; N]) -> Self {
        let mut out = Tags::new();
        for t in tags {
            out.add(t);
        }
        out
    }
}

/// Tag definitions for one document schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSet {
    pub schema: &'static str,
    pub list: Vec<Definition>,
}

impl TagSet {
    pub fn new(schema: &'static str, list: Vec<Definition>) -> Self {
        Self { schema, list }
    }

    /// Combine two sets for the same schema. Definitions already present
    /// win; sets for other schemas are ignored.
    pub fn merge(&mut self, other: &TagSet) {
        if self.schema != other.schema {
            return;
        }
        for def in &other.list {
            if !self.list.iter().any(|d| d.key == def.key) {
                self.list.push(def.clone());
            }
        }
    }

    pub fn keys(&self) -> Vec<&Key> {
        self.list.iter().filter_map(|d| d.key.as_ref()).collect()
    }

    pub fn has(&self, key: &Key) -> bool {
        self.list.iter().any(|d| d.key.as_ref() == Some(key))
    }
}

/// Every tag must be one of the defined keys; failures are keyed by the
/// tag's index.
pub fn validate_tags(tags: &Tags, defined: &TagSet) -> Result<(), ErrorTree> {
    let mut tree = ErrorTree::new();
    for (i, t) in tags.iter().enumerate() {
        if !defined.has(t) {
            tree.insert(i.to_string(), Issue::invalid(format!("'{t}' undefined")));
        }
    }
    tree.into_result()
}

/// Schema name for invoices.
pub const SCHEMA_INVOICE: &str = "bill/invoice";

/// Invoice tags every regime accepts.
pub fn common_invoice_tags() -> TagSet {
    TagSet::new(
        SCHEMA_INVOICE,
        vec![
            Definition::key(
                TAG_SIMPLIFIED,
                I18n::en("Simplified Invoice").with("es", "Factura simplificada").with("pt", "Fatura simplificada"),
            )
            .desc(I18n::en(
                "Used for B2C transactions when the client details are not available.",
            )),
            Definition::key(
                TAG_REVERSE_CHARGE,
                I18n::en("Reverse Charge").with("es", "Inversión del sujeto pasivo").with("pt", "Autoliquidação"),
            ),
            Definition::key(
                TAG_SELF_BILLED,
                I18n::en("Self-billed").with("es", "Facturación por el destinatario").with("pt", "Autofaturação"),
            ),
            Definition::key(
                TAG_CUSTOMER_RATES,
                I18n::en("Customer rates").with("es", "Tarifas aplicables al destinatario"),
            )
            .desc(I18n::en("Apply the tax rates of the customer's country.")),
            Definition::key(TAG_PARTIAL, I18n::en("Partial").with("es", "Parcial").with("pt", "Parcial")),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique() {
        let mut tags = Tags::from(["simplified", "reverse-charge", "simplified"]);
        assert_eq!(tags.as_slice().len(), 2);
        tags.remove("simplified");
        assert!(!tags.has("simplified"));
        assert!(tags.has("reverse-charge"));
    }

    #[test]
    fn merge_keeps_first_definition() {
        let mut set = common_invoice_tags();
        let other = TagSet::new(
            SCHEMA_INVOICE,
            vec![
                Definition::key(TAG_SIMPLIFIED, I18n::en("Other")),
                Definition::key("invoice-receipt", I18n::en("Invoice receipt")),
            ],
        );
        set.merge(&other);
        assert_eq!(set.list.len(), 6);
        assert_eq!(set.list[0].name.in_langs(&["en"]), "Simplified Invoice");
    }

    #[test]
    fn undefined_tag() {
        let tags = Tags::from(["simplified", "bogus"]);
        let err = validate_tags(&tags, &common_invoice_tags()).unwrap_err();
        assert_eq!(err.to_string(), "1: 'bogus' undefined.");
    }
}
