//! Correction definitions: which corrective documents a regime or addon
//! allows and what the caller must supply to issue them.

use crate::cbc::Key;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionDefinition {
    pub schema: &'static str,
    /// Document types that may be issued as corrections.
    pub types: Vec<Key>,
    /// Extension keys that may be set on the preceding reference.
    pub extensions: Vec<Key>,
    /// Extension keys the caller must supply.
    pub required_extensions: Vec<Key>,
    /// Stamps of the original document that must be supplied.
    pub stamps: Vec<Key>,
    /// Correction periods are accepted.
    pub periods: bool,
    pub reason_required: bool,
    /// Copy the tax totals of the original into the preceding reference.
    pub copy_tax: bool,
}

impl CorrectionDefinition {
    pub fn new(schema: &'static str) -> Self {
        Self {
            schema,
            ..Default::default()
        }
    }

    pub fn types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(Key::new).collect();
        self
    }

    pub fn extensions(mut self, keys: &[&str]) -> Self {
        self.extensions = keys.iter().map(Key::new).collect();
        self
    }

    pub fn required_extensions(mut self, keys: &[&str]) -> Self {
        self.required_extensions = keys.iter().map(Key::new).collect();
        self
    }

    pub fn stamps(mut self, keys: &[&str]) -> Self {
        self.stamps = keys.iter().map(Key::new).collect();
        self
    }

    pub fn reason_required(mut self) -> Self {
        self.reason_required = true;
        self
    }

    pub fn copy_tax(mut self) -> Self {
        self.copy_tax = true;
        self
    }

    pub fn has_type(&self, kind: &Key) -> bool {
        self.types.contains(kind)
    }

    pub fn has_extension(&self, key: &Key) -> bool {
        self.extensions.contains(key) || self.required_extensions.contains(key)
    }

    /// Union the lists and OR the flags of a definition for the same
    /// schema. Definitions for other schemas are ignored.
    pub fn merge(&mut self, other: &CorrectionDefinition) {
        if self.schema != other.schema {
            return;
        }
        for (list, from) in [
            (&mut self.types, &other.types),
            (&mut self.extensions, &other.extensions),
            (&mut self.required_extensions, &other.required_extensions),
            (&mut self.stamps, &other.stamps),
        ] {
            crate::cbc::append_unique_keys(list, from.iter().cloned());
        }
        self.periods |= other.periods;
        self.reason_required |= other.reason_required;
        self.copy_tax |= other.copy_tax;
    }
}

/// Definition for `schema` in a list, if any.
pub fn correction_for<'a>(
    list: &'a [CorrectionDefinition],
    schema: &str,
) -> Option<&'a CorrectionDefinition> {
    list.iter().find(|cd| schema.ends_with(cd.schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::SCHEMA_INVOICE;

    #[test]
    fn merge_unions_and_ors() {
        let mut regime = CorrectionDefinition::new(SCHEMA_INVOICE)
            .types(&["credit-note", "corrective"])
            .extensions(&["es-facturae-correction"]);
        let addon = CorrectionDefinition::new(SCHEMA_INVOICE)
            .types(&["credit-note", "debit-note"])
            .extensions(&["es-sii-doc-type"])
            .reason_required()
            .copy_tax();
        regime.merge(&addon);
        assert_eq!(regime.types.len(), 3);
        assert!(regime.has_type(&Key::new("debit-note")));
        assert!(regime.has_extension(&Key::new("es-sii-doc-type")));
        assert!(regime.reason_required);
        assert!(regime.copy_tax);
    }

    #[test]
    fn other_schema_ignored() {
        let mut a = CorrectionDefinition::new(SCHEMA_INVOICE).types(&["credit-note"]);
        let b = CorrectionDefinition::new("bill/receipt").types(&["debit-note"]).reason_required();
        a.merge(&b);
        assert_eq!(a.types.len(), 1);
        assert!(!a.reason_required);
    }
}
