//! Scenarios: declarative rules that add extensions and legal notes to a
//! document depending on its type, tags and extension values.

use crate::bill::Invoice;
use crate::cbc::{Code, I18n, Key, Note};

use super::Extensions;

/// Predicate over the whole document for cases the declarative filters
/// cannot express.
pub type ScenarioFilter = fn(&Invoice) -> bool;

#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub name: I18n,
    /// Document types the scenario applies to; any when empty.
    pub types: Vec<Key>,
    /// Tags that must all be present.
    pub tags: Vec<Key>,
    /// Extension key that must be present on the document tax or any line
    /// tax combo.
    pub ext_key: Option<Key>,
    /// Value the `ext_key` must hold; any when absent.
    pub ext_value: Option<Code>,
    pub filter: Option<ScenarioFilter>,
    /// Extensions merged into the document tax extensions.
    pub ext: Extensions,
    pub note: Option<Note>,
    pub codes: Extensions,
}

impl Scenario {
    pub fn new(name: I18n) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(Key::new).collect();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(Key::new).collect();
        self
    }

    pub fn ext_key(mut self, key: &str) -> Self {
        self.ext_key = Some(Key::new(key));
        self
    }

    pub fn ext_value(mut self, value: &str) -> Self {
        self.ext_value = Some(Code::new(value));
        self
    }

    pub fn filter(mut self, f: ScenarioFilter) -> Self {
        self.filter = Some(f);
        self
    }

    pub fn ext(mut self, ext: Extensions) -> Self {
        self.ext = ext;
        self
    }

    pub fn note(mut self, note: Note) -> Self {
        self.note = Some(note);
        self
    }

    pub fn codes(mut self, codes: Extensions) -> Self {
        self.codes = codes;
        self
    }

    fn matches(&self, inv: &Invoice, exts: &[&Extensions]) -> bool {
        if !self.types.is_empty() && !self.types.contains(&inv.kind.key()) {
            return false;
        }
        if !inv.tags.has_all(&self.tags) {
            return false;
        }
        if let Some(key) = &self.ext_key {
            let found = exts.iter().any(|ext| match ext.get(key.as_str()) {
                None => false,
                Some(v) => self.ext_value.as_ref().is_none_or(|want| want == v),
            });
            if !found {
                return false;
            }
        }
        self.filter.is_none_or(|f| f(inv))
    }

    /// Note produced by the scenario, carrying the matched extension value
    /// as its code.
    fn output_note(&self) -> Option<Note> {
        let mut note = self.note.clone()?;
        if note.code.is_empty() {
            if let Some(v) = &self.ext_value {
                note.code = v.clone();
            }
        }
        Some(note)
    }
}

/// Scenarios for one document schema.
#[derive(Debug, Clone)]
pub struct ScenarioSet {
    pub schema: &'static str,
    pub list: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn new(schema: &'static str, list: Vec<Scenario>) -> Self {
        Self { schema, list }
    }

    /// Append the scenarios of another set for the same schema.
    pub fn merge(&mut self, other: &ScenarioSet) {
        if self.schema == other.schema {
            self.list.extend(other.list.iter().cloned());
        }
    }

    /// Every extension key any scenario may set.
    pub fn ext_keys(&self) -> Vec<&Key> {
        let mut keys: Vec<&Key> = Vec::new();
        for k in self.list.iter().flat_map(|s| s.ext.keys()) {
            if !keys.contains(&k) {
                keys.push(k);
            }
        }
        keys
    }

    /// Every note any scenario may add.
    pub fn notes(&self) -> Vec<Note> {
        self.list.iter().filter_map(Scenario::output_note).collect()
    }

    /// Outputs of every matching scenario, applied in declaration order.
    pub fn summary_for(&self, inv: &Invoice) -> ScenarioSummary {
        let exts = inv.scenario_extensions();
        let mut summary = ScenarioSummary::default();
        for s in self.list.iter().filter(|s| s.matches(inv, &exts)) {
            if let Some(note) = s.output_note() {
                summary.add_note(note);
            }
            summary.codes.merge(&s.codes);
            summary.ext.merge(&s.ext);
        }
        summary
    }
}

/// Combined outputs of the scenarios matching a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioSummary {
    pub notes: Vec<Note>,
    pub codes: Extensions,
    pub ext: Extensions,
}

impl ScenarioSummary {
    fn add_note(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.same_as(&note)) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
    }
}

/// Apply the scenario outputs to the document.
///
/// Extension values and notes a scenario produced earlier but which no
/// longer match are removed first, so re-running after a change of type
/// or tags gives the same result as a fresh run.
pub fn apply_scenarios(set: &ScenarioSet, inv: &mut Invoice) -> ScenarioSummary {
    let summary = set.summary_for(inv);

    let tax = inv.tax.get_or_insert_with(Default::default);
    for s in &set.list {
        for (k, v) in s.ext.iter() {
            if tax.ext.get(k.as_str()) == Some(v) && !summary.ext.has(k.as_str()) {
                tax.ext.delete(k.as_str());
            }
        }
    }
    tax.ext.merge(&summary.ext);

    let stale: Vec<Note> = set
        .notes()
        .into_iter()
        .filter(|n| !summary.notes.iter().any(|m| m.same_as(n) && m.code == n.code))
        .collect();
    inv.notes.retain(|n| !stale.iter().any(|s| s.same_as(n) && s.code == n.code));
    for note in &summary.notes {
        match inv.notes.iter_mut().find(|n| n.same_as(note)) {
            Some(existing) => *existing = note.clone(),
            None => inv.notes.push(note.clone()),
        }
    }
    summary
}
