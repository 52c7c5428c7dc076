//! Plug-in definitions: regimes, addons and catalogues.
//!
//! Each plug-in is plain data plus optional hook functions. Hooks receive
//! one document node at a time through the [`Node`] and [`NodeRef`] sum
//! types and match on the variants they care about.

use crate::bill::{self, Charge, Discount, Invoice, Line, LineCharge, LineDiscount};
use crate::cbc::{Code, Definition, I18n, Key, Note, Source};
use crate::l10n::CountryCode;
use crate::org::{self, DocumentRef, Item, Party};
use crate::pay::Instructions;
use crate::rules::ErrorTree;

use super::category::CategoryDef;
use super::correction::{CorrectionDefinition, correction_for};
use super::keymap::{KeyMap, KeyScope};
use super::scenario::ScenarioSet;
use super::tags::TagSet;
use super::zone::ZoneDef;
use super::{Combo, Identity};

/// Mutable view of one document node.
#[derive(Debug)]
pub enum Node<'a> {
    Invoice(&'a mut Invoice),
    Tax(&'a mut bill::Tax),
    Line(&'a mut Line),
    Combo(&'a mut Combo),
    Item(&'a mut Item),
    Party(&'a mut Party),
    TaxIdentity(&'a mut Identity),
    Identity(&'a mut org::Identity),
    Preceding(&'a mut DocumentRef),
    Discount(&'a mut Discount),
    Charge(&'a mut Charge),
    LineDiscount(&'a mut LineDiscount),
    LineCharge(&'a mut LineCharge),
    Instructions(&'a mut Instructions),
    Note(&'a mut Note),
}

/// Shared view of one document node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Invoice(&'a Invoice),
    Tax(&'a bill::Tax),
    Line(&'a Line),
    Combo(&'a Combo),
    Item(&'a Item),
    Party(&'a Party),
    TaxIdentity(&'a Identity),
    Identity(&'a org::Identity),
    Preceding(&'a DocumentRef),
    Discount(&'a Discount),
    Charge(&'a Charge),
    LineDiscount(&'a LineDiscount),
    LineCharge(&'a LineCharge),
    Instructions(&'a Instructions),
    Note(&'a Note),
}

impl Node<'_> {
    /// Reborrow as a mutable node with a shorter lifetime.
    pub fn reborrow(&mut self) -> Node<'_> {
        match self {
            Node::Invoice(v) => Node::Invoice(v),
            Node::Tax(v) => Node::Tax(v),
            Node::Line(v) => Node::Line(v),
            Node::Combo(v) => Node::Combo(v),
            Node::Item(v) => Node::Item(v),
            Node::Party(v) => Node::Party(v),
            Node::TaxIdentity(v) => Node::TaxIdentity(v),
            Node::Identity(v) => Node::Identity(v),
            Node::Preceding(v) => Node::Preceding(v),
            Node::Discount(v) => Node::Discount(v),
            Node::Charge(v) => Node::Charge(v),
            Node::LineDiscount(v) => Node::LineDiscount(v),
            Node::LineCharge(v) => Node::LineCharge(v),
            Node::Instructions(v) => Node::Instructions(v),
            Node::Note(v) => Node::Note(v),
        }
    }
}

/// Normalization hook. Must not fail; problems are left to validation.
pub type Normalizer = fn(Node<'_>);

/// Validation hook returning the faults found on the node, keyed by the
/// node's field names.
pub type Validator = fn(NodeRef<'_>) -> Result<(), ErrorTree>;

/// Rewrites a legacy document shape before any other normalization.
pub type Migration = fn(&mut Invoice);

/// Country tax regime.
#[derive(Debug, Clone, Default)]
pub struct RegimeDef {
    /// Lower-case country code.
    pub key: Key,
    pub country: CountryCode,
    /// Other country codes accepted as prefixes in tax identities.
    pub alt_country_codes: Vec<CountryCode>,
    pub name: I18n,
    pub description: I18n,
    pub sources: Vec<Source>,
    pub currency: &'static str,
    pub tax_scheme: Option<Code>,
    pub time_zone: &'static str,
    pub tags: Vec<TagSet>,
    pub extensions: Vec<Definition>,
    pub scenarios: Vec<ScenarioSet>,
    pub key_maps: Vec<KeyMap>,
    pub categories: Vec<CategoryDef>,
    pub zones: Vec<ZoneDef>,
    /// Extension on tax combos whose code selects zone specific rate
    /// values.
    pub zone_ext_key: Option<Key>,
    pub identities: Vec<Definition>,
    pub payment_means_keys: Vec<Definition>,
    /// Catalogues in scope for every document under the regime.
    pub catalogues: Vec<Key>,
    pub corrections: Vec<CorrectionDefinition>,
    pub migrations: Vec<Migration>,
    pub normalizer: Option<Normalizer>,
    pub validator: Option<Validator>,
}

impl RegimeDef {
    pub fn category_def(&self, code: &Code) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| &c.code == code)
    }

    pub fn in_categories(&self, code: &Code) -> bool {
        self.category_def(code).is_some()
    }

    pub fn zone_def(&self, code: &Code) -> Option<&ZoneDef> {
        super::zone::zone_def(&self.zones, code)
    }

    pub fn correction_definition(&self, schema: &str) -> Option<&CorrectionDefinition> {
        correction_for(&self.corrections, schema)
    }

    pub fn alt_country_strs(&self) -> Vec<&str> {
        self.alt_country_codes.iter().map(CountryCode::as_str).collect()
    }
}

/// Optional package of extensions, scenarios and rules layered on top of
/// a regime, usually for one reporting format.
#[derive(Debug, Clone, Default)]
pub struct AddonDef {
    pub key: Key,
    pub name: I18n,
    pub description: I18n,
    pub sources: Vec<Source>,
    /// Addons that must also be present, included before this one.
    pub requires: Vec<Key>,
    /// Catalogues whose extensions the addon uses.
    pub catalogues: Vec<Key>,
    pub extensions: Vec<Definition>,
    pub tags: Vec<TagSet>,
    pub scenarios: Vec<ScenarioSet>,
    pub key_maps: Vec<KeyMap>,
    pub normalizer: Option<Normalizer>,
    pub validator: Option<Validator>,
    pub corrections: Vec<CorrectionDefinition>,
}

impl AddonDef {
    pub fn correction_definition(&self, schema: &str) -> Option<&CorrectionDefinition> {
        correction_for(&self.corrections, schema)
    }
}

/// Shared code lists that addons refer to.
#[derive(Debug, Clone, Default)]
pub struct CatalogueDef {
    pub key: Key,
    pub name: I18n,
    pub description: I18n,
    pub sources: Vec<Source>,
    pub extensions: Vec<Definition>,
    pub normalizer: Option<Normalizer>,
    pub validator: Option<Validator>,
}

/// Behaviour common to the three plug-in kinds.
pub trait Plugin {
    fn key(&self) -> &Key;
    fn extensions(&self) -> &[Definition];
    fn normalizer(&self) -> Option<Normalizer>;
    fn validator(&self) -> Option<Validator>;
    fn tags(&self) -> &[TagSet] {
        &[]
    }
    fn scenarios(&self) -> &[ScenarioSet] {
        &[]
    }
    fn key_maps(&self) -> &[KeyMap] {
        &[]
    }
    fn corrections(&self) -> &[CorrectionDefinition] {
        &[]
    }

    fn extension_def(&self, key: &Key) -> Option<&Definition> {
        self.extensions().iter().find(|d| d.key.as_ref() == Some(key))
    }

    fn key_map(&self, scope: KeyScope) -> Option<&KeyMap> {
        self.key_maps().iter().find(|m| m.scope == scope)
    }
}

impl Plugin for RegimeDef {
    fn key(&self) -> &Key {
        &self.key
    }
    fn extensions(&self) -> &[Definition] {
        &self.extensions
    }
    fn normalizer(&self) -> Option<Normalizer> {
        self.normalizer
    }
    fn validator(&self) -> Option<Validator> {
        self.validator
    }
    fn tags(&self) -> &[TagSet] {
        &self.tags
    }
    fn scenarios(&self) -> &[ScenarioSet] {
        &self.scenarios
    }
    fn key_maps(&self) -> &[KeyMap] {
        &self.key_maps
    }
    fn corrections(&self) -> &[CorrectionDefinition] {
        &self.corrections
    }
}

impl Plugin for AddonDef {
    fn key(&self) -> &Key {
        &self.key
    }
    fn extensions(&self) -> &[Definition] {
        &self.extensions
    }
    fn normalizer(&self) -> Option<Normalizer> {
        self.normalizer
    }
    fn validator(&self) -> Option<Validator> {
        self.validator
    }
    fn tags(&self) -> &[TagSet] {
        &self.tags
    }
    fn scenarios(&self) -> &[ScenarioSet] {
        &self.scenarios
    }
    fn key_maps(&self) -> &[KeyMap] {
        &self.key_maps
    }
    fn corrections(&self) -> &[CorrectionDefinition] {
        &self.corrections
    }
}

impl Plugin for CatalogueDef {
    fn key(&self) -> &Key {
        &self.key
    }
    fn extensions(&self) -> &[Definition] {
        &self.extensions
    }
    fn normalizer(&self) -> Option<Normalizer> {
        self.normalizer
    }
    fn validator(&self) -> Option<Validator> {
        self.validator
    }
}
