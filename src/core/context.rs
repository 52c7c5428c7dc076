//! The set of plug-ins that apply to one document.

use tracing::{trace, warn};

use crate::bill::Invoice;
use crate::cbc::{Definition, Key};
use crate::l10n::CountryCode;
use crate::rules::ErrorTree;
use crate::tax::{
    AddonDef, CatalogueDef, CorrectionDefinition, Node, NodeRef, Plugin, RegimeDef, Registry,
    ScenarioSet, TagSet, common_invoice_tags,
};

/// Regime, addons and catalogues resolved for a document.
#[derive(Debug, Clone)]
pub struct Context<'r> {
    pub registry: &'r Registry,
    pub regime: Option<&'r RegimeDef>,
    /// Registered addons in document order.
    pub addons: Vec<&'r AddonDef>,
    pub catalogues: Vec<&'r CatalogueDef>,
}

impl<'r> Context<'r> {
    /// Resolve the plug-ins a document declares. The regime comes from
    /// `$regime`, else from the supplier's tax identity. Catalogues are
    /// those of the regime followed by those of each addon.
    pub fn for_invoice(registry: &'r Registry, inv: &Invoice) -> Self {
        let regime = regime_country(inv).and_then(|c| registry.regime_for(c.as_str()));
        let addons: Vec<&AddonDef> =
            inv.addons.iter().filter_map(|k| registry.addon_for_key(k)).collect();
        let mut catalogues: Vec<&CatalogueDef> = Vec::new();
        let declared = regime.into_iter().flat_map(|r| r.catalogues.iter());
        for key in declared.chain(addons.iter().flat_map(|a| a.catalogues.iter())) {
            if let Some(cat) = registry.catalogue_for_key(key) {
                if !catalogues.iter().any(|c| c.key == cat.key) {
                    catalogues.push(cat);
                }
            }
        }
        Self {
            registry,
            regime,
            addons,
            catalogues,
        }
    }

    /// Regime, then addons, then catalogues.
    pub fn plugins(&self) -> impl Iterator<Item = &'r dyn Plugin> + '_ {
        self.regime
            .map(|r| r as &dyn Plugin)
            .into_iter()
            .chain(self.addons.iter().map(|a| *a as &dyn Plugin))
            .chain(self.catalogues.iter().map(|c| *c as &dyn Plugin))
    }

    /// Definition of an extension key from any plug-in in scope.
    pub fn extension_def(&self, key: &Key) -> Option<&'r Definition> {
        self.plugins().find_map(|p| p.extension_def(key))
    }

    /// Regime for another country, such as a customer's.
    pub fn regime_for(&self, country: &CountryCode) -> Option<&'r RegimeDef> {
        if country.is_empty() {
            return None;
        }
        self.registry.regime_for(country.as_str())
    }

    pub fn has_addon(&self, key: &str) -> bool {
        self.addons.iter().any(|a| a.key == key)
    }

    /// Tags accepted for the schema: common tags, then the regime's and
    /// each addon's.
    pub fn tag_set(&self, schema: &'static str) -> TagSet {
        let mut set = common_invoice_tags();
        set.schema = schema;
        for ts in self.plugins().flat_map(|p| p.tags().iter()) {
            set.merge(ts);
        }
        set
    }

    /// Scenarios of the regime followed by those of each addon.
    pub fn scenario_set(&self, schema: &'static str) -> ScenarioSet {
        let mut set = ScenarioSet::new(schema, Vec::new());
        for ss in self.plugins().flat_map(|p| p.scenarios().iter()) {
            set.merge(ss);
        }
        set
    }

    /// Merged correction definition for the schema, if any plug-in
    /// defines one.
    pub fn correction_definition(&self, schema: &str) -> Option<CorrectionDefinition> {
        let mut out: Option<CorrectionDefinition> = None;
        for cd in self.plugins().flat_map(|p| p.corrections().iter()) {
            if !schema.ends_with(cd.schema) {
                continue;
            }
            match &mut out {
                Some(o) => o.merge(cd),
                None => out = Some(cd.clone()),
            }
        }
        out
    }

    /// Regime whose hooks apply to the node. Tax identities use the
    /// regime of their own country.
    fn regime_for_node(&self, node: NodeRef<'_>) -> Option<&'r RegimeDef> {
        match node {
            NodeRef::TaxIdentity(id) => self.regime_for(&id.country),
            _ => self.regime,
        }
    }

    /// Run the regime normalizer on a node.
    pub fn normalize_regime(&self, node: Node<'_>) {
        let regime = match &node {
            Node::TaxIdentity(id) => self.regime_for(&id.country),
            _ => self.regime,
        };
        if let Some(r) = regime {
            if let Some(f) = r.normalizer {
                trace!(regime = %r.key, "regime hook");
                f(node);
            }
        }
    }

    /// Run every validator in scope on a node and merge their trees.
    pub fn validate_node(&self, node: NodeRef<'_>) -> Result<(), ErrorTree> {
        let mut tree = ErrorTree::new();
        let regime = self.regime_for_node(node).and_then(|r| r.validator);
        let others = self
            .addons
            .iter()
            .filter_map(|a| a.validator)
            .chain(self.catalogues.iter().filter_map(|c| c.validator));
        for f in regime.into_iter().chain(others) {
            if let Err(t) = f(node) {
                tree.merge(t);
            }
        }
        tree.into_result()
    }
}

/// Country whose regime applies to the document.
pub fn regime_country(inv: &Invoice) -> Option<&CountryCode> {
    if !inv.regime.is_empty() {
        return Some(&inv.regime);
    }
    inv.supplier.tax_country()
}

/// Expand addon requirements in place, keeping unknown keys at the end
/// so validation can report them.
pub fn expand_invoice_addons(registry: &Registry, inv: &mut Invoice) {
    let mut keys = registry.expand_addons(&inv.addons);
    for k in &inv.addons {
        if registry.addon_for_key(k).is_none() {
            warn!(addon = %k, "document references an unregistered addon");
            keys.push(k.clone());
        }
    }
    inv.addons = keys;
}

/// Validation with the resolved context.
pub trait Validate {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbc::I18n;
    use crate::org::Party;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register_catalogue(CatalogueDef {
            key: Key::new("codes"),
            ..Default::default()
        })
        .unwrap();
        reg.register_regime(RegimeDef {
            key: Key::new("xx"),
            country: CountryCode::new("XX"),
            name: I18n::en("Test"),
            catalogues: vec![Key::new("codes")],
            ..Default::default()
        })
        .unwrap();
        reg.register_addon(AddonDef {
            key: Key::new("base"),
            ..Default::default()
        })
        .unwrap();
        reg.register_addon(AddonDef {
            key: Key::new("child"),
            requires: vec![Key::new("base")],
            ..Default::default()
        })
        .unwrap();
        reg
    }

    #[test]
    fn regime_from_supplier() {
        let reg = registry();
        let inv = Invoice {
            supplier: Party::new("S").tax_id("XX", "1"),
            ..Default::default()
        };
        let ctx = Context::for_invoice(&reg, &inv);
        assert_eq!(ctx.regime.map(|r| r.key.as_str()), Some("xx"));
    }

    #[test]
    fn addons_expanded_with_unknown_kept() {
        let reg = registry();
        let mut inv = Invoice {
            addons: vec![Key::new("child"), Key::new("nope")],
            ..Default::default()
        };
        expand_invoice_addons(&reg, &mut inv);
        let keys: Vec<&str> = inv.addons.iter().map(Key::as_str).collect();
        assert_eq!(keys, vec!["base", "child", "nope"]);
        let ctx = Context::for_invoice(&reg, &inv);
        assert_eq!(ctx.addons.len(), 2);
        assert!(ctx.has_addon("child"));
    }

    #[test]
    fn regime_catalogues_without_addons() {
        let reg = registry();
        let inv = Invoice {
            supplier: Party::new("S").tax_id("XX", "1"),
            ..Default::default()
        };
        let ctx = Context::for_invoice(&reg, &inv);
        assert!(ctx.addons.is_empty());
        let keys: Vec<&str> = ctx.catalogues.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["codes"]);
    }
}
