//! Registry of regimes, addons and catalogues.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::cbc::{Definition, Key};
use crate::core::{Error, Result};

use super::keymap::{KeyMap, KeyScope};
use super::plugin::{AddonDef, CatalogueDef, Plugin, RegimeDef};

/// Lookup tables for every registered plug-in. Keys are unique across
/// the three kinds.
#[derive(Debug, Default)]
pub struct Registry {
    regimes: Vec<RegimeDef>,
    addons: Vec<AddonDef>,
    catalogues: Vec<CatalogueDef>,
    regimes_by_key: HashMap<Key, usize>,
    regimes_by_country: HashMap<String, usize>,
    addons_by_key: HashMap<Key, usize>,
    catalogues_by_key: HashMap<Key, usize>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every regime, addon and catalogue in this crate.
    pub fn builtin() -> Result<Self> {
        let mut reg = Self::new();
        #[cfg(feature = "catalogues")]
        for cat in crate::catalogues::all() {
            reg.register_catalogue(cat)?;
        }
        #[cfg(feature = "regimes")]
        for regime in crate::regimes::all() {
            reg.register_regime(regime)?;
        }
        #[cfg(feature = "addons")]
        for addon in crate::addons::all() {
            reg.register_addon(addon)?;
        }
        debug!(
            regimes = reg.regimes.len(),
            addons = reg.addons.len(),
            catalogues = reg.catalogues.len(),
            "built-in registry ready"
        );
        Ok(reg)
    }

    fn is_taken(&self, key: &Key) -> bool {
        self.regimes_by_key.contains_key(key)
            || self.addons_by_key.contains_key(key)
            || self.catalogues_by_key.contains_key(key)
    }

    /// Register a regime. Fails if the key is taken or another regime
    /// already has the same country. Alternative codes never replace an
    /// existing mapping.
    pub fn register_regime(&mut self, regime: RegimeDef) -> Result<()> {
        if self.is_taken(&regime.key) {
            return Err(Error::DuplicateKey(regime.key));
        }
        if self.regimes.iter().any(|r| r.country == regime.country) {
            return Err(Error::DuplicateCountry(regime.country.as_str().to_string()));
        }
        debug!(key = %regime.key, "registering regime");
        let idx = self.regimes.len();
        self.regimes_by_key.insert(regime.key.clone(), idx);
        self.regimes_by_country.insert(regime.country.as_str().to_string(), idx);
        for alt in &regime.alt_country_codes {
            self.regimes_by_country.entry(alt.as_str().to_string()).or_insert(idx);
        }
        self.regimes.push(regime);
        Ok(())
    }

    /// Register an addon. Fails if the key is taken or if following
    /// `requires` from the new addon leads back to it.
    pub fn register_addon(&mut self, addon: AddonDef) -> Result<()> {
        if self.is_taken(&addon.key) {
            return Err(Error::DuplicateKey(addon.key));
        }
        if self.requires_reaches(&addon, &addon.key) {
            return Err(Error::DependencyCycle(addon.key));
        }
        debug!(key = %addon.key, requires = addon.requires.len(), "registering addon");
        self.addons_by_key.insert(addon.key.clone(), self.addons.len());
        self.addons.push(addon);
        Ok(())
    }

    fn requires_reaches(&self, from: &AddonDef, target: &Key) -> bool {
        let mut stack: Vec<&Key> = from.requires.iter().collect();
        let mut seen: Vec<&Key> = Vec::new();
        while let Some(k) = stack.pop() {
            if k == target {
                return true;
            }
            if seen.contains(&k) {
                continue;
            }
            seen.push(k);
            if let Some(a) = self.addon_for_key(k) {
                stack.extend(a.requires.iter());
            }
        }
        false
    }

    pub fn register_catalogue(&mut self, catalogue: CatalogueDef) -> Result<()> {
        if self.is_taken(&catalogue.key) {
            return Err(Error::DuplicateKey(catalogue.key));
        }
        debug!(key = %catalogue.key, "registering catalogue");
        self.catalogues_by_key.insert(catalogue.key.clone(), self.catalogues.len());
        self.catalogues.push(catalogue);
        Ok(())
    }

    /// Regime for a country code, alternative codes included.
    pub fn regime_for(&self, country: &str) -> Option<&RegimeDef> {
        let idx = self.regimes_by_country.get(&country.to_uppercase())?;
        self.regimes.get(*idx)
    }

    pub fn regime_for_key(&self, key: &Key) -> Option<&RegimeDef> {
        self.regimes.get(*self.regimes_by_key.get(key)?)
    }

    pub fn addon_for_key(&self, key: &Key) -> Option<&AddonDef> {
        self.addons.get(*self.addons_by_key.get(key)?)
    }

    pub fn catalogue_for_key(&self, key: &Key) -> Option<&CatalogueDef> {
        self.catalogues.get(*self.catalogues_by_key.get(key)?)
    }

    /// Addons sorted by key.
    pub fn all_addons(&self) -> Vec<&AddonDef> {
        let mut list: Vec<&AddonDef> = self.addons.iter().collect();
        list.sort_by(|a, b| a.key.cmp(&b.key));
        list
    }

    pub fn all_regimes(&self) -> Vec<&RegimeDef> {
        let mut list: Vec<&RegimeDef> = self.regimes.iter().collect();
        list.sort_by(|a, b| a.key.cmp(&b.key));
        list
    }

    fn plugins(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.regimes
            .iter()
            .map(|r| r as &dyn Plugin)
            .chain(self.addons.iter().map(|a| a as &dyn Plugin))
            .chain(self.catalogues.iter().map(|c| c as &dyn Plugin))
    }

    /// Definition of an extension key from any registered plug-in.
    pub fn extension_for_key(&self, key: &Key) -> Option<&Definition> {
        self.plugins().find_map(|p| p.extension_def(key))
    }

    fn key_maps(&self, scope: KeyScope) -> Vec<&KeyMap> {
        self.plugins()
            .flat_map(|p| p.key_maps().iter())
            .filter(|m| m.scope == scope)
            .collect()
    }

    /// Extensions whose codes are derived from tax combo keys.
    pub fn tax_rate_extensions(&self) -> Vec<&Definition> {
        self.mapped_extensions(KeyScope::TaxCombo)
    }

    /// Extensions whose codes are derived from payment means keys.
    pub fn payment_means_extensions(&self) -> Vec<&Definition> {
        self.mapped_extensions(KeyScope::PaymentMeans)
    }

    fn mapped_extensions(&self, scope: KeyScope) -> Vec<&Definition> {
        let mut out: Vec<&Definition> = Vec::new();
        for m in self.key_maps(scope) {
            if let Some(def) = self.extension_for_key(&m.ext_key) {
                if !out.iter().any(|d| d.key == def.key) {
                    out.push(def);
                }
            }
        }
        out
    }

    /// Addon keys expanded with their requirements (requirements first),
    /// de-duplicated and in document order. Unknown keys are dropped.
    pub fn expand_addons(&self, keys: &[Key]) -> Vec<Key> {
        let mut out = Vec::new();
        for k in keys {
            self.expand_into(k, &mut out, 0);
        }
        out
    }

    fn expand_into(&self, key: &Key, out: &mut Vec<Key>, depth: usize) {
        if out.contains(key) || depth > self.addons.len() {
            return;
        }
        let Some(addon) = self.addon_for_key(key) else {
            return;
        };
        for r in &addon.requires {
            self.expand_into(r, out, depth + 1);
        }
        if !out.contains(key) {
            out.push(key.clone());
        }
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Process wide registry with every built-in plug-in, built on first use.
///
/// Built-in tables never collide; should they, the offending plug-in is
/// skipped and logged rather than panicking.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| match Registry::builtin() {
        Ok(reg) => reg,
        Err(e) => {
            tracing::error!(error = %e, "built-in registry failed, starting empty");
            Registry::new()
        }
    })
}
