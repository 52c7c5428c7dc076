//! Normalization pipeline and the document level entry points.
//!
//! Normalization runs in stages, each visiting every node of the document
//! children first with the invoice itself last:
//!
//! 1. regime migrations, then built-in combo and identity normalization
//! 2. regime hooks
//! 3. addon hooks, in document order
//! 4. catalogue hooks
//! 5. rates again, for keys and rates picked by addon hooks
//! 6. scenarios
//!
//! When totals are calculated, scenarios run after the calculator so
//! that those matching on totals see the current amounts.

use tracing::{debug, trace};

use crate::bill::{Calculator, DefaultCalculator, Invoice};
use crate::rules::ErrorTree;
use crate::tax::{
    Node, Registry, SCHEMA_INVOICE, apply_scenarios, migrate_combo, normalize_identity,
    registry, resolve_combo,
};

use super::context::{Context, Validate, expand_invoice_addons, regime_country};

/// Visit every node of the invoice, children before parents.
pub fn for_each_node(inv: &mut Invoice, f: &mut dyn FnMut(Node<'_>)) {
    if let Some(tax) = &mut inv.tax {
        f(Node::Tax(tax));
    }
    for doc in &mut inv.preceding {
        f(Node::Preceding(doc));
    }
    visit_party(&mut inv.supplier, f);
    if let Some(customer) = &mut inv.customer {
        visit_party(customer, f);
    }
    if let Some(issuer) = inv.ordering.as_mut().and_then(|o| o.issuer.as_mut()) {
        visit_party(issuer, f);
    }
    for line in &mut inv.lines {
        f(Node::Item(&mut line.item));
        for d in &mut line.discounts {
            f(Node::LineDiscount(d));
        }
        for c in &mut line.charges {
            f(Node::LineCharge(c));
        }
        for combo in &mut line.taxes {
            f(Node::Combo(combo));
        }
        for note in &mut line.notes {
            f(Node::Note(note));
        }
        f(Node::Line(line));
    }
    for d in &mut inv.discounts {
        for combo in &mut d.taxes {
            f(Node::Combo(combo));
        }
        f(Node::Discount(d));
    }
    for c in &mut inv.charges {
        for combo in &mut c.taxes {
            f(Node::Combo(combo));
        }
        f(Node::Charge(c));
    }
    if let Some(instr) = inv.payment.as_mut().and_then(|p| p.instructions.as_mut()) {
        f(Node::Instructions(instr));
    }
    for note in &mut inv.notes {
        f(Node::Note(note));
    }
    f(Node::Invoice(inv));
}

fn visit_party(party: &mut crate::org::Party, f: &mut dyn FnMut(Node<'_>)) {
    if let Some(id) = &mut party.tax_id {
        f(Node::TaxIdentity(id));
    }
    for id in &mut party.identities {
        f(Node::Identity(id));
    }
    f(Node::Party(party));
}

/// Normalize with the built-in registry.
pub fn normalize(inv: &mut Invoice) {
    normalize_with(registry(), inv)
}

/// Fill derived fields, map keys to codes and apply scenarios. Never
/// fails; problems are left for validation. Running it twice gives the
/// same document.
pub fn normalize_with(registry: &Registry, inv: &mut Invoice) {
    normalize_document(registry, inv);
    apply_invoice_scenarios(registry, inv);
}

fn normalize_document(registry: &Registry, inv: &mut Invoice) {
    if inv.regime.is_empty() {
        if let Some(c) = regime_country(inv).cloned() {
            if registry.regime_for(c.as_str()).is_some() {
                inv.regime = c;
            }
        }
    }
    expand_invoice_addons(registry, inv);
    let ctx = Context::for_invoice(registry, inv);
    if let Some(regime) = ctx.regime {
        if inv.currency.is_empty() {
            inv.currency = regime.currency.to_string();
        }
    }

    debug!(stage = "migrations", regime = ?ctx.regime.map(|r| r.key.as_str()), "normalize");
    if let Some(regime) = ctx.regime {
        for m in &regime.migrations {
            m(inv);
        }
    }
    for (i, line) in inv.lines.iter_mut().enumerate() {
        line.index = i + 1;
    }
    let date = inv.value_date();
    let home = inv.regime.clone();
    for_each_node(inv, &mut |node| match node {
        Node::Combo(c) => {
            migrate_combo(c);
            let regime = match c.foreign_country(&home) {
                Some(country) => ctx.regime_for(country),
                None => ctx.regime,
            };
            if let (Some(r), Some(d)) = (regime, date) {
                resolve_combo(c, r, d);
            }
        }
        Node::TaxIdentity(id) => {
            let alt = ctx.regime_for(&id.country).map(|r| r.alt_country_strs()).unwrap_or_default();
            normalize_identity(id, &alt);
        }
        Node::Party(p) => p.ext.clean(),
        Node::Item(item) => item.ext.clean(),
        Node::Tax(t) => t.ext.clean(),
        _ => {}
    });

    debug!(stage = "regime", "normalize");
    for_each_node(inv, &mut |node| ctx.normalize_regime(node));

    debug!(stage = "addons", count = ctx.addons.len(), "normalize");
    for addon in &ctx.addons {
        if let Some(f) = addon.normalizer {
            trace!(addon = %addon.key, "addon hooks");
            for_each_node(inv, &mut |node| f(node));
        }
    }

    debug!(stage = "catalogues", count = ctx.catalogues.len(), "normalize");
    for cat in &ctx.catalogues {
        if let Some(f) = cat.normalizer {
            trace!(catalogue = %cat.key, "catalogue hooks");
            for_each_node(inv, &mut |node| f(node));
        }
    }

    debug!(stage = "rates", "normalize");
    for_each_node(inv, &mut |node| {
        if let Node::Combo(c) = node {
            let regime = match c.foreign_country(&home) {
                Some(country) => ctx.regime_for(country),
                None => ctx.regime,
            };
            if let (Some(r), Some(d)) = (regime, date) {
                resolve_combo(c, r, d);
            }
        }
    });
}

fn apply_invoice_scenarios(registry: &Registry, inv: &mut Invoice) {
    debug!(stage = "scenarios", "normalize");
    let set = Context::for_invoice(registry, inv).scenario_set(SCHEMA_INVOICE);
    apply_scenarios(&set, inv);
    if inv.tax.as_ref().is_some_and(|t| t.ext.is_empty() && t.prices_include.is_none()) {
        inv.tax = None;
    }
}

/// Validate with the built-in registry.
pub fn validate(inv: &Invoice) -> Result<(), ErrorTree> {
    validate_with(registry(), inv)
}

/// Run the shared rules and every plug-in validator in scope, collecting
/// all failures into one tree.
pub fn validate_with(registry: &Registry, inv: &Invoice) -> Result<(), ErrorTree> {
    let ctx = Context::for_invoice(registry, inv);
    debug!(regime = ?ctx.regime.map(|r| r.key.as_str()), addons = ctx.addons.len(), "validate");
    inv.validate(&ctx)
}

/// Normalize and compute totals with the built-in registry.
pub fn calculate(inv: &mut Invoice) {
    calculate_with(registry(), inv)
}

/// Normalize, then compute totals with the default calculator.
pub fn calculate_with(registry: &Registry, inv: &mut Invoice) {
    calculate_using(registry, inv, &DefaultCalculator)
}

/// Normalize, then compute totals with a custom calculator. Scenarios are
/// applied once the totals are in place.
pub fn calculate_using(registry: &Registry, inv: &mut Invoice, calc: &dyn Calculator) {
    normalize_document(registry, inv);
    let regime = Context::for_invoice(registry, inv).regime;
    calc.calculate(inv, regime);
    apply_invoice_scenarios(registry, inv);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::Line;
    use crate::org::{Item, Party};
    use crate::tax::Combo;

    #[test]
    fn children_before_parents() {
        let mut inv = Invoice::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Party::new("S").tax_id("ES", "B1"),
        )
        .line(Line::new(dec!(1), Item::new("A", dec!(1))).tax(Combo::new("VAT")));
        let mut seen = Vec::new();
        for_each_node(&mut inv, &mut |node| {
            seen.push(match node {
                Node::TaxIdentity(_) => "tax-id",
                Node::Party(_) => "party",
                Node::Item(_) => "item",
                Node::Combo(_) => "combo",
                Node::Line(_) => "line",
                Node::Invoice(_) => "invoice",
                _ => "other",
            })
        });
        assert_eq!(seen, vec!["tax-id", "party", "item", "combo", "line", "invoice"]);
    }

    #[test]
    fn empty_registry_keeps_document() {
        let reg = Registry::new();
        let mut inv = Invoice::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Party::new("S"),
        );
        let before = inv.clone();
        normalize_with(&reg, &mut inv);
        assert_eq!(inv, before);
    }
}
