//! Rules every invoice must satisfy, whatever its regime, with the
//! plug-in validators merged in at each node.

use std::sync::LazyLock;

use regex::Regex;

use crate::cbc::{Code, Note};
use crate::core::{Context, ErrorKind, Validate};
use crate::org::{self, DocumentRef, Item, Party};
use crate::pay::{Instructions, PaymentDetails};
use crate::rules::{ErrorTree, Fields, Issue, by, each_validate, matches, required};
use crate::tax::{
    Combo, Extensions, Identity, NodeRef, SCHEMA_INVOICE, validate_combo, validate_extensions,
    validate_identity, validate_tags,
};

use super::{Charge, Discount, Invoice, Line, LineCharge, LineDiscount, Tax};

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency regex is valid"));

fn valid_code<'r>() -> crate::rules::Rule<'r, Code> {
    by(|c: &Code| {
        if c.is_empty() || c.is_valid() {
            Ok(())
        } else {
            Err(Issue::format().into())
        }
    })
}

fn ext_in_scope(ctx: &Context<'_>, ext: &Extensions) -> Result<(), ErrorTree> {
    validate_extensions(ext, |k| ctx.extension_def(k))
}

impl Validate for Invoice {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        let mut f = Fields::new();
        f.field("$regime", &self.regime, [required()])
            .tree("$addons", addons_in_scope(self, ctx))
            .tree("$tags", validate_tags(&self.tags, &ctx.tag_set(SCHEMA_INVOICE)))
            .field("series", &self.series, [valid_code()])
            .field("code", &self.code, [valid_code()])
            .field("issue_date", &self.issue_date, [required()])
            .field("currency", &self.currency, [required(), matches(&CURRENCY)]);
        if let Some(tax) = &self.tax {
            f.tree("tax", tax.validate(ctx));
        }
        if self.kind == super::InvoiceType::Corrective {
            f.field("preceding", &self.preceding, [required()]);
        }
        f.tree("preceding", each_validate(&self.preceding, |d| d.validate(ctx)))
            .tree("supplier", self.supplier.validate(ctx));
        if let Some(customer) = &self.customer {
            f.tree("customer", customer.validate(ctx));
        }
        if let Some(issuer) = self.ordering.as_ref().and_then(|o| o.issuer.as_ref()) {
            f.tree("ordering", Fields::new().tree("issuer", issuer.validate(ctx)).finish());
        }
        f.tree("lines", each_validate(&self.lines, |l| l.validate(ctx)))
            .tree("discounts", each_validate(&self.discounts, |d| d.validate(ctx)))
            .tree("charges", each_validate(&self.charges, |c| c.validate(ctx)));
        if let Some(payment) = &self.payment {
            f.tree("payment", payment.validate(ctx));
        }
        f.tree("notes", each_validate(&self.notes, |n| n.validate(ctx)))
            .merge_result(ctx.validate_node(NodeRef::Invoice(self)))
            .finish()
    }
}

/// Every addon must be registered and have its requirements declared.
fn addons_in_scope(inv: &Invoice, ctx: &Context<'_>) -> Result<(), ErrorTree> {
    let mut tree = ErrorTree::new();
    for (i, key) in inv.addons.iter().enumerate() {
        match ctx.registry.addon_for_key(key) {
            None => tree.insert(i.to_string(), Issue::invalid(format!("addon '{key}' not registered"))),
            Some(addon) => {
                if let Some(missing) = addon.requires.iter().find(|r| !inv.addons.contains(r)) {
                    tree.insert(
                        i.to_string(),
                        Issue::new(ErrorKind::MissingDependency, format!("requires '{missing}'")),
                    );
                }
            }
        }
    }
    tree.into_result()
}

impl Validate for Tax {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Tax(self)))
            .finish()
    }
}

impl Validate for DocumentRef {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .field("series", &self.series, [valid_code()])
            .field("code", &self.code, [required(), valid_code()])
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Preceding(self)))
            .finish()
    }
}

impl Validate for Party {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        let mut f = Fields::new();
        f.field("name", &self.name, [required()]);
        if let Some(id) = &self.tax_id {
            f.tree("tax_id", id.validate(ctx));
        }
        f.tree("identities", each_validate(&self.identities, |id| id.validate(ctx)))
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Party(self)))
            .finish()
    }
}

impl Validate for Identity {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .merge_result(validate_identity(self))
            .merge_result(ctx.validate_node(NodeRef::TaxIdentity(self)))
            .finish()
    }
}

impl Validate for org::Identity {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .field("code", &self.code, [required()])
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Identity(self)))
            .finish()
    }
}

impl Validate for Line {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .tree("item", self.item.validate(ctx))
            .tree("discounts", each_validate(&self.discounts, |d| d.validate(ctx)))
            .tree("charges", each_validate(&self.charges, |c| c.validate(ctx)))
            .tree("taxes", each_validate(&self.taxes, |c| c.validate(ctx)))
            .tree("notes", each_validate(&self.notes, |n| n.validate(ctx)))
            .merge_result(ctx.validate_node(NodeRef::Line(self)))
            .finish()
    }
}

impl Validate for Item {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .field("name", &self.name, [required()])
            .field("price", &self.price, [required()])
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Item(self)))
            .finish()
    }
}

impl Validate for Combo {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        let regime = match ctx.regime.and_then(|r| self.foreign_country(&r.country)) {
            Some(country) => ctx.regime_for(country),
            None => ctx.regime,
        };
        Fields::new()
            .merge_result(validate_combo(self, regime))
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Combo(self)))
            .finish()
    }
}

impl Validate for LineDiscount {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::LineDiscount(self)))
            .finish()
    }
}

impl Validate for LineCharge {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::LineCharge(self)))
            .finish()
    }
}

impl Validate for Discount {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .tree("taxes", each_validate(&self.taxes, |c| c.validate(ctx)))
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Discount(self)))
            .finish()
    }
}

impl Validate for Charge {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .tree("taxes", each_validate(&self.taxes, |c| c.validate(ctx)))
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Charge(self)))
            .finish()
    }
}

impl Validate for PaymentDetails {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        let mut f = Fields::new();
        if let Some(instr) = &self.instructions {
            f.tree("instructions", instr.validate(ctx));
        }
        f.finish()
    }
}

impl Validate for Instructions {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .field("key", &self.key, [required()])
            .tree("ext", ext_in_scope(ctx, &self.ext))
            .merge_result(ctx.validate_node(NodeRef::Instructions(self)))
            .finish()
    }
}

impl Validate for Note {
    fn validate(&self, ctx: &Context<'_>) -> Result<(), ErrorTree> {
        Fields::new()
            .field("text", &self.text, [required()])
            .merge_result(ctx.validate_node(NodeRef::Note(self)))
            .finish()
    }
}
