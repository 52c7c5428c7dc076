use std::sync::LazyLock;

use rust_decimal::Decimal;

use crate::bill::{self as b, Charge, Discount, Invoice, InvoiceType, Line, LineCharge, LineDiscount, Totals};
use crate::catalogues::untdid::{
    EXT_KEY_ALLOWANCE, EXT_KEY_CHARGE, EXT_KEY_DOCUMENT_TYPE, EXT_KEY_PAYMENT_MEANS, EXT_KEY_TAX_CATEGORY,
};
use crate::cbc::Key;
use crate::core::ErrorKind;
use crate::org::Party;
use crate::pay::{self, Instructions, PaymentDetails};
use crate::rules::{ErrorTree, Fault, Fields, Issue, Presence, Rule, by, each_validate, required, when};
use crate::tax::{Extensions, KeyMap, KeyScope, Total, ext_requires};

use super::*;

pub(super) static DISCOUNTS: LazyLock<KeyMap> = LazyLock::new(|| {
    KeyMap::new(
        KeyScope::Discount,
        EXT_KEY_ALLOWANCE,
        &[
            (b::DISCOUNT_KEY_EARLY_COMPLETION, "41"),
            (b::DISCOUNT_KEY_MILITARY, "62"),
            (b::DISCOUNT_KEY_WORK_ACCIDENT, "63"),
            (b::DISCOUNT_KEY_SPECIAL_AGREEMENT, "64"),
            (b::DISCOUNT_KEY_PRODUCTION_ERROR, "65"),
            (b::DISCOUNT_KEY_NEW_OUTLET, "66"),
            (b::DISCOUNT_KEY_SAMPLE, "67"),
            (b::DISCOUNT_KEY_END_OF_RANGE, "68"),
            (b::DISCOUNT_KEY_INCOTERM, "70"),
            (b::DISCOUNT_KEY_POS_THRESHOLD, "71"),
            (b::DISCOUNT_KEY_SPECIAL_REBATE, "100"),
            (b::DISCOUNT_KEY_TEMPORARY, "103"),
            (b::DISCOUNT_KEY_STANDARD, "104"),
            (b::DISCOUNT_KEY_YEARLY_TURNOVER, "105"),
        ],
    )
});

/// A starting point only; most users set the UNTDID 7161 code directly.
pub(super) static CHARGES: LazyLock<KeyMap> = LazyLock::new(|| {
    KeyMap::new(
        KeyScope::Charge,
        EXT_KEY_CHARGE,
        &[
            (b::CHARGE_KEY_STAMP_DUTY, "ST"),
            (b::CHARGE_KEY_OUTLAY, "AAE"),
            (b::CHARGE_KEY_TAX, "TX"),
            (b::CHARGE_KEY_CUSTOMS, "ABW"),
            (b::CHARGE_KEY_DELIVERY, "DL"),
            (b::CHARGE_KEY_PACKING, "PC"),
            (b::CHARGE_KEY_HANDLING, "HD"),
            (b::CHARGE_KEY_INSURANCE, "IN"),
            (b::CHARGE_KEY_STORAGE, "ABA"),
            (b::CHARGE_KEY_ADMIN, "AEM"),
            (b::CHARGE_KEY_CLEANING, "CG"),
        ],
    )
});

pub(super) static PAYMENT_MEANS: LazyLock<KeyMap> = LazyLock::new(|| {
    KeyMap::new(
        KeyScope::PaymentMeans,
        EXT_KEY_PAYMENT_MEANS,
        &[
            (pay::MEANS_KEY_ANY, "1"),
            (pay::MEANS_KEY_CASH, "10"),
            (pay::MEANS_KEY_CHEQUE, "20"),
            (pay::MEANS_KEY_BANK_DRAFT, "21"),
            (pay::MEANS_KEY_CREDIT_TRANSFER, "30"),
            (pay::MEANS_KEY_DEBIT_TRANSFER, "31"),
            (pay::MEANS_KEY_CARD, "48"),
            (pay::MEANS_KEY_DIRECT_DEBIT, "49"),
            ("credit-transfer+sepa", "58"),
            ("direct-debit+sepa", "59"),
            (pay::MEANS_KEY_PROMISSORY_NOTE, "60"),
            (pay::MEANS_KEY_ONLINE, "68"),
            (pay::MEANS_KEY_NETTING, "97"),
            (pay::MEANS_KEY_OTHER, "ZZZ"),
        ],
    )
});

/// Tax categories that may appear in a single rate of the breakdown.
const SINGLE_RATE_CATEGORIES: &[&str] = &[
    TAX_CATEGORY_ZERO,
    TAX_CATEGORY_EXEMPT,
    TAX_CATEGORY_REVERSE_CHARGE,
    TAX_CATEGORY_INTRA_COMMUNITY,
    TAX_CATEGORY_EXPORT,
    TAX_CATEGORY_OUTSIDE_SCOPE,
];

const ALLOWANCE_REASON: &str = "either a reason or an allowance type extension is required";
const CHARGE_REASON: &str = "either a reason or a charge type extension is required";

pub(super) fn normalize_invoice(inv: &mut Invoice) {
    inv.tax.get_or_insert_with(Default::default);
}

fn apply_key_map(map: &KeyMap, key: &Key, ext: &mut Extensions) {
    if let Some(code) = map.code_for(key) {
        ext.set(map.ext_key.as_str(), code.clone());
    }
}

pub(super) fn normalize_discount(d: &mut Discount) {
    apply_key_map(&DISCOUNTS, &d.key, &mut d.ext);
}

pub(super) fn normalize_line_discount(d: &mut LineDiscount) {
    apply_key_map(&DISCOUNTS, &d.key, &mut d.ext);
}

pub(super) fn normalize_charge(c: &mut Charge) {
    apply_key_map(&CHARGES, &c.key, &mut c.ext);
}

pub(super) fn normalize_line_charge(c: &mut LineCharge) {
    apply_key_map(&CHARGES, &c.key, &mut c.ext);
}

/// Payment means codes given by the caller are kept.
pub(super) fn normalize_instructions(instr: &mut Instructions) {
    if let Some(code) = PAYMENT_MEANS.code_for(&instr.key) {
        instr.ext.set_if_empty(EXT_KEY_PAYMENT_MEANS, code.clone());
    }
}

/// Amount still owed after advances.
fn is_due(inv: &Invoice) -> bool {
    inv.totals.as_ref().is_some_and(|t| t.due.unwrap_or(t.payable) > Decimal::ZERO)
}

/// Presence check reporting a business rule code.
fn required_br<'r, T: Presence + ?Sized>(message: &'r str, rule: &'r str) -> Rule<'r, T> {
    by(move |v: &T| {
        if v.is_present() {
            Ok(())
        } else {
            Err(Issue::new(ErrorKind::Required, message).rule(rule).into())
        }
    })
}

pub(super) fn validate_invoice(inv: &Invoice) -> Result<(), ErrorTree> {
    let payment_due = is_due(inv) && inv.kind == InvoiceType::Standard;
    Fields::new()
        .nested("tax", &inv.tax, [required()], |tax| match tax {
            Some(tax) => Fields::new()
                .field("ext", &tax.ext, [ext_requires(&[EXT_KEY_DOCUMENT_TYPE])])
                .finish(),
            None => Ok(()),
        })
        .field("lines", &inv.lines, [required_br("cannot be blank", "BR-16")])
        .nested("supplier", &inv.supplier, [], |p| validate_party(p, "BR-8"))
        .nested("customer", &inv.customer, [], |p| {
            p.as_ref().map_or(Ok(()), |p| validate_party(p, "BR-10"))
        })
        .nested(
            "payment",
            &inv.payment,
            [when(
                payment_due,
                vec![required_br("payment details are required when amount is due", "BR-CO-25")],
            )],
            |p| match p {
                Some(p) if payment_due => validate_payment(p),
                _ => Ok(()),
            },
        )
        .nested("totals", &inv.totals, [], |t| t.as_ref().map_or(Ok(()), validate_totals))
        .finish()
}

/// Postal address of seller and buyer.
fn validate_party(party: &Party, rule: &'static str) -> Result<(), ErrorTree> {
    Fields::new()
        .field("addresses", &party.addresses, [required_br("cannot be blank", rule)])
        .finish()
}

fn validate_payment(payment: &PaymentDetails) -> Result<(), ErrorTree> {
    Fields::new()
        .field(
            "terms",
            &payment.terms,
            [required_br("payment terms are required when amount is due", "BR-CO-25")],
        )
        .finish()
}

fn validate_totals(totals: &Totals) -> Result<(), ErrorTree> {
    Fields::new().field("taxes", &totals.taxes, [by(validate_tax_breakdown)]).finish()
}

/// Exempt style categories carry a single rate each, and outside scope
/// cannot be mixed with any of them.
fn validate_tax_breakdown(total: &Total) -> Result<(), Fault> {
    for cat in &total.categories {
        let mut seen: Vec<&str> = Vec::new();
        for rate in &cat.rates {
            let Some(code) = rate.ext.get(EXT_KEY_TAX_CATEGORY).map(|c| c.as_str()) else {
                continue;
            };
            if !SINGLE_RATE_CATEGORIES.contains(&code) {
                continue;
            }
            if seen.contains(&code) {
                return Err(Issue::invalid(format!("UNTDID tax category {code} appears more than once"))
                    .rule(&format!("BR-{code}-01"))
                    .into());
            }
            seen.push(code);
        }
        if seen.contains(&TAX_CATEGORY_OUTSIDE_SCOPE) && seen.len() > 1 {
            return Err(Issue::invalid("outside scope (O) cannot be combined with other VAT categories")
                .rule("BR-O-11")
                .into());
        }
    }
    Ok(())
}

pub(super) fn validate_line(line: &Line) -> Result<(), ErrorTree> {
    Fields::new()
        .tree(
            "discounts",
            each_validate(&line.discounts, |d| {
                reason_or_code(&d.reason, &d.ext, EXT_KEY_ALLOWANCE, ALLOWANCE_REASON, "BR-41")
            }),
        )
        .tree(
            "charges",
            each_validate(&line.charges, |c| reason_or_code(&c.reason, &c.ext, EXT_KEY_CHARGE, CHARGE_REASON, "BR-44")),
        )
        .finish()
}

pub(super) fn validate_discount(d: &Discount) -> Result<(), ErrorTree> {
    reason_or_code(&d.reason, &d.ext, EXT_KEY_ALLOWANCE, ALLOWANCE_REASON, "BR-33")
}

pub(super) fn validate_charge(c: &Charge) -> Result<(), ErrorTree> {
    reason_or_code(&c.reason, &c.ext, EXT_KEY_CHARGE, CHARGE_REASON, "BR-36")
}

/// Allowances and charges are described by free text, a code, or both.
fn reason_or_code(
    reason: &str,
    ext: &Extensions,
    ext_key: &str,
    message: &str,
    rule: &str,
) -> Result<(), ErrorTree> {
    if reason.is_present() || ext.has(ext_key) {
        return Ok(());
    }
    let issue = Issue::new(ErrorKind::Required, message).rule(rule);
    ErrorTree::new().with("reason", issue.clone()).with("ext", issue).into_result()
}
