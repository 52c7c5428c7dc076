use chrono::NaiveDate;

use crate::bill::{Invoice, InvoiceType, Line, Totals};
use crate::org::DocumentRef;
use crate::rules::{
    ErrorTree, Fault, Fields, Issue, Rule, by, each_validate, max, required, when, zero_or_positive,
};

pub(super) fn validate_invoice(inv: &Invoice) -> Result<(), ErrorTree> {
    let issued = inv.issue_date;
    let mut fields = Fields::new();
    fields
        .field("operation_date", &inv.operation_date, [not_after(issued)])
        .field(
            "preceding",
            &inv.preceding,
            [when(
                inv.kind.is_in(&[InvoiceType::CreditNote, InvoiceType::DebitNote]),
                vec![required()],
            )],
        )
        .tree("preceding", each_validate(&inv.preceding, |doc| validate_preceding(doc, issued)))
        .tree("lines", each_validate(&inv.lines, validate_line));
    if let Some(totals) = &inv.totals {
        fields.nested("totals", totals, [], validate_totals);
    }
    fields.finish()
}

fn validate_preceding(doc: &DocumentRef, issued: Option<NaiveDate>) -> Result<(), ErrorTree> {
    Fields::new().field("issue_date", &doc.issue_date, [not_after(issued)]).finish()
}

fn validate_line(line: &Line) -> Result<(), ErrorTree> {
    Fields::new()
        .field("quantity", &line.quantity, [zero_or_positive()])
        .tree(
            "item",
            Fields::new().field("price", &line.item.price, [zero_or_positive()]).finish(),
        )
        .finish()
}

/// Advances and the amount due may not add up to more than the payable.
fn validate_totals(totals: &Totals) -> Result<(), ErrorTree> {
    let advances = totals.advances.unwrap_or_default();
    let due = totals.due.unwrap_or_default();
    Fields::new()
        .field("advances", &totals.advances, [max(totals.payable - due)])
        .field("due", &totals.due, [max(totals.payable - advances)])
        .finish()
}

fn not_after<'r>(limit: Option<NaiveDate>) -> Rule<'r, Option<NaiveDate>> {
    by(move |date: &Option<NaiveDate>| match (date, limit) {
        (Some(d), Some(l)) if *d > l => Err(Fault::from(Issue::invalid("too late"))),
        _ => Ok(()),
    })
}
