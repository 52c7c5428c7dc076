use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::bill::Invoice;
use crate::cbc::Code;
use crate::core::ErrorKind;
use crate::org::{ITEM_KEY_GOODS, ITEM_KEY_SERVICES, Item};
use crate::pay::{self, Instructions};
use crate::rules::{ErrorTree, Fault, Fields, Issue, by, each_validate, required, zero_or_positive};
use crate::tax::{CATEGORY_VAT, Extensions, KeyMap, KeyScope, ext_requires};

use super::*;

static FULL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^ ]+ [^/^ ]+/[0-9]+$").expect("full code regex is valid"));
static SERIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^ ]+ [^/^ ]+$").expect("series regex is valid"));
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("code regex is valid"));
static SOURCE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^ ]+)(?:M|D ([^ ]+)) [^/^ ]+/[$0-9]+$").expect("source ref regex is valid")
});

const UNIT_SERVICE: &str = "service";
const UNIT_DEFAULT: &str = "item";

pub(super) static PAYMENT_MEANS: LazyLock<KeyMap> = LazyLock::new(|| {
    KeyMap::new(
        KeyScope::PaymentMeans,
        EXT_KEY_PAYMENT_MEANS,
        &[
            (pay::MEANS_KEY_CASH, "NU"),
            (pay::MEANS_KEY_CARD, "CC"),
            (pay::MEANS_KEY_CHEQUE, "CH"),
            (pay::MEANS_KEY_CREDIT_TRANSFER, "TB"),
            (pay::MEANS_KEY_DEBIT_TRANSFER, "TB"),
            (pay::MEANS_KEY_DIRECT_DEBIT, "TB"),
            (pay::MEANS_KEY_PROMISSORY_NOTE, "LC"),
            (pay::MEANS_KEY_ONLINE, "DE"),
            (pay::MEANS_KEY_NETTING, "CS"),
            (pay::MEANS_KEY_OTHER, "OU"),
        ],
    )
});

pub(super) fn normalize_invoice(inv: &mut Invoice) {
    inv.tax
        .get_or_insert_with(Default::default)
        .ext
        .set_if_empty(EXT_KEY_SOURCE, SOURCE_PRODUCED);
    let issue_date = inv.issue_date;
    if let Some(payment) = &mut inv.payment {
        for adv in &mut payment.advances {
            if adv.date.is_none() {
                adv.date = issue_date;
            }
        }
    }
}

/// Product type from the item key, else from its unit: anything but a
/// service unit counts as goods.
pub(super) fn normalize_item(item: &mut Item) {
    if !item.ext.has(EXT_KEY_PRODUCT_TYPE) {
        let code = match item.key.as_str() {
            ITEM_KEY_GOODS => PRODUCT_TYPE_GOODS,
            ITEM_KEY_SERVICES => PRODUCT_TYPE_SERVICE,
            _ if item.unit.is_empty() || item.unit == UNIT_SERVICE => PRODUCT_TYPE_SERVICE,
            _ => PRODUCT_TYPE_GOODS,
        };
        item.ext.set(EXT_KEY_PRODUCT_TYPE, code);
    }
    if item.unit.is_empty() {
        item.unit = UNIT_DEFAULT.to_string();
    }
}

pub(super) fn normalize_instructions(instr: &mut Instructions) {
    if let Some(code) = PAYMENT_MEANS.code_for(&instr.key) {
        instr.ext.set_if_empty(EXT_KEY_PAYMENT_MEANS, code.clone());
    }
}

pub(super) fn validate_item(item: &Item) -> Result<(), ErrorTree> {
    Fields::new()
        .field("unit", &item.unit, [required()])
        .field("ext", &item.ext, [ext_requires(&[EXT_KEY_PRODUCT_TYPE])])
        .finish()
}

/// SAF-T document type: the invoice type, or the work type for
/// documents that are not invoices.
fn doc_type(inv: &Invoice) -> Option<&Code> {
    let ext = inv.tax.as_ref().map(|t| &t.ext)?;
    ext.get(EXT_KEY_INVOICE_TYPE).or_else(|| ext.get(EXT_KEY_WORK_TYPE))
}

pub(super) fn validate_invoice(inv: &Invoice) -> Result<(), ErrorTree> {
    let dt = doc_type(inv).map(Code::as_str);
    let empty = Extensions::new();
    let ext = inv.tax.as_ref().map_or(&empty, |t| &t.ext);

    let mut f = Fields::new();
    f.tree("tax", Fields::new().field("ext", ext, [by(validate_tax_ext(dt))]).finish())
        .field("series", &inv.series, [by(|s: &Code| series_format(s, dt))])
        .field("code", &inv.code, [by(|c: &Code| code_format(c, &inv.series, dt))])
        .tree(
            "lines",
            each_validate(&inv.lines, |line| {
                if line.combo(CATEGORY_VAT).is_some() {
                    Ok(())
                } else {
                    Err(ErrorTree::new().with("taxes", Issue::new(ErrorKind::Required, "missing category VAT")))
                }
            }),
        );
    if inv.preceding.len() > 1 {
        f.fault("preceding", Issue::invalid("the length must be no more than 1"));
    }
    if let Some(payment) = &inv.payment {
        f.tree(
            "payment",
            Fields::new()
                .tree(
                    "advances",
                    each_validate(&payment.advances, |adv| {
                        Fields::new().field("date", &adv.date, [required()]).finish()
                    }),
                )
                .finish(),
        );
    }
    if let Some(totals) = &inv.totals {
        let receipt = dt == Some(INVOICE_TYPE_INVOICE_RECEIPT);
        let mut t = Fields::new();
        t.field("payable", &totals.payable, [zero_or_positive()]);
        if receipt && totals.due.is_some_and(|d| !d.is_zero()) {
            t.fault("due", Issue::invalid(format!("must be equal to {}", Decimal::ZERO)));
        }
        f.tree("totals", t.finish());
    }
    f.finish()
}

fn validate_tax_ext(dt: Option<&str>) -> impl Fn(&Extensions) -> Result<(), Fault> + '_ {
    move |ext: &Extensions| {
        let msg = format!("either `{EXT_KEY_WORK_TYPE}` or `{EXT_KEY_INVOICE_TYPE}` must be set");
        match (ext.has(EXT_KEY_WORK_TYPE), ext.has(EXT_KEY_INVOICE_TYPE)) {
            (false, false) => return Err(Issue::invalid(msg).into()),
            (true, true) => return Err(Issue::invalid(format!("{msg}, but not both")).into()),
            _ => {}
        }
        let mut tree = ErrorTree::new();
        if !ext.has(EXT_KEY_SOURCE) {
            tree.insert(EXT_KEY_SOURCE, Issue::required());
        } else if !ext.is(EXT_KEY_SOURCE, SOURCE_PRODUCED) && !ext.has(EXT_KEY_SOURCE_REF) {
            tree.insert(EXT_KEY_SOURCE_REF, Issue::required());
        }
        if let (true, Some(dt)) = (ext.is(EXT_KEY_SOURCE, SOURCE_MANUAL), dt) {
            if let Some(r) = ext.get(EXT_KEY_SOURCE_REF) {
                if let Err(msg) = source_ref_format(r.as_str(), dt) {
                    tree.insert(EXT_KEY_SOURCE_REF, Issue::new(ErrorKind::InvalidFormat, msg));
                }
            }
        }
        tree.into_result().map_err(Into::into)
    }
}

/// Manual documents point at the paper original, e.g. `FTM abc/00001`
/// or `FTD FT SERIESA/123`.
fn source_ref_format(r: &str, dt: &str) -> Result<(), String> {
    let caps = SOURCE_REF.captures(r).ok_or_else(|| "must be in valid format".to_string())?;
    if &caps[1] != dt {
        return Err(format!("must start with the document type '{dt}' not '{}'", &caps[1]));
    }
    if let Some(orig) = caps.get(2) {
        if orig.as_str() != dt {
            return Err(format!("must refer to an original document '{dt}' not '{}'", orig.as_str()));
        }
    }
    Ok(())
}

fn prefixed(value: &Code, dt: Option<&str>) -> Result<(), Fault> {
    match dt {
        Some(dt) if !value.as_str().starts_with(&format!("{dt} ")) => {
            Err(Issue::new(ErrorKind::InvalidFormat, format!("must start with '{dt} '")).into())
        }
        _ => Ok(()),
    }
}

fn invalid_format() -> Fault {
    Issue::format().into()
}

/// The series carries the document type, e.g. `FT SERIES-A`.
fn series_format(series: &Code, dt: Option<&str>) -> Result<(), Fault> {
    if series.is_empty() {
        return Ok(());
    }
    prefixed(series, dt)?;
    if SERIES.is_match(series.as_str()) { Ok(()) } else { Err(invalid_format()) }
}

/// A plain number after a series, otherwise the full `FT SERIES-A/123`.
fn code_format(code: &Code, series: &Code, dt: Option<&str>) -> Result<(), Fault> {
    if code.is_empty() {
        return Ok(());
    }
    if !series.is_empty() {
        return if CODE.is_match(code.as_str()) { Ok(()) } else { Err(invalid_format()) };
    }
    prefixed(code, dt)?;
    if FULL_CODE.is_match(code.as_str()) { Ok(()) } else { Err(invalid_format()) }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::{Line, Totals};
    use crate::org::{DocumentRef, Party};
    use crate::pay::{Advance, PaymentDetails};
    use crate::tax::Combo;

    fn invoice() -> Invoice {
        Invoice::new("FT SERIES-A/123", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Party::new("S"))
            .tax_ext(EXT_KEY_INVOICE_TYPE, "FT")
            .tax_ext(EXT_KEY_SOURCE, "P")
            .line(Line::new(dec!(1), Item::new("Item", dec!(10))).tax(Combo::new("VAT").rate("general")))
    }

    #[test]
    fn valid_invoice() {
        assert!(validate_invoice(&invoice()).is_ok());
    }

    #[test]
    fn doc_type_required() {
        let mut inv = invoice();
        inv.tax = None;
        let err = validate_invoice(&inv).unwrap_err();
        assert_eq!(
            err.to_string(),
            "tax: (ext: either `pt-saft-work-type` or `pt-saft-invoice-type` must be set.)."
        );

        let inv = invoice().tax_ext(EXT_KEY_WORK_TYPE, "PF");
        let err = validate_invoice(&inv).unwrap_err();
        assert!(err.to_string().contains("must be set, but not both"));
    }

    #[test]
    fn source_billing() {
        let mut inv = invoice();
        inv.tax.as_mut().unwrap().ext.delete(EXT_KEY_SOURCE);
        let err = validate_invoice(&inv).unwrap_err();
        assert_eq!(err.to_string(), "tax: (ext: (pt-saft-source: required.).).");

        let inv = invoice().tax_ext(EXT_KEY_SOURCE, "I");
        let err = validate_invoice(&inv).unwrap_err();
        assert_eq!(err.to_string(), "tax: (ext: (pt-saft-source-ref: required.).).");

        let inv = invoice().tax_ext(EXT_KEY_SOURCE, "M").tax_ext(EXT_KEY_SOURCE_REF, "FTM abc/00001");
        assert!(validate_invoice(&inv).is_ok());
        let inv = invoice().tax_ext(EXT_KEY_SOURCE, "M").tax_ext(EXT_KEY_SOURCE_REF, "FSM abc/00001");
        let err = validate_invoice(&inv).unwrap_err();
        assert!(err.to_string().contains("must start with the document type 'FT' not 'FS'"));
        let inv = invoice().tax_ext(EXT_KEY_SOURCE, "M").tax_ext(EXT_KEY_SOURCE_REF, "FTD FS SERIES/1");
        let err = validate_invoice(&inv).unwrap_err();
        assert!(err.to_string().contains("must refer to an original document 'FT' not 'FS'"));
    }

    #[test]
    fn series_and_code() {
        let inv = invoice().series("FT SERIES-A");
        let mut inv = inv;
        inv.code = Code::new("123");
        assert!(validate_invoice(&inv).is_ok());

        inv.code = Code::new("A123");
        assert_eq!(validate_invoice(&inv).unwrap_err().to_string(), "code: must be in a valid format.");

        let mut inv = invoice().series("FS SERIES-A");
        inv.code = Code::new("1");
        assert_eq!(validate_invoice(&inv).unwrap_err().to_string(), "series: must start with 'FT '.");

        let mut inv = invoice();
        inv.code = Code::new("FT SERIES-A");
        assert_eq!(validate_invoice(&inv).unwrap_err().to_string(), "code: must be in a valid format.");
    }

    #[test]
    fn lines_need_vat() {
        let mut inv = invoice();
        inv.lines[0].taxes.clear();
        let err = validate_invoice(&inv).unwrap_err();
        assert_eq!(err.to_string(), "lines: (0: (taxes: missing category VAT.).).");
    }

    #[test]
    fn receipts_and_totals() {
        let mut inv = invoice().tax_ext(EXT_KEY_INVOICE_TYPE, "FR");
        inv.code = Code::new("FR SERIES-A/1");
        inv.totals = Some(Totals {
            payable: dec!(10),
            due: Some(dec!(5)),
            ..Default::default()
        });
        let err = validate_invoice(&inv).unwrap_err();
        assert_eq!(err.to_string(), "totals: (due: must be equal to 0.).");

        let mut inv = invoice();
        inv.totals = Some(Totals {
            payable: dec!(-1),
            ..Default::default()
        });
        let err = validate_invoice(&inv).unwrap_err();
        assert_eq!(err.to_string(), "totals: (payable: must be no less than 0.).");
    }

    #[test]
    fn one_preceding_at_most() {
        let inv = invoice().preceding(DocumentRef::new("1")).preceding(DocumentRef::new("2"));
        let err = validate_invoice(&inv).unwrap_err();
        assert_eq!(err.to_string(), "preceding: the length must be no more than 1.");
    }

    #[test]
    fn advances_dated() {
        let mut inv = invoice().payment(PaymentDetails {
            advances: vec![Advance::new("Deposit", dec!(5))],
            ..Default::default()
        });
        let err = validate_invoice(&inv).unwrap_err();
        assert!(err.at("payment.advances.0.date").is_some());

        normalize_invoice(&mut inv);
        assert_eq!(inv.payment.as_ref().unwrap().advances[0].date, inv.issue_date);
        assert!(validate_invoice(&inv).is_ok());
    }

    #[test]
    fn source_default() {
        let mut inv = invoice();
        inv.tax = None;
        normalize_invoice(&mut inv);
        assert!(inv.tax.unwrap().ext.is(EXT_KEY_SOURCE, "P"));

        let mut inv = invoice().tax_ext(EXT_KEY_SOURCE, "I");
        normalize_invoice(&mut inv);
        assert!(inv.tax.unwrap().ext.is(EXT_KEY_SOURCE, "I"));
    }

    #[test]
    fn items() {
        let cases = [
            (Item::new("A", dec!(1)).key("goods"), "P"),
            (Item::new("A", dec!(1)).key("services").unit("kg"), "S"),
            (Item::new("A", dec!(1)), "S"),
            (Item::new("A", dec!(1)).unit("kg"), "P"),
            (Item::new("A", dec!(1)).unit("service"), "S"),
            (Item::new("A", dec!(1)).ext(EXT_KEY_PRODUCT_TYPE, "E"), "E"),
        ];
        for (mut item, code) in cases {
            normalize_item(&mut item);
            assert!(item.ext.is(EXT_KEY_PRODUCT_TYPE, code), "{}", item.unit);
            assert!(validate_item(&item).is_ok());
        }
        let mut item = Item::new("A", dec!(1));
        normalize_item(&mut item);
        assert_eq!(item.unit, "item");

        let err = validate_item(&Item::new("A", dec!(1))).unwrap_err();
        assert_eq!(err.to_string(), "unit: cannot be blank; ext: (pt-saft-product-type: required.).");
    }

    #[test]
    fn payment_means() {
        let mut instr = Instructions::new("credit-transfer+sepa");
        normalize_instructions(&mut instr);
        assert!(instr.ext.is(EXT_KEY_PAYMENT_MEANS, "TB"));
        let mut instr = Instructions::new("cash");
        normalize_instructions(&mut instr);
        assert!(instr.ext.is(EXT_KEY_PAYMENT_MEANS, "NU"));
        let mut instr = Instructions::new("cash");
        instr.ext.set(EXT_KEY_PAYMENT_MEANS, "MB");
        normalize_instructions(&mut instr);
        assert!(instr.ext.is(EXT_KEY_PAYMENT_MEANS, "MB"));
    }
}
