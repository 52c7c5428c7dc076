use crate::bill::Invoice;
use crate::l10n::CountryCode;
use crate::org::Party;
use crate::rules::{ErrorTree, Fields, Rule, by, is_in, required, skip, when};
use crate::tax::{Identity, require_identity_code};

use super::zones::ZONES_FORAL;

pub(super) fn validate_invoice(inv: &Invoice) -> Result<(), ErrorTree> {
    let foral = inv
        .supplier
        .tax_id
        .as_ref()
        .is_some_and(|id| ZONES_FORAL.contains(&id.zone.as_str()));
    let mut fields = Fields::new();
    if !inv.currency.is_empty() {
        fields.field("currency", &inv.currency, [is_in(vec!["EUR".to_string()])]);
    }
    fields
        .field(
            "preceding",
            &inv.preceding,
            [when(foral && inv.kind.is_correction(), vec![required()])],
        )
        .nested("supplier", &inv.supplier, [], validate_supplier);
    if let Some(customer) = &inv.customer {
        fields.nested("customer", customer, [], validate_customer);
    }
    fields.finish()
}

fn validate_supplier(party: &Party) -> Result<(), ErrorTree> {
    Fields::new()
        .field("tax_id", &party.tax_id, [required(), identity_code()])
        .finish()
}

/// Spanish customers must be identified by code; foreign ones may give
/// just their country.
fn validate_customer(party: &Party) -> Result<(), ErrorTree> {
    let Some(id) = &party.tax_id else {
        return Ok(());
    };
    let spanish = id.country.same_country(&CountryCode::new("ES"));
    Fields::new()
        .field("tax_id", &party.tax_id, [if spanish { identity_code() } else { skip() }])
        .finish()
}

fn identity_code<'r>() -> Rule<'r, Option<Identity>> {
    by(|id: &Option<Identity>| match id {
        Some(id) => crate::rules::check(id, [require_identity_code()]),
        None => Ok(()),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::bill::InvoiceType;

    fn invoice() -> Invoice {
        Invoice::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            Party::new("Provide One S.L.").tax_id("ES", "B98602642"),
        )
        .currency("EUR")
    }

    #[test]
    fn accepts_basic_invoice() {
        assert!(validate_invoice(&invoice()).is_ok());
    }

    #[test]
    fn euro_only() {
        let err = validate_invoice(&invoice().currency("USD")).unwrap_err();
        assert!(err.get("currency").is_some());
    }

    #[test]
    fn supplier_needs_code() {
        let mut inv = invoice();
        inv.supplier.tax_id = Some(Identity::new("ES", ""));
        let err = validate_invoice(&inv).unwrap_err();
        assert_eq!(err.to_string(), "supplier: (tax_id: (code: cannot be blank.).).");

        inv.supplier.tax_id = None;
        assert!(validate_invoice(&inv).is_err());
    }

    #[test]
    fn customer_code_only_for_spanish_ids() {
        let inv = invoice().customer(Party::new("Foreign").tax_id("PT", ""));
        assert!(validate_invoice(&inv).is_ok());
        let inv = invoice().customer(Party::new("Local").tax_id("ES", ""));
        assert!(validate_invoice(&inv).is_err());
        let inv = invoice().customer(Party::new("Consumer"));
        assert!(validate_invoice(&inv).is_ok());
    }

    #[test]
    fn foral_corrections_need_preceding() {
        let mut inv = invoice().kind(InvoiceType::CreditNote);
        if let Some(id) = &mut inv.supplier.tax_id {
            id.zone = crate::cbc::Code::new("BI");
        }
        let err = validate_invoice(&inv).unwrap_err();
        assert!(err.get("preceding").is_some());
    }
}
