//! Rewrites of invoices written against older Portuguese conventions.

use crate::bill::Invoice;
use crate::cbc::{Code, Key};
use crate::tax::keys::KEY_EXEMPT;
use crate::tax::{CATEGORY_VAT, Combo};

use super::EXT_KEY_REGION;
use super::exemptions::{EXEMPTIONS, EXT_KEY_EXEMPTION};
use super::zones::region_for_zone;

fn combos_mut(inv: &mut Invoice) -> impl Iterator<Item = &mut Combo> {
    let lines = inv.lines.iter_mut().flat_map(|l| l.taxes.iter_mut());
    let discounts = inv.discounts.iter_mut().flat_map(|d| d.taxes.iter_mut());
    let charges = inv.charges.iter_mut().flat_map(|c| c.taxes.iter_mut());
    lines.chain(discounts).chain(charges)
}

/// Exempt rate keys such as `exempt+internal-operations` become the
/// `exempt` key with the matching AT exemption code.
pub(super) fn migrate_exempt_rates(inv: &mut Invoice) {
    for combo in combos_mut(inv) {
        if !combo.is_category(CATEGORY_VAT) || !combo.rate.has_prefix(&Key::new(KEY_EXEMPT)) {
            continue;
        }
        if let Some(ex) = EXEMPTIONS.iter().find(|e| combo.rate.as_str() == e.rate) {
            combo.key = Key::new(KEY_EXEMPT);
            combo.rate = Key::empty();
            combo.percent = None;
            combo.ext.set(EXT_KEY_EXEMPTION, ex.code);
        }
    }
}

/// The supplier's tax identity zone used to pick the regional rates; it
/// now travels as an extension on each line's VAT combo.
pub(super) fn migrate_identity_zone(inv: &mut Invoice) {
    let Some(id) = inv.supplier.tax_id.as_mut() else {
        return;
    };
    if id.zone.is_empty() {
        return;
    }
    let region = region_for_zone(id.zone.as_str());
    id.zone = Code::empty();
    for line in &mut inv.lines {
        if let Some(vat) = line.combo_mut(CATEGORY_VAT) {
            vat.ext.set(EXT_KEY_REGION, region);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::{Discount, Line};
    use crate::org::{Item, Party};

    fn invoice(rate: &str) -> Invoice {
        Invoice::new(
            "1",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            Party::new("Fornecedor").tax_id("PT", "545259045"),
        )
        .line(Line::new(dec!(1), Item::new("Serviço", dec!(10))).tax(Combo::new("VAT").rate(rate)))
        .discount(Discount::new("Promo", dec!(1)).tax(Combo::new("VAT").rate(rate)))
    }

    #[test]
    fn exempt_rates_to_codes() {
        let mut inv = invoice("exempt+internal-operations");
        migrate_exempt_rates(&mut inv);
        let vat = inv.lines[0].combo("VAT").unwrap();
        assert_eq!(vat.key.as_str(), "exempt");
        assert!(vat.rate.is_empty());
        assert!(vat.ext.is(EXT_KEY_EXEMPTION, "M07"));
        assert!(inv.discounts[0].taxes[0].ext.is(EXT_KEY_EXEMPTION, "M07"));

        let mut inv = invoice("exempt+reverse-charge+gold");
        migrate_exempt_rates(&mut inv);
        assert!(inv.lines[0].taxes[0].ext.is(EXT_KEY_EXEMPTION, "M43"));
    }

    #[test]
    fn other_rates_untouched() {
        let mut inv = invoice("exempt+unknown");
        migrate_exempt_rates(&mut inv);
        assert_eq!(inv.lines[0].taxes[0].rate.as_str(), "exempt+unknown");
        assert!(inv.lines[0].taxes[0].ext.is_empty());

        let mut inv = invoice("reduced");
        migrate_exempt_rates(&mut inv);
        assert_eq!(inv.lines[0].taxes[0].rate.as_str(), "reduced");
    }

    #[test]
    fn identity_zone_to_region() {
        let mut inv = invoice("general");
        inv.supplier.tax_id.as_mut().unwrap().zone = Code::new("30");
        migrate_identity_zone(&mut inv);
        assert!(inv.supplier.tax_id.as_ref().unwrap().zone.is_empty());
        assert!(inv.lines[0].taxes[0].ext.is(EXT_KEY_REGION, "PT-MA"));
        assert!(inv.discounts[0].taxes[0].ext.is_empty());
    }
}
