//! Line and document totals.

use rust_decimal::Decimal;

use crate::tax::{RegimeDef, Total, round};

use super::{Invoice, Totals};

/// Computes line sums and document totals.
pub trait Calculator {
    fn calculate(&self, inv: &mut Invoice, regime: Option<&RegimeDef>);
}

/// Sums `quantity × price` per line, subtracts line discounts, adds line
/// charges, then groups taxable bases by category and rate. Amounts are
/// rounded half away from zero to two decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCalculator;

fn percent_of(base: Decimal, percent: Decimal) -> Decimal {
    round(base * percent / Decimal::ONE_HUNDRED, 2)
}

impl Calculator for DefaultCalculator {
    fn calculate(&self, inv: &mut Invoice, regime: Option<&RegimeDef>) {
        for (i, line) in inv.lines.iter_mut().enumerate() {
            line.index = i + 1;
            let price = line.item.price.unwrap_or_default();
            let sum = round(line.quantity * price, 2);
            for d in &mut line.discounts {
                if let Some(p) = d.percent {
                    d.amount = percent_of(sum, p);
                }
            }
            for c in &mut line.charges {
                if let Some(p) = c.percent {
                    c.amount = percent_of(sum, p);
                }
            }
            let discounts: Decimal = line.discounts.iter().map(|d| d.amount).sum();
            let charges: Decimal = line.charges.iter().map(|c| c.amount).sum();
            line.sum = Some(sum);
            line.total = Some(round(sum - discounts + charges, 2));
        }

        let sum = round(inv.lines.iter().filter_map(|l| l.total).sum(), 2);

        for (i, d) in inv.discounts.iter_mut().enumerate() {
            d.index = i + 1;
            if let Some(p) = d.percent {
                d.amount = percent_of(sum, p);
            }
        }
        for (i, c) in inv.charges.iter_mut().enumerate() {
            c.index = i + 1;
            if let Some(p) = c.percent {
                c.amount = percent_of(sum, p);
            }
        }
        let discount: Decimal = inv.discounts.iter().map(|d| d.amount).sum();
        let charge: Decimal = inv.charges.iter().map(|c| c.amount).sum();
        let total = round(sum - discount + charge, 2);

        let retained = |code: &crate::cbc::Code| {
            regime.and_then(|r| r.category_def(code)).is_some_and(|cd| cd.retained)
        };
        let mut taxes = Total::default();
        for line in &inv.lines {
            let base = line.total.unwrap_or_default();
            for combo in &line.taxes {
                taxes.add(combo, base, retained(&combo.category));
            }
        }
        // document discounts reduce the base, charges increase it
        for d in &inv.discounts {
            for combo in &d.taxes {
                taxes.add(combo, -d.amount, retained(&combo.category));
            }
        }
        for c in &inv.charges {
            for combo in &c.taxes {
                taxes.add(combo, c.amount, retained(&combo.category));
            }
        }
        taxes.calculate();
        sort_breakdown(&mut taxes);

        let tax = taxes.sum;
        let total_with_tax = round(total + tax, 2);
        let advances: Option<Decimal> = inv
            .payment
            .as_ref()
            .filter(|p| !p.advances.is_empty())
            .map(|p| p.advances.iter().map(|a| a.amount).sum());

        inv.totals = Some(Totals {
            sum,
            discount: (!inv.discounts.is_empty()).then_some(discount),
            charge: (!inv.charges.is_empty()).then_some(charge),
            total,
            taxes,
            tax,
            total_with_tax,
            payable: total_with_tax,
            due: advances.map(|a| round(total_with_tax - a, 2)),
            advances,
        });
    }
}

/// Categories by code and rates by percent, descending, for stable
/// output.
fn sort_breakdown(taxes: &mut Total) {
    taxes.categories.sort_by(|a, b| a.code.cmp(&b.code));
    for cat in &mut taxes.categories {
        cat.rates.sort_by(|a, b| b.percent.cmp(&a.percent).then(a.key.cmp(&b.key)));
    }
}
