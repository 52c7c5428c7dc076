#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;
use tributa::bill::{Invoice, Line};
use tributa::org::{Item, Party};
use tributa::tax::{Combo, Identity, normalize_identity};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut id = Identity::new("ES", s);
    normalize_identity(&mut id, &["EL"]);

    let Some(date) = NaiveDate::from_ymd_opt(2024, 6, 13) else {
        return;
    };
    for country in ["ES", "PT", "AD"] {
        let mut inv = Invoice::new("FUZZ-1", date, Party::new("Supplier").tax_id(country, s))
            .line(Line::new(Decimal::ONE, Item::new("Item", Decimal::TEN)).tax(Combo::new("VAT").rate("general")));
        tributa::calculate(&mut inv);
        let _ = tributa::validate(&inv);
    }
});
