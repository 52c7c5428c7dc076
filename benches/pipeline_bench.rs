use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use tributa::addons::{es_sii, es_verifactu, eu_en16931, pt_saft};
use tributa::bill::{Invoice, Line};
use tributa::org::{Address, Item, Party};
use tributa::tax::{Combo, Registry};
use tributa::{CorrectionOptions, calculate_with, correct_with, validate_with};

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn spanish_invoice(addon: &str, lines: usize) -> Invoice {
    let mut inv = Invoice::new(
        "BENCH-001",
        test_date(),
        Party::new("Provide One S.L.")
            .tax_id("ES", "B98602642")
            .address(Address::new("Calle Pradillo 42", "Madrid", "28002", "ES")),
    )
    .addon(addon)
    .customer(
        Party::new("Sample Consumer")
            .tax_id("ES", "54387763P")
            .address(Address::new("Calle Mayor 1", "Madrid", "28013", "ES")),
    );
    for i in 1..=lines {
        let rate = if i % 3 == 0 { "reduced" } else { "general" };
        inv = inv.line(
            Line::new(dec!(5), Item::new(&format!("Service item {i}"), dec!(120)))
                .tax(Combo::new("VAT").rate(rate)),
        );
    }
    inv
}

fn portuguese_invoice(lines: usize) -> Invoice {
    let mut inv = Invoice::new(
        "FT SERIES-A/123",
        test_date(),
        Party::new("Test Supplier").tax_id("PT", "545259045"),
    )
    .addon(pt_saft::KEY)
    .customer(Party::new("Test Customer").tax_id("PT", "514329874"));
    for i in 1..=lines {
        inv = inv.line(
            Line::new(dec!(2), Item::new(&format!("Item {i}"), dec!(9.99)).unit("kg"))
                .tax(Combo::new("VAT").rate("general")),
        );
    }
    inv
}

fn bench_registry(c: &mut Criterion) {
    c.bench_function("registry_builtin", |b| {
        b.iter(|| black_box(Registry::builtin()));
    });
}

fn bench_calculate(c: &mut Criterion) {
    let reg = Registry::builtin().unwrap();
    for (name, addon) in [
        ("calculate_sii_10_lines", es_sii::KEY),
        ("calculate_verifactu_10_lines", es_verifactu::KEY),
        ("calculate_en16931_10_lines", eu_en16931::KEY),
    ] {
        let invoice = spanish_invoice(addon, 10);
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut inv = invoice.clone();
                calculate_with(&reg, black_box(&mut inv));
                black_box(inv)
            });
        });
    }

    let invoice = portuguese_invoice(10);
    c.bench_function("calculate_saft_10_lines", |b| {
        b.iter(|| {
            let mut inv = invoice.clone();
            calculate_with(&reg, black_box(&mut inv));
            black_box(inv)
        });
    });
}

fn bench_validate(c: &mut Criterion) {
    let reg = Registry::builtin().unwrap();
    let mut invoice = spanish_invoice(es_sii::KEY, 10);
    calculate_with(&reg, &mut invoice);
    c.bench_function("validate_sii_10_lines", |b| {
        b.iter(|| black_box(validate_with(&reg, black_box(&invoice))));
    });

    // Missing customer and unpaid terms give a non-empty error tree.
    let mut invoice = spanish_invoice(eu_en16931::KEY, 10);
    invoice.customer = None;
    calculate_with(&reg, &mut invoice);
    c.bench_function("validate_en16931_with_errors", |b| {
        b.iter(|| black_box(validate_with(&reg, black_box(&invoice))));
    });
}

fn bench_correct(c: &mut Criterion) {
    let reg = Registry::builtin().unwrap();
    let mut invoice = spanish_invoice(es_sii::KEY, 10);
    calculate_with(&reg, &mut invoice);
    let opts = CorrectionOptions::credit().issue_date(test_date()).refund();
    c.bench_function("correct_sii_credit_note", |b| {
        b.iter(|| black_box(correct_with(&reg, black_box(&invoice), &opts)));
    });
}

fn bench_calculate_1000_lines(c: &mut Criterion) {
    let reg = Registry::builtin().unwrap();
    let invoice = portuguese_invoice(1000);
    c.bench_function("calculate_saft_1000_lines", |b| {
        b.iter(|| {
            let mut inv = invoice.clone();
            calculate_with(&reg, black_box(&mut inv));
            black_box(inv)
        });
    });
}

fn bench_json(c: &mut Criterion) {
    let reg = Registry::builtin().unwrap();
    let mut invoice = spanish_invoice(es_sii::KEY, 10);
    calculate_with(&reg, &mut invoice);
    let json = invoice.to_json().unwrap();
    c.bench_function("json_serialize", |b| {
        b.iter(|| black_box(black_box(&invoice).to_json()));
    });
    c.bench_function("json_parse", |b| {
        b.iter(|| black_box(Invoice::from_json(black_box(&json))));
    });
}

criterion_group!(
    benches,
    bench_registry,
    bench_calculate,
    bench_validate,
    bench_correct,
    bench_calculate_1000_lines,
    bench_json,
);
criterion_main!(benches);
