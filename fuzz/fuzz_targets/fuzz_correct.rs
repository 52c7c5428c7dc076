#![no_main]

use libfuzzer_sys::fuzz_target;
use tributa::CorrectionOptions;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(mut inv) = tributa::bill::Invoice::from_json(s) {
            tributa::calculate(&mut inv);
            for opts in [CorrectionOptions::credit(), CorrectionOptions::debit()] {
                let _ = tributa::correct(&inv, &opts);
                let _ = tributa::correct(&inv, &opts.clone().refund());
            }
        }
    }
});
