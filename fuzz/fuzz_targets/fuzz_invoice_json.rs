#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(mut inv) = tributa::bill::Invoice::from_json(s) {
            tributa::calculate(&mut inv);
            let _ = tributa::validate(&inv);
            let _ = inv.to_json();
        }
    }
});
