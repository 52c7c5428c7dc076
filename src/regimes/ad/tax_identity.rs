//! Andorran NRT (Número de Registre Tributari).

use std::sync::LazyLock;

use regex::Regex;

use crate::rules::ErrorTree;
use crate::tax::{Identity, IdentityCodeError, validate_identity_code};

/// Leading letter for the kind of person, six digits and a control
/// letter.
static NRT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[AEFL][0-9]{6}[A-Z]$").expect("nrt regex is valid"));

pub(super) fn validate_tax_identity(id: &Identity) -> Result<(), ErrorTree> {
    validate_identity_code(id, check_code)
}

/// The control letter algorithm is not published; only the shape is
/// checked.
pub fn check_code(code: &str) -> Result<(), IdentityCodeError> {
    if NRT.is_match(code) { Ok(()) } else { Err(IdentityCodeError::Format) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes() {
        for code in ["L123456A", "F121212B", "A000001Z", "E654321K"] {
            assert_eq!(check_code(code), Ok(()), "{code}");
        }
        for code in ["X123456A", "L12345A", "L1234567A", "L123456", "l123456a"] {
            assert_eq!(check_code(code), Err(IdentityCodeError::Format), "{code}");
        }
    }
}
