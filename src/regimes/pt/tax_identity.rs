//! Portuguese NIF.

use std::sync::LazyLock;

use regex::Regex;

use crate::rules::ErrorTree;
use crate::tax::{Identity, IdentityCodeError, validate_identity_code};

static NIF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9}$").expect("nif regex is valid"));

/// Leading digits assigned to individuals, companies and public bodies.
const VALID_PREFIXES: &[&str] = &[
    "1", "2", "3", "5", "6", "8", "45", "70", "71", "72", "74", "75", "77", "78", "79", "90",
    "91", "98", "99",
];

pub(super) fn validate_tax_identity(id: &Identity) -> Result<(), ErrorTree> {
    validate_identity_code(id, check_code)
}

/// Nine digits with a known prefix; the last one is a mod 11 check over
/// the first eight weighted 9 down to 2.
pub fn check_code(code: &str) -> Result<(), IdentityCodeError> {
    if !NIF.is_match(code) {
        return Err(IdentityCodeError::Format);
    }
    if !VALID_PREFIXES.iter().any(|p| code.starts_with(p)) {
        return Err(IdentityCodeError::UnknownType);
    }
    let digits: Vec<u32> = code.chars().filter_map(|c| c.to_digit(10)).collect();
    let sum: u32 = digits[..8].iter().zip((2..=9).rev()).map(|(d, w)| d * w).sum();
    let expected = match sum % 11 {
        0 | 1 => 0,
        r => 11 - r,
    };
    if digits[8] == expected {
        Ok(())
    } else {
        Err(IdentityCodeError::Checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        for code in ["545259045", "501442600", "123456789"] {
            assert_eq!(check_code(code), Ok(()), "{code}");
        }
    }

    #[test]
    fn invalid_codes() {
        assert_eq!(check_code("545259046"), Err(IdentityCodeError::Checksum));
        assert_eq!(check_code("420000000"), Err(IdentityCodeError::UnknownType));
        assert_eq!(check_code("12345678"), Err(IdentityCodeError::Format));
        assert_eq!(check_code("A12345678"), Err(IdentityCodeError::Format));
    }

    #[test]
    fn reports_under_code() {
        let err = validate_tax_identity(&Identity::new("PT", "545259046")).unwrap_err();
        assert!(err.get("code").is_some());
    }
}
