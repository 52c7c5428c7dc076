//! Spanish tax identity codes: DNI, NIE and CIF/NIF.

use std::sync::LazyLock;

use regex::Regex;

use crate::cbc::Code;
use crate::rules::ErrorTree;
use crate::tax::{Identity, IdentityCodeError, validate_identity_code};

const CHECK_LETTERS: &[u8] = b"TRWAGMYFPDXBNJZSQVHLCKE";
const FOREIGNER_TYPE_LETTERS: &str = "XYZ";
const ORG_CHECK_LETTERS: &str = "JABCDEFGHI";

static NATIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>[0-9]{8})(?P<check>[TRWAGMYFPDXBNJZSQVHLCKE])$")
        .expect("national regex is valid")
});
static FOREIGNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[XYZ])(?P<number>[0-9]{7})(?P<check>[TRWAGMYFPDXBNJZSQVHLCKE])$")
        .expect("foreigner regex is valid")
});
static OTHER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[KLM])(?P<number>[0-9]{7})(?P<check>[0-9JABCDEFGHI])$")
        .expect("other regex is valid")
});
static ORG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[ABCDEFGHJNPQRSUVW])(?P<number>[0-9]{7})(?P<check>[0-9JABCDEFGHI])$")
        .expect("org regex is valid")
});

/// Kind of Spanish tax code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdentityType {
    /// DNI of a Spanish national.
    National,
    /// NIE of a resident foreigner.
    Foreigner,
    /// CIF of a company or other legal entity.
    Org,
    /// Codes issued to non-residents and minors.
    Other,
    Unknown,
}

impl TaxIdentityType {
    pub fn as_str(self) -> &'static str {
        match self {
            TaxIdentityType::National => "national",
            TaxIdentityType::Foreigner => "foreigner",
            TaxIdentityType::Org => "org",
            TaxIdentityType::Other => "other",
            TaxIdentityType::Unknown => "unknown",
        }
    }
}

/// Classify an already normalized code. Organisation patterns are tried
/// first.
pub fn tax_identity_type(code: &str) -> TaxIdentityType {
    if ORG.is_match(code) {
        TaxIdentityType::Org
    } else if NATIONAL.is_match(code) {
        TaxIdentityType::National
    } else if FOREIGNER.is_match(code) {
        TaxIdentityType::Foreigner
    } else if OTHER.is_match(code) {
        TaxIdentityType::Other
    } else {
        TaxIdentityType::Unknown
    }
}

/// Codes starting with a digit lost their leading zeros somewhere; pad
/// them back to nine characters.
pub(super) fn normalize_tax_identity(id: &mut Identity) {
    let code = id.code.as_str();
    if code.starts_with(|c: char| c.is_ascii_digit()) && code.len() < 9 {
        id.code = Code::new(format!("{code:0>9}"));
    }
}

pub(super) fn validate_tax_identity(id: &Identity) -> Result<(), ErrorTree> {
    validate_identity_code(id, check_code)
}

/// Verify the check character of a Spanish tax code.
pub fn check_code(code: &str) -> Result<(), IdentityCodeError> {
    match tax_identity_type(code) {
        TaxIdentityType::National => verify_national(code),
        TaxIdentityType::Foreigner => verify_foreigner(code),
        TaxIdentityType::Org => verify_org(&ORG, code),
        TaxIdentityType::Other => verify_org(&OTHER, code),
        TaxIdentityType::Unknown => Err(IdentityCodeError::UnknownType),
    }
}

fn verify_national(code: &str) -> Result<(), IdentityCodeError> {
    let caps = NATIONAL.captures(code).ok_or(IdentityCodeError::Format)?;
    let number = &caps["number"];
    if number == "00000000" {
        return Err(IdentityCodeError::Format);
    }
    letter_matches(number, &caps["check"])
}

fn verify_foreigner(code: &str) -> Result<(), IdentityCodeError> {
    let caps = FOREIGNER.captures(code).ok_or(IdentityCodeError::Format)?;
    let prefix = FOREIGNER_TYPE_LETTERS.find(&caps["type"]).ok_or(IdentityCodeError::Format)?;
    letter_matches(&format!("{prefix}{}", &caps["number"]), &caps["check"])
}

fn letter_matches(number: &str, check: &str) -> Result<(), IdentityCodeError> {
    let n: u64 = number.parse().map_err(|_| IdentityCodeError::Format)?;
    let expected = CHECK_LETTERS[(n % 23) as usize];
    if check.as_bytes().first() == Some(&expected) {
        Ok(())
    } else {
        Err(IdentityCodeError::Checksum)
    }
}

/// Organisation check: digits in odd positions are doubled (summing the
/// digits of the product), the check is the complement to ten of the
/// total. It may be written as a digit or as a letter of `JABCDEFGHI`.
fn verify_org(re: &Regex, code: &str) -> Result<(), IdentityCodeError> {
    let caps = re.captures(code).ok_or(IdentityCodeError::Format)?;
    let mut sum = 0u32;
    for (i, c) in caps["number"].chars().enumerate() {
        let d = c.to_digit(10).ok_or(IdentityCodeError::Format)?;
        sum += if i % 2 == 0 {
            let v = d * 2;
            if v > 9 { v - 9 } else { v }
        } else {
            d
        };
    }
    let expected = (10 - sum % 10) % 10;
    let check = &caps["check"];
    let given = match ORG_CHECK_LETTERS.find(check) {
        Some(i) => i as u32,
        None => check.parse().map_err(|_| IdentityCodeError::Format)?,
    };
    if given == expected { Ok(()) } else { Err(IdentityCodeError::Checksum) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(tax_identity_type("B98602642"), TaxIdentityType::Org);
        assert_eq!(tax_identity_type("54387763P"), TaxIdentityType::National);
        assert_eq!(tax_identity_type("X1234567L"), TaxIdentityType::Foreigner);
        assert_eq!(tax_identity_type("K1234567J"), TaxIdentityType::Other);
        assert_eq!(tax_identity_type("1234"), TaxIdentityType::Unknown);
    }

    #[test]
    fn valid_codes() {
        for code in ["B98602642", "54387763P", "X1234567L", "Y1234567X", "Q2826000H", "A58818501"] {
            assert_eq!(check_code(code), Ok(()), "{code}");
        }
    }

    #[test]
    fn bad_check() {
        assert_eq!(check_code("B98602643"), Err(IdentityCodeError::Checksum));
        assert_eq!(check_code("54387763T"), Err(IdentityCodeError::Checksum));
        assert_eq!(check_code("X1234567T"), Err(IdentityCodeError::Checksum));
    }

    #[test]
    fn bad_format() {
        assert_eq!(check_code("00000000T"), Err(IdentityCodeError::Format));
    }

    #[test]
    fn unknown_type() {
        assert_eq!(check_code("I1234567A"), Err(IdentityCodeError::UnknownType));
        assert_eq!(check_code("123"), Err(IdentityCodeError::UnknownType));
        assert_eq!(check_code("Q123"), Err(IdentityCodeError::UnknownType));

        let err = validate_tax_identity(&Identity::new("ES", "Q123")).unwrap_err();
        assert!(err.has_kind(crate::core::ErrorKind::UnknownType));
        assert!(!err.has_kind(crate::core::ErrorKind::InvalidFormat));
    }

    #[test]
    fn pads_numeric_codes() {
        let mut id = Identity::new("ES", "4387763P");
        normalize_tax_identity(&mut id);
        assert_eq!(id.code.as_str(), "04387763P");

        let mut id = Identity::new("ES", "B98602642");
        normalize_tax_identity(&mut id);
        assert_eq!(id.code.as_str(), "B98602642");
    }

    #[test]
    fn errors_under_code() {
        let err = validate_tax_identity(&Identity::new("ES", "B98602643")).unwrap_err();
        assert!(err.get("code").is_some());
        assert!(validate_tax_identity(&Identity::new("ES", "")).is_ok());
    }
}
