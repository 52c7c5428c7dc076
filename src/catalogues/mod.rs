//! Shared code lists that addons pull into scope.

pub mod cef;
pub mod untdid;

use crate::cbc::{Definition, I18n};
use crate::tax::CatalogueDef;

pub fn all() -> Vec<CatalogueDef> {
    vec![untdid::new(), cef::new()]
}

/// Extension definition listing `(code, english name)` pairs.
pub(crate) fn code_list(key: &str, name: I18n, desc: I18n, codes: &[(&str, &str)]) -> Definition {
    Definition::key(key, name)
        .desc(desc)
        .values(codes.iter().map(|(code, name)| Definition::code(*code, I18n::en(*name))).collect())
}
