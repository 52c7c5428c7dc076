//! Composable validation rules.
//!
//! Rules are small boxed predicates over a value. A [`Fields`] collector
//! runs the rules of each named field in order, stopping at the first
//! failure or at a [`skip`] marker, and records failures under the field
//! name. Nested structures add their own trees through [`Fields::nested`].

use regex::Regex;
use rust_decimal::Decimal;

use super::tree::{ErrorTree, Fault, Issue};
use crate::core::ErrorKind;

type Check<'r, T> = Box<dyn Fn(&T) -> Result<(), Fault> + 'r>;

/// A single validation rule for values of type `T`.
pub enum Rule<'r, T: ?Sized> {
    Check(Check<'r, T>),
    /// Stop evaluating the remaining rules of the field, nested
    /// validation included.
    Skip,
}

impl<'r, T: ?Sized> Rule<'r, T> {
    pub fn new(f: impl Fn(&T) -> Result<(), Fault> + 'r) -> Self {
        Rule::Check(Box::new(f))
    }
}

/// Run `rules` against `value`. Returns the first failure and whether a
/// skip marker was reached.
fn run<'a, T: ?Sized>(value: &T, rules: impl IntoIterator<Item = Rule<'a, T>>) -> (Option<Fault>, bool) {
    for rule in rules {
        match rule {
            Rule::Skip => return (None, true),
            Rule::Check(f) => {
                if let Err(fault) = f(value) {
                    return (Some(fault), false);
                }
            }
        }
    }
    (None, false)
}

/// Apply rules to a standalone value.
pub fn check<'r, T: ?Sized>(value: &T, rules: impl IntoIterator<Item = Rule<'r, T>>) -> Result<(), Fault> {
    match run(value, rules).0 {
        Some(f) => Err(f),
        None => Ok(()),
    }
}

/// Collects per-field failures into an [`ErrorTree`].
#[derive(Debug, Default)]
pub struct Fields {
    tree: ErrorTree,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the rules for a named field.
    pub fn field<'r, T: ?Sized>(
        &mut self,
        name: &str,
        value: &T,
        rules: impl IntoIterator<Item = Rule<'r, T>>,
    ) -> &mut Self {
        if let (Some(fault), _) = run(value, rules) {
            self.tree.insert(name, fault);
        }
        self
    }

    /// Run the rules for a named field, then descend with `then` unless a
    /// rule failed or a skip marker was reached.
    pub fn nested<'r, T: ?Sized>(
        &mut self,
        name: &str,
        value: &T,
        rules: impl IntoIterator<Item = Rule<'r, T>>,
        then: impl FnOnce(&T) -> Result<(), ErrorTree>,
    ) -> &mut Self {
        match run(value, rules) {
            (Some(fault), _) => self.tree.insert(name, fault),
            (None, true) => {}
            (None, false) => {
                if let Err(t) = then(value) {
                    self.tree.insert(name, t);
                }
            }
        }
        self
    }

    /// Record a fault directly.
    pub fn fault(&mut self, name: &str, fault: impl Into<Fault>) -> &mut Self {
        self.tree.insert(name, fault);
        self
    }

    /// Record the outcome of a nested validation under `name`.
    pub fn tree(&mut self, name: &str, result: Result<(), ErrorTree>) -> &mut Self {
        if let Err(t) = result {
            self.tree.insert(name, t);
        }
        self
    }

    /// Merge a tree produced elsewhere at this level.
    pub fn merge(&mut self, tree: ErrorTree) -> &mut Self {
        self.tree.merge(tree);
        self
    }

    /// Merge the outcome of a validation at this level.
    pub fn merge_result(&mut self, result: Result<(), ErrorTree>) -> &mut Self {
        if let Err(t) = result {
            self.tree.merge(t);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ErrorTree> {
        std::mem::take(&mut self.tree).into_result()
    }
}

/// Validate every element of a list, producing index-keyed trees.
pub fn each_validate<T>(
    list: &[T],
    mut f: impl FnMut(&T) -> Result<(), ErrorTree>,
) -> Result<(), ErrorTree> {
    let mut tree = ErrorTree::new();
    for (i, item) in list.iter().enumerate() {
        if let Err(t) = f(item) {
            tree.insert(i.to_string(), t);
        }
    }
    tree.into_result()
}

/// Values that can be absent or blank.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        self.as_str().is_present()
    }
}

impl<T> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for Decimal {
    fn is_present(&self) -> bool {
        !self.is_zero()
    }
}

impl Presence for crate::cbc::Key {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for crate::cbc::Code {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for crate::l10n::CountryCode {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

/// Value must be present.
pub fn required<'r, T: Presence + ?Sized>() -> Rule<'r, T> {
    Rule::new(|v: &T| if v.is_present() { Ok(()) } else { Err(Issue::blank().into()) })
}

/// Value must be present; custom message.
pub fn required_msg<'r, T: Presence + ?Sized>(message: &'r str) -> Rule<'r, T> {
    Rule::new(move |v: &T| {
        if v.is_present() {
            Ok(())
        } else {
            Err(Issue::new(ErrorKind::Required, message).into())
        }
    })
}

/// Value must be absent or blank.
pub fn empty<'r, T: Presence + ?Sized>() -> Rule<'r, T> {
    Rule::new(|v: &T| {
        if v.is_present() {
            Err(Issue::invalid("must be blank").into())
        } else {
            Ok(())
        }
    })
}

/// Non-empty strings must match the regular expression.
pub fn matches<'r, T: AsRef<str> + ?Sized>(re: &'r Regex) -> Rule<'r, T> {
    Rule::new(move |v: &T| {
        let s = v.as_ref();
        if s.is_empty() || re.is_match(s) {
            Ok(())
        } else {
            Err(Issue::format().into())
        }
    })
}

/// Character count of non-empty strings must be within `min..=max`.
pub fn length<'r, T: AsRef<str> + ?Sized>(min: usize, max: usize) -> Rule<'r, T> {
    Rule::new(move |v: &T| {
        let n = v.as_ref().chars().count();
        if n == 0 || (min..=max).contains(&n) {
            return Ok(());
        }
        let message = if min == 0 {
            format!("the length must be no more than {max}")
        } else {
            format!("the length must be between {min} and {max}")
        };
        Err(Issue::new(ErrorKind::InvalidFormat, message).into())
    })
}

/// Value must be one of `allowed`.
pub fn is_in<'r, T: PartialEq + 'r>(allowed: Vec<T>) -> Rule<'r, T> {
    Rule::new(move |v: &T| {
        if allowed.contains(v) {
            Ok(())
        } else {
            Err(Issue::new(ErrorKind::InvalidEnum, "must be a valid value").into())
        }
    })
}

/// Value must not be one of `denied`.
pub fn not_in<'r, T: PartialEq + 'r>(denied: Vec<T>) -> Rule<'r, T> {
    Rule::new(move |v: &T| {
        if denied.contains(v) {
            Err(Issue::new(ErrorKind::InvalidEnum, "must not be in list").into())
        } else {
            Ok(())
        }
    })
}

/// Numeric values, possibly absent.
pub trait Numeric {
    fn number(&self) -> Option<Decimal>;
}

impl Numeric for Decimal {
    fn number(&self) -> Option<Decimal> {
        Some(*self)
    }
}

impl Numeric for Option<Decimal> {
    fn number(&self) -> Option<Decimal> {
        *self
    }
}

/// Present numbers must be at least `min`.
pub fn min<'r, T: Numeric + ?Sized>(min: Decimal) -> Rule<'r, T> {
    Rule::new(move |v: &T| match v.number() {
        Some(n) if n < min => {
            Err(Issue::invalid(format!("must be no less than {min}")).into())
        }
        _ => Ok(()),
    })
}

pub fn max<'r, T: Numeric + ?Sized>(max: Decimal) -> Rule<'r, T> {
    Rule::new(move |v: &T| match v.number() {
        Some(n) if n > max => {
            Err(Issue::invalid(format!("must be no greater than {max}")).into())
        }
        _ => Ok(()),
    })
}

/// Present numbers must be greater than zero.
pub fn positive<'r, T: Numeric + ?Sized>() -> Rule<'r, T> {
    Rule::new(|v: &T| match v.number() {
        Some(n) if n <= Decimal::ZERO => Err(Issue::invalid("must be greater than 0").into()),
        _ => Ok(()),
    })
}

/// Present numbers must not be negative.
pub fn zero_or_positive<'r, T: Numeric + ?Sized>() -> Rule<'r, T> {
    Rule::new(|v: &T| match v.number() {
        Some(n) if n < Decimal::ZERO => Err(Issue::invalid("must be no less than 0").into()),
        _ => Ok(()),
    })
}

/// Arbitrary predicate over the value.
pub fn by<'r, T: ?Sized>(f: impl Fn(&T) -> Result<(), Fault> + 'r) -> Rule<'r, T> {
    Rule::new(f)
}

/// Apply `rules` only when `cond` holds.
pub fn when<'r, T: ?Sized + 'r>(cond: bool, rules: Vec<Rule<'r, T>>) -> Rule<'r, T> {
    Rule::new(move |v: &T| {
        if !cond {
            return Ok(());
        }
        for rule in &rules {
            match rule {
                Rule::Skip => break,
                Rule::Check(f) => f(v)?,
            }
        }
        Ok(())
    })
}

/// Apply `rules` to every element, keying failures by index.
pub fn each<'r, T: 'r>(rules: Vec<Rule<'r, T>>) -> Rule<'r, Vec<T>> {
    Rule::new(move |list: &Vec<T>| {
        let mut tree = ErrorTree::new();
        for (i, item) in list.iter().enumerate() {
            for rule in &rules {
                match rule {
                    Rule::Skip => break,
                    Rule::Check(f) => {
                        if let Err(fault) = f(item) {
                            tree.insert(i.to_string(), fault);
                            break;
                        }
                    }
                }
            }
        }
        if tree.is_empty() { Ok(()) } else { Err(tree.into()) }
    })
}

/// Stop evaluating further rules for the field.
pub fn skip<'r, T: ?Sized>() -> Rule<'r, T> {
    Rule::Skip
}
