//! Comparison of dynamic values by operator token.
//!
//! Equality is structural (see [`AnyValue`]'s `PartialEq`); ordering coerces
//! both sides to `f64`; `LIKE` searches a regular expression in the string
//! form of the left operand.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{AnyValue, convert};

/// Comparison operator understood by [`compare`].
///
/// Parsing never fails: an unknown token is kept as
/// [`CompareOperator::Unrecognized`], which compares `true`.
///
/// # Examples
///
/// ```
/// use value_schema_core::CompareOperator;
///
/// assert_eq!(CompareOperator::parse("<>"), CompareOperator::Ne);
/// assert_eq!(CompareOperator::parse("ge"), CompareOperator::Ge);
/// assert_eq!(
///     CompareOperator::parse("~~"),
///     CompareOperator::Unrecognized("~~".into())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompareOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    Unrecognized(String),
}

impl CompareOperator {
    /// Parses an operator token, case-insensitively. Unknown tokens are kept as `Unrecognized`.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "=" | "==" | "EQ" => CompareOperator::Eq,
            "!=" | "<>" | "NE" => CompareOperator::Ne,
            "<" | "LT" => CompareOperator::Lt,
            "<=" | "LE" => CompareOperator::Le,
            ">" | "GT" => CompareOperator::Gt,
            ">=" | "GE" => CompareOperator::Ge,
            "LIKE" => CompareOperator::Like,
            _ => CompareOperator::Unrecognized(token.to_string()),
        }
    }

    /// Returns the canonical token, e.g. `"LE"`.
    pub fn as_str(&self) -> &str {
        match self {
            CompareOperator::Eq => "EQ",
            CompareOperator::Ne => "NE",
            CompareOperator::Lt => "LT",
            CompareOperator::Le => "LE",
            CompareOperator::Gt => "GT",
            CompareOperator::Ge => "GE",
            CompareOperator::Like => "LIKE",
            CompareOperator::Unrecognized(token) => token,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CompareOperator {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl From<String> for CompareOperator {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<CompareOperator> for String {
    fn from(op: CompareOperator) -> Self {
        op.as_str().to_string()
    }
}

/// Compares two values with `op`.
///
/// # Examples
///
/// ```
/// use value_schema_core::{compare, AnyValue, CompareOperator};
///
/// let five = AnyValue::from(5);
/// assert!(compare::compare(&five, &CompareOperator::Gt, &AnyValue::from("4.5")));
/// assert!(compare::compare(&"hello".into(), &CompareOperator::Like, &"^h.*o$".into()));
/// assert!(compare::compare(&five, &CompareOperator::parse("whatever"), &AnyValue::Null));
/// ```
pub fn compare(value1: &AnyValue, op: &CompareOperator, value2: &AnyValue) -> bool {
    match op {
        CompareOperator::Eq => are_equal(value1, value2),
        CompareOperator::Ne => are_not_equal(value1, value2),
        CompareOperator::Lt => is_less(value1, value2),
        CompareOperator::Le => are_equal(value1, value2) || is_less(value1, value2),
        CompareOperator::Gt => is_greater(value1, value2),
        CompareOperator::Ge => are_equal(value1, value2) || is_greater(value1, value2),
        CompareOperator::Like => matches(value1, value2),
        CompareOperator::Unrecognized(_) => true,
    }
}

/// Both `Null` compare equal; `Null` against anything else does not.
pub fn are_equal(value1: &AnyValue, value2: &AnyValue) -> bool {
    match (value1.is_null(), value2.is_null()) {
        (true, true) => true,
        (true, false) | (false, true) => false,
        (false, false) => value1 == value2,
    }
}

/// Negation of [`are_equal`].
pub fn are_not_equal(value1: &AnyValue, value2: &AnyValue) -> bool {
    !are_equal(value1, value2)
}

/// `false` when either side cannot be read as a number.
pub fn is_less(value1: &AnyValue, value2: &AnyValue) -> bool {
    match (convert::to_double(value1), convert::to_double(value2)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

/// `false` when either side cannot be read as a number.
pub fn is_greater(value1: &AnyValue, value2: &AnyValue) -> bool {
    match (convert::to_double(value1), convert::to_double(value2)) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

/// Searches the pattern `value2` inside the string form of `value1`.
///
/// Both `Null` match; one `Null` or an invalid pattern does not.
pub fn matches(value1: &AnyValue, value2: &AnyValue) -> bool {
    match (value1.is_null(), value2.is_null()) {
        (true, true) => return true,
        (true, false) | (false, true) => return false,
        (false, false) => {}
    }
    let (Some(text), Some(pattern)) = (convert::to_string(value1), convert::to_string(value2))
    else {
        return false;
    };
    Regex::new(&pattern).is_ok_and(|regex| regex.is_match(&text))
}
