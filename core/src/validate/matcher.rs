//! Matching of resolved type codes against expected types.
//!
//! Numeric codes are interchangeable: any two of Integer, Long, Float and
//! Double match each other, since schemas check that a value is numeric
//! enough rather than its exact width. Named expectations go through a fixed,
//! case-insensitive alias table.

use crate::validate::schema::TypeDescriptor;
use crate::{AnyValue, TypeCode};

/// Returns `true` when `actual` satisfies `expected`.
///
/// The actual code is always resolved; a missing value is represented by
/// [`TypeCode::Unknown`], and callers skip `Null` values before matching.
/// Nested schema descriptors are validated by the schema itself, not here,
/// and never match.
///
/// # Examples
///
/// ```
/// use value_schema_core::{matcher, TypeCode, TypeDescriptor};
///
/// assert!(matcher::match_type(&TypeDescriptor::Any, TypeCode::Map));
/// assert!(matcher::match_type(&TypeCode::Integer.into(), TypeCode::Double));
/// assert!(matcher::match_type(&"string[]".into(), TypeCode::Array));
/// assert!(!matcher::match_type(&"long".into(), TypeCode::Integer));
/// ```
pub fn match_type(expected: &TypeDescriptor, actual: TypeCode) -> bool {
    match expected {
        TypeDescriptor::Any => true,
        TypeDescriptor::Code(code) => match_type_code(*code, actual),
        TypeDescriptor::Name(name) => match_type_name(name, actual),
        TypeDescriptor::Schema(_) => false,
    }
}

/// Matches against a type code, with numeric widening.
pub fn match_type_code(expected: TypeCode, actual: TypeCode) -> bool {
    expected == actual || (expected.is_numeric() && actual.is_numeric())
}

/// Matches against a type name from the alias table.
pub fn match_type_name(expected: &str, actual: TypeCode) -> bool {
    let name = expected.trim().to_ascii_lowercase();
    match name.as_str() {
        "object" => true,
        "int" | "integer" => matches!(actual, TypeCode::Integer | TypeCode::Long),
        "long" => actual == TypeCode::Long,
        "float" => matches!(actual, TypeCode::Float | TypeCode::Double),
        "double" => actual == TypeCode::Double,
        "string" => actual == TypeCode::String,
        "bool" | "boolean" => actual == TypeCode::Boolean,
        "date" | "datetime" => actual == TypeCode::DateTime,
        "timespan" | "duration" => actual == TypeCode::Duration || actual.is_numeric(),
        "enum" => matches!(actual, TypeCode::Enum | TypeCode::Integer | TypeCode::String),
        "map" | "dict" | "dictionary" => actual == TypeCode::Map,
        "array" | "list" => actual == TypeCode::Array,
        _ if name.ends_with("[]") => actual == TypeCode::Array,
        _ => false,
    }
}

const TYPE_NAMES: &[&str] = &[
    "object",
    "int",
    "integer",
    "long",
    "float",
    "double",
    "string",
    "bool",
    "boolean",
    "date",
    "datetime",
    "timespan",
    "duration",
    "enum",
    "map",
    "dict",
    "dictionary",
    "array",
    "list",
];

/// Returns `true` when `name` is in the alias table, ignoring case.
///
/// Any name ending in `[]` counts as an array type.
pub fn is_known_type_name(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    name.ends_with("[]") || TYPE_NAMES.contains(&name.as_str())
}

/// Resolves the type code of `value` and matches it.
pub fn match_value_type(expected: &TypeDescriptor, value: &AnyValue) -> bool {
    match_type(expected, value.type_code())
}
