//! Coarse runtime type classification for dynamic values.
//!
//! Every [`AnyValue`](crate::AnyValue) resolves to exactly one [`TypeCode`].
//! Schemas and the [`matcher`](crate::matcher) reason about data in
//! terms of these codes rather than concrete Rust types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse type tag of a dynamic value.
///
/// # Examples
///
/// ```
/// use value_schema_core::TypeCode;
///
/// assert_eq!(TypeCode::default(), TypeCode::Unknown);
/// assert!(TypeCode::Long.is_numeric());
/// assert!(!TypeCode::Map.is_simple());
/// assert_eq!(TypeCode::DateTime.to_string(), "DateTime");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TypeCode {
    /// Unresolved type; the code of `Null`.
    #[default]
    Unknown,
    String,
    Boolean,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    DateTime,
    Duration,
    /// Record with named members.
    Object,
    /// Symbolic enumeration value.
    Enum,
    Array,
    /// String-keyed dictionary.
    Map,
}

impl TypeCode {
    /// Canonical name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCode::Unknown => "Unknown",
            TypeCode::String => "String",
            TypeCode::Boolean => "Boolean",
            TypeCode::Integer => "Integer",
            TypeCode::Long => "Long",
            TypeCode::Float => "Float",
            TypeCode::Double => "Double",
            TypeCode::DateTime => "DateTime",
            TypeCode::Duration => "Duration",
            TypeCode::Object => "Object",
            TypeCode::Enum => "Enum",
            TypeCode::Array => "Array",
            TypeCode::Map => "Map",
        }
    }

    /// Returns `true` for Integer, Long, Float and Double.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeCode::Integer | TypeCode::Long | TypeCode::Float | TypeCode::Double
        )
    }

    /// Returns `true` for leaf codes, i.e. anything that is not a container.
    ///
    /// Recursive reflection descends into non-simple values only.
    pub fn is_simple(&self) -> bool {
        !matches!(self, TypeCode::Array | TypeCode::Map | TypeCode::Object)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_codes() {
        let numeric: Vec<TypeCode> = [
            TypeCode::String,
            TypeCode::Integer,
            TypeCode::Long,
            TypeCode::Float,
            TypeCode::Double,
            TypeCode::Duration,
        ]
        .into_iter()
        .filter(TypeCode::is_numeric)
        .collect();

        assert_eq!(
            numeric,
            vec![
                TypeCode::Integer,
                TypeCode::Long,
                TypeCode::Float,
                TypeCode::Double
            ]
        );
    }

    #[test]
    fn test_containers_are_not_simple() {
        assert!(!TypeCode::Array.is_simple());
        assert!(!TypeCode::Map.is_simple());
        assert!(!TypeCode::Object.is_simple());
        assert!(TypeCode::Enum.is_simple());
        assert!(TypeCode::Unknown.is_simple());
    }

    #[test]
    fn test_type_code_serializes_by_name() {
        let raw = serde_json::to_string(&TypeCode::DateTime).unwrap();
        assert_eq!(raw, "\"DateTime\"");
        let back: TypeCode = serde_json::from_str("\"Map\"").unwrap();
        assert_eq!(back, TypeCode::Map);
    }
}
