//! Dynamic values, reflection and schema validation.
//!
//! This crate defines the data model and the validation engine shared by
//! the definition loader, the command framework and the `schema-check` CLI:
//!
//! - [`AnyValue`] — a dynamically typed value with shared, possibly cyclic
//!   containers ([`AnyArray`], [`AnyMap`], [`AnyObject`]).
//! - [`convert`] — soft conversion between value types; [`TypeCode`] is the
//!   coarse type tag every value resolves to.
//! - [`reflect`] — duck-typed property access, plus dotted paths and
//!   cycle-safe flattening in [`reflect::recursive`].
//! - [`compare`] — operator-based comparison used by rules.
//! - [`Schema`] and its implementations ([`ValueSchema`], [`ObjectSchema`],
//!   [`PropertySchema`], [`ArraySchema`], [`MapSchema`]) with composable
//!   [`ValidationRule`]s.
//!
//! Validation never fails fast. It returns every [`ValidationResult`], and
//! [`ValidationError`] aggregates them only when a caller asks for an error.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use value_schema_core::*;
//!
//! let schema = ObjectSchema::new()
//!     .with_required_property("name", TypeCode::String)
//!     .with_optional_property("age", TypeCode::Integer);
//!
//! let input = AnyValue::from(json!({"name": "Alice", "age": "30", "extra": true}));
//! let results = schema.validate(&input);
//!
//! assert_eq!(results.len(), 2);
//! assert_eq!((results[0].path.as_str(), results[0].code.as_str()), (".age", "TYPE_MISMATCH"));
//! assert_eq!((results[1].path.as_str(), results[1].code.as_str()), ("extra", "UNEXPECTED_PROPERTY"));
//! assert_eq!(results[1].result_type, ValidationResultType::Warning);
//!
//! // The warning alone only fails in strict mode; the type error always does.
//! let err = schema.validate_and_throw_error(Some("req-1"), &input, false).unwrap_err();
//! assert_eq!(err.code(), "INVALID_DATA");
//! assert_eq!(err.results().len(), 2);
//! ```

pub mod compare;
pub mod convert;
pub mod reflect;
mod types;
mod validate;
mod value;

pub use compare::CompareOperator;
pub use types::TypeCode;
pub use validate::matcher;
pub use validate::rules::{
    AndRule, AtLeastOneExistsRule, ExcludedRule, IncludedRule, NotRule, OnlyOneExistsRule,
    OrRule, PropertiesComparisonRule, ValidationRule, ValueComparisonRule,
};
pub use validate::{
    ArraySchema, MapSchema, ObjectSchema, PropertySchema, Schema, SchemaCore, TypeDescriptor,
    ValidationError, ValidationResult, ValidationResultType, ValueSchema, codes,
    perform_type_validation, validate_base,
};
pub use value::{AnyArray, AnyMap, AnyObject, AnyValue};
