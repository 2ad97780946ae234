use std::fmt;
use std::sync::Arc;

use crate::validate::error::ValidationError;
use crate::validate::matcher;
use crate::validate::result::{ValidationResult, codes, display_name};
use crate::validate::rules::ValidationRule;
use crate::{AnyValue, ArraySchema, MapSchema, ObjectSchema, TypeCode};

/// Expected type of a value, property, element or map entry.
#[derive(Debug, Clone, Default)]
pub enum TypeDescriptor {
    /// Untyped; always passes.
    #[default]
    Any,
    /// A type code, numeric codes widening into each other.
    Code(TypeCode),
    /// A type name resolved through the alias table of [`matcher`].
    Name(String),
    /// Full validation by a nested schema.
    Schema(Arc<dyn Schema>),
}

impl TypeDescriptor {
    /// Wraps a nested schema.
    pub fn schema<S: Schema + 'static>(schema: S) -> Self {
        TypeDescriptor::Schema(Arc::new(schema))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Any => f.write_str("any"),
            TypeDescriptor::Code(code) => fmt::Display::fmt(code, f),
            TypeDescriptor::Name(name) => f.write_str(name),
            TypeDescriptor::Schema(_) => f.write_str("schema"),
        }
    }
}

impl From<TypeCode> for TypeDescriptor {
    fn from(code: TypeCode) -> Self {
        TypeDescriptor::Code(code)
    }
}

impl From<&str> for TypeDescriptor {
    fn from(name: &str) -> Self {
        TypeDescriptor::Name(name.to_string())
    }
}

impl From<String> for TypeDescriptor {
    fn from(name: String) -> Self {
        TypeDescriptor::Name(name)
    }
}

impl From<Arc<dyn Schema>> for TypeDescriptor {
    fn from(schema: Arc<dyn Schema>) -> Self {
        TypeDescriptor::Schema(schema)
    }
}

impl From<ValueSchema> for TypeDescriptor {
    fn from(schema: ValueSchema) -> Self {
        Self::schema(schema)
    }
}

impl From<ObjectSchema> for TypeDescriptor {
    fn from(schema: ObjectSchema) -> Self {
        Self::schema(schema)
    }
}

impl From<ArraySchema> for TypeDescriptor {
    fn from(schema: ArraySchema) -> Self {
        Self::schema(schema)
    }
}

impl From<MapSchema> for TypeDescriptor {
    fn from(schema: MapSchema) -> Self {
        Self::schema(schema)
    }
}

/// Settings shared by every schema: the required flag and the rule list.
#[derive(Debug, Clone, Default)]
pub struct SchemaCore {
    pub required: bool,
    pub rules: Vec<Arc<dyn ValidationRule>>,
}

/// A reusable validator for one shape of dynamic data.
///
/// Schemas hold configuration only; every validation pass threads its own
/// result list through [`perform_validation`](Schema::perform_validation),
/// so one schema may serve many concurrent validations.
pub trait Schema: fmt::Debug + Send + Sync {
    fn core(&self) -> &SchemaCore;

    /// Validates `value` located at `path`, appending findings to `results`.
    fn perform_validation(&self, path: &str, value: &AnyValue, results: &mut Vec<ValidationResult>);

    fn is_required(&self) -> bool {
        self.core().required
    }

    fn rules(&self) -> &[Arc<dyn ValidationRule>] {
        &self.core().rules
    }

    /// Validates a root value and returns every finding in encounter order.
    fn validate(&self, value: &AnyValue) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        self.perform_validation("", value, &mut results);
        results
    }

    /// Validates and returns an error when the value fails.
    fn validate_and_return_error(
        &self,
        correlation_id: Option<&str>,
        value: &AnyValue,
        strict: bool,
    ) -> Option<ValidationError> {
        ValidationError::from_results(correlation_id, self.validate(value), strict)
    }

    /// Validates and fails with the aggregated error when the value fails.
    fn validate_and_throw_error(
        &self,
        correlation_id: Option<&str>,
        value: &AnyValue,
        strict: bool,
    ) -> Result<(), ValidationError> {
        ValidationError::throw_if_needed(correlation_id, self.validate(value), strict)
    }
}

/// Builder methods for the shared [`SchemaCore`] settings.
macro_rules! schema_builders {
    ($schema:ty) => {
        impl $schema {
            /// Rejects `Null` values.
            pub fn make_required(mut self) -> Self {
                self.core.required = true;
                self
            }

            /// Accepts `Null` values without further checks.
            pub fn make_optional(mut self) -> Self {
                self.core.required = false;
                self
            }

            /// Adds a rule.
            pub fn with_rule(
                mut self,
                rule: impl $crate::validate::rules::ValidationRule + 'static,
            ) -> Self {
                self.core.rules.push(::std::sync::Arc::new(rule));
                self
            }

            /// Adds a rule shared with other schemas.
            pub fn with_shared_rule(
                mut self,
                rule: ::std::sync::Arc<dyn $crate::validate::rules::ValidationRule>,
            ) -> Self {
                self.core.rules.push(rule);
                self
            }
        }
    };
}

pub(crate) use schema_builders;

/// Checks shared by every schema: the required flag, then every rule in order.
///
/// A `Null` value stops here; it is reported only when `schema` is required.
pub fn validate_base(
    schema: &dyn Schema,
    path: &str,
    value: &AnyValue,
    results: &mut Vec<ValidationResult>,
) {
    if value.is_null() {
        if schema.is_required() {
            results.push(
                ValidationResult::error(
                    path,
                    codes::VALUE_IS_NULL,
                    format!("{} must not be null", display_name(path)),
                )
                .with_expected("NOT NULL"),
            );
        }
        return;
    }

    for rule in schema.rules() {
        rule.validate(path, schema, value, results);
    }
}

/// Checks `value` against an expected type.
///
/// A nested schema validates the value in full. Otherwise a `Null` value is
/// skipped, since absence is the required check's concern, and any other
/// value must match the expected type.
pub fn perform_type_validation(
    path: &str,
    value_type: &TypeDescriptor,
    value: &AnyValue,
    results: &mut Vec<ValidationResult>,
) {
    match value_type {
        TypeDescriptor::Any => {}
        TypeDescriptor::Schema(schema) => schema.perform_validation(path, value, results),
        expected => {
            if value.is_null() {
                return;
            }
            let actual = value.type_code();
            if !matcher::match_type(expected, actual) {
                results.push(
                    ValidationResult::error(
                        path,
                        codes::TYPE_MISMATCH,
                        format!(
                            "{} type must be {} but found {}",
                            display_name(path),
                            expected,
                            actual
                        ),
                    )
                    .with_expected(expected.to_string())
                    .with_actual(actual.as_str()),
                );
            }
        }
    }
}

/// Path of a declared member: the segment always follows a dot.
pub(crate) fn member_path(path: &str, segment: &str) -> String {
    format!("{path}.{segment}")
}

/// Path of a discovered key: the bare key at the root.
pub(crate) fn key_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// A schema with no structure of its own: the required flag plus rules.
///
/// # Examples
///
/// ```
/// use value_schema_core::{AnyValue, Schema, ValueSchema, ValueComparisonRule};
///
/// let schema = ValueSchema::new()
///     .make_required()
///     .with_rule(ValueComparisonRule::new("GT", 0));
///
/// assert!(schema.validate(&AnyValue::from(5)).is_empty());
/// assert_eq!(schema.validate(&AnyValue::Null)[0].code, "VALUE_IS_NULL");
/// assert_eq!(schema.validate(&AnyValue::from(-1))[0].code, "BAD_VALUE");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValueSchema {
    core: SchemaCore,
}

impl ValueSchema {
    /// Creates an optional schema with no rules.
    pub fn new() -> Self {
        Self::default()
    }
}

schema_builders!(ValueSchema);

impl Schema for ValueSchema {
    fn core(&self) -> &SchemaCore {
        &self.core
    }

    fn perform_validation(&self, path: &str, value: &AnyValue, results: &mut Vec<ValidationResult>) {
        validate_base(self, path, value, results);
    }
}
