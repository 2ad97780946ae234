use crate::compare::{self, CompareOperator};
use crate::validate::result::{ValidationResult, codes, display_name};
use crate::validate::rules::{ValidationRule, list_values};
use crate::validate::schema::Schema;
use crate::{AnyArray, AnyValue, convert};

/// Passes when the value equals one of the listed values.
#[derive(Debug, Clone)]
pub struct IncludedRule {
    values: Vec<AnyValue>,
}

impl IncludedRule {
    /// Allows only the given values.
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AnyValue>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the allowed values.
    pub fn values(&self) -> &[AnyValue] {
        &self.values
    }
}

impl ValidationRule for IncludedRule {
    fn validate(
        &self,
        path: &str,
        _schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        if self.values.iter().any(|v| compare::are_equal(value, v)) {
            return;
        }
        results.push(
            ValidationResult::error(
                path,
                codes::VALUE_NOT_INCLUDED,
                format!(
                    "{} must be one of {}",
                    display_name(path),
                    list_values(&self.values)
                ),
            )
            .with_expected(self.values.iter().cloned().collect::<AnyArray>())
            .with_actual(value.clone()),
        );
    }
}

/// Passes when the value equals none of the listed values.
#[derive(Debug, Clone)]
pub struct ExcludedRule {
    values: Vec<AnyValue>,
}

impl ExcludedRule {
    /// Rejects the given values.
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AnyValue>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the rejected values.
    pub fn values(&self) -> &[AnyValue] {
        &self.values
    }
}

impl ValidationRule for ExcludedRule {
    fn validate(
        &self,
        path: &str,
        _schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        if !self.values.iter().any(|v| compare::are_equal(value, v)) {
            return;
        }
        results.push(
            ValidationResult::error(
                path,
                codes::VALUE_INCLUDED,
                format!(
                    "{} cannot be one of {}",
                    display_name(path),
                    list_values(&self.values)
                ),
            )
            .with_expected(self.values.iter().cloned().collect::<AnyArray>())
            .with_actual(value.clone()),
        );
    }
}

/// Passes when `compare(value, operation, constant)` holds.
///
/// # Examples
///
/// ```
/// use value_schema_core::{AnyValue, Schema, ValueSchema, ValueComparisonRule};
///
/// let schema = ValueSchema::new().with_rule(ValueComparisonRule::new("LIKE", "^[a-z]+$"));
/// assert!(schema.validate(&"abc".into()).is_empty());
/// assert_eq!(schema.validate(&"ABC".into())[0].code, "BAD_VALUE");
/// ```
#[derive(Debug, Clone)]
pub struct ValueComparisonRule {
    operation: CompareOperator,
    value: AnyValue,
}

impl ValueComparisonRule {
    /// Compares the validated value against `value`.
    pub fn new(operation: impl Into<CompareOperator>, value: impl Into<AnyValue>) -> Self {
        Self {
            operation: operation.into(),
            value: value.into(),
        }
    }

    /// Returns the comparison operator.
    pub fn operation(&self) -> &CompareOperator {
        &self.operation
    }

    /// Returns the value compared against.
    pub fn value(&self) -> &AnyValue {
        &self.value
    }
}

impl ValidationRule for ValueComparisonRule {
    fn validate(
        &self,
        path: &str,
        _schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        if compare::compare(value, &self.operation, &self.value) {
            return;
        }
        let render = |v: &AnyValue| convert::to_string(v).unwrap_or_else(|| v.to_json().to_string());
        results.push(
            ValidationResult::error(
                path,
                codes::BAD_VALUE,
                format!(
                    "{} must {} {} but found {}",
                    display_name(path),
                    self.operation,
                    render(&self.value),
                    render(value)
                ),
            )
            .with_expected(self.value.clone())
            .with_actual(value.clone()),
        );
    }
}
