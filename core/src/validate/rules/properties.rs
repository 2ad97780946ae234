use crate::compare::{self, CompareOperator};
use crate::reflect;
use crate::validate::result::{ValidationResult, codes, display_name};
use crate::validate::rules::ValidationRule;
use crate::validate::schema::Schema;
use crate::{AnyArray, AnyValue};

fn names_value(names: &[String]) -> AnyValue {
    names.iter().map(|n| AnyValue::from(n.as_str())).collect::<AnyArray>().into()
}

/// Passes when at least one of the listed properties is present and not `Null`.
#[derive(Debug, Clone)]
pub struct AtLeastOneExistsRule {
    properties: Vec<String>,
}

impl AtLeastOneExistsRule {
    /// Requires at least one of `properties` to be set.
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the property names.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

impl ValidationRule for AtLeastOneExistsRule {
    fn validate(
        &self,
        path: &str,
        _schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        let found = self
            .properties
            .iter()
            .any(|p| reflect::get_property(value, p).is_some_and(|v| !v.is_null()));
        if found {
            return;
        }
        results.push(
            ValidationResult::error(
                path,
                codes::VALUE_NULL,
                format!(
                    "{} must have at least one property from {}",
                    display_name(path),
                    self.properties.join(",")
                ),
            )
            .with_expected(names_value(&self.properties)),
        );
    }
}

/// Passes when exactly one of the listed properties holds a truthy value.
///
/// `Null`, `false`, zero, `NaN` and empty strings or enum names count as absent.
#[derive(Debug, Clone)]
pub struct OnlyOneExistsRule {
    properties: Vec<String>,
}

impl OnlyOneExistsRule {
    /// Requires exactly one of `properties` to be set.
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the property names.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

fn is_truthy(value: &AnyValue) -> bool {
    match value {
        AnyValue::Null => false,
        AnyValue::Boolean(b) => *b,
        AnyValue::Integer(n) => *n != 0,
        AnyValue::Long(n) => *n != 0,
        AnyValue::Float(n) => *n != 0.0 && !n.is_nan(),
        AnyValue::Double(n) => *n != 0.0 && !n.is_nan(),
        AnyValue::String(s) | AnyValue::Enum(s) => !s.is_empty(),
        _ => true,
    }
}

impl ValidationRule for OnlyOneExistsRule {
    fn validate(
        &self,
        path: &str,
        _schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        let found = self
            .properties
            .iter()
            .filter(|p| reflect::get_property(value, p).is_some_and(|v| is_truthy(&v)))
            .count();
        let name = display_name(path);
        let list = self.properties.join(",");
        let result = match found {
            1 => return,
            0 => ValidationResult::error(
                path,
                codes::VALUE_NULL,
                format!("{name} must have at least one property from {list}"),
            ),
            _ => ValidationResult::error(
                path,
                codes::VALUE_ONLY_ONE,
                format!("{name} must have only one property from {list}"),
            ),
        };
        results.push(result.with_expected(names_value(&self.properties)));
    }
}

/// Passes when `compare(value.property1, operation, value.property2)` holds.
///
/// # Examples
///
/// ```
/// use value_schema_core::{AnyObject, AnyValue, ObjectSchema, PropertiesComparisonRule, Schema};
///
/// let schema = ObjectSchema::new()
///     .allow_extra_properties(true)
///     .with_rule(PropertiesComparisonRule::new("min", "LE", "max"));
///
/// let ok = AnyObject::new().with("min", 1).with("max", 5);
/// let bad = AnyObject::new().with("min", 9).with("max", 5);
/// assert!(schema.validate(&ok.into()).is_empty());
/// assert_eq!(schema.validate(&bad.into())[0].code, "PROPERTIES_NOT_MATCH");
/// ```
#[derive(Debug, Clone)]
pub struct PropertiesComparisonRule {
    property1: String,
    operation: CompareOperator,
    property2: String,
}

impl PropertiesComparisonRule {
    /// Compares two properties of the same value.
    pub fn new(
        property1: impl Into<String>,
        operation: impl Into<CompareOperator>,
        property2: impl Into<String>,
    ) -> Self {
        Self {
            property1: property1.into(),
            operation: operation.into(),
            property2: property2.into(),
        }
    }

    /// Returns the left property name.
    pub fn property1(&self) -> &str {
        &self.property1
    }

    /// Returns the comparison operator.
    pub fn operation(&self) -> &CompareOperator {
        &self.operation
    }

    /// Returns the right property name.
    pub fn property2(&self) -> &str {
        &self.property2
    }
}

impl ValidationRule for PropertiesComparisonRule {
    fn validate(
        &self,
        path: &str,
        _schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        let value1 = reflect::get_property(value, &self.property1).unwrap_or_default();
        let value2 = reflect::get_property(value, &self.property2).unwrap_or_default();
        if compare::compare(&value1, &self.operation, &value2) {
            return;
        }
        results.push(
            ValidationResult::error(
                path,
                codes::PROPERTIES_NOT_MATCH,
                format!(
                    "{} must have {} {} {}",
                    display_name(path),
                    self.property1,
                    self.operation,
                    self.property2
                ),
            )
            .with_expected(value2)
            .with_actual(value1),
        );
    }
}
