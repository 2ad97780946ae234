//! Composable checks attached to schemas.
//!
//! A rule is configured once at construction and is a pure function of its
//! inputs afterwards. Rules record findings in the shared result list and
//! never abort the walk; only the logical combinators collect sub-results
//! into a local list first.

mod logic;
mod properties;
mod values;

use std::fmt;

pub use logic::{AndRule, NotRule, OrRule};
pub use properties::{AtLeastOneExistsRule, OnlyOneExistsRule, PropertiesComparisonRule};
pub use values::{ExcludedRule, IncludedRule, ValueComparisonRule};

use crate::validate::result::ValidationResult;
use crate::validate::schema::Schema;
use crate::{AnyValue, convert};

/// A check against a value or its properties.
pub trait ValidationRule: fmt::Debug + Send + Sync {
    /// Checks `value` located at `path`, appending findings to `results`.
    fn validate(
        &self,
        path: &str,
        schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    );
}

/// Comma-separated rendering of rule operands for messages.
fn list_values(values: &[AnyValue]) -> String {
    values
        .iter()
        .map(|v| convert::to_string(v).unwrap_or_else(|| v.to_json().to_string()))
        .collect::<Vec<_>>()
        .join(",")
}
