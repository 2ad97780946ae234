use std::sync::Arc;

use crate::AnyValue;
use crate::validate::result::{ValidationResult, codes, display_name};
use crate::validate::rules::ValidationRule;
use crate::validate::schema::Schema;

/// Passes when every nested rule passes; reports all of their findings.
#[derive(Debug, Clone, Default)]
pub struct AndRule {
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl AndRule {
    /// Creates a rule requiring all of `rules` to pass.
    pub fn new(rules: Vec<Arc<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    /// Adds a nested rule.
    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Returns the nested rules.
    pub fn rules(&self) -> &[Arc<dyn ValidationRule>] {
        &self.rules
    }
}

impl ValidationRule for AndRule {
    fn validate(
        &self,
        path: &str,
        schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        for rule in &self.rules {
            rule.validate(path, schema, value, results);
        }
    }
}

/// Passes as soon as one nested rule passes.
///
/// Findings of the rules tried before the passing one are discarded. When
/// every rule fails, all of their findings are reported. An empty rule list
/// passes.
///
/// # Examples
///
/// ```
/// use value_schema_core::{OrRule, Schema, ValueComparisonRule, ValueSchema};
///
/// let outside = OrRule::default()
///     .with_rule(ValueComparisonRule::new("LT", 0))
///     .with_rule(ValueComparisonRule::new("GT", 10));
/// let schema = ValueSchema::new().with_rule(outside);
///
/// assert!(schema.validate(&42.into()).is_empty());
/// assert_eq!(schema.validate(&5.into()).len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrRule {
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl OrRule {
    /// Creates a rule requiring any of `rules` to pass.
    pub fn new(rules: Vec<Arc<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    /// Adds a nested rule.
    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Returns the nested rules.
    pub fn rules(&self) -> &[Arc<dyn ValidationRule>] {
        &self.rules
    }
}

impl ValidationRule for OrRule {
    fn validate(
        &self,
        path: &str,
        schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        if self.rules.is_empty() {
            return;
        }

        let mut local = Vec::new();
        for rule in &self.rules {
            let before = local.len();
            rule.validate(path, schema, value, &mut local);
            if local.len() == before {
                return;
            }
        }
        results.extend(local);
    }
}

/// Inverts a rule: passes when the wrapped rule reports something.
#[derive(Debug, Clone)]
pub struct NotRule {
    rule: Arc<dyn ValidationRule>,
}

impl NotRule {
    /// Inverts `rule`.
    pub fn new(rule: impl ValidationRule + 'static) -> Self {
        Self {
            rule: Arc::new(rule),
        }
    }

    /// Inverts a shared rule.
    pub fn from_shared(rule: Arc<dyn ValidationRule>) -> Self {
        Self { rule }
    }

    /// Returns the wrapped rule.
    pub fn rule(&self) -> &Arc<dyn ValidationRule> {
        &self.rule
    }
}

impl ValidationRule for NotRule {
    fn validate(
        &self,
        path: &str,
        schema: &dyn Schema,
        value: &AnyValue,
        results: &mut Vec<ValidationResult>,
    ) {
        let mut local = Vec::new();
        self.rule.validate(path, schema, value, &mut local);
        if local.is_empty() {
            results.push(ValidationResult::error(
                path,
                codes::NOT_FAILED,
                format!("Negative check for {} failed", display_name(path)),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExcludedRule, IncludedRule, ValueSchema};

    #[test]
    fn test_and_rule_reports_every_failure() {
        let rule = AndRule::default()
            .with_rule(IncludedRule::new(["a"]))
            .with_rule(ExcludedRule::new(["z"]));
        let schema = ValueSchema::new().with_rule(rule);

        assert!(schema.validate(&"a".into()).is_empty());
        assert_eq!(schema.validate(&"z".into()).len(), 2);
    }

    #[test]
    fn test_or_rule_discards_findings_of_earlier_failures() {
        let rule = OrRule::default()
            .with_rule(IncludedRule::new(["a"]))
            .with_rule(IncludedRule::new(["b"]));
        let schema = ValueSchema::new().with_rule(rule);

        assert!(schema.validate(&"b".into()).is_empty());
        let results = schema.validate(&"c".into());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.code == codes::VALUE_NOT_INCLUDED));
    }

    #[test]
    fn test_empty_or_rule_passes() {
        let schema = ValueSchema::new().with_rule(OrRule::default());
        assert!(schema.validate(&"anything".into()).is_empty());
    }

    #[test]
    fn test_not_rule() {
        let schema = ValueSchema::new().with_rule(NotRule::new(IncludedRule::new(["root"])));
        assert!(schema.validate(&"guest".into()).is_empty());

        let results = schema.validate(&"root".into());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, codes::NOT_FAILED);
        assert_eq!(results[0].message, "Negative check for value failed");
    }

    #[test]
    fn test_nested_combinators() {
        let rule = NotRule::new(
            OrRule::default()
                .with_rule(IncludedRule::new(["x"]))
                .with_rule(IncludedRule::new(["y"])),
        );
        let schema = ValueSchema::new().with_rule(rule);
        assert!(schema.validate(&"q".into()).is_empty());
        assert_eq!(schema.validate(&"y".into())[0].code, codes::NOT_FAILED);
    }
}
