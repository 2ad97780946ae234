use std::fmt;
use std::sync::Arc;

use tracing::debug;
use value_schema_core::{AnyMap, AnyValue, Schema, ValidationResult};

use crate::error::CommandError;

/// Something that can be invoked with a map of arguments.
pub trait Executable: Send + Sync {
    fn name(&self) -> &str;

    /// Checks `args` without running anything.
    fn validate(&self, args: &AnyMap) -> Vec<ValidationResult>;

    fn execute(&self, correlation_id: Option<&str>, args: &AnyMap) -> Result<AnyValue, CommandError>;
}

type Action = dyn Fn(Option<&str>, &AnyMap) -> Result<AnyValue, CommandError> + Send + Sync;

/// A named action guarded by an optional argument schema.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use value_schema_commands::{Command, Executable};
/// use value_schema_core::{AnyMap, AnyValue, ObjectSchema, TypeCode};
///
/// let schema = ObjectSchema::new().with_required_property("name", TypeCode::String);
/// let greet = Command::new("greet", Some(Arc::new(schema)), |_, args| {
///     let name = args.get("name").unwrap_or_default();
///     Ok(AnyValue::from(format!("Hello, {}!", name.as_str().unwrap_or("stranger"))))
/// });
///
/// let args: AnyMap = [("name", "Ada")].into_iter().collect();
/// assert_eq!(greet.execute(None, &args).unwrap(), AnyValue::from("Hello, Ada!"));
///
/// let err = greet.execute(Some("req-7"), &AnyMap::new()).unwrap_err();
/// assert_eq!(err.code(), "INVALID_DATA");
/// ```
#[derive(Clone)]
pub struct Command {
    name: String,
    schema: Option<Arc<dyn Schema>>,
    action: Arc<Action>,
}

impl Command {
    /// Creates a command; `schema`, when present, checks arguments before `action` runs.
    pub fn new<F>(name: impl Into<String>, schema: Option<Arc<dyn Schema>>, action: F) -> Self
    where
        F: Fn(Option<&str>, &AnyMap) -> Result<AnyValue, CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            schema,
            action: Arc::new(action),
        }
    }

    /// Returns the argument schema, if any.
    pub fn schema(&self) -> Option<&Arc<dyn Schema>> {
        self.schema.as_ref()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Executable for Command {
    fn name(&self) -> &str {
        &self.name
    }

    /// Results of the argument schema; empty without one.
    fn validate(&self, args: &AnyMap) -> Vec<ValidationResult> {
        match &self.schema {
            Some(schema) => schema.validate(&AnyValue::Map(args.clone())),
            None => Vec::new(),
        }
    }

    fn execute(&self, correlation_id: Option<&str>, args: &AnyMap) -> Result<AnyValue, CommandError> {
        if let Some(schema) = &self.schema {
            schema
                .validate_and_throw_error(correlation_id, &AnyValue::Map(args.clone()), false)
                .map_err(|err| {
                    debug!(
                        command = %self.name,
                        correlation_id = correlation_id.unwrap_or_default(),
                        results = err.results().len(),
                        "Rejected command arguments"
                    );
                    CommandError::bad_request(correlation_id, err)
                })?;
        }
        (self.action)(correlation_id, args)
    }
}
