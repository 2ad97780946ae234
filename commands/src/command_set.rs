use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;
use value_schema_core::{AnyMap, AnyValue, ValidationResult};

use crate::command::{Command, Executable};
use crate::error::CommandError;
use crate::interceptor::{Interceptor, build_chain};

/// Code of the validation result reported for an unknown command.
pub const CMD_NOT_FOUND: &str = "CMD_NOT_FOUND";

/// A named collection of commands sharing one interceptor chain.
///
/// Commands are kept in registration order; registering a name again
/// replaces the earlier command in place.
///
/// # Examples
///
/// ```
/// use value_schema_commands::{Command, CommandSet};
/// use value_schema_core::{AnyMap, AnyValue};
///
/// let mut set = CommandSet::new();
/// set.add_command(Command::new("ping", None, |_, _| Ok(AnyValue::from("pong"))));
///
/// assert_eq!(set.execute(None, "ping", &AnyMap::new()).unwrap(), AnyValue::from("pong"));
/// assert_eq!(set.execute(None, "pong", &AnyMap::new()).unwrap_err().code(), "CMD_NOT_FOUND");
/// ```
#[derive(Default)]
pub struct CommandSet {
    commands: IndexMap<String, Arc<Command>>,
    chains: IndexMap<String, Arc<dyn Executable>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl CommandSet {
    /// Creates an empty command set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command, wrapping it with the current interceptors.
    pub fn add_command(&mut self, command: Command) {
        let name = command.name().to_string();
        let command = Arc::new(command);
        let chain = build_chain(command.clone(), &self.interceptors);
        self.commands.insert(name.clone(), command);
        self.chains.insert(name, chain);
    }

    /// Registers every command from `commands`.
    pub fn add_commands(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.add_command(command);
        }
    }

    /// Copies every command of `other` into this set.
    ///
    /// The copied commands are wrapped by this set's interceptors, not by
    /// those of `other`.
    pub fn add_command_set(&mut self, other: &CommandSet) {
        for command in other.commands.values() {
            self.add_command(Command::clone(command));
        }
    }

    /// Registers an interceptor inside all previously registered ones.
    pub fn add_interceptor(&mut self, interceptor: impl Interceptor + 'static) {
        self.interceptors.push(Arc::new(interceptor));
        self.rebuild_chains();
    }

    fn rebuild_chains(&mut self) {
        self.chains = self
            .commands
            .iter()
            .map(|(name, command)| {
                let command: Arc<dyn Executable> = command.clone();
                (name.clone(), build_chain(command, &self.interceptors))
            })
            .collect();
    }

    /// Returns the registered commands in registration order.
    pub fn commands(&self) -> Vec<&Command> {
        self.commands.values().map(AsRef::as_ref).collect()
    }

    /// Looks up a command by exact name.
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` when no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Validates `args` for the named command through the interceptor chain.
    ///
    /// An unknown command yields a single `CMD_NOT_FOUND` error.
    pub fn validate(&self, name: &str, args: &AnyMap) -> Vec<ValidationResult> {
        match self.chains.get(name) {
            Some(chain) => chain.validate(args),
            None => vec![
                ValidationResult::error(
                    "",
                    CMD_NOT_FOUND,
                    format!("Requested command {name} does not exist"),
                )
                .with_actual(name),
            ],
        }
    }

    /// Executes the named command through the interceptor chain.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NotFound`] for an unknown command, and
    /// otherwise whatever the chain returns.
    pub fn execute(
        &self,
        correlation_id: Option<&str>,
        name: &str,
        args: &AnyMap,
    ) -> Result<AnyValue, CommandError> {
        let Some(chain) = self.chains.get(name) else {
            debug!(command = name, "Requested command does not exist");
            return Err(CommandError::not_found(correlation_id, name));
        };
        debug!(
            command = name,
            correlation_id = correlation_id.unwrap_or_default(),
            interceptors = self.interceptors.len(),
            "Executing command"
        );
        chain.execute(correlation_id, args)
    }
}
