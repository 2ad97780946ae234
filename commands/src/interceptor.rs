use std::sync::Arc;

use value_schema_core::{AnyMap, AnyValue, ValidationResult};

use crate::command::Executable;
use crate::error::CommandError;

/// Wraps command execution, deciding whether and how to call `next`.
///
/// Interceptors are registered on a [`CommandSet`](crate::CommandSet) and
/// apply to every command in it.
pub trait Interceptor: Send + Sync {
    fn execute(
        &self,
        correlation_id: Option<&str>,
        next: &dyn Executable,
        args: &AnyMap,
    ) -> Result<AnyValue, CommandError>;

    fn validate(&self, next: &dyn Executable, args: &AnyMap) -> Vec<ValidationResult> {
        next.validate(args)
    }
}

/// One link of an interceptor chain.
pub(crate) struct InterceptedCommand {
    interceptor: Arc<dyn Interceptor>,
    next: Arc<dyn Executable>,
}

impl InterceptedCommand {
    pub(crate) fn new(interceptor: Arc<dyn Interceptor>, next: Arc<dyn Executable>) -> Self {
        Self { interceptor, next }
    }
}

impl Executable for InterceptedCommand {
    fn name(&self) -> &str {
        self.next.name()
    }

    fn validate(&self, args: &AnyMap) -> Vec<ValidationResult> {
        self.interceptor.validate(self.next.as_ref(), args)
    }

    fn execute(&self, correlation_id: Option<&str>, args: &AnyMap) -> Result<AnyValue, CommandError> {
        self.interceptor.execute(correlation_id, self.next.as_ref(), args)
    }
}

/// Builds the chain for `command`: the first interceptor is the outermost.
pub(crate) fn build_chain(
    command: Arc<dyn Executable>,
    interceptors: &[Arc<dyn Interceptor>],
) -> Arc<dyn Executable> {
    interceptors.iter().rev().fold(command, |next, interceptor| {
        let link: Arc<dyn Executable> =
            Arc::new(InterceptedCommand::new(Arc::clone(interceptor), next));
        link
    })
}
