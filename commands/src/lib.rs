//! Commands whose arguments are checked by a schema before they run.
//!
//! A [`Command`] pairs an action with an optional argument schema. Executing
//! it validates the arguments first and returns
//! [`CommandError::BadRequest`] without running the action when they fail.
//! A [`CommandSet`] groups commands by name and wraps each of them in a chain
//! of [`Interceptor`]s.

mod command;
mod command_set;
pub mod error;
mod interceptor;

pub use command::{Command, Executable};
pub use command_set::{CMD_NOT_FOUND, CommandSet};
pub use error::CommandError;
pub use interceptor::Interceptor;
