//! Schema validation over [`AnyValue`](crate::AnyValue) trees.
//!
//! A validation pass walks the value alongside the schema tree. Every schema
//! and rule appends [`ValidationResult`]s to one list owned by the pass, each
//! tagged with the dotted path where it was found. Nothing aborts the walk:
//! callers receive every finding and decide afterwards, optionally turning
//! them into a [`ValidationError`].

mod array;
mod error;
mod map;
pub mod matcher;
mod object;
mod property;
mod result;
pub mod rules;
mod schema;

pub use array::ArraySchema;
pub use error::ValidationError;
pub use map::MapSchema;
pub use object::ObjectSchema;
pub use property::PropertySchema;
pub use result::{ValidationResult, ValidationResultType, codes};
pub use schema::{Schema, SchemaCore, TypeDescriptor, ValueSchema, perform_type_validation, validate_base};
