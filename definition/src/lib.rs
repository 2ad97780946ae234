//! Declarative schema definitions.
//!
//! Schemas can be written as YAML or JSON configuration instead of Rust
//! builder calls. A [`SchemaDefinition`] mirrors the schema tree of
//! `value-schema-core`: object, array, map and plain value schemas with
//! typed properties and the full rule set. [`SchemaDefinition::compile`]
//! turns it into an `Arc<dyn Schema>` ready to validate.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use value_schema_core::AnyValue;
//! use value_schema_definition::SchemaDefinition;
//!
//! let definition = SchemaDefinition::from_yaml_str(r#"
//! kind: object
//! properties:
//!   - name: name
//!     required: true
//!     type: string
//!   - name: role
//!     rules:
//!       - included: [admin, user]
//! "#).unwrap();
//!
//! let schema = definition.compile().unwrap();
//! assert!(schema.validate(&AnyValue::from(json!({"name": "Bob", "role": "user"}))).is_empty());
//!
//! let results = schema.validate(&AnyValue::from(json!({"role": "guest"})));
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].code, "VALUE_IS_NULL");
//! assert_eq!(results[1].code, "VALUE_NOT_INCLUDED");
//! ```

mod compile;
pub mod error;
mod model;

pub use error::{DefinitionError, Result};
pub use model::{
    DefinitionFormat, PropertyDefinition, RuleDefinition, SchemaDefinition, SchemaKind,
    TypeDefinition,
};
