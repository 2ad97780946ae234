use crate::AnyValue;
use crate::validate::result::ValidationResult;
use crate::validate::schema::{
    Schema, SchemaCore, TypeDescriptor, member_path, perform_type_validation, schema_builders,
    validate_base,
};

/// Validates one named property of an object.
///
/// The property is reported at `path.name`. A property missing from the
/// parent is validated as `Null`.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    core: SchemaCore,
    name: String,
    value_type: TypeDescriptor,
}

impl PropertySchema {
    /// Creates an optional property schema.
    pub fn new(name: impl Into<String>, value_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            core: SchemaCore::default(),
            name: name.into(),
            value_type: value_type.into(),
        }
    }

    /// Returns the property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the expected value type.
    pub fn value_type(&self) -> &TypeDescriptor {
        &self.value_type
    }
}

schema_builders!(PropertySchema);

impl Schema for PropertySchema {
    fn core(&self) -> &SchemaCore {
        &self.core
    }

    /// `path` is the path of the parent object.
    fn perform_validation(&self, path: &str, value: &AnyValue, results: &mut Vec<ValidationResult>) {
        let path = member_path(path, &self.name);
        validate_base(self, &path, value, results);
        perform_type_validation(&path, &self.value_type, value, results);
    }
}
