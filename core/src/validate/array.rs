use crate::validate::result::{ValidationResult, codes, display_name};
use crate::validate::schema::{
    Schema, SchemaCore, TypeDescriptor, member_path, perform_type_validation, schema_builders,
    validate_base,
};
use crate::{AnyValue, TypeCode};

/// Validates every element of an array against one expected type.
///
/// Elements are reported at `path.index`. Any non-`Null` value that is not
/// an array is an error.
#[derive(Debug, Clone, Default)]
pub struct ArraySchema {
    core: SchemaCore,
    value_type: TypeDescriptor,
}

impl ArraySchema {
    /// Creates a schema whose elements must match `value_type`.
    pub fn new(value_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            core: SchemaCore::default(),
            value_type: value_type.into(),
        }
    }

    /// Returns the element type.
    pub fn value_type(&self) -> &TypeDescriptor {
        &self.value_type
    }
}

schema_builders!(ArraySchema);

impl Schema for ArraySchema {
    fn core(&self) -> &SchemaCore {
        &self.core
    }

    fn perform_validation(&self, path: &str, value: &AnyValue, results: &mut Vec<ValidationResult>) {
        validate_base(self, path, value, results);
        if value.is_null() {
            return;
        }

        let Some(array) = value.as_array() else {
            let actual = value.type_code();
            results.push(
                ValidationResult::error(
                    path,
                    codes::VALUE_ISNOT_ARRAY,
                    format!("{} must be an array but found {}", display_name(path), actual),
                )
                .with_expected(TypeCode::Array.as_str())
                .with_actual(actual.as_str()),
            );
            return;
        };

        for (index, element) in array.values().iter().enumerate() {
            let element_path = member_path(path, &index.to_string());
            perform_type_validation(&element_path, &self.value_type, element, results);
        }
    }
}
