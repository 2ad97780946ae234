//! Duck-typed property access over dynamic values.
//!
//! Maps and objects expose their keys as properties, matched ignoring ASCII
//! case; objects hide members whose names start with `_`. Arrays expose their
//! in-bounds indices as stringified property names. Every other value has no
//! properties.
//!
//! The [`recursive`] submodule extends this to dotted paths and flattening.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use value_schema_core::{reflect, AnyValue};
//!
//! let value = AnyValue::from(json!({"Name": "Alice", "tags": ["a", "b"]}));
//! assert!(reflect::has_property(&value, "name"));
//! assert_eq!(reflect::get_property(&value, "NAME"), Some(AnyValue::from("Alice")));
//!
//! let tags = reflect::get_property(&value, "tags").unwrap();
//! assert_eq!(reflect::get_property_names(&tags), vec!["0", "1"]);
//! ```

pub mod recursive;

use indexmap::IndexMap;

use crate::AnyValue;

fn parse_index(name: &str) -> Option<usize> {
    name.trim().parse::<usize>().ok()
}

/// Returns `true` when `obj` exposes a property called `name`.
pub fn has_property(obj: &AnyValue, name: &str) -> bool {
    match obj {
        AnyValue::Map(map) => map.find_key(name).is_some(),
        AnyValue::Object(object) => object.find_member(name).is_some(),
        AnyValue::Array(array) => parse_index(name).is_some_and(|index| index < array.len()),
        _ => false,
    }
}

/// Reads a property, returning `None` when it does not exist.
pub fn get_property(obj: &AnyValue, name: &str) -> Option<AnyValue> {
    match obj {
        AnyValue::Map(map) => map.find_key(name).and_then(|key| map.get(&key)),
        AnyValue::Object(object) => object.find_member(name).and_then(|key| object.get(&key)),
        AnyValue::Array(array) => parse_index(name).and_then(|index| array.get(index)),
        _ => None,
    }
}

/// Lists property names in enumeration order.
pub fn get_property_names(obj: &AnyValue) -> Vec<String> {
    get_properties(obj).into_keys().collect()
}

/// Lists properties with their values in enumeration order.
pub fn get_properties(obj: &AnyValue) -> IndexMap<String, AnyValue> {
    match obj {
        AnyValue::Map(map) => map.snapshot(),
        AnyValue::Object(object) => object.public_entries().into_iter().collect(),
        AnyValue::Array(array) => array
            .values()
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        _ => IndexMap::new(),
    }
}

/// Writes a property, returning `false` when `obj` cannot hold it.
///
/// An existing key matching `name` ignoring case is overwritten in place;
/// otherwise a new key is added. Array writes past the end pad with `Null`.
/// Private object members cannot be written.
pub fn set_property(obj: &AnyValue, name: &str, value: AnyValue) -> bool {
    match obj {
        AnyValue::Map(map) => {
            let key = map.find_key(name).unwrap_or_else(|| name.to_string());
            map.put(key, value);
            true
        }
        AnyValue::Object(object) => {
            if crate::AnyObject::is_private(name) {
                return false;
            }
            let key = object.find_member(name).unwrap_or_else(|| name.to_string());
            object.set(key, value);
            true
        }
        AnyValue::Array(array) => match parse_index(name) {
            Some(index) => {
                array.set(index, value);
                true
            }
            None => false,
        },
        _ => false,
    }
}

/// Writes every entry of `values` with [`set_property`].
pub fn set_properties(obj: &AnyValue, values: &IndexMap<String, AnyValue>) {
    for (name, value) in values {
        set_property(obj, name, value.clone());
    }
}
