//! Dotted-path property access and flattening.
//!
//! A path such as `"a.b.2.c"` is resolved one segment at a time with the
//! flat accessors of the parent module; any missing segment short-circuits.
//! Flattening walks every container reachable from the root and reports
//! leaves under their dotted path. Containers already open on the walk are
//! skipped, and no more than [`MAX_OPEN_CONTAINERS`] are open at once.

use indexmap::IndexMap;
use tracing::debug;

use crate::reflect;
use crate::{AnyMap, AnyValue};

/// Maximum number of containers open at the same time while flattening.
pub const MAX_OPEN_CONTAINERS: usize = 100;

/// Resolves every segment but the last, returning the parent and the last segment.
fn resolve_parent<'p>(obj: &AnyValue, path: &'p str) -> Option<(AnyValue, &'p str)> {
    if path.is_empty() {
        return None;
    }
    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop()?;
    let mut current = obj.clone();
    for segment in segments {
        current = reflect::get_property(&current, segment).filter(|v| !v.is_null())?;
    }
    Some((current, last))
}

/// Returns `true` when the dotted `path` resolves to a non-null value.
pub fn has_property(obj: &AnyValue, path: &str) -> bool {
    resolve_parent(obj, path).is_some_and(|(parent, last)| reflect::has_property(&parent, last))
}

/// Resolves a dotted path such as `"a.b.2.c"`.
pub fn get_property(obj: &AnyValue, path: &str) -> Option<AnyValue> {
    let (parent, last) = resolve_parent(obj, path)?;
    reflect::get_property(&parent, last)
}

/// Writes a value at a dotted path, creating missing intermediate maps.
///
/// Returns `false` when some segment cannot be written.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use value_schema_core::{reflect::recursive, AnyValue};
///
/// let value = AnyValue::from(json!({}));
/// assert!(recursive::set_property(&value, "a.b.c", AnyValue::from(1)));
/// assert_eq!(value, AnyValue::from(json!({"a": {"b": {"c": 1}}})));
/// ```
pub fn set_property(obj: &AnyValue, path: &str, value: AnyValue) -> bool {
    if path.is_empty() {
        return false;
    }
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };
    let mut current = obj.clone();
    for segment in parents {
        current = match reflect::get_property(&current, segment) {
            Some(next) if !next.is_null() => next,
            _ => {
                let child = AnyValue::Map(AnyMap::new());
                if !reflect::set_property(&current, segment, child.clone()) {
                    return false;
                }
                child
            }
        };
    }
    reflect::set_property(&current, last, value)
}

/// Sets every dotted path in `values`, creating intermediate maps.
pub fn set_properties(obj: &AnyValue, values: &IndexMap<String, AnyValue>) {
    for (path, value) in values {
        set_property(obj, path, value.clone());
    }
}

/// Copies every flattened leaf of `src` into `dest` at the same path.
pub fn copy_properties(dest: &AnyValue, src: &AnyValue) {
    set_properties(dest, &get_properties(src));
}

/// Lists the dotted paths of every leaf reachable from `obj`.
pub fn get_property_names(obj: &AnyValue) -> Vec<String> {
    get_properties(obj).into_keys().collect()
}

/// Lists every leaf reachable from `obj` under its dotted path.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use value_schema_core::{reflect::recursive, AnyValue};
///
/// let value = AnyValue::from(json!({"a": 1, "b": {"c": [true, null]}}));
/// assert_eq!(
///     recursive::get_property_names(&value),
///     vec!["a", "b.c.0", "b.c.1"]
/// );
/// ```
pub fn get_properties(obj: &AnyValue) -> IndexMap<String, AnyValue> {
    let mut result = IndexMap::new();
    let mut open = Vec::new();
    flatten(obj, None, &mut open, &mut result);
    result
}

fn flatten(
    obj: &AnyValue,
    path: Option<&str>,
    open: &mut Vec<usize>,
    result: &mut IndexMap<String, AnyValue>,
) {
    if open.len() >= MAX_OPEN_CONTAINERS {
        debug!(
            limit = MAX_OPEN_CONTAINERS,
            path = path.unwrap_or_default(),
            "Open container limit reached while flattening"
        );
        if let Some(path) = path {
            result.insert(path.to_string(), obj.clone());
        }
        return;
    }

    let id = obj.container_id();
    if let Some(id) = id {
        open.push(id);
    }

    for (key, value) in reflect::get_properties(obj) {
        if value.container_id().is_some_and(|child| open.contains(&child)) {
            continue;
        }
        let child_path = match path {
            Some(path) => format!("{path}.{key}"),
            None => key,
        };
        if value.type_code().is_simple() {
            result.insert(child_path, value);
        } else {
            flatten(&value, Some(&child_path), open, result);
        }
    }

    if id.is_some() {
        open.pop();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_property_by_path() {
        let value = AnyValue::from(json!({"a": {"b": [{"c": 5}]}}));
        assert_eq!(get_property(&value, "a.b.0.c"), Some(AnyValue::Integer(5)));
        assert_eq!(get_property(&value, "a.x.0.c"), None);
        assert!(has_property(&value, "A.B.0"));
        assert!(!has_property(&value, "a.b.1"));
        assert!(!has_property(&value, ""));
    }

    #[test]
    fn test_missing_intermediate_short_circuits() {
        let value = AnyValue::from(json!({"a": null}));
        assert_eq!(get_property(&value, "a.b"), None);
        assert!(!has_property(&value, "a.b"));
    }

    #[test]
    fn test_self_reference_is_skipped() {
        let map = AnyMap::new();
        map.put("a", 1);
        map.put("self", map.clone());

        let names = get_property_names(&AnyValue::Map(map));
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_indirect_cycle_is_skipped() {
        let outer = AnyMap::new();
        let inner = AnyMap::new();
        inner.put("back", outer.clone());
        inner.put("x", "y");
        outer.put("inner", inner);

        let properties = get_properties(&AnyValue::Map(outer));
        assert_eq!(properties.len(), 1);
        assert_eq!(properties.get("inner.x"), Some(&AnyValue::from("y")));
    }

    #[test]
    fn test_shared_sibling_is_not_a_cycle() {
        let shared = AnyMap::new();
        shared.put("v", 1);
        let root = AnyMap::new();
        root.put("left", shared.clone());
        root.put("right", shared);

        assert_eq!(
            get_property_names(&AnyValue::Map(root)),
            vec!["left.v", "right.v"]
        );
    }

    #[test]
    fn test_deep_nesting_stops_at_open_container_limit() {
        let root = AnyMap::new();
        let mut current = root.clone();
        for _ in 0..150 {
            let next = AnyMap::new();
            current.put("n", next.clone());
            current = next;
        }
        current.put("leaf", 1);

        let names = get_property_names(&AnyValue::Map(root));
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].split('.').count(), MAX_OPEN_CONTAINERS);
    }

    #[test]
    fn test_set_property_fails_through_primitive() {
        let value = AnyValue::from(json!({"a": 1}));
        assert!(!set_property(&value, "a.b", AnyValue::from(2)));
        assert!(!set_property(&value, "", AnyValue::from(2)));
    }

    #[test]
    fn test_copy_properties() {
        let src = AnyValue::from(json!({"a": {"b": 1}, "c": "d"}));
        let dest = AnyValue::from(json!({}));
        copy_properties(&dest, &src);
        assert_eq!(dest, src);
    }
}
