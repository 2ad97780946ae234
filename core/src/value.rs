//! Portable dynamic value containers.
//!
//! [`AnyValue`] is the value tree every schema validates. Containers
//! ([`AnyArray`], [`AnyMap`], [`AnyObject`]) are shared handles: cloning one
//! clones the handle, not the contents, so a container may hold a reference
//! to itself. Equality, `Debug` and JSON conversion all terminate on such
//! cyclic graphs.
//!
//! # Examples
//!
//! ```
//! use value_schema_core::{AnyMap, AnyValue, TypeCode};
//!
//! let person = AnyMap::new();
//! person.put("name", "Alice");
//! person.put("age", 30);
//! let value = AnyValue::Map(person.clone());
//!
//! assert_eq!(value.type_code(), TypeCode::Map);
//! assert_eq!(person.get("age"), Some(AnyValue::Integer(30)));
//!
//! // Same shape written as JSON.
//! let parsed = AnyValue::from(serde_json::json!({"name": "Alice", "age": 30}));
//! assert_eq!(value, parsed);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value as Json;

use crate::TypeCode;

/// Lock-protected shared storage behind every container handle.
struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    fn new(inner: T) -> Self {
        Self(Arc::new(RwLock::new(inner)))
    }

    fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum AnyValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Duration(TimeDelta),
    /// Symbolic enumeration value, identified by name.
    Enum(String),
    Array(AnyArray),
    Map(AnyMap),
    Object(AnyObject),
}

impl AnyValue {
    /// Returns `true` for [`AnyValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, AnyValue::Null)
    }

    /// Resolves the coarse type code of this value.
    pub fn type_code(&self) -> TypeCode {
        crate::convert::to_type_code(self)
    }

    /// Returns the string content of `String` and `Enum` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnyValue::String(s) | AnyValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array handle, if this is an array.
    pub fn as_array(&self) -> Option<&AnyArray> {
        match self {
            AnyValue::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Returns the map handle, if this is a map.
    pub fn as_map(&self) -> Option<&AnyMap> {
        match self {
            AnyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the object handle, if this is an object.
    pub fn as_object(&self) -> Option<&AnyObject> {
        match self {
            AnyValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Identity of the underlying container, `None` for scalars.
    pub fn container_id(&self) -> Option<usize> {
        match self {
            AnyValue::Array(array) => Some(array.id()),
            AnyValue::Map(map) => Some(map.id()),
            AnyValue::Object(object) => Some(object.id()),
            _ => None,
        }
    }

    /// Converts the value into JSON.
    ///
    /// Containers already being converted further up the tree become `null`,
    /// date-times are written as RFC 3339 strings and durations as
    /// milliseconds.
    pub fn to_json(&self) -> Json {
        json_of(self, &mut Vec::new())
    }
}

fn json_of(value: &AnyValue, stack: &mut Vec<usize>) -> Json {
    match value {
        AnyValue::Null => Json::Null,
        AnyValue::Boolean(b) => Json::Bool(*b),
        AnyValue::Integer(i) => Json::from(*i),
        AnyValue::Long(l) => Json::from(*l),
        AnyValue::Float(f) => float_json(f64::from(*f)),
        AnyValue::Double(d) => float_json(*d),
        AnyValue::String(s) | AnyValue::Enum(s) => Json::String(s.clone()),
        AnyValue::DateTime(dt) => Json::String(dt.to_rfc3339()),
        AnyValue::Duration(d) => Json::from(d.num_milliseconds()),
        AnyValue::Array(array) => {
            if stack.contains(&array.id()) {
                return Json::Null;
            }
            stack.push(array.id());
            let items = array.values().iter().map(|v| json_of(v, stack)).collect();
            stack.pop();
            Json::Array(items)
        }
        AnyValue::Map(map) => entries_json(map.id(), map.entries(), stack),
        AnyValue::Object(object) => entries_json(object.id(), object.entries(), stack),
    }
}

fn entries_json(id: usize, entries: Vec<(String, AnyValue)>, stack: &mut Vec<usize>) -> Json {
    if stack.contains(&id) {
        return Json::Null;
    }
    stack.push(id);
    let object = entries
        .into_iter()
        .map(|(key, value)| {
            let json = json_of(&value, stack);
            (key, json)
        })
        .collect();
    stack.pop();
    Json::Object(object)
}

fn float_json(value: f64) -> Json {
    serde_json::Number::from_f64(value)
        .map(Json::Number)
        .unwrap_or(Json::Null)
}

impl Serialize for AnyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other, &mut Vec::new())
    }
}

fn integral(value: &AnyValue) -> Option<i64> {
    match value {
        AnyValue::Integer(i) => Some(i64::from(*i)),
        AnyValue::Long(l) => Some(*l),
        _ => None,
    }
}

fn fractional(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Float(f) => Some(f64::from(*f)),
        AnyValue::Double(d) => Some(*d),
        AnyValue::Integer(i) => Some(f64::from(*i)),
        AnyValue::Long(l) => Some(*l as f64),
        _ => None,
    }
}

/// Structural equality. `visiting` holds container pairs currently being
/// compared; meeting one again means the rest of the cycle is equal so far.
fn values_equal(a: &AnyValue, b: &AnyValue, visiting: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (AnyValue::Null, AnyValue::Null) => true,
        (AnyValue::Boolean(x), AnyValue::Boolean(y)) => x == y,
        (AnyValue::String(x), AnyValue::String(y)) => x == y,
        (AnyValue::Enum(x), AnyValue::Enum(y)) => x == y,
        (AnyValue::DateTime(x), AnyValue::DateTime(y)) => x == y,
        (AnyValue::Duration(x), AnyValue::Duration(y)) => x == y,
        (AnyValue::Array(x), AnyValue::Array(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            let key = (x.id(), y.id());
            if visiting.contains(&key) {
                return true;
            }
            let (xs, ys) = (x.values(), y.values());
            if xs.len() != ys.len() {
                return false;
            }
            visiting.push(key);
            let equal = xs
                .iter()
                .zip(ys.iter())
                .all(|(l, r)| values_equal(l, r, visiting));
            visiting.pop();
            equal
        }
        (AnyValue::Map(x), AnyValue::Map(y)) => {
            x.ptr_eq(y) || entries_equal((x.id(), y.id()), x.snapshot(), y.snapshot(), visiting)
        }
        (AnyValue::Object(x), AnyValue::Object(y)) => {
            x.ptr_eq(y) || entries_equal((x.id(), y.id()), x.snapshot(), y.snapshot(), visiting)
        }
        _ => {
            if let (Some(x), Some(y)) = (integral(a), integral(b)) {
                return x == y;
            }
            match (fractional(a), fractional(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
    }
}

fn entries_equal(
    key: (usize, usize),
    xs: IndexMap<String, AnyValue>,
    ys: IndexMap<String, AnyValue>,
    visiting: &mut Vec<(usize, usize)>,
) -> bool {
    if visiting.contains(&key) {
        return true;
    }
    if xs.len() != ys.len() {
        return false;
    }
    visiting.push(key);
    let equal = xs.iter().all(|(name, l)| match ys.get(name) {
        Some(r) => values_equal(l, r, visiting),
        None => false,
    });
    visiting.pop();
    equal
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack = RefCell::new(Vec::new());
        let guarded = Guarded {
            value: self,
            stack: &stack,
        };
        fmt::Debug::fmt(&guarded, f)
    }
}

/// `Debug` adapter that prints a revisited container as `<cycle>`.
struct Guarded<'a> {
    value: &'a AnyValue,
    stack: &'a RefCell<Vec<usize>>,
}

impl Guarded<'_> {
    fn child<'b>(&'b self, value: &'b AnyValue) -> Guarded<'b> {
        Guarded {
            value,
            stack: self.stack,
        }
    }
}

impl fmt::Debug for Guarded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(id) = self.value.container_id() else {
            return match self.value {
                AnyValue::Null => f.write_str("Null"),
                AnyValue::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
                AnyValue::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
                AnyValue::Long(l) => f.debug_tuple("Long").field(l).finish(),
                AnyValue::Float(x) => f.debug_tuple("Float").field(x).finish(),
                AnyValue::Double(x) => f.debug_tuple("Double").field(x).finish(),
                AnyValue::String(s) => f.debug_tuple("String").field(s).finish(),
                AnyValue::DateTime(dt) => f.debug_tuple("DateTime").field(dt).finish(),
                AnyValue::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
                AnyValue::Enum(s) => f.debug_tuple("Enum").field(s).finish(),
                _ => Ok(()),
            };
        };
        if self.stack.borrow().contains(&id) {
            return f.write_str("<cycle>");
        }
        self.stack.borrow_mut().push(id);
        let result = match self.value {
            AnyValue::Array(array) => {
                let values = array.values();
                f.debug_list()
                    .entries(values.iter().map(|v| self.child(v)))
                    .finish()
            }
            AnyValue::Map(map) => {
                let entries = map.snapshot();
                f.debug_map()
                    .entries(entries.iter().map(|(k, v)| (k, self.child(v))))
                    .finish()
            }
            AnyValue::Object(object) => {
                let entries = object.snapshot();
                let mut s = f.debug_struct("Object");
                for (name, value) in &entries {
                    s.field(name, &self.child(value));
                }
                s.finish()
            }
            _ => Ok(()),
        };
        self.stack.borrow_mut().pop();
        result
    }
}

/// Shared, ordered list of values.
#[derive(Clone, Default)]
pub struct AnyArray(Shared<Vec<AnyValue>>);

impl AnyArray {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Returns `true` when there are no elements.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Returns a clone of the element at `index`.
    pub fn get(&self, index: usize) -> Option<AnyValue> {
        self.0.read().get(index).cloned()
    }

    /// Sets the element at `index`, padding with `Null` when writing past the end.
    pub fn set(&self, index: usize, value: impl Into<AnyValue>) {
        let mut values = self.0.write();
        if index >= values.len() {
            values.resize(index + 1, AnyValue::Null);
        }
        values[index] = value.into();
    }

    /// Appends an element.
    pub fn push(&self, value: impl Into<AnyValue>) {
        self.0.write().push(value.into());
    }

    /// Snapshot of the current elements.
    pub fn values(&self) -> Vec<AnyValue> {
        self.0.read().clone()
    }

    /// Identity of the shared storage, used for cycle detection.
    pub fn id(&self) -> usize {
        self.0.id()
    }

    /// Returns `true` when both handles point at the same storage.
    pub fn ptr_eq(&self, other: &AnyArray) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl FromIterator<AnyValue> for AnyArray {
    fn from_iter<I: IntoIterator<Item = AnyValue>>(iter: I) -> Self {
        Self(Shared::new(iter.into_iter().collect()))
    }
}

impl fmt::Debug for AnyArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&AnyValue::Array(self.clone()), f)
    }
}

impl PartialEq for AnyArray {
    fn eq(&self, other: &Self) -> bool {
        AnyValue::Array(self.clone()) == AnyValue::Array(other.clone())
    }
}

/// Shared, insertion-ordered dictionary keyed by strings.
#[derive(Clone, Default)]
pub struct AnyMap(Shared<IndexMap<String, AnyValue>>);

impl AnyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Returns `true` when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Looks a key up by exact name.
    pub fn get(&self, key: &str) -> Option<AnyValue> {
        self.0.read().get(key).cloned()
    }

    /// Returns `true` when `key` is present, matching exactly.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Finds the stored key equal to `name` ignoring ASCII case.
    pub fn find_key(&self, name: &str) -> Option<String> {
        self.0
            .read()
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn put(&self, key: impl Into<String>, value: impl Into<AnyValue>) -> Option<AnyValue> {
        self.0.write().insert(key.into(), value.into())
    }

    /// Removes a key, keeping the order of the remaining entries.
    pub fn remove(&self, key: &str) -> Option<AnyValue> {
        self.0.write().shift_remove(key)
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.read().keys().cloned().collect()
    }

    /// Returns clones of all entries in insertion order.
    pub fn entries(&self) -> Vec<(String, AnyValue)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of the current contents.
    pub fn snapshot(&self) -> IndexMap<String, AnyValue> {
        self.0.read().clone()
    }

    /// Identity of the shared storage, used for cycle detection.
    pub fn id(&self) -> usize {
        self.0.id()
    }

    /// Returns `true` when both handles share storage.
    pub fn ptr_eq(&self, other: &AnyMap) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl<K: Into<String>, V: Into<AnyValue>> FromIterator<(K, V)> for AnyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(Shared::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }
}

impl fmt::Debug for AnyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&AnyValue::Map(self.clone()), f)
    }
}

impl PartialEq for AnyMap {
    fn eq(&self, other: &Self) -> bool {
        AnyValue::Map(self.clone()) == AnyValue::Map(other.clone())
    }
}

/// Shared record of named members.
///
/// Members whose name starts with `_` are private: they are stored and
/// compared, but reflection never exposes them.
#[derive(Clone, Default)]
pub struct AnyObject(AnyMap);

impl AnyObject {
    /// Creates an object with no members.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style member assignment.
    pub fn with(self, name: impl Into<String>, value: impl Into<AnyValue>) -> Self {
        self.0.put(name, value);
        self
    }

    /// Returns a clone of the member `name`.
    pub fn get(&self, name: &str) -> Option<AnyValue> {
        self.0.get(name)
    }

    /// Sets a member and returns the previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<AnyValue>) -> Option<AnyValue> {
        self.0.put(name, value)
    }

    /// Removes a member and returns it.
    pub fn remove(&self, name: &str) -> Option<AnyValue> {
        self.0.remove(name)
    }

    /// Returns the number of members, private ones included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `name` denotes a private member.
    pub fn is_private(name: &str) -> bool {
        name.starts_with('_')
    }

    /// Finds a public member name equal to `name` ignoring ASCII case.
    pub fn find_member(&self, name: &str) -> Option<String> {
        self.public_entries()
            .into_iter()
            .map(|(key, _)| key)
            .find(|key| key.eq_ignore_ascii_case(name))
    }

    /// All members, private ones included.
    pub fn entries(&self) -> Vec<(String, AnyValue)> {
        self.0.entries()
    }

    /// Members visible to reflection.
    pub fn public_entries(&self) -> Vec<(String, AnyValue)> {
        self.0
            .entries()
            .into_iter()
            .filter(|(name, _)| !Self::is_private(name))
            .collect()
    }

    /// Returns a copy of all members, private ones included.
    pub fn snapshot(&self) -> IndexMap<String, AnyValue> {
        self.0.snapshot()
    }

    /// Identity of the shared storage, used for cycle detection.
    pub fn id(&self) -> usize {
        self.0.id()
    }

    /// Returns `true` when both handles share storage.
    pub fn ptr_eq(&self, other: &AnyObject) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl fmt::Debug for AnyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&AnyValue::Object(self.clone()), f)
    }
}

impl PartialEq for AnyObject {
    fn eq(&self, other: &Self) -> bool {
        AnyValue::Object(self.clone()) == AnyValue::Object(other.clone())
    }
}

impl From<Json> for AnyValue {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => AnyValue::Null,
            Json::Bool(b) => AnyValue::Boolean(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i)
                    .map(AnyValue::Integer)
                    .unwrap_or(AnyValue::Long(i)),
                None => AnyValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => AnyValue::String(s),
            Json::Array(items) => AnyValue::Array(items.into_iter().map(AnyValue::from).collect()),
            Json::Object(map) => AnyValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, AnyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for AnyValue {
                fn from(value: $source) -> Self {
                    AnyValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    i32 => Integer,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime<Utc> => DateTime,
    TimeDelta => Duration,
    AnyArray => Array,
    AnyMap => Map,
    AnyObject => Object,
}

impl From<&str> for AnyValue {
    fn from(value: &str) -> Self {
        AnyValue::String(value.to_string())
    }
}

impl From<Vec<AnyValue>> for AnyValue {
    fn from(values: Vec<AnyValue>) -> Self {
        AnyValue::Array(values.into_iter().collect())
    }
}

impl<T: Into<AnyValue>> From<Option<T>> for AnyValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_numbers_pick_narrowest_integer() {
        let value = AnyValue::from(json!([1, 5_000_000_000_i64, 1.5]));
        let items = value.as_array().unwrap().values();
        assert!(matches!(items[0], AnyValue::Integer(1)));
        assert!(matches!(items[1], AnyValue::Long(5_000_000_000)));
        assert!(matches!(items[2], AnyValue::Double(_)));
    }

    #[test]
    fn test_numeric_equality_across_widths() {
        assert_eq!(AnyValue::Integer(3), AnyValue::Long(3));
        assert_eq!(AnyValue::Long(3), AnyValue::Double(3.0));
        assert_ne!(AnyValue::Integer(3), AnyValue::String("3".into()));
    }

    #[test]
    fn test_containers_share_storage() {
        let map = AnyMap::new();
        let alias = map.clone();
        alias.put("a", 1);
        assert_eq!(map.get("a"), Some(AnyValue::Integer(1)));
        assert!(map.ptr_eq(&alias));
    }

    #[test]
    fn test_array_set_pads_with_null() {
        let array = AnyArray::new();
        array.set(2, "x");
        assert_eq!(
            array.values(),
            vec![AnyValue::Null, AnyValue::Null, AnyValue::from("x")]
        );
    }

    #[test]
    fn test_cyclic_values_compare_debug_and_serialize() {
        let first = AnyMap::new();
        first.put("a", 1);
        first.put("self", first.clone());

        let second = AnyMap::new();
        second.put("a", 1);
        second.put("self", second.clone());

        assert_eq!(AnyValue::Map(first.clone()), AnyValue::Map(second));
        assert!(format!("{first:?}").contains("<cycle>"));
        assert_eq!(
            AnyValue::Map(first).to_json(),
            json!({"a": 1, "self": null})
        );
    }

    #[test]
    fn test_object_hides_private_members() {
        let object = AnyObject::new().with("id", 1).with("_secret", "x");
        assert_eq!(object.len(), 2);
        assert_eq!(object.public_entries().len(), 1);
        assert_eq!(object.find_member("ID"), Some("id".to_string()));
        assert_eq!(object.find_member("_secret"), None);
    }

    #[test]
    fn test_map_remove_keeps_order() {
        let map: AnyMap = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        map.remove("b");
        assert_eq!(map.keys(), vec!["a", "c"]);
    }
}
