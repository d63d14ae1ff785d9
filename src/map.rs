//! Ordered map type for [`Value`](crate::Value) objects.
//!
//! [`ValueMap`] wraps an [`IndexMap`] so members are written in insertion
//! order, which keeps output deterministic and easy to diff.
//!
//! ## Examples
//!
//! ```rust
//! use typetext::{ValueMap, Value};
//!
//! let mut map = ValueMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! assert_eq!(typetext::to_json(&map).unwrap(), r#"{"name":"Alice","age":30}"#);
//! ```

use crate::reflect::{downcast, EntryIter, Reflect, TypeDescriptor};
use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMap(IndexMap<String, Value>);

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value of the key.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

fn value_map_entries(value: &dyn Reflect) -> crate::Result<EntryIter<'_>> {
    let entries: EntryIter<'_> = Box::new(
        downcast::<ValueMap>(value)?
            .iter()
            .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
    );
    Ok(entries)
}

impl Reflect for ValueMap {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::object::<ValueMap>("ValueMap")
            .dictionary::<String, Value>(value_map_entries)
            .build()
    }
}

impl From<HashMap<String, Value>> for ValueMap {
    fn from(map: HashMap<String, Value>) -> Self {
        ValueMap(map.into_iter().collect())
    }
}

impl From<ValueMap> for HashMap<String, Value> {
    fn from(map: ValueMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ValueMap(IndexMap::from_iter(iter))
    }
}
