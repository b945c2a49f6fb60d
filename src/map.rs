//! Ordered member storage for objects.
//!
//! [`Members`] wraps an [`IndexMap`] so an object's own members are written in the
//! order they were assigned. Re-assigning an existing key keeps its position, the
//! same way property order behaves in the host languages this format comes from.
//!
//! ## Examples
//!
//! ```rust
//! use serde_construct::{Members, Value};
//!
//! let mut members = Members::new();
//! members.insert("name".to_string(), Value::from("Alice"));
//! members.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(members.len(), 2);
//! assert_eq!(members.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An ordered map of member names to values.
///
/// # Examples
///
/// ```rust
/// use serde_construct::{Members, Value};
///
/// let mut members = Members::new();
/// members.insert("first".to_string(), Value::from(1));
/// members.insert("second".to_string(), Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = members.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Members(IndexMap<String, Value>);

impl Members {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Members(IndexMap::new())
    }

    /// Creates an empty map with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Members(IndexMap::with_capacity(capacity))
    }

    /// Inserts a member, returning the previous value for the key.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Removes a member, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for Members {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Members {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Members {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Members(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reassignment_keeps_position() {
        let mut members = Members::new();
        members.insert("a".to_string(), Value::from(1));
        members.insert("b".to_string(), Value::from(2));
        members.insert("a".to_string(), Value::from(3));

        let keys: Vec<_> = members.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(members.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut members: Members = [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();
        assert_eq!(members.remove("b"), Some(Value::from(2)));

        let keys: Vec<_> = members.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
