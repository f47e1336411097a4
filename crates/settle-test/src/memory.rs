//! Ordered in-memory store

use std::collections::BTreeMap;

use settle_core::{State, StateView};
use thiserror::Error;

/// Errors reported by the reference stores
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("key already exists: {0}")]
    AlreadyExists(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("mutation rejected: {op} {key}")]
    Rejected { op: String, key: String },
}

/// Store backed by a `BTreeMap`, so walks visit keys in sorted order.
///
/// Mutations are strict: `add` refuses an existing key, `update` and
/// `delete` refuse a missing one. A correct plan never trips these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryState<V> {
    entries: BTreeMap<String, V>,
}

impl<V> MemoryState<V> {
    pub fn new() -> Self {
        MemoryState {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        MemoryState {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Insert or replace without the strictness of the `State` methods
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter()
    }
}

impl<V> Default for MemoryState<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for MemoryState<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MemoryState::from_pairs(iter)
    }
}

impl<V> StateView for MemoryState<V> {
    type Value = V;

    fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    fn walk(&self, visit: &mut dyn FnMut(&str, &V)) {
        for (key, value) in &self.entries {
            visit(key, value);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<V> State for MemoryState<V> {
    type Error = StoreError;

    fn add(&mut self, key: &str, value: V) -> Result<(), StoreError> {
        if self.entries.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn update(&mut self, key: &str, value: V) -> Result<(), StoreError> {
        match self.entries.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_is_sorted_and_stable() {
        let state = MemoryState::from_pairs([("b", 2), ("a", 1), ("c", 3)]);

        assert_eq!(state.keys(), vec!["a", "b", "c"]);
        assert_eq!(state.keys(), state.keys());
    }

    #[test]
    fn test_strict_mutations() {
        let mut state = MemoryState::from_pairs([("a", 1)]);

        assert_eq!(state.add("a", 2), Err(StoreError::AlreadyExists("a".into())));
        assert_eq!(state.update("z", 2), Err(StoreError::NotFound("z".into())));
        assert_eq!(state.delete("z"), Err(StoreError::NotFound("z".into())));

        state.add("b", 2).unwrap();
        state.update("a", 10).unwrap();
        state.delete("b").unwrap();
        assert_eq!(state, MemoryState::from_pairs([("a", 10)]));
    }

    #[test]
    fn test_none_value_is_present() {
        let state = MemoryState::from_pairs([("k", None::<u8>)]);

        assert_eq!(state.get("k"), Some(&None));
        assert_eq!(state.get("missing"), None);
    }
}
