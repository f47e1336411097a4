//! Keyed state contract
//!
//! A state is a mapping from string keys to opaque values. The reconciler
//! only ever reads a state through [`StateView`] and mutates it through
//! [`State`]; no concrete store lives in this crate.

/// Read side of a keyed store.
///
/// `walk` takes `&self`, so nothing can be added to the store while a walk
/// is running. Values changed as a consequence of a walk are only seen by
/// the next one.
pub trait StateView {
    /// Value bound to each key
    type Value;

    /// Look up a key. `None` is the only signal that a key is absent.
    fn get(&self, key: &str) -> Option<&Self::Value>;

    /// Visit every entry exactly once.
    ///
    /// Two walks of an unchanged store must visit the same keys in the same
    /// order. No ordering is implied across different stores.
    fn walk(&self, visit: &mut dyn FnMut(&str, &Self::Value));

    /// Keys in walk order
    fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.walk(&mut |key, _| keys.push(key.to_string()));
        keys
    }

    /// Number of entries
    fn len(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_, _| n += 1);
        n
    }

    /// Check if the store has no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable keyed store that can be reconciled toward a desired state.
///
/// Mutations must be complete when they return; the reconciler assumes a
/// `get` after a successful `add` observes the new value.
pub trait State: StateView {
    /// Failure reported by the underlying store
    type Error: std::error::Error + 'static;

    /// Bind a value to a key that is not yet present
    fn add(&mut self, key: &str, value: Self::Value) -> Result<(), Self::Error>;

    /// Replace the value bound to an existing key
    fn update(&mut self, key: &str, value: Self::Value) -> Result<(), Self::Error>;

    /// Remove a key
    fn delete(&mut self, key: &str) -> Result<(), Self::Error>;
}

impl<S: StateView + ?Sized> StateView for &S {
    type Value = S::Value;

    fn get(&self, key: &str) -> Option<&Self::Value> {
        (**self).get(key)
    }

    fn walk(&self, visit: &mut dyn FnMut(&str, &Self::Value)) {
        (**self).walk(visit)
    }
}

impl<S: StateView + ?Sized> StateView for &mut S {
    type Value = S::Value;

    fn get(&self, key: &str) -> Option<&Self::Value> {
        (**self).get(key)
    }

    fn walk(&self, visit: &mut dyn FnMut(&str, &Self::Value)) {
        (**self).walk(visit)
    }
}

impl<S: State + ?Sized> State for &mut S {
    type Error = S::Error;

    fn add(&mut self, key: &str, value: Self::Value) -> Result<(), Self::Error> {
        (**self).add(key, value)
    }

    fn update(&mut self, key: &str, value: Self::Value) -> Result<(), Self::Error> {
        (**self).update(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        (**self).delete(key)
    }
}
