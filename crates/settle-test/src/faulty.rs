//! Store wrapper that rejects chosen mutations

use settle_core::{ActionKind, State, StateView};

use crate::StoreError;

/// Wraps another store and rejects mutations matching a fault rule.
pub struct FaultyState<S> {
    inner: S,
    faults: Vec<(ActionKind, String)>,
    /// Mutations that reached the inner store
    pub attempts: u32,
}

impl<S> FaultyState<S> {
    pub fn new(inner: S) -> Self {
        FaultyState {
            inner,
            faults: Vec::new(),
            attempts: 0,
        }
    }

    /// Reject `kind` mutations of `key`
    pub fn fail_on(mut self, kind: ActionKind, key: impl Into<String>) -> Self {
        self.faults.push((kind, key.into()));
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn check(&self, kind: ActionKind, key: &str) -> Result<(), StoreError> {
        if self.faults.iter().any(|(k, f)| *k == kind && f == key) {
            return Err(StoreError::Rejected {
                op: kind.to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl<S: StateView> StateView for FaultyState<S> {
    type Value = S::Value;

    fn get(&self, key: &str) -> Option<&Self::Value> {
        self.inner.get(key)
    }

    fn walk(&self, visit: &mut dyn FnMut(&str, &Self::Value)) {
        self.inner.walk(visit)
    }
}

impl<S> State for FaultyState<S>
where
    S: State,
    StoreError: From<S::Error>,
{
    type Error = StoreError;

    fn add(&mut self, key: &str, value: Self::Value) -> Result<(), StoreError> {
        self.check(ActionKind::Create, key)?;
        self.attempts += 1;
        Ok(self.inner.add(key, value)?)
    }

    fn update(&mut self, key: &str, value: Self::Value) -> Result<(), StoreError> {
        self.check(ActionKind::Update, key)?;
        self.attempts += 1;
        Ok(self.inner.update(key, value)?)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.check(ActionKind::Delete, key)?;
        self.attempts += 1;
        Ok(self.inner.delete(key)?)
    }
}
