//! Actions - one unit of required change

use std::fmt;

/// Kind of change an action requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Key is desired but missing from current
    Create,
    /// Key is in current but not desired
    Delete,
    /// Key is in both and the values differ
    Update,
}

impl ActionKind {
    /// Label used in trace output
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Create => "Create",
            ActionKind::Delete => "Delete",
            ActionKind::Update => "Update",
        }
    }

    /// Whether this action removes a key
    #[inline]
    pub fn is_delete(self) -> bool {
        matches!(self, ActionKind::Delete)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A pending change against the current state, with the reason it was generated.
#[derive(Clone, Debug, PartialEq)]
pub struct Action<V> {
    pub key: String,
    pub kind: ActionKind,
    /// Desired value; `None` for deletes
    pub value: Option<V>,
    pub reason: String,
}

impl<V> Action<V> {
    pub fn create(key: impl Into<String>, value: V) -> Self {
        let key = key.into();
        let reason = format!("key {} absent in current", key);
        Action {
            key,
            kind: ActionKind::Create,
            value: Some(value),
            reason,
        }
    }

    pub fn update(key: impl Into<String>, value: V, reason: impl Into<String>) -> Self {
        Action {
            key: key.into(),
            kind: ActionKind::Update,
            value: Some(value),
            reason: reason.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        let key = key.into();
        let reason = format!("key {} absent in desired", key);
        Action {
            key,
            kind: ActionKind::Delete,
            value: None,
            reason,
        }
    }
}
