//! Drift detection - compute the actions that turn current into desired

use settle_core::{Action, ActionKind, Comparator, DefaultComparator, StateView};
use tracing::debug;

/// Ordered list of actions produced by a diff.
///
/// Every create and update precedes every delete.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan<V> {
    actions: Vec<Action<V>>,
}

/// Action counts by kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl PlanSummary {
    pub fn total(&self) -> usize {
        self.creates + self.updates + self.deletes
    }
}

impl<V> Plan<V> {
    /// True when current already matches desired
    pub fn is_converged(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action<V>] {
        &self.actions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action<V>> {
        self.actions.iter()
    }

    /// Find the action planned for a key
    pub fn get(&self, key: &str) -> Option<&Action<V>> {
        self.actions.iter().find(|a| a.key == key)
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for action in &self.actions {
            match action.kind {
                ActionKind::Create => summary.creates += 1,
                ActionKind::Update => summary.updates += 1,
                ActionKind::Delete => summary.deletes += 1,
            }
        }
        summary
    }

    pub fn into_actions(self) -> Vec<Action<V>> {
        self.actions
    }
}

impl<V> Default for Plan<V> {
    fn default() -> Self {
        Plan {
            actions: Vec::new(),
        }
    }
}

impl<V> IntoIterator for Plan<V> {
    type Item = Action<V>;
    type IntoIter = std::vec::IntoIter<Action<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Plan<V> {
    type Item = &'a Action<V>;
    type IntoIter = std::slice::Iter<'a, Action<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Walks desired and current states and plans the actions between them
#[derive(Clone, Debug, Default)]
pub struct Differ<C = DefaultComparator> {
    comparator: C,
}

impl Differ {
    pub fn new() -> Self {
        Differ::default()
    }
}

impl<C> Differ<C> {
    /// Differ using a specific equality strategy
    pub fn with_comparator(comparator: C) -> Self {
        Differ { comparator }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Plan the actions that turn `current` into `desired`.
    ///
    /// Phase 1 walks desired and emits creates and updates. Phase 2 walks
    /// current and emits deletes. Each key is visited at most once per phase.
    pub fn diff<S, D, V>(&self, current: &S, desired: &D) -> Plan<V>
    where
        S: StateView<Value = V> + ?Sized,
        D: StateView<Value = V> + ?Sized,
        V: Clone,
        C: Comparator<V>,
    {
        let mut actions = Vec::new();

        desired.walk(&mut |key, value| match current.get(key) {
            None => actions.push(Action::create(key, value.clone())),
            Some(existing) => {
                if let Err(mismatch) = self.comparator.compare(existing, value) {
                    actions.push(Action::update(key, value.clone(), mismatch.to_string()));
                }
            }
        });

        current.walk(&mut |key, _| {
            if desired.get(key).is_none() {
                actions.push(Action::delete(key));
            }
        });

        let plan = Plan { actions };
        let summary = plan.summary();
        debug!(
            creates = summary.creates,
            updates = summary.updates,
            deletes = summary.deletes,
            "planned reconciliation"
        );
        plan
    }
}

/// Plan the actions that turn `current` into `desired`, preferring checksums
pub fn diff<S, D, V>(current: &S, desired: &D) -> Plan<V>
where
    S: StateView<Value = V> + ?Sized,
    D: StateView<Value = V> + ?Sized,
    V: settle_core::Comparable + Clone,
{
    Differ::new().diff(current, desired)
}
