//! Reconciliation entry points
//!
//! A reconciliation is exactly one diff followed by one apply against the
//! same current store. It is not a convergence loop: callers that want
//! eventual convergence re-run it on their own schedule.

use parking_lot::Mutex;
use settle_core::{ApplyResult, Comparable, Comparator, DefaultComparator, State, StateView};

use crate::{ApplyReport, Applier, Differ, Plan, TraceSink, TracingSink};

/// Reconciliation configuration
#[derive(Clone, Debug, Default)]
pub struct ReconcileConfig {
    /// Trace each action before it is applied
    pub verbose: bool,
}

impl ReconcileConfig {
    /// No per-action trace
    pub fn quiet() -> Self {
        ReconcileConfig { verbose: false }
    }

    /// Trace every action
    pub fn verbose() -> Self {
        ReconcileConfig { verbose: true }
    }
}

/// Diff-then-apply driver with a configurable comparator and trace sink
pub struct Reconciler<'s, C = DefaultComparator> {
    config: ReconcileConfig,
    differ: Differ<C>,
    sink: Option<&'s mut dyn TraceSink>,
}

impl Reconciler<'_> {
    pub fn new(config: ReconcileConfig) -> Self {
        Reconciler {
            config,
            differ: Differ::new(),
            sink: None,
        }
    }
}

impl<'s, C> Reconciler<'s, C> {
    /// Replace the equality strategy
    pub fn comparator<C2>(self, comparator: C2) -> Reconciler<'s, C2> {
        Reconciler {
            config: self.config,
            differ: Differ::with_comparator(comparator),
            sink: self.sink,
        }
    }

    /// Send verbose trace output to `sink` instead of `tracing`
    pub fn sink(mut self, sink: &'s mut dyn TraceSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Detect drift without fixing it
    pub fn check<S, D, V>(&self, current: &S, desired: &D) -> Plan<V>
    where
        S: StateView<Value = V> + ?Sized,
        D: StateView<Value = V> + ?Sized,
        V: Clone,
        C: Comparator<V>,
    {
        self.differ.diff(current, desired)
    }

    /// Diff `current` against `desired` and apply the resulting plan to `current`
    pub fn reconcile<S, D>(
        &mut self,
        current: &mut S,
        desired: &D,
    ) -> ApplyResult<ApplyReport, S::Error>
    where
        S: State + ?Sized,
        D: StateView<Value = S::Value> + ?Sized,
        S::Value: Clone,
        C: Comparator<S::Value>,
    {
        let plan = self.differ.diff(&*current, desired);

        let mut fallback = TracingSink;
        let mut applier = match (self.config.verbose, self.sink.as_deref_mut()) {
            (false, _) => Applier::new(),
            (true, Some(sink)) => Applier::with_sink(sink),
            (true, None) => Applier::with_sink(&mut fallback),
        };
        applier.apply(current, plan)
    }
}

/// Bring `current` in line with `desired` in a single diff and apply pass.
///
/// With `verbose`, each action is emitted as a `tracing` event (target
/// `settle::apply`) before it is applied. Only a failing store mutation can
/// make this return an error.
pub fn reconcile<S, D>(current: &mut S, desired: &D, verbose: bool) -> ApplyResult<ApplyReport, S::Error>
where
    S: State + ?Sized,
    D: StateView<Value = S::Value> + ?Sized,
    S::Value: Comparable + Clone,
{
    Reconciler::new(ReconcileConfig { verbose }).reconcile(current, desired)
}

/// Reconcile shared state, holding its lock across both the diff and the apply.
///
/// Walk-then-mutate is not atomic on its own; concurrent reconciliations of
/// the same store must go through this (or an equivalent external lock).
pub fn reconcile_locked<S, D>(
    current: &Mutex<S>,
    desired: &D,
    verbose: bool,
) -> ApplyResult<ApplyReport, S::Error>
where
    S: State,
    D: StateView<Value = S::Value> + ?Sized,
    S::Value: Comparable + Clone,
{
    let mut guard = current.lock();
    reconcile(&mut *guard, desired, verbose)
}
