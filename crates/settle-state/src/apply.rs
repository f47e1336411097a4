//! Drift repair - dispatch planned actions to the current store

use settle_core::{Action, ActionKind, ApplyError, ApplyResult, State};

use crate::{TraceRecord, TraceSink};

/// Count of mutations performed by an apply pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl ApplyReport {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// True when nothing had to change
    pub fn is_noop(&self) -> bool {
        self.total() == 0
    }
}

/// Applies actions in order, optionally tracing each one first
#[derive(Default)]
pub struct Applier<'s> {
    sink: Option<&'s mut dyn TraceSink>,
}

impl<'s> Applier<'s> {
    pub fn new() -> Self {
        Applier { sink: None }
    }

    /// Trace every action to `sink` before it is dispatched
    pub fn with_sink(sink: &'s mut dyn TraceSink) -> Self {
        Applier { sink: Some(sink) }
    }

    /// Dispatch each action to the matching mutation on `current`.
    ///
    /// Stops at the first failing mutation. Mutations already performed stay
    /// in place and the remaining actions are not attempted.
    pub fn apply<S, I>(&mut self, current: &mut S, actions: I) -> ApplyResult<ApplyReport, S::Error>
    where
        S: State + ?Sized,
        I: IntoIterator<Item = Action<S::Value>>,
    {
        let mut report = ApplyReport::default();

        for (index, action) in actions.into_iter().enumerate() {
            if let Some(sink) = self.sink.as_mut() {
                sink.record(&TraceRecord::from_action(&action));
            }

            let Action {
                key, kind, value, ..
            } = action;

            let result = match (kind, value) {
                (ActionKind::Create, Some(value)) => {
                    current.add(&key, value).map(|()| report.created += 1)
                }
                (ActionKind::Update, Some(value)) => {
                    current.update(&key, value).map(|()| report.updated += 1)
                }
                (ActionKind::Delete, _) => current.delete(&key).map(|()| report.deleted += 1),
                (kind, None) => return Err(ApplyError::MissingValue { index, key, kind }),
            };

            result.map_err(|source| ApplyError::Store {
                index,
                key,
                kind,
                source,
            })?;
        }

        Ok(report)
    }
}

/// Apply actions to `current`, tracing to `sink` when one is given
pub fn apply<S, I>(
    current: &mut S,
    actions: I,
    sink: Option<&mut dyn TraceSink>,
) -> ApplyResult<ApplyReport, S::Error>
where
    S: State + ?Sized,
    I: IntoIterator<Item = Action<S::Value>>,
{
    let mut applier = match sink {
        Some(sink) => Applier::with_sink(sink),
        None => Applier::new(),
    };
    applier.apply(current, actions)
}
