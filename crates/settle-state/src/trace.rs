//! Per-action trace output
//!
//! The applier reports each action to a [`TraceSink`] before dispatching it.
//! Sinks are passed in by the caller, so tests can capture the trail
//! without a global logger.

use std::io::Write;

use settle_core::{Action, ActionKind};
use tracing::info;

/// One traced action
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    pub key: String,
    pub kind: ActionKind,
    pub reason: String,
}

impl TraceRecord {
    pub fn from_action<V>(action: &Action<V>) -> Self {
        TraceRecord {
            key: action.key.clone(),
            kind: action.kind,
            reason: action.reason.clone(),
        }
    }
}

/// Receiver for the audit trail of an apply pass
pub trait TraceSink {
    fn record(&mut self, record: &TraceRecord);
}

impl<F: FnMut(&TraceRecord)> TraceSink for F {
    fn record(&mut self, record: &TraceRecord) {
        self(record)
    }
}

/// Emits one `tracing` event per action
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&mut self, record: &TraceRecord) {
        info!(
            target: "settle::apply",
            key = %record.key,
            kind = %record.kind,
            reason = %record.reason,
            "reconcile action"
        );
    }
}

/// Writes a two-line text record per action
///
/// ```text
/// key:b state:Create
///     why:key b absent in current
/// ```
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for WriterSink<W> {
    fn record(&mut self, record: &TraceRecord) {
        // Write failures are ignored
        let _ = writeln!(
            self.writer,
            "key:{} state:{}\n\twhy:{}",
            record.key, record.kind, record.reason
        );
    }
}

/// Keeps every record in memory
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    records: Vec<TraceRecord>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink::default()
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }
}

impl TraceSink for RecordingSink {
    fn record(&mut self, record: &TraceRecord) {
        self.records.push(record.clone());
    }
}
