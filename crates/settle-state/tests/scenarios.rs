//! End-to-end reconciliation scenarios against the reference stores

use settle_core::{ActionKind, Blob, Checksummed, StateView, Summed};
use settle_state::{
    apply, diff, reconcile, ReconcileConfig, Reconciler, RecordingSink, TraceRecord, WriterSink,
};
use settle_test::{FaultyState, MemoryState, StoreError};

fn kinds<V>(plan: &settle_state::Plan<V>) -> Vec<(String, ActionKind)> {
    plan.iter().map(|a| (a.key.clone(), a.kind)).collect()
}

#[test]
fn create_missing_and_delete_extra() {
    let mut current = MemoryState::from_pairs([("a", 1), ("c", 3)]);
    let desired = MemoryState::from_pairs([("a", 1), ("b", 2)]);

    let plan = diff(&current, &desired);
    assert_eq!(
        kinds(&plan),
        vec![
            ("b".to_string(), ActionKind::Create),
            ("c".to_string(), ActionKind::Delete),
        ]
    );

    apply(&mut current, plan, None).unwrap();
    assert_eq!(current, MemoryState::from_pairs([("a", 1), ("b", 2)]));
}

#[test]
fn populate_empty_current() {
    let mut current = MemoryState::<String>::new();
    let desired = MemoryState::from_pairs([("x", "v".to_string())]);

    reconcile(&mut current, &desired, false).unwrap();

    assert_eq!(current.get("x").map(String::as_str), Some("v"));
}

#[test]
fn update_changed_value_with_verbose_trail() {
    let mut current = MemoryState::from_pairs([("k", "old".to_string())]);
    let desired = MemoryState::from_pairs([("k", "new".to_string())]);
    let mut out = WriterSink::new(Vec::new());

    Reconciler::new(ReconcileConfig::verbose())
        .sink(&mut out)
        .reconcile(&mut current, &desired)
        .unwrap();

    let trail = String::from_utf8(out.into_inner()).unwrap();
    assert_eq!(trail, "key:k state:Update\n\twhy:structural mismatch\n");
    assert_eq!(current.get("k").map(String::as_str), Some("new"));
}

#[test]
fn equal_states_leave_current_untouched() {
    let mut current = MemoryState::from_pairs([("m", 5)]);
    let desired = current.clone();

    let report = reconcile(&mut current, &desired, true).unwrap();

    assert!(report.is_noop());
    assert_eq!(current.get("m"), Some(&5));
}

#[test]
fn checksum_mismatch_names_both_sums() {
    let h1 = Blob::new(vec![0u8; 1024]);
    let h2 = Blob::new(vec![1u8; 1024]);
    let current = MemoryState::from_pairs([("k", h1.clone())]);
    let desired = MemoryState::from_pairs([("k", h2.clone())]);

    let plan = diff(&current, &desired);
    let action = plan.get("k").unwrap();

    let prefix = |b: &Blob| {
        b.sum()[..5]
            .iter()
            .map(|x| format!("{:02x}", x))
            .collect::<String>()
    };
    assert_eq!(action.kind, ActionKind::Update);
    assert_eq!(
        action.reason,
        format!(
            "checksum mismatch: current sum={} != desired sum={}",
            prefix(&h1),
            prefix(&h2)
        )
    );
}

/// Only the version takes part in the checksum
#[derive(Clone, Debug, PartialEq)]
struct Manifest {
    version: u32,
    fetched_at: u64,
}

impl Checksummed for Manifest {
    fn sum(&self) -> Vec<u8> {
        self.version.to_be_bytes().to_vec()
    }
}

#[test]
fn checksum_equality_ignores_unhashed_fields() {
    let mut current = MemoryState::from_pairs([(
        "m",
        Summed(Manifest {
            version: 3,
            fetched_at: 100,
        }),
    )]);
    let desired = MemoryState::from_pairs([(
        "m",
        Summed(Manifest {
            version: 3,
            fetched_at: 200,
        }),
    )]);

    let report = reconcile(&mut current, &desired, false).unwrap();

    assert!(report.is_noop());
    assert_eq!(current.get("m").map(|m| m.0.fetched_at), Some(100));
}

#[test]
fn failing_mutation_surfaces_after_trace() {
    let mut current = FaultyState::new(MemoryState::from_pairs([("a", 1), ("z", 9)]))
        .fail_on(ActionKind::Update, "a");
    let desired = MemoryState::from_pairs([("a", 2), ("b", 3)]);
    let mut sink = RecordingSink::new();

    let err = Reconciler::new(ReconcileConfig::verbose())
        .sink(&mut sink)
        .reconcile(&mut current, &desired)
        .unwrap_err();

    assert_eq!(err.kind(), ActionKind::Update);
    assert_eq!(
        err.store_error(),
        Some(&StoreError::Rejected {
            op: "Update".into(),
            key: "a".into()
        })
    );
    // The failing action is on the trail, the rest of the pass never runs
    assert_eq!(
        sink.records(),
        &[TraceRecord {
            key: "a".into(),
            kind: ActionKind::Update,
            reason: "structural mismatch".into(),
        }]
    );
    assert_eq!(current.get("b"), None);
    assert_eq!(current.get("z"), Some(&9));
}
