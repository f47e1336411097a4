//! Settle State Engine - Drift detection and repair
//!
//! This crate implements the reconciliation pass:
//! - Diff: compare current against desired and plan actions
//! - Apply: dispatch planned actions to the current store
//! - Trace: optional per-action audit trail
//! - Reconcile: one diff followed by one apply

pub mod apply;
pub mod diff;
pub mod reconcile;
pub mod trace;

pub use apply::*;
pub use diff::*;
pub use reconcile::*;
pub use trace::*;
