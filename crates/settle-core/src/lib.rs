//! Settle Core - Fundamental types for state reconciliation
//!
//! This crate defines the pieces every reconciliation pass is built from:
//! - The keyed state contract (`StateView`, `State`)
//! - Value equality (`Comparable`, `Checksummed`, `Comparator`)
//! - Actions produced by a diff
//! - Error types

pub mod action;
pub mod blob;
pub mod compare;
pub mod error;
pub mod state;

pub use action::*;
pub use blob::*;
pub use compare::*;
pub use error::*;
pub use state::*;
