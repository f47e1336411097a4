//! Error types for reconciliation

use thiserror::Error;

use crate::ActionKind;

/// Number of checksum bytes rendered in a mismatch reason
pub const SUM_PREFIX_LEN: usize = 5;

/// Why two values bound to the same key are not the same.
///
/// A mismatch is the expected signal that drives an update. It ends up as
/// the reason of an `Update` action and is never returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Both values expose a checksum and the checksums differ
    #[error("checksum mismatch: current sum={} != desired sum={}", hex_prefix(.current), hex_prefix(.desired))]
    Checksum { current: Vec<u8>, desired: Vec<u8> },

    /// Fallback equality failed
    #[error("structural mismatch")]
    Structural,
}

impl Mismatch {
    /// Build a checksum mismatch keeping only the diagnostic prefix of each sum
    pub fn checksum(current: &[u8], desired: &[u8]) -> Self {
        Mismatch::Checksum {
            current: current[..current.len().min(SUM_PREFIX_LEN)].to_vec(),
            desired: desired[..desired.len().min(SUM_PREFIX_LEN)].to_vec(),
        }
    }
}

fn hex_prefix(sum: &[u8]) -> String {
    sum.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Applying a plan stopped at one action.
///
/// Actions before `index` were applied and are not rolled back; actions
/// after it were never attempted.
#[derive(Error, Debug)]
pub enum ApplyError<E: std::error::Error + 'static> {
    /// The store rejected the mutation
    #[error("{kind} of key {key} failed at action {index}")]
    Store {
        /// Position of the failing action in the plan
        index: usize,
        key: String,
        kind: ActionKind,
        #[source]
        source: E,
    },

    /// A create or update carried no value to write
    #[error("{kind} of key {key} at action {index} has no value")]
    MissingValue {
        index: usize,
        key: String,
        kind: ActionKind,
    },
}

impl<E: std::error::Error + 'static> ApplyError<E> {
    /// Position of the failing action in the plan
    pub fn index(&self) -> usize {
        match self {
            ApplyError::Store { index, .. } | ApplyError::MissingValue { index, .. } => *index,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            ApplyError::Store { key, .. } | ApplyError::MissingValue { key, .. } => key,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ApplyError::Store { kind, .. } | ApplyError::MissingValue { kind, .. } => *kind,
        }
    }

    /// Error reported by the store, if the store was reached
    pub fn store_error(&self) -> Option<&E> {
        match self {
            ApplyError::Store { source, .. } => Some(source),
            ApplyError::MissingValue { .. } => None,
        }
    }
}

/// Result type for applying a plan to a store
pub type ApplyResult<T, E> = Result<T, ApplyError<E>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_checksum_reason_truncates() {
        let m = Mismatch::checksum(&[0xde, 0xad, 0xbe, 0xef, 0x01, 0x02, 0x03], &[0xca, 0xfe]);

        assert_eq!(
            m.to_string(),
            "checksum mismatch: current sum=deadbeef01 != desired sum=cafe"
        );
    }

    #[test]
    fn test_structural_reason() {
        assert_eq!(Mismatch::Structural.to_string(), "structural mismatch");
    }

    #[test]
    fn test_apply_error_keeps_source() {
        let err = ApplyError::Store {
            index: 2,
            key: "k".into(),
            kind: ActionKind::Update,
            source: std::io::Error::new(std::io::ErrorKind::Other, "read-only"),
        };

        assert_eq!(err.to_string(), "Update of key k failed at action 2");
        assert_eq!(err.source().map(|s| s.to_string()), Some("read-only".into()));
        assert_eq!(err.index(), 2);
        assert_eq!(err.key(), "k");
        assert!(err.store_error().is_some());
    }

    #[test]
    fn test_missing_value_has_no_source() {
        let err: ApplyError<std::io::Error> = ApplyError::MissingValue {
            index: 0,
            key: "x".into(),
            kind: ActionKind::Create,
        };

        assert_eq!(err.to_string(), "Create of key x at action 0 has no value");
        assert_eq!(err.kind(), ActionKind::Create);
        assert!(err.source().is_none());
        assert!(err.store_error().is_none());
    }
}
