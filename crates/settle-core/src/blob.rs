//! Opaque byte payloads compared by SHA-256 digest

use std::fmt;

use sha2::{Digest, Sha256};

use crate::{Checksummed, Comparable};

/// Serialized blob. Equality goes through its SHA-256 digest.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Blob {
    bytes: Vec<u8>,
}

impl Blob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Blob {
            bytes: bytes.into(),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Checksummed for Blob {
    fn sum(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hasher.finalize().to_vec()
    }
}

impl Comparable for Blob {
    fn checksum(&self) -> Option<Vec<u8>> {
        Some(self.sum())
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Blob::new(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Blob::new(bytes)
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob({} bytes)", self.bytes.len())
    }
}
