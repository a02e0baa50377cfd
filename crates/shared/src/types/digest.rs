//! Opaque content digests.
//!
//! Digests are produced by an external hasher over off-ledger content
//! (property details, agreement terms, amendments, compliance evidence).
//! The ledger never inspects their structure; it only compares them and
//! rejects the all-zero digest where a real one is required.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

/// A fixed-width opaque content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    /// The all-zero digest, never valid as real content.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a digest from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true if this is the all-zero digest.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Hashes arbitrary bytes into a digest.
    #[must_use]
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hasher.finalize().into())
    }

    /// Folds an ordered sequence of digests into one.
    ///
    /// Deterministic for equal ordered input; reordering the parts
    /// produces a different result (the fold is non-commutative).
    #[must_use]
    pub fn chain(parts: &[Self]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.0);
        }
        Self(hasher.finalize().into())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
