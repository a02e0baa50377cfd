//! Typed IDs for type-safe entity references.
//!
//! Registries assign ids from an [`IdSequence`]: monotonically increasing,
//! starting at 1, never reused. Using typed wrappers prevents accidentally
//! passing a `PropertyId` where an `AgreementId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers over `u64`.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Creates an ID from a raw value.
            #[must_use]
            pub const fn from_raw(value: u64) -> Self {
                Self(value)
            }

            /// Returns the inner value.
            #[must_use]
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

typed_id!(PropertyId, "Unique identifier for a registered property.");
typed_id!(AgreementId, "Unique identifier for a rental agreement.");

/// Monotonic id allocator owned by a registry.
///
/// Ids start at 1 and strictly increase; a value handed out is never
/// handed out again, even after the owning record reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Creates a sequence whose first id will be 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocates the next id.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Returns the next id that would be allocated, without allocating it.
    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
