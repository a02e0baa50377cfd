//! Actor identities.
//!
//! An actor is an authenticated identity (landlord, tenant, broker, admin)
//! issuing operations. Authentication itself happens outside the core; the
//! ledger only compares identities and rejects the zero identity as a party.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated actor identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// The zero identity, never a valid party.
    pub const ZERO: Self = Self(Uuid::nil());

    /// Creates a new random identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identity from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns true if this is the zero identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_identity() {
        assert!(ActorId::ZERO.is_zero());
        assert!(!ActorId::new().is_zero());
    }

    #[test]
    fn test_random_identities_are_distinct() {
        assert_ne!(ActorId::new(), ActorId::new());
    }

    #[test]
    fn test_from_uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let actor = ActorId::from_uuid(uuid);
        assert_eq!(actor.0, uuid);
        assert_eq!(actor.to_string(), uuid.to_string());
    }
}
