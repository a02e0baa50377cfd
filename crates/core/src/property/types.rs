//! Property domain types.

use renlo_shared::{ActorId, AgreementId, Digest, PropertyId};
use serde::Serialize;

/// A registered property.
///
/// Records are owned exclusively by the [`super::PropertyRegistry`];
/// other components see them only through [`PropertyDetails`] snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyRecord {
    /// Registry-assigned id, never reused.
    pub id: PropertyId,
    /// Current owner.
    pub owner: ActorId,
    /// Digest of the off-ledger property details.
    pub data_hash: Digest,
    /// Inactive properties reject new agreements but keep their history.
    pub is_active: bool,
    /// Every agreement ever attached to this property, append-only.
    pub agreement_history: Vec<AgreementId>,
}

/// Immutable snapshot of a property returned by accessor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyDetails {
    /// Current owner.
    pub owner: ActorId,
    /// Digest of the off-ledger property details.
    pub data_hash: Digest,
    /// Whether the property accepts new agreements.
    pub is_active: bool,
}

impl PropertyRecord {
    /// Returns the accessor snapshot for this record.
    #[must_use]
    pub fn details(&self) -> PropertyDetails {
        PropertyDetails {
            owner: self.owner,
            data_hash: self.data_hash,
            is_active: self.is_active,
        }
    }
}
