//! Agreement domain types.

use chrono::{DateTime, Utc};
use renlo_shared::{ActorId, AgreementId, Digest, Money, PropertyId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LedgerError;

/// Agreement status lifecycle.
///
/// The normal machine is `Pending → Active → {Terminated, Expired,
/// Disputed}`. Activation is an explicit privileged call, never automatic
/// on creation, and `Expired` is only ever reached the same way: the core
/// never self-triggers on wall-clock time. The three right-hand states are
/// terminal for every operation except amendment recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementStatus {
    /// Created, awaiting out-of-band activation.
    Pending,
    /// In force; payments are accepted.
    Active,
    /// Ended by a party before the end date.
    Terminated,
    /// Ran past its end date.
    Expired,
    /// Under dispute.
    Disputed,
}

impl AgreementStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Terminated => "terminated",
            Self::Expired => "expired",
            Self::Disputed => "disputed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "terminated" => Some(Self::Terminated),
            "expired" => Some(Self::Expired),
            "disputed" => Some(Self::Disputed),
            _ => None,
        }
    }

    /// Returns true if no further lifecycle transition is permitted.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::Expired | Self::Disputed)
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<u8> for AgreementStatus {
    type Error = LedgerError;

    /// Decodes a wire status code; out-of-range codes are invalid input.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Active),
            2 => Ok(Self::Terminated),
            3 => Ok(Self::Expired),
            4 => Ok(Self::Disputed),
            other => Err(LedgerError::InvalidStatusCode(other)),
        }
    }
}

/// A rental agreement.
///
/// Owned exclusively by the [`super::AgreementRegistry`]; other components
/// read it through [`AgreementDetails`] snapshots. Never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct AgreementRecord {
    /// Registry-assigned id, never reused.
    pub id: AgreementId,
    /// The property this agreement references.
    pub property_id: PropertyId,
    /// The landlord party (property owner at creation time).
    pub landlord: ActorId,
    /// The tenant party.
    pub tenant: ActorId,
    /// Tenancy start.
    pub start_date: DateTime<Utc>,
    /// Tenancy end.
    pub end_date: DateTime<Utc>,
    /// Monthly rent.
    pub rent_amount: Money,
    /// Nominal deposit.
    pub deposit_amount: Money,
    /// Current lifecycle status.
    pub status: AgreementStatus,
    /// Digest of the full textual terms.
    pub terms_hash: Digest,
    /// Ordered amendment digests, append-only.
    pub amendment_hashes: Vec<Digest>,
}

impl AgreementRecord {
    /// Returns true if the actor is landlord or tenant.
    #[must_use]
    pub fn is_party(&self, actor: ActorId) -> bool {
        actor == self.landlord || actor == self.tenant
    }

    /// Returns the accessor snapshot for this record.
    #[must_use]
    pub fn details(&self) -> AgreementDetails {
        AgreementDetails {
            property_id: self.property_id,
            landlord: self.landlord,
            tenant: self.tenant,
            start_date: self.start_date,
            end_date: self.end_date,
            rent_amount: self.rent_amount,
            deposit_amount: self.deposit_amount,
            status: self.status,
            terms_hash: self.terms_hash,
            amendment_hashes: self.amendment_hashes.clone(),
        }
    }
}

/// Immutable snapshot of an agreement returned by accessor reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgreementDetails {
    /// The property this agreement references.
    pub property_id: PropertyId,
    /// The landlord party.
    pub landlord: ActorId,
    /// The tenant party.
    pub tenant: ActorId,
    /// Tenancy start.
    pub start_date: DateTime<Utc>,
    /// Tenancy end.
    pub end_date: DateTime<Utc>,
    /// Monthly rent.
    pub rent_amount: Money,
    /// Nominal deposit.
    pub deposit_amount: Money,
    /// Current lifecycle status.
    pub status: AgreementStatus,
    /// Digest of the full textual terms.
    pub terms_hash: Digest,
    /// Ordered amendment digests.
    pub amendment_hashes: Vec<Digest>,
}

impl AgreementDetails {
    /// Folds the terms digest and every amendment, in order, into one
    /// digest identifying the agreement's effective terms.
    #[must_use]
    pub fn effective_terms_digest(&self) -> Digest {
        let mut parts = Vec::with_capacity(1 + self.amendment_hashes.len());
        parts.push(self.terms_hash);
        parts.extend_from_slice(&self.amendment_hashes);
        Digest::chain(&parts)
    }
}

/// Input for creating a new agreement.
#[derive(Debug, Clone)]
pub struct CreateAgreementInput {
    /// The property to attach the agreement to.
    pub property_id: PropertyId,
    /// The tenant party.
    pub tenant: ActorId,
    /// Digest of the full textual terms.
    pub terms_hash: Digest,
    /// Tenancy start, must be in the future.
    pub start_date: DateTime<Utc>,
    /// Tenancy end, must follow the start.
    pub end_date: DateTime<Utc>,
    /// Monthly rent, must be positive.
    pub rent_amount: Money,
    /// Nominal deposit, must be positive.
    pub deposit_amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            AgreementStatus::Pending,
            AgreementStatus::Active,
            AgreementStatus::Terminated,
            AgreementStatus::Expired,
            AgreementStatus::Disputed,
        ] {
            assert_eq!(AgreementStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AgreementStatus::parse("signed"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AgreementStatus::Pending.is_terminal());
        assert!(!AgreementStatus::Active.is_terminal());
        assert!(AgreementStatus::Terminated.is_terminal());
        assert!(AgreementStatus::Expired.is_terminal());
        assert!(AgreementStatus::Disputed.is_terminal());
    }

    #[test]
    fn test_status_code_decode() {
        assert_eq!(AgreementStatus::try_from(0), Ok(AgreementStatus::Pending));
        assert_eq!(AgreementStatus::try_from(4), Ok(AgreementStatus::Disputed));
        assert_eq!(
            AgreementStatus::try_from(5),
            Err(LedgerError::InvalidStatusCode(5))
        );
    }
}
