//! Ledger error taxonomy.
//!
//! Every operation fails synchronously with one of these errors and leaves
//! all entity state exactly as it was before the call. There are no
//! automatic retries inside the core; retry policy belongs to the caller.

use renlo_shared::{ActorId, AgreementId, Money, PropertyId};
use thiserror::Error;

use crate::agreement::AgreementStatus;
use crate::auth::Permission;
use crate::compliance::ComplianceSubject;

/// Result type alias using `LedgerError`.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Authorization ==========
    /// Caller lacks the required permission.
    #[error("Actor {actor} lacks permission {permission:?}")]
    PermissionDenied {
        /// The calling actor.
        actor: ActorId,
        /// The permission that was required.
        permission: Permission,
    },

    // ========== Lookup ==========
    /// Property not found.
    #[error("Property not found: {0}")]
    PropertyNotFound(PropertyId),

    /// Agreement not found.
    #[error("Agreement not found: {0}")]
    AgreementNotFound(AgreementId),

    // ========== Input ==========
    /// A required digest was the all-zero digest.
    #[error("Digest for {field} must not be zero")]
    ZeroDigest {
        /// Which input carried the zero digest.
        field: &'static str,
    },

    /// A required identity was the zero identity.
    #[error("Identity for {field} must not be zero")]
    ZeroIdentity {
        /// Which input carried the zero identity.
        field: &'static str,
    },

    /// An amount that must be positive was zero or negative.
    #[error("Amount for {field} must be positive")]
    NonPositiveAmount {
        /// Which input carried the non-positive amount.
        field: &'static str,
    },

    /// A status code outside the agreement status enum range.
    #[error("Invalid agreement status code: {0}")]
    InvalidStatusCode(u8),

    // ========== Ownership / party ==========
    /// Caller is not the owner of the property.
    #[error("Actor {caller} is not the owner of property {property}")]
    NotPropertyOwner {
        /// The property in question.
        property: PropertyId,
        /// The calling actor.
        caller: ActorId,
    },

    /// Caller is neither landlord nor tenant of the agreement.
    #[error("Actor {caller} is not a party to agreement {agreement}")]
    NotAgreementParty {
        /// The agreement in question.
        agreement: AgreementId,
        /// The calling actor.
        caller: ActorId,
    },

    // ========== Dates ==========
    /// Start date is not in the future.
    #[error("Start date must be in the future")]
    InvalidStartDate,

    /// End date is not after the start date.
    #[error("End date must be after the start date")]
    InvalidEndDate,

    // ========== State ==========
    /// Property is inactive and rejects new agreements.
    #[error("Property {0} is inactive")]
    PropertyInactive(PropertyId),

    /// Operation requires an active agreement.
    #[error("Agreement {agreement} is {status}, expected active")]
    AgreementNotActive {
        /// The agreement in question.
        agreement: AgreementId,
        /// Its current status.
        status: AgreementStatus,
    },

    // ========== Payments ==========
    /// Payment amount below the required minimum.
    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment {
        /// The minimum the operation requires.
        required: Money,
        /// What the caller provided.
        provided: Money,
    },

    /// Requested release exceeds the available balance.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// The balance currently held.
        available: Money,
        /// What the caller requested.
        requested: Money,
    },

    // ========== Compliance ==========
    /// The external compliance verifier rejected the entity.
    #[error("Compliance verification failed for {0:?}")]
    ComplianceFailed(ComplianceSubject),

    /// Compliance parameters were never configured.
    #[error("Compliance parameters have not been configured")]
    ComplianceNotConfigured,

    // ========== Transfer ==========
    /// The external funds transfer could not complete.
    #[error("Funds transfer failed: {reason}")]
    TransferFailed {
        /// Collaborator-supplied failure reason.
        reason: String,
    },
}

impl LedgerError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::PropertyNotFound(_) | Self::AgreementNotFound(_) => "NOT_FOUND",
            Self::ZeroDigest { .. }
            | Self::ZeroIdentity { .. }
            | Self::NonPositiveAmount { .. }
            | Self::InvalidStatusCode(_) => "INVALID_INPUT",
            Self::NotPropertyOwner { .. } => "NOT_PROPERTY_OWNER",
            Self::NotAgreementParty { .. } => "NOT_AGREEMENT_PARTY",
            Self::InvalidStartDate => "INVALID_START_DATE",
            Self::InvalidEndDate => "INVALID_END_DATE",
            Self::PropertyInactive(_) | Self::AgreementNotActive { .. } => "INVALID_STATE",
            Self::InsufficientPayment { .. } => "INSUFFICIENT_PAYMENT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::ComplianceFailed(_) => "COMPLIANCE_FAILED",
            Self::ComplianceNotConfigured => "COMPLIANCE_NOT_CONFIGURED",
            Self::TransferFailed { .. } => "TRANSFER_FAILED",
        }
    }
}
