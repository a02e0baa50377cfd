//! Rent and deposit accounting, escrow, late fees.

mod service;
#[cfg(test)]
mod service_props;
mod types;

pub use service::{PaymentLedger, LATE_FEE_PERCENT};
pub use types::{PaymentAccount, PaymentKind, PaymentRecord};

use renlo_shared::{ActorId, Money};
use thiserror::Error;

use crate::error::LedgerError;

/// External funds-transfer capability.
///
/// Synchronous and single-attempt: the core never retries a failed
/// transfer, it surfaces the failure and rolls back its own state.
pub trait FundsTransfer {
    /// Moves `amount` from custody to the recipient.
    fn transfer(&mut self, recipient: ActorId, amount: Money) -> Result<(), TransferFailure>;
}

/// A funds transfer that could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct TransferFailure {
    /// Collaborator-supplied failure reason.
    pub reason: String,
}

impl TransferFailure {
    /// Creates a failure with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<TransferFailure> for LedgerError {
    fn from(failure: TransferFailure) -> Self {
        Self::TransferFailed {
            reason: failure.reason,
        }
    }
}
