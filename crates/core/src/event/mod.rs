//! Append-only event log.
//!
//! Every mutating operation records the events an off-core indexer would
//! consume. The log is strictly append-only: entries are never reordered,
//! rewritten, or compacted.

use chrono::{DateTime, Utc};
use renlo_shared::{ActorId, AgreementId, Digest, Money, PropertyId};
use serde::Serialize;

use crate::agreement::AgreementStatus;
use crate::payment::PaymentKind;

/// Events emitted by the ledger, consumed by off-core indexers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A property was registered.
    PropertyRegistered {
        /// The new property id.
        property_id: PropertyId,
        /// The registering owner.
        owner: ActorId,
        /// Digest of the off-ledger property details.
        data_hash: Digest,
    },
    /// An agreement was created in `Pending` status.
    AgreementCreated {
        /// The new agreement id.
        agreement_id: AgreementId,
        /// The property the agreement references.
        property_id: PropertyId,
        /// The landlord party.
        landlord: ActorId,
        /// The tenant party.
        tenant: ActorId,
        /// Monthly rent.
        rent_amount: Money,
        /// Nominal deposit.
        deposit_amount: Money,
    },
    /// An agreement's status changed.
    AgreementStatusUpdated {
        /// The agreement.
        agreement_id: AgreementId,
        /// Status before the change.
        old_status: AgreementStatus,
        /// Status after the change.
        new_status: AgreementStatus,
    },
    /// A rent payment was processed.
    RentPaymentProcessed {
        /// The agreement paid against.
        agreement_id: AgreementId,
        /// The paying actor.
        payer: ActorId,
        /// The paid amount.
        amount: Money,
        /// When the payment was recorded.
        timestamp: DateTime<Utc>,
    },
    /// A deposit payment was processed into escrow.
    DepositProcessed {
        /// The agreement paid against.
        agreement_id: AgreementId,
        /// The paying actor.
        payer: ActorId,
        /// The paid amount.
        amount: Money,
        /// When the payment was recorded.
        timestamp: DateTime<Utc>,
    },
    /// Escrowed deposit funds were released.
    DepositReleased {
        /// The agreement whose escrow was drawn down.
        agreement_id: AgreementId,
        /// Where the funds went.
        recipient: ActorId,
        /// The released amount.
        amount: Money,
    },
    /// A late fee was added to an agreement's outstanding balance.
    LateFeeCharged {
        /// The agreement.
        agreement_id: AgreementId,
        /// The assessed fee.
        amount: Money,
    },
    /// A payment record was confirmed.
    PaymentConfirmed {
        /// The agreement.
        agreement_id: AgreementId,
        /// Rent, deposit, or late fee.
        kind: PaymentKind,
        /// The confirmed amount.
        amount: Money,
    },
    /// An agreement's balances changed.
    BalanceUpdated {
        /// The agreement.
        agreement_id: AgreementId,
        /// Outstanding rent after the change.
        outstanding_balance: Money,
        /// Deposit escrow after the change.
        deposit_balance: Money,
    },
}

/// Append-only sequence of [`LedgerEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&mut self, event: LedgerEvent) {
        tracing::debug!(?event, "ledger event");
        self.events.push(event);
    }

    /// Returns all recorded events in insertion order.
    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Returns the most recent event, if any.
    #[must_use]
    pub fn last(&self) -> Option<&LedgerEvent> {
        self.events.last()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
