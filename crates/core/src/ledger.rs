//! The rental ledger facade.
//!
//! [`RentalLedger`] owns every component and threads them through each
//! other so embedders hold one value instead of five. All mutations take
//! `&mut self`: operations are serialized by construction and each one is
//! atomic with respect to the next. Time never comes from a clock inside
//! the core; every time-dependent operation takes `now` from the caller.

use chrono::{DateTime, Utc};
use renlo_shared::{ActorId, AgreementId, Digest, Money, PropertyId};

use crate::agreement::{AgreementDetails, AgreementRegistry, AgreementStatus, CreateAgreementInput};
use crate::auth::AuthorizationProvider;
use crate::compliance::{ComplianceGate, ComplianceRecord, ComplianceSubject, ComplianceVerifier};
use crate::error::LedgerResult;
use crate::event::{EventLog, LedgerEvent};
use crate::payment::{FundsTransfer, PaymentLedger, PaymentRecord};
use crate::property::{PropertyDetails, PropertyRegistry};

/// Rental-agreement ledger over external authorization, compliance, and
/// funds-transfer capabilities.
#[derive(Debug)]
pub struct RentalLedger<A, V, F> {
    auth: A,
    bank: F,
    properties: PropertyRegistry,
    agreements: AgreementRegistry,
    payments: PaymentLedger,
    gate: ComplianceGate<V>,
    events: EventLog,
}

impl<A, V, F> RentalLedger<A, V, F>
where
    A: AuthorizationProvider,
    V: ComplianceVerifier,
    F: FundsTransfer,
{
    /// Creates an empty ledger over the given capabilities.
    pub fn new(auth: A, verifier: V, bank: F) -> Self {
        Self {
            auth,
            bank,
            properties: PropertyRegistry::new(),
            agreements: AgreementRegistry::new(),
            payments: PaymentLedger::new(),
            gate: ComplianceGate::new(verifier),
            events: EventLog::new(),
        }
    }

    // ===== Properties =====

    /// Registers a property owned by the caller.
    pub fn register_property(
        &mut self,
        caller: ActorId,
        data_hash: Digest,
    ) -> LedgerResult<PropertyId> {
        self.properties
            .register_property(&self.auth, &mut self.events, caller, data_hash)
    }

    /// Returns an immutable snapshot of a property.
    pub fn property_details(&self, id: PropertyId) -> LedgerResult<PropertyDetails> {
        self.properties.property_details(id)
    }

    /// Transfers ownership of a property (current-owner only).
    pub fn transfer_ownership(
        &mut self,
        caller: ActorId,
        id: PropertyId,
        new_owner: ActorId,
    ) -> LedgerResult<()> {
        self.properties.transfer_ownership(caller, id, new_owner)
    }

    /// Toggles a property's active flag (owner only).
    pub fn set_property_active(
        &mut self,
        caller: ActorId,
        id: PropertyId,
        active: bool,
    ) -> LedgerResult<()> {
        self.properties.set_active_status(caller, id, active)
    }

    /// Returns the agreements ever attached to a property, oldest first.
    pub fn agreement_history(&self, id: PropertyId) -> LedgerResult<&[AgreementId]> {
        self.properties.agreement_history(id)
    }

    /// Returns the properties currently owned by an actor.
    #[must_use]
    pub fn properties_of(&self, owner: ActorId) -> &[PropertyId] {
        self.properties.properties_of(owner)
    }

    // ===== Agreements =====

    /// Creates a `Pending` agreement on an active property.
    pub fn create_agreement(
        &mut self,
        caller: ActorId,
        input: CreateAgreementInput,
        now: DateTime<Utc>,
    ) -> LedgerResult<AgreementId> {
        self.agreements.create_agreement(
            &mut self.properties,
            &mut self.gate,
            &mut self.events,
            caller,
            input,
            now,
        )
    }

    /// Terminates an active agreement (either party).
    pub fn terminate_agreement(
        &mut self,
        caller: ActorId,
        id: AgreementId,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        self.agreements
            .terminate_agreement(&mut self.gate, &mut self.events, caller, id, now)
    }

    /// Administratively overrides an agreement's status (privileged).
    pub fn update_agreement_status(
        &mut self,
        caller: ActorId,
        id: AgreementId,
        new_status: AgreementStatus,
    ) -> LedgerResult<()> {
        self.agreements
            .update_agreement_status(&self.auth, &mut self.events, caller, id, new_status)
    }

    /// Appends an amendment digest to an agreement (party only).
    pub fn add_amendment(
        &mut self,
        caller: ActorId,
        id: AgreementId,
        amendment_hash: Digest,
    ) -> LedgerResult<()> {
        self.agreements.add_amendment(caller, id, amendment_hash)
    }

    /// Returns an immutable snapshot of an agreement.
    pub fn agreement_details(&self, id: AgreementId) -> LedgerResult<AgreementDetails> {
        self.agreements.agreement_details(id)
    }

    /// Returns the agreements an actor is party to.
    #[must_use]
    pub fn agreements_of(&self, party: ActorId) -> &[AgreementId] {
        self.agreements.agreements_of(party)
    }

    // ===== Payments =====

    /// Processes a rent payment against an active agreement.
    pub fn process_rent_payment(
        &mut self,
        caller: ActorId,
        id: AgreementId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        self.payments
            .process_rent_payment(&self.agreements, &mut self.events, caller, id, amount, now)
    }

    /// Processes a deposit payment into escrow.
    pub fn process_deposit(
        &mut self,
        caller: ActorId,
        id: AgreementId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        self.payments
            .process_deposit(&self.agreements, &mut self.events, caller, id, amount, now)
    }

    /// Releases escrowed deposit funds to a recipient (privileged).
    pub fn release_deposit(
        &mut self,
        caller: ActorId,
        id: AgreementId,
        amount: Money,
        recipient: ActorId,
    ) -> LedgerResult<()> {
        self.payments.release_deposit(
            &self.auth,
            &mut self.bank,
            &self.agreements,
            &mut self.events,
            caller,
            id,
            amount,
            recipient,
        )
    }

    /// Returns `(outstanding, late_fees)` for an agreement.
    pub fn calculate_outstanding_rent(
        &self,
        id: AgreementId,
        now: DateTime<Utc>,
    ) -> LedgerResult<(Money, Money)> {
        self.payments
            .calculate_outstanding_rent(&self.agreements, id, now)
    }

    /// Assesses the statutory late fee against an agreement (privileged).
    pub fn handle_late_fees(
        &mut self,
        caller: ActorId,
        id: AgreementId,
        now: DateTime<Utc>,
    ) -> LedgerResult<Money> {
        self.payments
            .handle_late_fees(&self.auth, &self.agreements, &mut self.events, caller, id, now)
    }

    /// Returns an agreement's payment records in insertion order.
    #[must_use]
    pub fn payment_history(&self, id: AgreementId) -> &[PaymentRecord] {
        self.payments.payment_history(id)
    }

    /// Returns an agreement's current deposit escrow balance.
    #[must_use]
    pub fn deposit_balance(&self, id: AgreementId) -> Money {
        self.payments.deposit_balance(id)
    }

    /// Returns the total balance currently held in custody.
    #[must_use]
    pub fn custodial_balance(&self) -> Money {
        self.payments.custodial_balance()
    }

    /// Drains the entire custodial balance to a recipient (break-glass).
    pub fn emergency_withdraw(
        &mut self,
        caller: ActorId,
        recipient: ActorId,
    ) -> LedgerResult<Money> {
        self.payments
            .emergency_withdraw(&self.auth, &mut self.bank, caller, recipient)
    }

    // ===== Observation =====

    /// Returns the last known compliance result for a subject.
    #[must_use]
    pub fn compliance_status(&self, subject: ComplianceSubject) -> Option<&ComplianceRecord> {
        self.gate.last_result(subject)
    }

    /// Returns every event emitted so far, in emission order.
    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        self.events.events()
    }

    /// Returns the authorization provider for grant management.
    pub fn authorizer_mut(&mut self) -> &mut A {
        &mut self.auth
    }

    /// Returns the funds-transfer collaborator.
    pub fn bank(&self) -> &F {
        &self.bank
    }
}
