//! Agreement lifecycle operations.
//!
//! Preconditions are checked in a fixed order and the first failure wins;
//! nothing is mutated until every check (including the external compliance
//! call) has passed.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use renlo_shared::{ActorId, AgreementId, Digest, IdSequence};

use super::types::{AgreementDetails, AgreementRecord, AgreementStatus, CreateAgreementInput};
use crate::auth::{require_permission, AuthorizationProvider, Permission};
use crate::compliance::{ComplianceGate, ComplianceSubject, ComplianceVerifier};
use crate::error::{LedgerError, LedgerResult};
use crate::event::{EventLog, LedgerEvent};
use crate::property::PropertyRegistry;

/// Owned arena of agreement records plus a per-party index.
#[derive(Debug, Default)]
pub struct AgreementRegistry {
    agreements: BTreeMap<AgreementId, AgreementRecord>,
    by_party: HashMap<ActorId, Vec<AgreementId>>,
    ids: IdSequence,
}

impl AgreementRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `Pending` agreement on an active property.
    ///
    /// The caller must be the property's current owner and becomes the
    /// landlord. Compliance is verified against the *property*: the
    /// agreement id does not exist until every check has passed, so the
    /// verifier (and its cache) is keyed by the property id. Emits
    /// `AgreementCreated`.
    pub fn create_agreement<V: ComplianceVerifier>(
        &mut self,
        properties: &mut PropertyRegistry,
        gate: &mut ComplianceGate<V>,
        events: &mut EventLog,
        caller: ActorId,
        input: CreateAgreementInput,
        now: DateTime<Utc>,
    ) -> LedgerResult<AgreementId> {
        let property = properties.property_details(input.property_id)?;
        if !property.is_active {
            return Err(LedgerError::PropertyInactive(input.property_id));
        }
        if property.owner != caller {
            return Err(LedgerError::NotPropertyOwner {
                property: input.property_id,
                caller,
            });
        }
        if input.tenant.is_zero() {
            return Err(LedgerError::ZeroIdentity { field: "tenant" });
        }
        if input.terms_hash.is_zero() {
            return Err(LedgerError::ZeroDigest { field: "terms_hash" });
        }
        if input.start_date <= now {
            return Err(LedgerError::InvalidStartDate);
        }
        if input.end_date <= input.start_date {
            return Err(LedgerError::InvalidEndDate);
        }
        if !input.rent_amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount {
                field: "rent_amount",
            });
        }
        if !input.deposit_amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount {
                field: "deposit_amount",
            });
        }

        gate.require(ComplianceSubject::Property(input.property_id), now)?;

        let id = AgreementId::from_raw(self.ids.allocate());
        self.agreements.insert(
            id,
            AgreementRecord {
                id,
                property_id: input.property_id,
                landlord: caller,
                tenant: input.tenant,
                start_date: input.start_date,
                end_date: input.end_date,
                rent_amount: input.rent_amount,
                deposit_amount: input.deposit_amount,
                status: AgreementStatus::Pending,
                terms_hash: input.terms_hash,
                amendment_hashes: Vec::new(),
            },
        );
        properties.attach_agreement(input.property_id, id)?;
        self.by_party.entry(caller).or_default().push(id);
        self.by_party.entry(input.tenant).or_default().push(id);

        tracing::info!(agreement = %id, property = %input.property_id, "agreement created");
        events.record(LedgerEvent::AgreementCreated {
            agreement_id: id,
            property_id: input.property_id,
            landlord: caller,
            tenant: input.tenant,
            rent_amount: input.rent_amount,
            deposit_amount: input.deposit_amount,
        });
        Ok(id)
    }

    /// Terminates an active agreement.
    ///
    /// Either party may call; only `Active` agreements qualify; compliance
    /// is re-verified (keyed by the agreement) before the transition.
    /// Emits `AgreementStatusUpdated`. Financial settlement is the
    /// caller's responsibility via the payment ledger.
    pub fn terminate_agreement<V: ComplianceVerifier>(
        &mut self,
        gate: &mut ComplianceGate<V>,
        events: &mut EventLog,
        caller: ActorId,
        id: AgreementId,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let record = self.record(id)?;
        if !record.is_party(caller) {
            return Err(LedgerError::NotAgreementParty {
                agreement: id,
                caller,
            });
        }
        if record.status != AgreementStatus::Active {
            return Err(LedgerError::AgreementNotActive {
                agreement: id,
                status: record.status,
            });
        }

        gate.require(ComplianceSubject::Agreement(id), now)?;

        let record = self.record_mut(id)?;
        let old_status = record.status;
        record.status = AgreementStatus::Terminated;

        tracing::info!(agreement = %id, by = %caller, "agreement terminated");
        events.record(LedgerEvent::AgreementStatusUpdated {
            agreement_id: id,
            old_status,
            new_status: AgreementStatus::Terminated,
        });
        Ok(())
    }

    /// Administratively overrides an agreement's status.
    ///
    /// Requires `Permission::UpdateAgreement`. This is the escape hatch
    /// for disputes and corrections: it applies NO transition-table
    /// enforcement, so any status may move to any other, including
    /// reopening a terminal state. It bypasses the state machine's guards
    /// on purpose. Emits `AgreementStatusUpdated`.
    pub fn update_agreement_status(
        &mut self,
        auth: &dyn AuthorizationProvider,
        events: &mut EventLog,
        caller: ActorId,
        id: AgreementId,
        new_status: AgreementStatus,
    ) -> LedgerResult<()> {
        require_permission(auth, caller, Permission::UpdateAgreement)?;
        let record = self.record_mut(id)?;
        let old_status = record.status;
        record.status = new_status;

        tracing::info!(agreement = %id, %old_status, %new_status, "status override");
        events.record(LedgerEvent::AgreementStatusUpdated {
            agreement_id: id,
            old_status,
            new_status,
        });
        Ok(())
    }

    /// Appends an amendment digest to an agreement.
    ///
    /// Party-only. Permitted in any status, terminal ones included;
    /// neither the status nor the terms digest changes.
    pub fn add_amendment(
        &mut self,
        caller: ActorId,
        id: AgreementId,
        amendment_hash: Digest,
    ) -> LedgerResult<()> {
        if amendment_hash.is_zero() {
            return Err(LedgerError::ZeroDigest {
                field: "amendment_hash",
            });
        }
        let record = self.record_mut(id)?;
        if !record.is_party(caller) {
            return Err(LedgerError::NotAgreementParty {
                agreement: id,
                caller,
            });
        }
        record.amendment_hashes.push(amendment_hash);
        Ok(())
    }

    /// Returns an immutable snapshot of an agreement.
    pub fn agreement_details(&self, id: AgreementId) -> LedgerResult<AgreementDetails> {
        self.record(id).map(AgreementRecord::details)
    }

    /// Returns the agreements an actor is party to.
    #[must_use]
    pub fn agreements_of(&self, party: ActorId) -> &[AgreementId] {
        self.by_party.get(&party).map_or(&[], Vec::as_slice)
    }

    fn record(&self, id: AgreementId) -> LedgerResult<&AgreementRecord> {
        self.agreements
            .get(&id)
            .ok_or(LedgerError::AgreementNotFound(id))
    }

    fn record_mut(&mut self, id: AgreementId) -> LedgerResult<&mut AgreementRecord> {
        self.agreements
            .get_mut(&id)
            .ok_or(LedgerError::AgreementNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAuthorizer;
    use chrono::Duration;
    use renlo_shared::Money;

    struct PassVerifier;

    impl ComplianceVerifier for PassVerifier {
        fn verify_compliance(&self, _subject: ComplianceSubject) -> (bool, Digest) {
            (true, Digest::of(b"ok"))
        }
        fn parameters_configured(&self) -> bool {
            true
        }
    }

    struct FailVerifier;

    impl ComplianceVerifier for FailVerifier {
        fn verify_compliance(&self, _subject: ComplianceSubject) -> (bool, Digest) {
            (false, Digest::of(b"violation"))
        }
        fn parameters_configured(&self) -> bool {
            true
        }
    }

    struct Setup {
        auth: StaticAuthorizer,
        properties: PropertyRegistry,
        agreements: AgreementRegistry,
        gate: ComplianceGate<PassVerifier>,
        events: EventLog,
        landlord: ActorId,
        tenant: ActorId,
        property_id: renlo_shared::PropertyId,
        now: DateTime<Utc>,
    }

    fn setup() -> Setup {
        let mut auth = StaticAuthorizer::new();
        let landlord = ActorId::new();
        let tenant = ActorId::new();
        auth.grant_permission(landlord, Permission::RegisterProperty);

        let mut properties = PropertyRegistry::new();
        let mut events = EventLog::new();
        let property_id = properties
            .register_property(&auth, &mut events, landlord, Digest::of(b"house"))
            .unwrap();

        Setup {
            auth,
            properties,
            agreements: AgreementRegistry::new(),
            gate: ComplianceGate::new(PassVerifier),
            events,
            landlord,
            tenant,
            property_id,
            now: Utc::now(),
        }
    }

    fn input(s: &Setup) -> CreateAgreementInput {
        CreateAgreementInput {
            property_id: s.property_id,
            tenant: s.tenant,
            terms_hash: Digest::of(b"terms"),
            start_date: s.now + Duration::days(1),
            end_date: s.now + Duration::days(366),
            rent_amount: Money::from_major(1000),
            deposit_amount: Money::from_major(2000),
        }
    }

    fn create(s: &mut Setup) -> AgreementId {
        let agreement_input = input(s);
        s.agreements
            .create_agreement(
                &mut s.properties,
                &mut s.gate,
                &mut s.events,
                s.landlord,
                agreement_input,
                s.now,
            )
            .unwrap()
    }

    #[test]
    fn test_create_agreement_is_pending() {
        let mut s = setup();
        let id = create(&mut s);

        let details = s.agreements.agreement_details(id).unwrap();
        assert_eq!(details.status, AgreementStatus::Pending);
        assert_eq!(details.landlord, s.landlord);
        assert_eq!(details.tenant, s.tenant);
        assert_eq!(s.properties.agreement_history(s.property_id).unwrap(), &[id]);
        assert_eq!(s.agreements.agreements_of(s.landlord), &[id]);
        assert_eq!(s.agreements.agreements_of(s.tenant), &[id]);
    }

    #[test]
    fn test_create_requires_active_property() {
        let mut s = setup();
        s.properties
            .set_active_status(s.landlord, s.property_id, false)
            .unwrap();

        let agreement_input = input(&s);
        let result = s.agreements.create_agreement(
            &mut s.properties,
            &mut s.gate,
            &mut s.events,
            s.landlord,
            agreement_input,
            s.now,
        );
        assert_eq!(result, Err(LedgerError::PropertyInactive(s.property_id)));
    }

    #[test]
    fn test_create_requires_property_owner() {
        let mut s = setup();
        let stranger = ActorId::new();
        let agreement_input = input(&s);
        let result = s.agreements.create_agreement(
            &mut s.properties,
            &mut s.gate,
            &mut s.events,
            stranger,
            agreement_input,
            s.now,
        );
        assert!(matches!(result, Err(LedgerError::NotPropertyOwner { .. })));
    }

    #[test]
    fn test_create_validates_inputs_in_order() {
        let mut s = setup();

        let mut bad = input(&s);
        bad.tenant = ActorId::ZERO;
        let result = s.agreements.create_agreement(
            &mut s.properties,
            &mut s.gate,
            &mut s.events,
            s.landlord,
            bad,
            s.now,
        );
        assert_eq!(result, Err(LedgerError::ZeroIdentity { field: "tenant" }));

        let mut bad = input(&s);
        bad.terms_hash = Digest::ZERO;
        let result = s.agreements.create_agreement(
            &mut s.properties,
            &mut s.gate,
            &mut s.events,
            s.landlord,
            bad,
            s.now,
        );
        assert_eq!(result, Err(LedgerError::ZeroDigest { field: "terms_hash" }));

        let mut bad = input(&s);
        bad.start_date = s.now - Duration::days(1);
        let result = s.agreements.create_agreement(
            &mut s.properties,
            &mut s.gate,
            &mut s.events,
            s.landlord,
            bad,
            s.now,
        );
        assert_eq!(result, Err(LedgerError::InvalidStartDate));

        let mut bad = input(&s);
        bad.end_date = bad.start_date;
        let result = s.agreements.create_agreement(
            &mut s.properties,
            &mut s.gate,
            &mut s.events,
            s.landlord,
            bad,
            s.now,
        );
        assert_eq!(result, Err(LedgerError::InvalidEndDate));

        let mut bad = input(&s);
        bad.rent_amount = Money::ZERO;
        let result = s.agreements.create_agreement(
            &mut s.properties,
            &mut s.gate,
            &mut s.events,
            s.landlord,
            bad,
            s.now,
        );
        assert_eq!(
            result,
            Err(LedgerError::NonPositiveAmount {
                field: "rent_amount"
            })
        );
    }

    #[test]
    fn test_create_fails_on_compliance_and_stores_nothing() {
        let mut s = setup();
        let mut gate = ComplianceGate::new(FailVerifier);
        let agreement_input = input(&s);

        let result = s.agreements.create_agreement(
            &mut s.properties,
            &mut gate,
            &mut s.events,
            s.landlord,
            agreement_input,
            s.now,
        );
        assert_eq!(
            result,
            Err(LedgerError::ComplianceFailed(ComplianceSubject::Property(
                s.property_id
            )))
        );
        assert!(s.agreements.agreements_of(s.landlord).is_empty());
        assert!(s.properties.agreement_history(s.property_id).unwrap().is_empty());
    }

    #[test]
    fn test_create_compliance_is_keyed_by_property() {
        let mut s = setup();
        create(&mut s);
        // The gate cached the check against the property, not the new agreement.
        assert!(s
            .gate
            .last_result(ComplianceSubject::Property(s.property_id))
            .is_some());
        assert!(s
            .gate
            .last_result(ComplianceSubject::Agreement(AgreementId::from_raw(1)))
            .is_none());
    }

    #[test]
    fn test_terminate_requires_active() {
        let mut s = setup();
        let id = create(&mut s);

        let result =
            s.agreements
                .terminate_agreement(&mut s.gate, &mut s.events, s.tenant, id, s.now);
        assert_eq!(
            result,
            Err(LedgerError::AgreementNotActive {
                agreement: id,
                status: AgreementStatus::Pending,
            })
        );
    }

    #[test]
    fn test_terminate_active_agreement() {
        let mut s = setup();
        let id = create(&mut s);
        let admin = ActorId::new();
        s.auth.grant_permission(admin, Permission::UpdateAgreement);
        s.agreements
            .update_agreement_status(&s.auth, &mut s.events, admin, id, AgreementStatus::Active)
            .unwrap();

        s.agreements
            .terminate_agreement(&mut s.gate, &mut s.events, s.tenant, id, s.now)
            .unwrap();
        assert_eq!(
            s.agreements.agreement_details(id).unwrap().status,
            AgreementStatus::Terminated
        );

        // A second attempt fails: Terminated is terminal.
        let again =
            s.agreements
                .terminate_agreement(&mut s.gate, &mut s.events, s.tenant, id, s.now);
        assert!(matches!(again, Err(LedgerError::AgreementNotActive { .. })));
    }

    #[test]
    fn test_terminate_blocked_by_compliance_keeps_agreement_active() {
        let mut s = setup();
        let id = create(&mut s);
        let admin = ActorId::new();
        s.auth.grant_permission(admin, Permission::UpdateAgreement);
        s.agreements
            .update_agreement_status(&s.auth, &mut s.events, admin, id, AgreementStatus::Active)
            .unwrap();
        let events_before = s.events.len();

        let mut gate = ComplianceGate::new(FailVerifier);
        let result = s.agreements.terminate_agreement(&mut gate, &mut s.events, s.tenant, id, s.now);

        assert_eq!(
            result,
            Err(LedgerError::ComplianceFailed(ComplianceSubject::Agreement(
                id
            )))
        );
        assert_eq!(
            s.agreements.agreement_details(id).unwrap().status,
            AgreementStatus::Active
        );
        assert_eq!(s.events.len(), events_before);
    }

    #[test]
    fn test_terminate_is_party_only() {
        let mut s = setup();
        let id = create(&mut s);
        let stranger = ActorId::new();

        let result =
            s.agreements
                .terminate_agreement(&mut s.gate, &mut s.events, stranger, id, s.now);
        assert!(matches!(result, Err(LedgerError::NotAgreementParty { .. })));
    }

    #[test]
    fn test_override_permits_any_transition() {
        let mut s = setup();
        let id = create(&mut s);
        let admin = ActorId::new();
        s.auth.grant_permission(admin, Permission::UpdateAgreement);

        // Straight to a terminal state, then back out of it: the override
        // deliberately skips the transition table.
        s.agreements
            .update_agreement_status(&s.auth, &mut s.events, admin, id, AgreementStatus::Disputed)
            .unwrap();
        s.agreements
            .update_agreement_status(&s.auth, &mut s.events, admin, id, AgreementStatus::Active)
            .unwrap();
        assert_eq!(
            s.agreements.agreement_details(id).unwrap().status,
            AgreementStatus::Active
        );
    }

    #[test]
    fn test_override_is_privileged() {
        let mut s = setup();
        let id = create(&mut s);

        let result = s.agreements.update_agreement_status(
            &s.auth,
            &mut s.events,
            s.landlord,
            id,
            AgreementStatus::Active,
        );
        assert!(matches!(result, Err(LedgerError::PermissionDenied { .. })));
    }

    #[test]
    fn test_add_amendment_appends_in_order() {
        let mut s = setup();
        let id = create(&mut s);
        let first = Digest::of(b"pets allowed");
        let second = Digest::of(b"rent adjusted");

        s.agreements.add_amendment(s.landlord, id, first).unwrap();
        s.agreements.add_amendment(s.tenant, id, second).unwrap();

        let details = s.agreements.agreement_details(id).unwrap();
        assert_eq!(details.amendment_hashes, vec![first, second]);
        assert_eq!(details.status, AgreementStatus::Pending);
        assert_eq!(
            details.effective_terms_digest(),
            Digest::chain(&[details.terms_hash, first, second])
        );
    }

    #[test]
    fn test_add_amendment_allowed_in_terminal_state() {
        let mut s = setup();
        let id = create(&mut s);
        let admin = ActorId::new();
        s.auth.grant_permission(admin, Permission::UpdateAgreement);
        s.agreements
            .update_agreement_status(
                &s.auth,
                &mut s.events,
                admin,
                id,
                AgreementStatus::Terminated,
            )
            .unwrap();

        s.agreements
            .add_amendment(s.tenant, id, Digest::of(b"settlement"))
            .unwrap();
        assert_eq!(
            s.agreements.agreement_details(id).unwrap().amendment_hashes.len(),
            1
        );
    }

    #[test]
    fn test_add_amendment_rejects_strangers_and_zero() {
        let mut s = setup();
        let id = create(&mut s);

        assert!(matches!(
            s.agreements
                .add_amendment(ActorId::new(), id, Digest::of(b"x")),
            Err(LedgerError::NotAgreementParty { .. })
        ));
        assert_eq!(
            s.agreements.add_amendment(s.tenant, id, Digest::ZERO),
            Err(LedgerError::ZeroDigest {
                field: "amendment_hash"
            })
        );
    }
}
