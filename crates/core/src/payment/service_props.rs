//! Property tests for escrow conservation.

use chrono::Duration;
use proptest::prelude::*;
use renlo_shared::{ActorId, AgreementId, Digest, Money};

use super::service::PaymentLedger;
use super::{FundsTransfer, TransferFailure};
use crate::agreement::{AgreementRegistry, AgreementStatus, CreateAgreementInput};
use crate::auth::{Permission, StaticAuthorizer};
use crate::compliance::{ComplianceGate, ComplianceSubject, ComplianceVerifier};
use crate::event::EventLog;
use crate::property::PropertyRegistry;

struct PassVerifier;

impl ComplianceVerifier for PassVerifier {
    fn verify_compliance(&self, _subject: ComplianceSubject) -> (bool, Digest) {
        (true, Digest::of(b"ok"))
    }
    fn parameters_configured(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct SinkBank {
    received: Money,
}

impl FundsTransfer for SinkBank {
    fn transfer(&mut self, _recipient: ActorId, amount: Money) -> Result<(), TransferFailure> {
        self.received += amount;
        Ok(())
    }
}

struct Escrow {
    auth: StaticAuthorizer,
    agreements: AgreementRegistry,
    ledger: PaymentLedger,
    events: EventLog,
    tenant: ActorId,
    manager: ActorId,
    agreement_id: AgreementId,
}

/// Active agreement with a one-unit nominal deposit so any positive
/// deposit amount clears the minimum check.
fn escrow() -> Escrow {
    let mut auth = StaticAuthorizer::new();
    let landlord = ActorId::new();
    let tenant = ActorId::new();
    let manager = ActorId::new();
    auth.grant_permission(landlord, Permission::RegisterProperty);
    auth.grant_permission(manager, Permission::UpdateAgreement);
    auth.grant_permission(manager, Permission::ReleaseDeposit);

    let mut properties = PropertyRegistry::new();
    let mut agreements = AgreementRegistry::new();
    let mut gate = ComplianceGate::new(PassVerifier);
    let mut events = EventLog::new();
    let now = chrono::Utc::now();
    let start = now + Duration::days(1);

    let property_id = properties
        .register_property(&auth, &mut events, landlord, Digest::of(b"flat"))
        .unwrap();
    let agreement_id = agreements
        .create_agreement(
            &mut properties,
            &mut gate,
            &mut events,
            landlord,
            CreateAgreementInput {
                property_id,
                tenant,
                terms_hash: Digest::of(b"terms"),
                start_date: start,
                end_date: start + Duration::days(365),
                rent_amount: Money::from_major(1),
                deposit_amount: Money::from_major(1),
            },
            now,
        )
        .unwrap();
    agreements
        .update_agreement_status(&auth, &mut events, manager, agreement_id, AgreementStatus::Active)
        .unwrap();

    Escrow {
        auth,
        agreements,
        ledger: PaymentLedger::new(),
        events,
        tenant,
        manager,
        agreement_id,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// After any mix of deposits and release attempts the escrow balance
    /// equals deposits minus the releases that succeeded, a release
    /// succeeds exactly when it fits the balance, and the bank received
    /// exactly the released total.
    #[test]
    fn prop_escrow_is_conserved(
        deposits in prop::collection::vec(1i64..10_000, 1..5),
        releases in prop::collection::vec(1i64..15_000, 0..8),
    ) {
        let mut e = escrow();
        let mut bank = SinkBank::default();
        let now = chrono::Utc::now();

        let mut expected = Money::ZERO;
        for amount in &deposits {
            e.ledger
                .process_deposit(
                    &e.agreements,
                    &mut e.events,
                    e.tenant,
                    e.agreement_id,
                    Money::from_major(*amount),
                    now,
                )
                .unwrap();
            expected += Money::from_major(*amount);
        }

        let mut released = Money::ZERO;
        for amount in &releases {
            let amount = Money::from_major(*amount);
            let result = e.ledger.release_deposit(
                &e.auth,
                &mut bank,
                &e.agreements,
                &mut e.events,
                e.manager,
                e.agreement_id,
                amount,
                e.tenant,
            );
            if amount <= expected {
                prop_assert!(result.is_ok());
                expected -= amount;
                released += amount;
            } else {
                prop_assert!(result.is_err());
            }
        }

        prop_assert_eq!(e.ledger.deposit_balance(e.agreement_id), expected);
        prop_assert_eq!(e.ledger.custodial_balance(), expected);
        prop_assert_eq!(bank.received, released);
    }
}
