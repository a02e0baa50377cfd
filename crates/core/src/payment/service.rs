//! Payment ledger operations.
//!
//! Balances are recomputed from the record sequence on every mutation;
//! every check runs before the first write so a failed call leaves the
//! account untouched. The one compensating action in the module is the
//! deposit-release rollback when the external transfer fails.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use renlo_shared::{ActorId, AgreementId, Money};
use rust_decimal::Decimal;

use super::types::{PaymentAccount, PaymentKind, PaymentRecord};
use super::FundsTransfer;
use crate::agreement::{AgreementDetails, AgreementRegistry, AgreementStatus};
use crate::auth::{require_permission, AuthorizationProvider, Permission};
use crate::error::{LedgerError, LedgerResult};
use crate::event::{EventLog, LedgerEvent};
use crate::validation::{statutory_late_fee, GRACE_PERIOD_DAYS};

/// Flat late-fee percent reported by outstanding-rent reads.
///
/// Distinct from `validation::STATUTORY_ANNUAL_RATE_BPS` (the 11.85%
/// statutory formula used by late-fee assessment); the two constants are
/// deliberately not unified.
pub const LATE_FEE_PERCENT: i64 = 10;

/// Days per accounting month when deriving expected cumulative rent.
const DAYS_PER_MONTH: i64 = 30;

/// Per-agreement payment accounts and the custodial escrow balance.
#[derive(Debug, Default)]
pub struct PaymentLedger {
    accounts: HashMap<AgreementId, PaymentAccount>,
    custodial_balance: Money,
}

impl PaymentLedger {
    /// Creates an empty payment ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a rent payment against an active agreement.
    ///
    /// Only the current monthly rent is checked as the minimum: paying
    /// more than one month, or less than the accumulated arrears, is still
    /// accepted as a single rent record. Emits `RentPaymentProcessed`,
    /// `PaymentConfirmed`, `BalanceUpdated`.
    pub fn process_rent_payment(
        &mut self,
        agreements: &AgreementRegistry,
        events: &mut EventLog,
        caller: ActorId,
        id: AgreementId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let agreement = require_active(agreements, id)?;
        if amount < agreement.rent_amount {
            return Err(LedgerError::InsufficientPayment {
                required: agreement.rent_amount,
                provided: amount,
            });
        }

        let account = self.accounts.entry(id).or_default();
        account.records.push(PaymentRecord {
            timestamp: now,
            amount,
            kind: PaymentKind::Rent,
            confirmed: true,
        });
        account.last_payment_date = Some(now);

        // Expected cumulative rent covers every started accounting month.
        let months_elapsed = (now - agreement.start_date).num_days() / DAYS_PER_MONTH;
        let expected = agreement.rent_amount * (months_elapsed + 1);
        account.outstanding_balance = expected.saturating_sub(account.total_rent_paid());
        let balances = (account.outstanding_balance, account.deposit_balance);

        tracing::info!(agreement = %id, %amount, "rent payment processed");
        events.record(LedgerEvent::RentPaymentProcessed {
            agreement_id: id,
            payer: caller,
            amount,
            timestamp: now,
        });
        events.record(LedgerEvent::PaymentConfirmed {
            agreement_id: id,
            kind: PaymentKind::Rent,
            amount,
        });
        events.record(LedgerEvent::BalanceUpdated {
            agreement_id: id,
            outstanding_balance: balances.0,
            deposit_balance: balances.1,
        });
        Ok(())
    }

    /// Processes a deposit payment into escrow.
    ///
    /// The full paid amount is credited, even past the nominal deposit.
    /// Emits `DepositProcessed`, `PaymentConfirmed`, `BalanceUpdated`.
    pub fn process_deposit(
        &mut self,
        agreements: &AgreementRegistry,
        events: &mut EventLog,
        caller: ActorId,
        id: AgreementId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let agreement = require_active(agreements, id)?;
        if amount < agreement.deposit_amount {
            return Err(LedgerError::InsufficientPayment {
                required: agreement.deposit_amount,
                provided: amount,
            });
        }

        let account = self.accounts.entry(id).or_default();
        account.records.push(PaymentRecord {
            timestamp: now,
            amount,
            kind: PaymentKind::Deposit,
            confirmed: true,
        });
        account.last_payment_date = Some(now);
        account.deposit_balance += amount;
        self.custodial_balance += amount;
        let balances = (account.outstanding_balance, account.deposit_balance);

        tracing::info!(agreement = %id, %amount, "deposit processed");
        events.record(LedgerEvent::DepositProcessed {
            agreement_id: id,
            payer: caller,
            amount,
            timestamp: now,
        });
        events.record(LedgerEvent::PaymentConfirmed {
            agreement_id: id,
            kind: PaymentKind::Deposit,
            amount,
        });
        events.record(LedgerEvent::BalanceUpdated {
            agreement_id: id,
            outstanding_balance: balances.0,
            deposit_balance: balances.1,
        });
        Ok(())
    }

    /// Releases escrowed deposit funds to a recipient.
    ///
    /// Privileged. All-or-nothing: when the external transfer fails the
    /// balance decrement is rolled back and `TransferFailed` surfaces.
    /// Emits `DepositReleased`, `BalanceUpdated`.
    #[allow(clippy::too_many_arguments)]
    pub fn release_deposit(
        &mut self,
        auth: &dyn AuthorizationProvider,
        bank: &mut dyn FundsTransfer,
        agreements: &AgreementRegistry,
        events: &mut EventLog,
        caller: ActorId,
        id: AgreementId,
        amount: Money,
        recipient: ActorId,
    ) -> LedgerResult<()> {
        require_permission(auth, caller, Permission::ReleaseDeposit)?;
        agreements.agreement_details(id)?;
        if recipient.is_zero() {
            return Err(LedgerError::ZeroIdentity { field: "recipient" });
        }
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount { field: "amount" });
        }

        let account = self.accounts.entry(id).or_default();
        if amount > account.deposit_balance {
            return Err(LedgerError::InsufficientBalance {
                available: account.deposit_balance,
                requested: amount,
            });
        }

        account.deposit_balance -= amount;
        if let Err(failure) = bank.transfer(recipient, amount) {
            account.deposit_balance += amount;
            return Err(failure.into());
        }
        // After an emergency drain custody may hold less than the
        // per-agreement figures suggest; never let it go negative.
        self.custodial_balance = self.custodial_balance.saturating_sub(amount);
        let account = &self.accounts[&id];
        let balances = (account.outstanding_balance, account.deposit_balance);

        tracing::info!(agreement = %id, %amount, recipient = %recipient, "deposit released");
        events.record(LedgerEvent::DepositReleased {
            agreement_id: id,
            recipient,
            amount,
        });
        events.record(LedgerEvent::BalanceUpdated {
            agreement_id: id,
            outstanding_balance: balances.0,
            deposit_balance: balances.1,
        });
        Ok(())
    }

    /// Returns `(outstanding, late_fees)` for an agreement.
    ///
    /// Pure read: the stored outstanding balance plus a fresh flat-rate
    /// late-fee figure. Inside the grace window (measured from the last
    /// payment, or the start date when none exists) the fee is zero;
    /// afterwards it is [`LATE_FEE_PERCENT`] of one month's rent.
    pub fn calculate_outstanding_rent(
        &self,
        agreements: &AgreementRegistry,
        id: AgreementId,
        now: DateTime<Utc>,
    ) -> LedgerResult<(Money, Money)> {
        let agreement = agreements.agreement_details(id)?;
        let account = self.accounts.get(&id);

        let outstanding = account.map_or(Money::ZERO, |a| a.outstanding_balance);
        let anchor = account
            .and_then(|a| a.last_payment_date)
            .unwrap_or(agreement.start_date);
        let days_late = (now - anchor).num_days();

        let late_fees = if days_late > GRACE_PERIOD_DAYS {
            Money::new(
                agreement.rent_amount.amount() * Decimal::from(LATE_FEE_PERCENT)
                    / Decimal::from(100),
            )
        } else {
            Money::ZERO
        };
        Ok((outstanding, late_fees))
    }

    /// Assesses the statutory late fee against an agreement.
    ///
    /// Privileged. The fee inflates the outstanding balance WITHOUT
    /// appending a payment record; a later rent payment settles against
    /// the larger figure. Emits `LateFeeCharged`, `BalanceUpdated`.
    pub fn handle_late_fees(
        &mut self,
        auth: &dyn AuthorizationProvider,
        agreements: &AgreementRegistry,
        events: &mut EventLog,
        caller: ActorId,
        id: AgreementId,
        now: DateTime<Utc>,
    ) -> LedgerResult<Money> {
        require_permission(auth, caller, Permission::AssessLateFees)?;
        let agreement = agreements.agreement_details(id)?;

        let account = self.accounts.entry(id).or_default();
        let anchor = account.last_payment_date.unwrap_or(agreement.start_date);
        let days_late = (now - anchor).num_days();
        let fee = statutory_late_fee(account.outstanding_balance, days_late);
        account.outstanding_balance += fee;
        let balances = (account.outstanding_balance, account.deposit_balance);

        tracing::info!(agreement = %id, %fee, days_late, "late fee assessed");
        events.record(LedgerEvent::LateFeeCharged {
            agreement_id: id,
            amount: fee,
        });
        events.record(LedgerEvent::BalanceUpdated {
            agreement_id: id,
            outstanding_balance: balances.0,
            deposit_balance: balances.1,
        });
        Ok(fee)
    }

    /// Returns an agreement's payment records in insertion order.
    #[must_use]
    pub fn payment_history(&self, id: AgreementId) -> &[PaymentRecord] {
        self.accounts
            .get(&id)
            .map_or(&[], |account| account.records.as_slice())
    }

    /// Returns an agreement's current deposit escrow balance.
    #[must_use]
    pub fn deposit_balance(&self, id: AgreementId) -> Money {
        self.accounts
            .get(&id)
            .map_or(Money::ZERO, |a| a.deposit_balance)
    }

    /// Returns an agreement's stored outstanding balance.
    #[must_use]
    pub fn outstanding_balance(&self, id: AgreementId) -> Money {
        self.accounts
            .get(&id)
            .map_or(Money::ZERO, |a| a.outstanding_balance)
    }

    /// Returns the total balance currently held in custody.
    #[must_use]
    pub fn custodial_balance(&self) -> Money {
        self.custodial_balance
    }

    /// Drains the entire custodial balance to a recipient (break-glass).
    ///
    /// Privileged. Deliberately NOT scoped to any agreement's escrow
    /// accounting: it can move funds belonging to other agreements'
    /// deposits, and per-agreement balances are left untouched. This is a
    /// known fund-safety risk carried in the contract's capability set.
    pub fn emergency_withdraw(
        &mut self,
        auth: &dyn AuthorizationProvider,
        bank: &mut dyn FundsTransfer,
        caller: ActorId,
        recipient: ActorId,
    ) -> LedgerResult<Money> {
        require_permission(auth, caller, Permission::EmergencyWithdraw)?;
        if recipient.is_zero() {
            return Err(LedgerError::ZeroIdentity { field: "recipient" });
        }

        let amount = self.custodial_balance;
        bank.transfer(recipient, amount)?;
        self.custodial_balance = Money::ZERO;

        tracing::warn!(%amount, recipient = %recipient, "emergency withdrawal drained custody");
        Ok(amount)
    }
}

fn require_active(
    agreements: &AgreementRegistry,
    id: AgreementId,
) -> LedgerResult<AgreementDetails> {
    let agreement = agreements.agreement_details(id)?;
    if agreement.status != AgreementStatus::Active {
        return Err(LedgerError::AgreementNotActive {
            agreement: id,
            status: agreement.status,
        });
    }
    Ok(agreement)
}
