//! Pure rental-term validation rules.
//!
//! Free functions with no state, used by embedders for user-facing
//! validation ahead of ledger calls. The statutory late-fee rate here
//! (11.85% per annum) is NOT the payment module's flat 10% late-fee
//! constant; the two are separate figures and must never be unified.

use chrono::{DateTime, Utc};
use renlo_shared::Money;
use rust_decimal::Decimal;
use thiserror::Error;

#[cfg(test)]
mod props;

/// Minimum rental duration in days.
pub const MIN_RENTAL_DAYS: i64 = 30;
/// Maximum rental duration in days (ten years).
pub const MAX_RENTAL_DAYS: i64 = 10 * 365;
/// Days after a due payment before late fees start accruing.
pub const GRACE_PERIOD_DAYS: i64 = 5;
/// Statutory annual late-fee rate, in basis points (11.85%).
pub const STATUTORY_ANNUAL_RATE_BPS: i64 = 1185;
/// Deposit cap as a multiple of monthly rent.
pub const MAX_DEPOSIT_MONTHS: i64 = 3;

const STATUTORY_RATE_DIVISOR: i64 = 36500;

/// Why a rental period is invalid.
///
/// The reason codes are part of the contract: callers surface different
/// user-facing messages per code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RentalPeriodError {
    /// End date is not after the start date (code 1).
    #[error("end date must be after start date")]
    EndNotAfterStart,
    /// Duration is below the 30-day minimum (code 2).
    #[error("rental period is shorter than the 30-day minimum")]
    TooShort,
    /// Duration exceeds the ten-year maximum (code 3).
    #[error("rental period is longer than the ten-year maximum")]
    TooLong,
}

impl RentalPeriodError {
    /// Returns the stable numeric reason code (a valid period is code 0).
    #[must_use]
    pub const fn reason_code(&self) -> u8 {
        match self {
            Self::EndNotAfterStart => 1,
            Self::TooShort => 2,
            Self::TooLong => 3,
        }
    }
}

/// Validates a rental period: end after start, duration within
/// [`MIN_RENTAL_DAYS`], [`MAX_RENTAL_DAYS`].
pub fn validate_rental_period(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), RentalPeriodError> {
    if end <= start {
        return Err(RentalPeriodError::EndNotAfterStart);
    }
    let days = (end - start).num_days();
    if days < MIN_RENTAL_DAYS {
        return Err(RentalPeriodError::TooShort);
    }
    if days > MAX_RENTAL_DAYS {
        return Err(RentalPeriodError::TooLong);
    }
    Ok(())
}

/// Why a deposit amount is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DepositError {
    /// Deposit must be strictly positive.
    #[error("deposit must be positive")]
    NonPositive,
    /// Deposit exceeds three months' rent.
    #[error("deposit exceeds three months' rent")]
    ExceedsCap,
}

/// Validates a deposit: positive and at most three months' rent.
pub fn validate_deposit(rent: Money, deposit: Money) -> Result<(), DepositError> {
    if !deposit.is_positive() {
        return Err(DepositError::NonPositive);
    }
    if deposit > rent * MAX_DEPOSIT_MONTHS {
        return Err(DepositError::ExceedsCap);
    }
    Ok(())
}

/// Notice period owed, as a step function of elapsed tenancy.
#[must_use]
pub fn notice_period_days(days_elapsed: i64) -> i64 {
    if days_elapsed < 90 {
        7
    } else if days_elapsed < 180 {
        14
    } else {
        30
    }
}

/// Why early termination is not permitted at this time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TerminationWindowError {
    /// The tenancy has not started yet.
    #[error("cannot terminate before the tenancy starts")]
    BeforeStart,
    /// The tenancy has already concluded.
    #[error("cannot terminate after the tenancy has ended")]
    AfterEnd,
}

/// Early-termination penalty as a step function of remaining duration.
///
/// More than 180 days remaining costs two months' rent, more than 90 days
/// costs one month, less costs nothing. Termination outside the tenancy
/// window is disallowed outright rather than priced at zero.
pub fn early_termination_penalty(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    monthly_rent: Money,
    now: DateTime<Utc>,
) -> Result<Money, TerminationWindowError> {
    if now < start {
        return Err(TerminationWindowError::BeforeStart);
    }
    if now > end {
        return Err(TerminationWindowError::AfterEnd);
    }
    let remaining = (end - now).num_days();
    let penalty = if remaining > 180 {
        monthly_rent * 2
    } else if remaining > 90 {
        monthly_rent
    } else {
        Money::ZERO
    };
    Ok(penalty)
}

/// Statutory late fee on an overdue amount.
///
/// Zero within the grace period; afterwards the amount accrues at the
/// statutory annual rate divided over 365 days:
/// `amount * 1185 * days_late / 36500`. Flat per assessment, not
/// compounded within a single call.
#[must_use]
pub fn statutory_late_fee(amount: Money, days_late: i64) -> Money {
    if days_late <= GRACE_PERIOD_DAYS {
        return Money::ZERO;
    }
    Money::new(
        amount.amount() * Decimal::from(STATUTORY_ANNUAL_RATE_BPS) * Decimal::from(days_late)
            / Decimal::from(STATUTORY_RATE_DIVISOR),
    )
}

/// Validates a five-digit postal code in [10000, 99999].
///
/// The code decomposes into a two-digit prefix and a three-digit suffix.
/// Given the digit-count constraint both group checks always hold; they
/// are kept because the decomposition is the documented format.
#[must_use]
pub fn validate_postal_code(code: u32) -> bool {
    if !(10000..=99999).contains(&code) {
        return false;
    }
    let prefix = code / 1000;
    let suffix = code % 1000;
    (10..=99).contains(&prefix) && suffix <= 999
}
