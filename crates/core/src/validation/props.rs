//! Property tests for the rental-term validation rules.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use renlo_shared::Money;
use rust_decimal::Decimal;

use super::*;

fn base_date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// For any duration in [30, 3650] days the period is valid; outside
    /// that range the reason code is exactly 1, 2, or 3 per the rule.
    #[test]
    fn prop_rental_period_codes_are_exact(days in -500i64..5000i64) {
        let start = base_date();
        let end = start + Duration::days(days);
        let result = validate_rental_period(start, end);

        if days <= 0 {
            prop_assert_eq!(result, Err(RentalPeriodError::EndNotAfterStart));
        } else if days < MIN_RENTAL_DAYS {
            prop_assert_eq!(result, Err(RentalPeriodError::TooShort));
        } else if days > MAX_RENTAL_DAYS {
            prop_assert_eq!(result, Err(RentalPeriodError::TooLong));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// A deposit is valid iff `0 < deposit <= 3 * rent`.
    #[test]
    fn prop_deposit_bound(rent in 1i64..100_000, deposit in -1000i64..400_000) {
        let rent = Money::from_major(rent);
        let deposit = Money::from_major(deposit);
        let valid = deposit.is_positive() && deposit <= rent * MAX_DEPOSIT_MONTHS;
        prop_assert_eq!(validate_deposit(rent, deposit).is_ok(), valid);
    }

    /// The notice period only ever takes the three documented values and
    /// never shrinks as tenancy grows.
    #[test]
    fn prop_notice_period_is_monotonic_steps(a in 0i64..4000, b in 0i64..4000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(notice_period_days(lo) <= notice_period_days(hi));
        prop_assert!([7, 14, 30].contains(&notice_period_days(a)));
    }

    /// No fee accrues inside the grace period; past it the fee matches the
    /// statutory formula and grows with the number of days late.
    #[test]
    fn prop_late_fee_grace_and_monotonicity(
        amount in 1i64..1_000_000,
        days in 0i64..2000,
    ) {
        let amount = Money::from_major(amount);
        let fee = statutory_late_fee(amount, days);

        if days <= GRACE_PERIOD_DAYS {
            prop_assert_eq!(fee, Money::ZERO);
        } else {
            let expected = amount.amount()
                * Decimal::from(STATUTORY_ANNUAL_RATE_BPS)
                * Decimal::from(days)
                / Decimal::from(36500);
            prop_assert_eq!(fee, Money::new(expected));
            prop_assert!(statutory_late_fee(amount, days + 1) > fee);
        }
    }

    /// Postal validity is exactly the five-digit range check.
    #[test]
    fn prop_postal_code_is_range_check(code in 0u32..200_000) {
        prop_assert_eq!(validate_postal_code(code), (10000..=99999).contains(&code));
    }
}
