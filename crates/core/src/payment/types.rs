//! Payment domain types.

use chrono::{DateTime, Utc};
use renlo_shared::Money;
use serde::Serialize;

/// Classification of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Monthly rent.
    Rent,
    /// Deposit into escrow.
    Deposit,
    /// Late-fee assessment.
    LateFee,
}

/// One confirmed payment against an agreement.
///
/// Records form an append-only ledger: insertion order is preserved and
/// entries are never rewritten or compacted. There is no pending state;
/// a record exists only once the payment is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentRecord {
    /// When the payment was recorded.
    pub timestamp: DateTime<Utc>,
    /// The paid amount.
    pub amount: Money,
    /// Rent, deposit, or late fee.
    pub kind: PaymentKind,
    /// Always true once recorded.
    pub confirmed: bool,
}

/// Per-agreement payment state derived from the record sequence.
#[derive(Debug, Clone, Default)]
pub struct PaymentAccount {
    /// The append-only payment records.
    pub records: Vec<PaymentRecord>,
    /// Cumulative confirmed deposits minus released amounts.
    pub deposit_balance: Money,
    /// Expected cumulative rent minus confirmed rent payments, floored at zero.
    pub outstanding_balance: Money,
    /// Timestamp of the most recent payment, if any.
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl PaymentAccount {
    /// Sums the confirmed rent payments.
    #[must_use]
    pub fn total_rent_paid(&self) -> Money {
        self.records
            .iter()
            .filter(|r| r.kind == PaymentKind::Rent && r.confirmed)
            .map(|r| r.amount)
            .sum()
    }
}
