//! Core business logic for Renlo.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and the
//! rental-agreement state machine live here.
//!
//! # Modules
//!
//! - `auth` - Roles, permissions, and the authorization seam
//! - `property` - Property registry and ownership
//! - `agreement` - Agreement lifecycle and status transitions
//! - `payment` - Rent and deposit accounting, escrow, late fees
//! - `compliance` - Adapter over the external compliance verifier
//! - `validation` - Pure rental-term validation rules
//! - `event` - Append-only event log
//! - `error` - The `LedgerError` taxonomy and stable error codes
//! - `ledger` - The `RentalLedger` facade tying the components together

pub mod agreement;
pub mod auth;
pub mod compliance;
pub mod error;
pub mod event;
pub mod ledger;
pub mod payment;
pub mod property;
pub mod validation;

pub use error::{LedgerError, LedgerResult};
pub use ledger::RentalLedger;
