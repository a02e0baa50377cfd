//! Agreement lifecycle and status transitions.

mod service;
mod types;

pub use service::AgreementRegistry;
pub use types::{AgreementDetails, AgreementRecord, AgreementStatus, CreateAgreementInput};
