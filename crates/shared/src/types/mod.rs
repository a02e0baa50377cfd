//! Common types used across the application.

pub mod actor;
pub mod digest;
pub mod id;
pub mod money;

pub use actor::ActorId;
pub use digest::Digest;
pub use id::{AgreementId, IdSequence, PropertyId};
pub use money::Money;
