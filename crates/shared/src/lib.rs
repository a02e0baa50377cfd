//! Shared types for Renlo.
//!
//! This crate provides common types used across all other crates:
//! - Money type with decimal precision
//! - Typed monotonic IDs for type-safe entity references
//! - Opaque content digests
//! - Actor identities

pub mod types;

pub use types::{ActorId, AgreementId, Digest, IdSequence, Money, PropertyId};
