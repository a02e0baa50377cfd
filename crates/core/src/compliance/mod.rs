//! Adapter over the external compliance verifier.
//!
//! The core never implements compliance logic. Before the mutations that
//! require it, the gate asks the external verifier and caches the result
//! keyed by `(entity, kind)`. The cache is a deliberate last-known-status
//! table, overwritten on every re-check, unlike the append-only payment
//! ledger.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use renlo_shared::{AgreementId, Digest, PropertyId};
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};

/// The entity a compliance check is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceSubject {
    /// A registered property.
    Property(PropertyId),
    /// A rental agreement.
    Agreement(AgreementId),
}

/// Last known verification result for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplianceRecord {
    /// Whether the verifier passed the subject.
    pub passed: bool,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
    /// Digest of the verifier's evidence.
    pub evidence: Digest,
}

/// External compliance capability consumed by the core.
pub trait ComplianceVerifier {
    /// Runs a compliance check, returning pass/fail and an evidence digest.
    fn verify_compliance(&self, subject: ComplianceSubject) -> (bool, Digest);

    /// Returns true if compliance parameters have ever been configured.
    fn parameters_configured(&self) -> bool;
}

/// Thin adapter invoking the verifier and caching the last result.
#[derive(Debug)]
pub struct ComplianceGate<V> {
    verifier: V,
    records: HashMap<ComplianceSubject, ComplianceRecord>,
}

impl<V: ComplianceVerifier> ComplianceGate<V> {
    /// Creates a gate over the given verifier.
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            records: HashMap::new(),
        }
    }

    /// Verifies the subject, recording the result.
    ///
    /// Fails the calling operation with `ComplianceNotConfigured` when the
    /// verifier has no parameters, or `ComplianceFailed` when it rejects
    /// the subject. The result is cached either way.
    pub fn require(
        &mut self,
        subject: ComplianceSubject,
        now: DateTime<Utc>,
    ) -> LedgerResult<Digest> {
        if !self.verifier.parameters_configured() {
            return Err(LedgerError::ComplianceNotConfigured);
        }

        let (passed, evidence) = self.verifier.verify_compliance(subject);
        self.records.insert(
            subject,
            ComplianceRecord {
                passed,
                checked_at: now,
                evidence,
            },
        );

        if passed {
            Ok(evidence)
        } else {
            Err(LedgerError::ComplianceFailed(subject))
        }
    }

    /// Returns the last known result for a subject, if it was ever checked.
    #[must_use]
    pub fn last_result(&self, subject: ComplianceSubject) -> Option<&ComplianceRecord> {
        self.records.get(&subject)
    }
}
