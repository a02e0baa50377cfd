//! Roles, permissions, and the authorization seam.
//!
//! The core never stores credentials. It asks an external
//! [`AuthorizationProvider`] before every privileged mutation and treats a
//! `false` answer as `PermissionDenied`. Roles and permissions are closed
//! enums: a fixed vocabulary instead of dynamically hashed permission
//! strings, so grants cannot proliferate past what the ledger understands.

use std::collections::{BTreeSet, HashMap};

use renlo_shared::ActorId;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Roles an actor may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative control.
    Admin,
    /// Owns properties and creates agreements.
    Landlord,
    /// Rents a property under an agreement.
    Tenant,
    /// Intermediary acting on behalf of parties.
    Broker,
    /// Manages escrow releases and late-fee assessment.
    PaymentManager,
    /// Operates the compliance verifier.
    ComplianceOfficer,
}

/// Permissions gating the ledger's privileged mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Register a new property.
    RegisterProperty,
    /// Administratively override an agreement's status.
    UpdateAgreement,
    /// Release escrowed deposit funds.
    ReleaseDeposit,
    /// Assess late fees against an agreement.
    AssessLateFees,
    /// Drain the custodial balance (break-glass).
    EmergencyWithdraw,
}

/// External authorization capability consumed by the core.
pub trait AuthorizationProvider {
    /// Returns true if the actor holds the permission.
    fn has_permission(&self, actor: ActorId, permission: Permission) -> bool;

    /// Returns true if the actor holds the role.
    fn has_role(&self, actor: ActorId, role: Role) -> bool;
}

/// Checks a permission, mapping a refusal to `PermissionDenied`.
pub(crate) fn require_permission(
    auth: &dyn AuthorizationProvider,
    actor: ActorId,
    permission: Permission,
) -> LedgerResult<()> {
    if auth.has_permission(actor, permission) {
        Ok(())
    } else {
        Err(LedgerError::PermissionDenied { actor, permission })
    }
}

/// In-memory grant table implementing [`AuthorizationProvider`].
///
/// One entry per actor: the set of permissions and roles they hold.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorizer {
    permissions: HashMap<ActorId, BTreeSet<Permission>>,
    roles: HashMap<ActorId, BTreeSet<Role>>,
}

impl StaticAuthorizer {
    /// Creates an empty grant table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a permission to an actor.
    pub fn grant_permission(&mut self, actor: ActorId, permission: Permission) {
        self.permissions.entry(actor).or_default().insert(permission);
    }

    /// Revokes a permission from an actor.
    pub fn revoke_permission(&mut self, actor: ActorId, permission: Permission) {
        if let Some(granted) = self.permissions.get_mut(&actor) {
            granted.remove(&permission);
        }
    }

    /// Grants a role to an actor.
    pub fn grant_role(&mut self, actor: ActorId, role: Role) {
        self.roles.entry(actor).or_default().insert(role);
    }

    /// Revokes a role from an actor.
    pub fn revoke_role(&mut self, actor: ActorId, role: Role) {
        if let Some(held) = self.roles.get_mut(&actor) {
            held.remove(&role);
        }
    }
}

impl AuthorizationProvider for StaticAuthorizer {
    fn has_permission(&self, actor: ActorId, permission: Permission) -> bool {
        self.permissions
            .get(&actor)
            .is_some_and(|granted| granted.contains(&permission))
    }

    fn has_role(&self, actor: ActorId, role: Role) -> bool {
        self.roles
            .get(&actor)
            .is_some_and(|held| held.contains(&role))
    }
}
