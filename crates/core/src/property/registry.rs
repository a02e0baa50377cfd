//! Property registry operations.

use std::collections::{BTreeMap, HashMap};

use renlo_shared::{ActorId, AgreementId, Digest, IdSequence, PropertyId};

use super::types::{PropertyDetails, PropertyRecord};
use crate::auth::{require_permission, AuthorizationProvider, Permission};
use crate::error::{LedgerError, LedgerResult};
use crate::event::{EventLog, LedgerEvent};

/// Owned arena of property records plus a per-owner index.
///
/// Single writer: all mutations go through this registry. Properties are
/// never deleted; deactivation keeps the record and its history.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    properties: BTreeMap<PropertyId, PropertyRecord>,
    by_owner: HashMap<ActorId, Vec<PropertyId>>,
    ids: IdSequence,
}

impl PropertyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property owned by the caller.
    ///
    /// Requires `Permission::RegisterProperty`. The data digest must not
    /// be zero. Emits `PropertyRegistered`.
    pub fn register_property(
        &mut self,
        auth: &dyn AuthorizationProvider,
        events: &mut EventLog,
        caller: ActorId,
        data_hash: Digest,
    ) -> LedgerResult<PropertyId> {
        require_permission(auth, caller, Permission::RegisterProperty)?;
        if data_hash.is_zero() {
            return Err(LedgerError::ZeroDigest { field: "data_hash" });
        }

        let id = PropertyId::from_raw(self.ids.allocate());
        self.properties.insert(
            id,
            PropertyRecord {
                id,
                owner: caller,
                data_hash,
                is_active: true,
                agreement_history: Vec::new(),
            },
        );
        self.by_owner.entry(caller).or_default().push(id);

        tracing::info!(property = %id, owner = %caller, "property registered");
        events.record(LedgerEvent::PropertyRegistered {
            property_id: id,
            owner: caller,
            data_hash,
        });
        Ok(id)
    }

    /// Returns an immutable snapshot of a property.
    pub fn property_details(&self, id: PropertyId) -> LedgerResult<PropertyDetails> {
        self.record(id).map(PropertyRecord::details)
    }

    /// Transfers ownership of a property to `new_owner`.
    ///
    /// Current-owner only. Agreement history is untouched.
    pub fn transfer_ownership(
        &mut self,
        caller: ActorId,
        id: PropertyId,
        new_owner: ActorId,
    ) -> LedgerResult<()> {
        if new_owner.is_zero() {
            return Err(LedgerError::ZeroIdentity { field: "new_owner" });
        }
        let record = self.record_mut(id)?;
        if record.owner != caller {
            return Err(LedgerError::NotPropertyOwner {
                property: id,
                caller,
            });
        }

        let previous = record.owner;
        record.owner = new_owner;
        if let Some(owned) = self.by_owner.get_mut(&previous) {
            owned.retain(|p| *p != id);
        }
        self.by_owner.entry(new_owner).or_default().push(id);

        tracing::info!(property = %id, from = %previous, to = %new_owner, "ownership transferred");
        Ok(())
    }

    /// Toggles the active flag on a property.
    ///
    /// Owner only. Does not retroactively affect existing agreements.
    pub fn set_active_status(
        &mut self,
        caller: ActorId,
        id: PropertyId,
        active: bool,
    ) -> LedgerResult<()> {
        let record = self.record_mut(id)?;
        if record.owner != caller {
            return Err(LedgerError::NotPropertyOwner {
                property: id,
                caller,
            });
        }
        record.is_active = active;
        tracing::info!(property = %id, active, "property active flag changed");
        Ok(())
    }

    /// Returns the agreements ever attached to a property, oldest first.
    pub fn agreement_history(&self, id: PropertyId) -> LedgerResult<&[AgreementId]> {
        self.record(id).map(|r| r.agreement_history.as_slice())
    }

    /// Returns the properties currently owned by an actor.
    #[must_use]
    pub fn properties_of(&self, owner: ActorId) -> &[PropertyId] {
        self.by_owner.get(&owner).map_or(&[], Vec::as_slice)
    }

    /// Appends an agreement to a property's history.
    ///
    /// Called by the agreement service once an agreement is created; the
    /// property must already have been validated.
    pub(crate) fn attach_agreement(
        &mut self,
        id: PropertyId,
        agreement: AgreementId,
    ) -> LedgerResult<()> {
        self.record_mut(id)?.agreement_history.push(agreement);
        Ok(())
    }

    fn record(&self, id: PropertyId) -> LedgerResult<&PropertyRecord> {
        self.properties
            .get(&id)
            .ok_or(LedgerError::PropertyNotFound(id))
    }

    fn record_mut(&mut self, id: PropertyId) -> LedgerResult<&mut PropertyRecord> {
        self.properties
            .get_mut(&id)
            .ok_or(LedgerError::PropertyNotFound(id))
    }
}
