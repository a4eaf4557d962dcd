//! Transfer service: the core-facing API
//!
//! `TransferService` couples the lifecycle manager with a [`RecordStore`].
//! It keeps the transfer table in memory behind a single `RwLock`:
//!
//! - reads take the read lock and see a consistent snapshot
//! - writes take the write lock for the whole validate -> mutate -> persist
//!   sequence, so writers are serialized against each other and readers
//!
//! A mutation is applied to a copy of the table. The copy replaces the
//! in-memory table only after the store accepted it, so a rejected or
//! unpersisted operation changes nothing.

use crate::core::aggregate::{aggregate, Aggregates};
use crate::core::clock::{Clock, SystemClock};
use crate::core::lifecycle::{known_branches, LifecycleManager, NewTransfer};
use crate::core::session::authenticate;
use crate::core::traits::RecordStore;
use crate::core::views::{list_view, ListFilter, TransferView};
use crate::types::{Actor, Transfer, TransferError, User};
use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};

pub struct TransferService<S: RecordStore, C: Clock = SystemClock> {
    store: S,
    lifecycle: LifecycleManager<C>,
    users: Vec<User>,
    branches: BTreeSet<String>,
    transfers: RwLock<Vec<Transfer>>,
}

impl<S: RecordStore> TransferService<S, SystemClock> {
    /// Load both tables from `store`
    pub fn open(store: S) -> Result<Self, TransferError> {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RecordStore, C: Clock> TransferService<S, C> {
    /// Load both tables from `store`, stamping transitions with `clock`
    pub fn with_clock(store: S, clock: C) -> Result<Self, TransferError> {
        let users = store.load_users()?;
        let transfers = store.load_transfers()?;
        debug!(
            users = users.len(),
            transfers = transfers.len(),
            "Loaded record store"
        );

        Ok(Self {
            branches: known_branches(&users),
            store,
            lifecycle: LifecycleManager::with_clock(clock),
            users,
            transfers: RwLock::new(transfers),
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Copy of the current transfer table
    pub fn transfers(&self) -> Vec<Transfer> {
        self.transfers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve credentials against the loaded user table
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Actor, TransferError> {
        authenticate(&self.users, username, password)
    }

    pub fn create_transfer(
        &self,
        actor: &Actor,
        request: NewTransfer,
    ) -> Result<Transfer, TransferError> {
        self.mutate(actor, "create", |lifecycle, table| {
            lifecycle.create(table, actor, request, &self.branches)
        })
    }

    pub fn pickup(&self, actor: &Actor, transfer_id: &str) -> Result<Transfer, TransferError> {
        self.mutate(actor, "pickup", |lifecycle, table| {
            lifecycle.pickup(table, actor, transfer_id)
        })
    }

    pub fn route_to_warehouse(
        &self,
        actor: &Actor,
        transfer_id: &str,
    ) -> Result<Transfer, TransferError> {
        self.mutate(actor, "route_to_warehouse", |lifecycle, table| {
            lifecycle.route_to_warehouse(table, actor, transfer_id)
        })
    }

    pub fn confirm_receipt(
        &self,
        actor: &Actor,
        transfer_id: &str,
    ) -> Result<Transfer, TransferError> {
        self.mutate(actor, "confirm_receipt", |lifecycle, table| {
            lifecycle.confirm_receipt(table, actor, transfer_id)
        })
    }

    pub fn list_view(
        &self,
        actor: &Actor,
        filter: &ListFilter,
    ) -> Result<TransferView, TransferError> {
        let table = self.transfers.read().unwrap_or_else(PoisonError::into_inner);
        list_view(&table, actor, filter)
    }

    /// Totals over what the actor's view shows
    pub fn aggregate(&self, actor: &Actor, filter: &ListFilter) -> Result<Aggregates, TransferError> {
        let visible = self.list_view(actor, filter)?.into_transfers();
        Ok(aggregate(&visible))
    }

    fn mutate<F>(&self, actor: &Actor, operation: &str, apply: F) -> Result<Transfer, TransferError>
    where
        F: FnOnce(&LifecycleManager<C>, &mut Vec<Transfer>) -> Result<Transfer, TransferError>,
    {
        let mut table = self.transfers.write().unwrap_or_else(PoisonError::into_inner);
        let mut draft = table.clone();

        let transfer = apply(&self.lifecycle, &mut draft).inspect_err(|e| {
            warn!(actor = %actor.username, operation, error = %e, "Rejected");
        })?;

        self.store.save_transfers(&draft).inspect_err(|e| {
            warn!(actor = %actor.username, operation, error = %e, "Failed to persist");
        })?;
        *table = draft;

        info!(
            actor = %actor.username,
            operation,
            transfer_id = %transfer.transfer_id,
            status = %transfer.status,
            "Transfer updated"
        );
        Ok(transfer)
    }
}
