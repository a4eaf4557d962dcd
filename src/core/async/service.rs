//! Async transfer service
//!
//! Same contract as [`crate::core::TransferService`], for callers living
//! on a tokio runtime. The table sits behind a `tokio::sync::RwLock`, so a
//! writer can hold the lock across the awaited save without blocking the
//! runtime's worker threads.
//!
//! # Architecture
//!
//! ```text
//! AsyncTransferService
//!     ├── LifecycleManager          (pure transition rules, shared with sync)
//!     ├── RwLock<Vec<Transfer>>     (tokio; one writer at a time)
//!     └── S: AsyncRecordStore       (awaited load/save)
//! ```

use crate::core::aggregate::{aggregate, Aggregates};
use crate::core::clock::{Clock, SystemClock};
use crate::core::lifecycle::{known_branches, LifecycleManager, NewTransfer};
use crate::core::session::authenticate;
use crate::core::traits::AsyncRecordStore;
use crate::core::views::{list_view, ListFilter, TransferView};
use crate::types::{Actor, Transfer, TransferError, User};
use std::collections::BTreeSet;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub struct AsyncTransferService<S: AsyncRecordStore, C: Clock = SystemClock> {
    store: S,
    lifecycle: LifecycleManager<C>,
    users: Vec<User>,
    branches: BTreeSet<String>,
    transfers: RwLock<Vec<Transfer>>,
}

impl<S: AsyncRecordStore> AsyncTransferService<S, SystemClock> {
    pub async fn open(store: S) -> Result<Self, TransferError> {
        Self::with_clock(store, SystemClock).await
    }
}

impl<S: AsyncRecordStore, C: Clock> AsyncTransferService<S, C> {
    pub async fn with_clock(store: S, clock: C) -> Result<Self, TransferError> {
        let users = store.load_users().await?;
        let transfers = store.load_transfers().await?;
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

    pub async fn transfers(&self) -> Vec<Transfer> {
        self.transfers.read().await.clone()
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<Actor, TransferError> {
        authenticate(&self.users, username, password)
    }

    pub async fn create_transfer(
        &self,
        actor: &Actor,
        request: NewTransfer,
    ) -> Result<Transfer, TransferError> {
        let mut table = self.transfers.write().await;
        let mut draft = table.clone();
        let result = self
            .lifecycle
            .create(&mut draft, actor, request, &self.branches);
        self.commit(&mut table, draft, actor, "create", result).await
    }

    pub async fn pickup(&self, actor: &Actor, transfer_id: &str) -> Result<Transfer, TransferError> {
        let mut table = self.transfers.write().await;
        let mut draft = table.clone();
        let result = self.lifecycle.pickup(&mut draft, actor, transfer_id);
        self.commit(&mut table, draft, actor, "pickup", result).await
    }

    pub async fn route_to_warehouse(
        &self,
        actor: &Actor,
        transfer_id: &str,
    ) -> Result<Transfer, TransferError> {
        let mut table = self.transfers.write().await;
        let mut draft = table.clone();
        let result = self
            .lifecycle
            .route_to_warehouse(&mut draft, actor, transfer_id);
        self.commit(&mut table, draft, actor, "route_to_warehouse", result)
            .await
    }

    pub async fn confirm_receipt(
        &self,
        actor: &Actor,
        transfer_id: &str,
    ) -> Result<Transfer, TransferError> {
        let mut table = self.transfers.write().await;
        let mut draft = table.clone();
        let result = self.lifecycle.confirm_receipt(&mut draft, actor, transfer_id);
        self.commit(&mut table, draft, actor, "confirm_receipt", result)
            .await
    }

    pub async fn list_view(
        &self,
        actor: &Actor,
        filter: &ListFilter,
    ) -> Result<TransferView, TransferError> {
        let table = self.transfers.read().await;
        list_view(&table, actor, filter)
    }

    pub async fn aggregate(
        &self,
        actor: &Actor,
        filter: &ListFilter,
    ) -> Result<Aggregates, TransferError> {
        let visible = self.list_view(actor, filter).await?.into_transfers();
        Ok(aggregate(&visible))
    }

    /// Persist `draft` and swap it in, or leave `table` untouched
    async fn commit(
        &self,
        table: &mut Vec<Transfer>,
        draft: Vec<Transfer>,
        actor: &Actor,
        operation: &str,
        result: Result<Transfer, TransferError>,
    ) -> Result<Transfer, TransferError> {
        let transfer = result.inspect_err(|e| {
            warn!(actor = %actor.username, operation, error = %e, "Rejected");
        })?;

        self.store.save_transfers(&draft).await.inspect_err(|e| {
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
