//! Record store abstractions
//!
//! The core never assumes a storage technology. It loads whole tables and
//! replaces the whole transfer table on every save; the store must make
//! that replacement appear atomic to its callers.

use crate::types::{Transfer, TransferError, User};
use std::future::Future;

/// Blocking load-all / save-all persistence
pub trait RecordStore {
    /// Load every transfer, in stored order
    fn load_transfers(&self) -> Result<Vec<Transfer>, TransferError>;

    /// Load every user
    fn load_users(&self) -> Result<Vec<User>, TransferError>;

    /// Replace the stored transfer table with `transfers`
    fn save_transfers(&self, transfers: &[Transfer]) -> Result<(), TransferError>;
}

/// Asynchronous counterpart of [`RecordStore`]
pub trait AsyncRecordStore: Send + Sync {
    fn load_transfers(&self) -> impl Future<Output = Result<Vec<Transfer>, TransferError>> + Send;

    fn load_users(&self) -> impl Future<Output = Result<Vec<User>, TransferError>> + Send;

    fn save_transfers(
        &self,
        transfers: &[Transfer],
    ) -> impl Future<Output = Result<(), TransferError>> + Send;
}
