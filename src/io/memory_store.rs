//! In-memory record store
//!
//! Holds both tables in process memory. Used to embed the service without
//! a filesystem and to observe saves in tests; saves can be made to fail
//! on demand.

use crate::core::traits::{AsyncRecordStore, RecordStore};
use crate::types::{Transfer, TransferError, User};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    transfers: Mutex<Vec<Transfer>>,
    users: Vec<User>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new(transfers: Vec<Transfer>, users: Vec<User>) -> Self {
        Self {
            transfers: Mutex::new(transfers),
            users,
            ..Default::default()
        }
    }

    /// Transfer table as last saved (or as constructed)
    pub fn saved_transfers(&self) -> Vec<Transfer> {
        self.transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every following save fail with an I/O error, or stop doing so
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn save(&self, transfers: &[Transfer]) -> Result<(), TransferError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(TransferError::Io {
                message: "record store rejected the save".to_string(),
            });
        }
        *self.transfers.lock().unwrap_or_else(PoisonError::into_inner) = transfers.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn load_transfers(&self) -> Result<Vec<Transfer>, TransferError> {
        Ok(self.saved_transfers())
    }

    fn load_users(&self) -> Result<Vec<User>, TransferError> {
        Ok(self.users.clone())
    }

    fn save_transfers(&self, transfers: &[Transfer]) -> Result<(), TransferError> {
        self.save(transfers)
    }
}

impl AsyncRecordStore for MemoryStore {
    async fn load_transfers(&self) -> Result<Vec<Transfer>, TransferError> {
        Ok(self.saved_transfers())
    }

    async fn load_users(&self) -> Result<Vec<User>, TransferError> {
        Ok(self.users.clone())
    }

    async fn save_transfers(&self, transfers: &[Transfer]) -> Result<(), TransferError> {
        self.save(transfers)
    }
}
