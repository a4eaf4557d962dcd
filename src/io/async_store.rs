//! Async CSV-file record store
//!
//! Same files and format as [`CsvRecordStore`](crate::io::CsvRecordStore).
//! Reads stream through `csv-async` over `tokio::fs`. Saves render the
//! table in memory and hand it to the same temp-file-then-persist path as
//! the sync store, on tokio's blocking pool.

use crate::core::traits::AsyncRecordStore;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::render_transfers_csv;
use crate::io::csv_store::{open_error, replace_atomically};
use crate::types::{Transfer, TransferError, User};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AsyncCsvStore {
    transfers_path: PathBuf,
    users_path: PathBuf,
}

impl AsyncCsvStore {
    pub fn new(transfers_path: impl Into<PathBuf>, users_path: impl Into<PathBuf>) -> Self {
        Self {
            transfers_path: transfers_path.into(),
            users_path: users_path.into(),
        }
    }

    pub fn transfers_path(&self) -> &Path {
        &self.transfers_path
    }
}

impl AsyncRecordStore for AsyncCsvStore {
    async fn load_transfers(&self) -> Result<Vec<Transfer>, TransferError> {
        let file = match File::open(&self.transfers_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.transfers_path.display(), "No transfers file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(open_error(&self.transfers_path, e)),
        };

        let transfers = AsyncReader::new(file.compat()).read_transfers().await?;
        debug!(path = %self.transfers_path.display(), rows = transfers.len(), "Loaded transfers");
        Ok(transfers)
    }

    async fn load_users(&self) -> Result<Vec<User>, TransferError> {
        let file = File::open(&self.users_path)
            .await
            .map_err(|e| open_error(&self.users_path, e))?;
        let users = AsyncReader::new(file.compat()).read_users().await?;
        debug!(path = %self.users_path.display(), rows = users.len(), "Loaded users");
        Ok(users)
    }

    async fn save_transfers(&self, transfers: &[Transfer]) -> Result<(), TransferError> {
        let contents = render_transfers_csv(transfers)?;
        let target = self.transfers_path.clone();

        tokio::task::spawn_blocking(move || {
            replace_atomically(&target, |output| Ok(output.write_all(&contents)?))
        })
        .await
        .map_err(|e| TransferError::Io {
            message: format!("Save task failed: {}", e),
        })??;

        debug!(path = %self.transfers_path.display(), rows = transfers.len(), "Saved transfers");
        Ok(())
    }
}
