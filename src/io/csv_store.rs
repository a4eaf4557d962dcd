//! CSV-file record store
//!
//! Two files, one per table. Saves write the whole transfer table to a
//! temporary file in the target's directory and then persist it over the
//! target, so readers only ever see the old or the new table.

use crate::core::traits::RecordStore;
use crate::io::csv_format::write_transfers_csv;
use crate::io::sync_reader::{read_transfers, read_users};
use crate::types::{Transfer, TransferError, User};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    transfers_path: PathBuf,
    users_path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(transfers_path: impl Into<PathBuf>, users_path: impl Into<PathBuf>) -> Self {
        Self {
            transfers_path: transfers_path.into(),
            users_path: users_path.into(),
        }
    }

    pub fn transfers_path(&self) -> &Path {
        &self.transfers_path
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }
}

/// Directory a temporary file must live in to be renamed over `path`
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Replace `path` with whatever `write` produces
///
/// The content goes to a temporary file in the same directory, is synced,
/// and is then renamed over `path`. An existing target's permissions carry
/// over to the replacement. On any error the temporary file is removed and
/// `path` is left as it was.
pub(crate) fn replace_atomically<F>(path: &Path, write: F) -> Result<(), TransferError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), TransferError>,
{
    let mut temp = NamedTempFile::new_in(parent_dir(path))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }

    match fs::metadata(path) {
        Ok(metadata) => temp.as_file().set_permissions(metadata.permissions())?,
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}

pub(crate) fn open_error(path: &Path, error: std::io::Error) -> TransferError {
    TransferError::Io {
        message: format!("Failed to open '{}': {}", path.display(), error),
    }
}

impl RecordStore for CsvRecordStore {
    /// A missing transfers file is an empty table
    fn load_transfers(&self) -> Result<Vec<Transfer>, TransferError> {
        let file = match File::open(&self.transfers_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.transfers_path.display(), "No transfers file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(open_error(&self.transfers_path, e)),
        };

        let transfers = read_transfers(file)?;
        debug!(path = %self.transfers_path.display(), rows = transfers.len(), "Loaded transfers");
        Ok(transfers)
    }

    fn load_users(&self) -> Result<Vec<User>, TransferError> {
        let file = File::open(&self.users_path).map_err(|e| open_error(&self.users_path, e))?;
        let users = read_users(file)?;
        debug!(path = %self.users_path.display(), rows = users.len(), "Loaded users");
        Ok(users)
    }

    fn save_transfers(&self, transfers: &[Transfer]) -> Result<(), TransferError> {
        replace_atomically(&self.transfers_path, |output| {
            write_transfers_csv(transfers, output)
        })?;

        debug!(path = %self.transfers_path.display(), rows = transfers.len(), "Saved transfers");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransferStatus, TransferType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::fs;
    use tempfile::TempDir;

    const TRANSFERS: &str = "Transfer ID,From Branch,To Branch,Value,Transfer Type,Status,Created At,\
                             Picked Up At,Received At,Driver,Handled By WH,Attachment,Notes\n\
                             T1,P00-01,P01-02,500.00,NORMAL,Received,2025-03-01 09:00:00,\
                             2025-03-01 10:00:00,2025-03-01 16:45:30.500,,Yes,doc-17,\"fragile, top shelf\"\n\
                             T2,P01-02,P00-01,12,RETURN,Pending,2025-03-02 08:00:00,,,,,,\n";

    const USERS: &str = "Username,Password,Role,Region,Branch Code\nbranch1,pw,Branch,Riyadh,P00-01\n";

    fn store(dir: &TempDir) -> CsvRecordStore {
        let transfers = dir.path().join("transfers.csv");
        let users = dir.path().join("users.csv");
        fs::write(&transfers, TRANSFERS).unwrap();
        fs::write(&users, USERS).unwrap();
        CsvRecordStore::new(transfers, users)
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let transfers = store.load_transfers().unwrap();
        store.save_transfers(&transfers).unwrap();

        assert_eq!(fs::read_to_string(store.transfers_path()).unwrap(), TRANSFERS);
    }

    #[test]
    fn test_save_replaces_table() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut transfers = store.load_transfers().unwrap();
        transfers.push(Transfer {
            transfer_id: "T3".to_string(),
            from_branch: "P00-01".to_string(),
            to_branch: "P02-01".to_string(),
            value: Decimal::new(1, 0),
            transfer_type: TransferType::Recall,
            status: TransferStatus::Pending,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 3)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap(),
            picked_up_at: None,
            received_at: None,
            driver: String::new(),
            handled_by_wh: false,
            attachment: None,
            notes: None,
        });

        store.save_transfers(&transfers).unwrap();

        assert_eq!(store.load_transfers().unwrap(), transfers);
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::set_permissions(store.transfers_path(), fs::Permissions::from_mode(0o644)).unwrap();

        let transfers = store.load_transfers().unwrap();
        store.save_transfers(&transfers).unwrap();

        let mode = fs::metadata(store.transfers_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_failed_write_leaves_target_and_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let err = replace_atomically(store.transfers_path(), |output| {
            output.write_all(b"partial")?;
            Err(TransferError::Io {
                message: "disk full".to_string(),
            })
        })
        .unwrap_err();

        assert_eq!(
            err,
            TransferError::Io {
                message: "disk full".to_string()
            }
        );
        assert_eq!(fs::read_to_string(store.transfers_path()).unwrap(), TRANSFERS);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_missing_transfers_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvRecordStore::new(dir.path().join("none.csv"), dir.path().join("users.csv"));
        assert!(store.load_transfers().unwrap().is_empty());
    }

    #[test]
    fn test_missing_users_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = CsvRecordStore::new(dir.path().join("t.csv"), dir.path().join("none.csv"));
        let err = store.load_users().unwrap_err();
        assert!(matches!(err, TransferError::Io { .. }));
    }

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        assert_eq!(parent_dir(Path::new("transfers.csv")), Path::new("."));
        assert_eq!(parent_dir(Path::new("data/transfers.csv")), Path::new("data"));
    }
}
