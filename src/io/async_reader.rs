//! Asynchronous CSV table reader
//!
//! Same contract as the sync reader, over a `futures::io::AsyncRead`.
//!
//! # Architecture
//!
//! ```text
//! tokio::fs::File → compat() → AsyncReader → Vec<Transfer> / Vec<User>
//!                                  ↓
//!                           csv_format module
//!                     (TransferRow, convert_transfer_row)
//! ```

use crate::io::csv_format::{convert_transfer_row, convert_user_row, TransferRow, UserRow};
use crate::types::{Transfer, TransferError, User};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use serde::de::DeserializeOwned;

/// Asynchronous reader over one stored table
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .trim(csv_async::Trim::Headers)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    pub async fn read_transfers(self) -> Result<Vec<Transfer>, TransferError> {
        self.read_table::<TransferRow, _>(convert_transfer_row).await
    }

    pub async fn read_users(self) -> Result<Vec<User>, TransferError> {
        self.read_table::<UserRow, _>(convert_user_row).await
    }

    /// Read every row, stopping at the first one that fails
    async fn read_table<Row, T>(
        mut self,
        convert: fn(Row) -> Result<T, String>,
    ) -> Result<Vec<T>, TransferError>
    where
        Row: DeserializeOwned + 'static,
    {
        let mut table = Vec::new();
        let mut records = self.csv_reader.deserialize::<Row>();
        let mut line: u64 = 1;

        while let Some(result) = records.next().await {
            line += 1;
            let row = result.map_err(|e| match TransferError::from(e) {
                TransferError::Parse { message, .. } => TransferError::parse(Some(line), message),
                other => other,
            })?;
            let record = convert(row).map_err(|e| TransferError::parse(Some(line), e))?;
            table.push(record);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, TransferStatus, TransferType};
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_async_reader_read_transfers() {
        let csv_content = "Transfer ID,From Branch,To Branch,Value,Transfer Type,Status,Created At,\
                           Picked Up At,Received At,Driver,Handled By WH,Attachment,Notes\n\
                           T1,P00-01,P01-02,500.00,NORMAL,Picked Up,2025-03-01 09:00:00,\
                           2025-03-01 10:00:00,,driver1,,,\n\
                           T2,P01-02,P00-01,75.5,RECALL,Received,2025-03-02 09:00:00,\
                           2025-03-02 10:00:00,2025-03-02 15:00:00,,Yes,,late\n";
        let reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let transfers = reader.read_transfers().await.unwrap();

        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].driver, "driver1");
        assert_eq!(transfers[0].status, TransferStatus::PickedUp);
        assert_eq!(transfers[1].value, Decimal::new(755, 1));
        assert_eq!(transfers[1].transfer_type, TransferType::Recall);
        assert_eq!(transfers[1].notes.as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn test_async_reader_empty_table() {
        let csv_content = "Username,Password,Role,Region,Branch Code\n";
        let reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));
        assert!(reader.read_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_invalid_record() {
        let csv_content = "Username,Password,Role,Region,Branch Code\n\
                           owner,pw,Owner,,\n\
                           intruder,pw,Admin,,\n";
        let reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let err = reader.read_users().await.unwrap_err();
        assert!(matches!(err, TransferError::Parse { line: Some(3), .. }), "{:?}", err);
    }

    struct UnpluggedReader;

    impl AsyncRead for UnpluggedReader {
        fn poll_read(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &mut [u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::other("device unplugged")))
        }
    }

    #[tokio::test]
    async fn test_async_reader_io_failure_is_io_error() {
        let err = AsyncReader::new(UnpluggedReader)
            .read_transfers()
            .await
            .unwrap_err();

        match err {
            TransferError::Io { message } => {
                assert!(message.contains("device unplugged"), "{}", message)
            }
            other => panic!("Expected IO error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_async_reader_read_users() {
        let csv_content = "Username,Password,Role,Region,Branch Code\n\
                           sup,pw,Supervisor,JEDDAH,\n";
        let reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let users = reader.read_users().await.unwrap();
        assert_eq!(users[0].role, Role::Supervisor);
        assert_eq!(users[0].region, "JEDDAH");
    }
}
