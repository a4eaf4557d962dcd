//! I/O module
//!
//! Handles the stored tables and CSV output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, output serialization)
//! - `sync_reader` - Synchronous table reader
//! - `async_reader` - Asynchronous table reader over `futures::io::AsyncRead`
//! - `csv_store` - File-backed [`RecordStore`](crate::core::RecordStore)
//! - `async_store` - File-backed [`AsyncRecordStore`](crate::core::AsyncRecordStore)
//! - `memory_store` - In-memory store implementing both traits

pub mod async_reader;
pub mod async_store;
pub mod csv_format;
pub mod csv_store;
pub mod memory_store;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use async_store::AsyncCsvStore;
pub use csv_format::{
    render_transfers_csv, write_actor_csv, write_aggregates_csv, write_transfers_csv,
    write_view_csv, TransferRow, UserRow,
};
pub use csv_store::CsvRecordStore;
pub use memory_store::MemoryStore;
