//! Synchronous CSV table reader
//!
//! Reads a whole stored table from any `std::io::Read`, delegating row
//! conversion to the csv_format module.
//!
//! # Error Handling
//!
//! Loading is all-or-nothing: the first unreadable or invalid row aborts
//! the load with a [`TransferError::Parse`] carrying its line number.
//! Headers are trimmed; field values are kept verbatim.

use crate::io::csv_format::{convert_transfer_row, convert_user_row, TransferRow, UserRow};
use crate::types::{Transfer, TransferError, User};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Read the transfer table
pub fn read_transfers<R: Read>(reader: R) -> Result<Vec<Transfer>, TransferError> {
    read_table::<R, TransferRow, _>(reader, convert_transfer_row)
}

/// Read the user table
pub fn read_users<R: Read>(reader: R) -> Result<Vec<User>, TransferError> {
    read_table::<R, UserRow, _>(reader, convert_user_row)
}

fn read_table<R, Row, T>(
    reader: R,
    convert: fn(Row) -> Result<T, String>,
) -> Result<Vec<T>, TransferError>
where
    R: Read,
    Row: DeserializeOwned,
{
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .buffer_capacity(8 * 1024)
        .from_reader(reader);

    let mut table = Vec::new();
    for (index, result) in reader.deserialize::<Row>().enumerate() {
        // Header is line 1
        let line = index as u64 + 2;
        let row = result?;
        let record = convert(row).map_err(|e| TransferError::parse(Some(line), e))?;
        table.push(record);
    }

    Ok(table)
}
