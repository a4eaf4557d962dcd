//! CSV format handling for the transfer and user tables
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserialization, keyed by the stored column names
//! - Conversion from rows to domain types
//! - Serialization of the transfer table, list views, aggregates and actors
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! The transfer table is written in a canonical form: header always
//! present, timestamps as `YYYY-MM-DD HH:MM:SS` with fractional seconds
//! only when non-zero, values with their stored scale, and `Yes`/empty for
//! the warehouse flag. Loading a canonical file and saving it again
//! reproduces it byte for byte.

use crate::core::aggregate::{Aggregates, Totals};
use crate::core::views::TransferView;
use crate::types::{Actor, Transfer, TransferError, TransferStatus, User};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Column order of the stored transfer table
pub const TRANSFER_HEADERS: [&str; 13] = [
    "Transfer ID",
    "From Branch",
    "To Branch",
    "Value",
    "Transfer Type",
    "Status",
    "Created At",
    "Picked Up At",
    "Received At",
    "Driver",
    "Handled By WH",
    "Attachment",
    "Notes",
];

/// Column order of the stored user table
pub const USER_HEADERS: [&str; 5] = ["Username", "Password", "Role", "Region", "Branch Code"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Stored transfer row
///
/// Every field is read as text so that conversion errors can name the
/// column. Columns added after the first release default to empty.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferRow {
    #[serde(rename = "Transfer ID")]
    pub transfer_id: String,
    #[serde(rename = "From Branch")]
    pub from_branch: String,
    #[serde(rename = "To Branch")]
    pub to_branch: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Transfer Type")]
    pub transfer_type: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Created At")]
    pub created_at: String,
    #[serde(rename = "Picked Up At", default)]
    pub picked_up_at: String,
    #[serde(rename = "Received At", default)]
    pub received_at: String,
    #[serde(rename = "Driver", default)]
    pub driver: String,
    #[serde(rename = "Handled By WH", default)]
    pub handled_by_wh: String,
    #[serde(rename = "Attachment", default)]
    pub attachment: String,
    #[serde(rename = "Notes", default)]
    pub notes: String,
}

/// Stored user row
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UserRow {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Region", default)]
    pub region: String,
    #[serde(rename = "Branch Code", default)]
    pub branch_code: String,
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse `YYYY-MM-DD HH:MM:SS`, with or without fractional seconds
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| format!("Invalid timestamp '{}': {}", text, e))
}

fn optional_timestamp(text: &str) -> Result<Option<NaiveDateTime>, String> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_timestamp(text).map(Some)
    }
}

fn optional_text(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_flag(text: &str) -> Result<bool, String> {
    match text.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "" | "no" | "false" | "0" => Ok(false),
        _ => Err(format!("Invalid Handled By WH flag: '{}'", text)),
    }
}

/// Convert a stored row to a [`Transfer`]
///
/// Rejects rows whose value is not a strictly positive decimal, whose
/// type or status is not recognized, or whose status disagrees with the
/// receipt timestamp or driver. A driver left on a Received row is kept.
///
/// # Returns
///
/// * `Ok(Transfer)` - Successfully converted record
/// * `Err(String)` - Error message naming the transfer and the bad column
pub fn convert_transfer_row(row: TransferRow) -> Result<Transfer, String> {
    let value = Decimal::from_str(row.value.trim())
        .map_err(|_| format!("Invalid value '{}' for transfer {}", row.value, row.transfer_id))?;
    if value <= Decimal::ZERO {
        return Err(format!(
            "Value must be positive for transfer {}, got {}",
            row.transfer_id, value
        ));
    }

    let transfer_type = row.transfer_type.parse()?;
    let status = row.status.parse()?;
    let created_at = parse_timestamp(&row.created_at)?;
    let picked_up_at = optional_timestamp(&row.picked_up_at)?;
    let received_at = optional_timestamp(&row.received_at)?;
    let handled_by_wh = parse_flag(&row.handled_by_wh)?;

    if received_at.is_some() != (status == TransferStatus::Received) {
        return Err(format!(
            "Received At must be set exactly when status is Received for transfer {}",
            row.transfer_id
        ));
    }
    if status == TransferStatus::Pending && !row.driver.trim().is_empty() {
        return Err(format!(
            "Pending transfer {} cannot have Driver '{}'",
            row.transfer_id, row.driver
        ));
    }

    Ok(Transfer {
        transfer_id: row.transfer_id,
        from_branch: row.from_branch,
        to_branch: row.to_branch,
        value,
        transfer_type,
        status,
        created_at,
        picked_up_at,
        received_at,
        driver: row.driver,
        handled_by_wh,
        attachment: optional_text(row.attachment),
        notes: optional_text(row.notes),
    })
}

pub fn convert_user_row(row: UserRow) -> Result<User, String> {
    let role = row
        .role
        .parse()
        .map_err(|e| format!("{} for user {}", e, row.username))?;

    Ok(User {
        username: row.username,
        password: row.password,
        role,
        region: row.region,
        branch_code: optional_text(row.branch_code),
    })
}

/// Field values of one transfer, in [`TRANSFER_HEADERS`] order
pub fn transfer_record(transfer: &Transfer) -> [String; 13] {
    [
        transfer.transfer_id.clone(),
        transfer.from_branch.clone(),
        transfer.to_branch.clone(),
        transfer.value.to_string(),
        transfer.transfer_type.to_string(),
        transfer.status.to_string(),
        format_timestamp(&transfer.created_at),
        transfer
            .picked_up_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        transfer
            .received_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        transfer.driver.clone(),
        if transfer.handled_by_wh { "Yes" } else { "" }.to_string(),
        transfer.attachment.clone().unwrap_or_default(),
        transfer.notes.clone().unwrap_or_default(),
    ]
}

/// Write the transfer table in its stored form
///
/// The header is written even for an empty table so that the file can be
/// loaded again.
pub fn write_transfers_csv(
    transfers: &[Transfer],
    output: &mut dyn Write,
) -> Result<(), TransferError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(TRANSFER_HEADERS)?;
    for transfer in transfers {
        writer.write_record(transfer_record(transfer))?;
    }
    writer.flush()?;

    Ok(())
}

/// Stored form of the transfer table as bytes
pub fn render_transfers_csv(transfers: &[Transfer]) -> Result<Vec<u8>, TransferError> {
    let mut buffer = Vec::new();
    write_transfers_csv(transfers, &mut buffer)?;
    Ok(buffer)
}

/// Write a role view, one row per transfer prefixed by its section name
///
/// A branch view ends with a `most_frequent_sender` row carrying the code
/// in the `From Branch` column, when the branch has incoming transfers.
pub fn write_view_csv(view: &TransferView, output: &mut dyn Write) -> Result<(), TransferError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    let mut header = vec!["Section"];
    header.extend(TRANSFER_HEADERS);
    writer.write_record(&header)?;

    for (section, transfers) in view.sections() {
        for transfer in transfers {
            let mut record = vec![section.to_string()];
            record.extend(transfer_record(transfer));
            writer.write_record(&record)?;
        }
    }

    if let TransferView::Branch(board) = view {
        if let Some(sender) = &board.most_frequent_sender {
            let mut record = vec![String::new(); TRANSFER_HEADERS.len() + 1];
            record[0] = "most_frequent_sender".to_string();
            record[2] = sender.clone();
            writer.write_record(&record)?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn totals_rows(dimension: &str, key: &str, totals: &Totals) -> [[String; 4]; 2] {
    [
        [
            dimension.to_string(),
            key.to_string(),
            "value".to_string(),
            totals.value.to_string(),
        ],
        [
            dimension.to_string(),
            key.to_string(),
            "count".to_string(),
            totals.count.to_string(),
        ],
    ]
}

/// Write aggregates in long form: `Dimension,Key,Metric,Value`
///
/// Dimensions appear in the order branch, region, month, status; keys
/// within a dimension are sorted.
pub fn write_aggregates_csv(
    aggregates: &Aggregates,
    output: &mut dyn Write,
) -> Result<(), TransferError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["Dimension", "Key", "Metric", "Value"])?;

    for (branch, totals) in &aggregates.by_branch {
        let metrics = [
            ("sent_value", totals.sent.value.to_string()),
            ("sent_count", totals.sent.count.to_string()),
            ("received_value", totals.received.value.to_string()),
            ("received_count", totals.received.count.to_string()),
            ("pending_sent_value", totals.pending_sent_value.to_string()),
            ("pending_received_value", totals.pending_received_value.to_string()),
        ];
        for (metric, value) in metrics {
            writer.write_record(["branch", branch.as_str(), metric, value.as_str()])?;
        }
    }

    for (label, totals) in &aggregates.by_region {
        for record in totals_rows("region", label.as_str(), totals) {
            writer.write_record(&record)?;
        }
    }

    for (month, totals) in &aggregates.by_month {
        for record in totals_rows("month", month, totals) {
            writer.write_record(&record)?;
        }
    }

    let status = &aggregates.by_status;
    for (key, value) in [
        (TransferStatus::Pending, status.pending_value),
        (TransferStatus::PickedUp, status.picked_up_value),
        (TransferStatus::Received, status.received_value),
    ] {
        writer.write_record(["status", key.as_str(), "value", &value.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_actor_csv(actor: &Actor, output: &mut dyn Write) -> Result<(), TransferError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["Username", "Role", "Region", "Branch Code"])?;
    writer.write_record([
        actor.username.as_str(),
        actor.role.as_str(),
        actor.region.as_str(),
        actor.branch().unwrap_or_default(),
    ])?;
    writer.flush()?;
    Ok(())
}
