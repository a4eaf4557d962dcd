//! Transfer-related types for the transfer tracker
//!
//! This module defines the transfer record, its lifecycle status and
//! the kinds of shipment a branch can request.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Transfer identifier
///
/// Caller-supplied, free-form text (e.g. a paper slip number).
pub type TransferId = String;

/// Branch code standing in for the warehouse once a driver re-routes a transfer.
pub const WAREHOUSE_BRANCH: &str = "WH";

/// Lifecycle status of a transfer
///
/// `Pending` is the initial state and `Received` is terminal. The only
/// backwards edge is `PickedUp -> Pending` through a warehouse re-route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransferStatus {
    /// Waiting in the pickup pool
    Pending,
    /// Held by a driver
    PickedUp,
    /// Confirmed by the destination branch
    Received,
}

impl TransferStatus {
    /// Persisted label
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "Pending",
            TransferStatus::PickedUp => "Picked Up",
            TransferStatus::Received => "Received",
        }
    }

    /// Whether no further transition is possible
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Received)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TransferStatus::Pending),
            "picked up" | "picked_up" | "pickedup" => Ok(TransferStatus::PickedUp),
            "received" => Ok(TransferStatus::Received),
            _ => Err(format!("Invalid transfer status: '{}'", s)),
        }
    }
}

/// Kind of shipment requested by the originating branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferType {
    /// Regular stock movement
    Normal,
    /// Goods sent back to the branch they came from
    Return,
    /// Stock pulled back on request
    Recall,
}

impl TransferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Normal => "NORMAL",
            TransferType::Return => "RETURN",
            TransferType::Recall => "RECALL",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NORMAL" => Ok(TransferType::Normal),
            "RETURN" => Ok(TransferType::Return),
            "RECALL" => Ok(TransferType::Recall),
            _ => Err(format!("Invalid transfer type: '{}'", s)),
        }
    }
}

/// One shipment of value between two branches
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub transfer_id: TransferId,

    /// Origin branch code, or [`WAREHOUSE_BRANCH`] after a re-route
    pub from_branch: String,

    /// Destination branch code
    pub to_branch: String,

    /// Shipment value, always strictly positive
    pub value: Decimal,

    pub transfer_type: TransferType,

    pub status: TransferStatus,

    /// Set once at creation, never modified afterwards
    pub created_at: NaiveDateTime,

    /// Set on pickup, cleared again on a warehouse re-route
    pub picked_up_at: Option<NaiveDateTime>,

    /// Present exactly when `status` is `Received`
    pub received_at: Option<NaiveDateTime>,

    /// Username of the driver holding the transfer; empty when nobody does
    pub driver: String,

    /// Whether the transfer has passed through the warehouse at least once
    pub handled_by_wh: bool,

    pub attachment: Option<String>,

    pub notes: Option<String>,
}

impl Transfer {
    /// Whether this transfer is currently held by `username`
    pub fn is_held_by(&self, username: &str) -> bool {
        self.status == TransferStatus::PickedUp && self.driver == username
    }

    /// Whether either end of the transfer starts with `prefix`
    pub fn touches_prefix(&self, prefix: &str) -> bool {
        self.from_branch.starts_with(prefix) || self.to_branch.starts_with(prefix)
    }

    /// Whether either end of the transfer is exactly `branch`
    pub fn involves_branch(&self, branch: &str) -> bool {
        self.from_branch == branch || self.to_branch == branch
    }

    /// Whether the transfer has been routed through the warehouse leg
    pub fn touches_warehouse(&self) -> bool {
        self.touches_prefix(WAREHOUSE_BRANCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn sample() -> Transfer {
        Transfer {
            transfer_id: "T1".to_string(),
            from_branch: "P00-01".to_string(),
            to_branch: "P01-02".to_string(),
            value: Decimal::new(50000, 2),
            transfer_type: TransferType::Normal,
            status: TransferStatus::Pending,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            picked_up_at: None,
            received_at: None,
            driver: String::new(),
            handled_by_wh: false,
            attachment: None,
            notes: None,
        }
    }

    #[rstest]
    #[case("Pending", TransferStatus::Pending)]
    #[case("Picked Up", TransferStatus::PickedUp)]
    #[case("picked up", TransferStatus::PickedUp)]
    #[case(" Received ", TransferStatus::Received)]
    fn test_status_parsing(#[case] input: &str, #[case] expected: TransferStatus) {
        assert_eq!(input.parse::<TransferStatus>().unwrap(), expected);
    }

    #[test]
    fn test_status_parsing_rejects_unknown() {
        let err = "Lost".parse::<TransferStatus>().unwrap_err();
        assert!(err.contains("Invalid transfer status"));
    }

    #[rstest]
    #[case(TransferStatus::Pending, "Pending")]
    #[case(TransferStatus::PickedUp, "Picked Up")]
    #[case(TransferStatus::Received, "Received")]
    fn test_status_display(#[case] status: TransferStatus, #[case] expected: &str) {
        assert_eq!(status.to_string(), expected);
    }

    #[rstest]
    #[case("NORMAL", TransferType::Normal)]
    #[case("return", TransferType::Return)]
    #[case("Recall", TransferType::Recall)]
    fn test_type_parsing(#[case] input: &str, #[case] expected: TransferType) {
        assert_eq!(input.parse::<TransferType>().unwrap(), expected);
    }

    #[test]
    fn test_only_received_is_terminal() {
        assert!(!TransferStatus::Pending.is_terminal());
        assert!(!TransferStatus::PickedUp.is_terminal());
        assert!(TransferStatus::Received.is_terminal());
    }

    #[test]
    fn test_is_held_by_requires_picked_up_status() {
        let mut transfer = sample();
        transfer.driver = "driver1".to_string();
        assert!(!transfer.is_held_by("driver1"));

        transfer.status = TransferStatus::PickedUp;
        assert!(transfer.is_held_by("driver1"));
        assert!(!transfer.is_held_by("driver2"));
    }

    #[rstest]
    #[case("P00", true)]
    #[case("P01", true)]
    #[case("P03", false)]
    fn test_touches_prefix(#[case] prefix: &str, #[case] expected: bool) {
        assert_eq!(sample().touches_prefix(prefix), expected);
    }

    #[test]
    fn test_touches_warehouse_after_reroute() {
        let mut transfer = sample();
        assert!(!transfer.touches_warehouse());
        transfer.from_branch = WAREHOUSE_BRANCH.to_string();
        assert!(transfer.touches_warehouse());
    }
}
