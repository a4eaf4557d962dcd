//! Transfer lifecycle manager
//!
//! This module owns the state machine of a transfer:
//!
//! ```text
//!            create            pickup
//!   (none) ---------> Pending ---------> Picked Up
//!                      ^   |                |
//!                      |   | confirm        | route to warehouse
//!                      |   v                | (from_branch = WH)
//!                      |  Received <--------+-- confirm
//!                      +---------------------+
//! ```
//!
//! Every operation validates completely before it touches the table, so a
//! rejected call leaves the table exactly as it was. Persisting the result
//! is the caller's job (see [`crate::core::service`]).

use crate::core::capability::{ensure_permitted, region_prefix, Operation};
use crate::core::clock::{Clock, SystemClock};
use crate::types::{
    Actor, Role, Transfer, TransferError, TransferStatus, TransferType, User, WAREHOUSE_BRANCH,
};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Inputs for a new transfer
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    pub transfer_id: String,
    pub to_branch: String,
    pub value: Decimal,
    pub transfer_type: TransferType,
    pub notes: Option<String>,
    pub attachment: Option<String>,
}

impl NewTransfer {
    pub fn new(
        transfer_id: impl Into<String>,
        to_branch: impl Into<String>,
        value: Decimal,
        transfer_type: TransferType,
    ) -> Self {
        Self {
            transfer_id: transfer_id.into(),
            to_branch: to_branch.into(),
            value,
            transfer_type,
            notes: None,
            attachment: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }
}

/// Branch codes a transfer may be addressed to
///
/// Every branch code held by a Branch-role user.
pub fn known_branches(users: &[User]) -> BTreeSet<String> {
    users
        .iter()
        .filter(|user| user.role == Role::Branch)
        .filter_map(|user| user.branch_code.as_deref())
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Applies lifecycle transitions to an in-memory transfer table
#[derive(Debug, Clone, Default)]
pub struct LifecycleManager<C: Clock = SystemClock> {
    clock: C,
}

impl LifecycleManager<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> LifecycleManager<C> {
    /// Create a manager stamping transfers with `clock`
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Create a new Pending transfer originating at the actor's branch
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the actor is not a Branch
    /// - `Validation` if the actor has no branch code, the id is blank,
    ///   the destination is blank, unknown or the actor's own branch, or
    ///   the value is not positive
    /// - `DuplicateTransfer` if the id is already in the table
    pub fn create(
        &self,
        table: &mut Vec<Transfer>,
        actor: &Actor,
        request: NewTransfer,
        known_branches: &BTreeSet<String>,
    ) -> Result<Transfer, TransferError> {
        let transfer_id = request.transfer_id.trim().to_string();
        ensure_permitted(actor, Operation::CreateTransfer, &transfer_id)?;

        let from_branch = actor.branch().ok_or_else(|| {
            TransferError::validation("branch_code", "acting branch has no branch code")
        })?;

        if transfer_id.is_empty() {
            return Err(TransferError::validation("transfer_id", "must not be empty"));
        }

        let to_branch = request.to_branch.trim();
        if to_branch.is_empty() {
            return Err(TransferError::validation(
                "to_branch",
                "a destination branch must be selected",
            ));
        }
        if to_branch == from_branch {
            return Err(TransferError::validation(
                "to_branch",
                "must differ from the sending branch",
            ));
        }
        if !known_branches.contains(to_branch) {
            return Err(TransferError::validation(
                "to_branch",
                &format!("unknown branch code '{}'", to_branch),
            ));
        }

        if request.value <= Decimal::ZERO {
            return Err(TransferError::validation("value", "must be greater than zero"));
        }

        if table.iter().any(|t| t.transfer_id.trim() == transfer_id) {
            return Err(TransferError::duplicate_transfer(&transfer_id));
        }

        let transfer = Transfer {
            transfer_id,
            from_branch: from_branch.to_string(),
            to_branch: to_branch.to_string(),
            value: request.value,
            transfer_type: request.transfer_type,
            status: TransferStatus::Pending,
            created_at: self.clock.now(),
            picked_up_at: None,
            received_at: None,
            driver: String::new(),
            handled_by_wh: false,
            attachment: non_blank(request.attachment),
            notes: non_blank(request.notes),
        };

        table.push(transfer.clone());
        Ok(transfer)
    }

    /// Move a Pending transfer in the driver's region into the driver's hands
    pub fn pickup(
        &self,
        table: &mut [Transfer],
        actor: &Actor,
        transfer_id: &str,
    ) -> Result<Transfer, TransferError> {
        let operation = Operation::Pickup;
        ensure_permitted(actor, operation, transfer_id)?;
        let prefix = region_prefix(actor)?;

        let transfer = find_mut(table, transfer_id)?;

        if transfer.status != TransferStatus::Pending {
            return Err(TransferError::invalid_transition(
                transfer_id,
                operation.verb(),
                &format!("status is {}", transfer.status),
            ));
        }
        if !transfer.touches_prefix(prefix) {
            return Err(TransferError::invalid_transition(
                transfer_id,
                operation.verb(),
                &format!("transfer is outside region {}", actor.region),
            ));
        }

        transfer.status = TransferStatus::PickedUp;
        transfer.picked_up_at = Some(self.clock.now());
        transfer.driver = actor.username.clone();

        Ok(transfer.clone())
    }

    /// Drop a held transfer at the warehouse, returning it to the pickup pool
    ///
    /// The warehouse becomes the new origin. This is the only transition
    /// that moves a transfer back to Pending, and it may repeat any number
    /// of times before receipt.
    pub fn route_to_warehouse(
        &self,
        table: &mut [Transfer],
        actor: &Actor,
        transfer_id: &str,
    ) -> Result<Transfer, TransferError> {
        let operation = Operation::RouteToWarehouse;
        ensure_permitted(actor, operation, transfer_id)?;

        let transfer = find_mut(table, transfer_id)?;

        if transfer.status != TransferStatus::PickedUp {
            return Err(TransferError::invalid_transition(
                transfer_id,
                operation.verb(),
                &format!("status is {}", transfer.status),
            ));
        }
        if transfer.driver != actor.username {
            return Err(TransferError::invalid_transition(
                transfer_id,
                operation.verb(),
                "transfer is held by another driver",
            ));
        }

        transfer.from_branch = WAREHOUSE_BRANCH.to_string();
        transfer.status = TransferStatus::Pending;
        transfer.handled_by_wh = true;
        transfer.picked_up_at = None;
        transfer.driver.clear();

        Ok(transfer.clone())
    }

    /// Mark a transfer addressed to the actor's branch as received
    ///
    /// Receipt is accepted from either Pending or Picked Up.
    pub fn confirm_receipt(
        &self,
        table: &mut [Transfer],
        actor: &Actor,
        transfer_id: &str,
    ) -> Result<Transfer, TransferError> {
        let operation = Operation::ConfirmReceipt;
        ensure_permitted(actor, operation, transfer_id)?;

        let branch = actor.branch().ok_or_else(|| {
            TransferError::invalid_transition(
                transfer_id,
                operation.verb(),
                "acting branch has no branch code",
            )
        })?;

        let transfer = find_mut(table, transfer_id)?;

        if transfer.to_branch != branch {
            return Err(TransferError::invalid_transition(
                transfer_id,
                operation.verb(),
                &format!("transfer is addressed to {}", transfer.to_branch),
            ));
        }
        if transfer.status.is_terminal() {
            return Err(TransferError::invalid_transition(
                transfer_id,
                operation.verb(),
                "transfer was already received",
            ));
        }

        transfer.status = TransferStatus::Received;
        transfer.received_at = Some(self.clock.now());
        transfer.driver.clear();

        Ok(transfer.clone())
    }
}

/// First row carrying `transfer_id`, ignoring surrounding whitespace
fn find_mut<'a>(
    table: &'a mut [Transfer],
    transfer_id: &str,
) -> Result<&'a mut Transfer, TransferError> {
    let transfer_id = transfer_id.trim();
    table
        .iter_mut()
        .find(|t| t.transfer_id.trim() == transfer_id)
        .ok_or_else(|| TransferError::not_found(transfer_id))
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
