//! Role-gated read views over the transfer table
//!
//! Each role sees a different slice of the table:
//!
//! - **Branch**: its own outgoing and incoming transfers, split by whether
//!   they have been received
//! - **Driver**: the Pending pool of its region plus what it is holding
//! - **Supervisor**: every non-warehouse transfer touching its region
//! - **Manager / Owner**: everything
//!
//! The general filters (branch, date, id search) apply to every view except
//! the driver's, which always works on the full table.

use crate::core::capability::region_prefix;
use crate::types::{Actor, Role, Transfer, TransferError, TransferStatus};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// General filters shared by the list and aggregate calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Keep transfers sent from or to this branch
    pub branch: Option<String>,
    /// Keep transfers created on this calendar date
    pub date: Option<NaiveDate>,
    /// Keep transfers whose id contains this text, ignoring case
    pub id_substring: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, transfer: &Transfer) -> bool {
        if let Some(branch) = self.branch.as_deref().filter(|b| !b.is_empty()) {
            if !transfer.involves_branch(branch) {
                return false;
            }
        }
        if let Some(date) = self.date {
            if transfer.created_at.date() != date {
                return false;
            }
        }
        if let Some(needle) = self.id_substring.as_deref().map(str::trim) {
            if !needle.is_empty()
                && !transfer
                    .transfer_id
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, transfers: &'a [Transfer]) -> Vec<&'a Transfer> {
        transfers.iter().filter(|t| self.matches(t)).collect()
    }
}

/// A branch's own transfers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchBoard {
    /// Outgoing, not yet received
    pub sending_pending: Vec<Transfer>,
    /// Outgoing, received
    pub sent_done: Vec<Transfer>,
    /// Incoming, not yet received
    pub receiving_pending: Vec<Transfer>,
    /// Incoming, received
    pub received_done: Vec<Transfer>,
    /// Origin that most often sends to this branch (ties: lowest code)
    pub most_frequent_sender: Option<String>,
}

/// What a driver can act on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverBoard {
    /// Pending transfers touching the driver's region
    pub pickup_pool: Vec<Transfer>,
    /// Transfers the driver currently holds
    pub holding: Vec<Transfer>,
}

/// Result of [`list_view`], shaped by the actor's role
#[derive(Debug, Clone, PartialEq)]
pub enum TransferView {
    Branch(BranchBoard),
    Driver(DriverBoard),
    Overview(Vec<Transfer>),
}

impl TransferView {
    /// Named sections in display order
    pub fn sections(&self) -> Vec<(&'static str, &[Transfer])> {
        match self {
            TransferView::Branch(board) => vec![
                ("sending_pending", board.sending_pending.as_slice()),
                ("sent_done", board.sent_done.as_slice()),
                ("receiving_pending", board.receiving_pending.as_slice()),
                ("received_done", board.received_done.as_slice()),
            ],
            TransferView::Driver(board) => vec![
                ("pickup_pool", board.pickup_pool.as_slice()),
                ("holding", board.holding.as_slice()),
            ],
            TransferView::Overview(transfers) => vec![("all", transfers.as_slice())],
        }
    }

    /// Every transfer in the view, once
    ///
    /// A branch sending to itself is impossible, so the branch sections
    /// never overlap; neither do the driver's pool and holdings.
    pub fn into_transfers(self) -> Vec<Transfer> {
        match self {
            TransferView::Branch(board) => board
                .sending_pending
                .into_iter()
                .chain(board.sent_done)
                .chain(board.receiving_pending)
                .chain(board.received_done)
                .collect(),
            TransferView::Driver(board) => {
                board.pickup_pool.into_iter().chain(board.holding).collect()
            }
            TransferView::Overview(transfers) => transfers,
        }
    }
}

/// Build the view appropriate to the actor's role
pub fn list_view(
    transfers: &[Transfer],
    actor: &Actor,
    filter: &ListFilter,
) -> Result<TransferView, TransferError> {
    match actor.role {
        Role::Branch => branch_board(transfers, actor, filter).map(TransferView::Branch),
        Role::Driver => driver_board(transfers, actor).map(TransferView::Driver),
        Role::Supervisor => {
            let prefix = region_prefix(actor)?;
            let visible = filter
                .apply(transfers)
                .into_iter()
                .filter(|t| t.touches_prefix(prefix) && !t.touches_warehouse())
                .cloned()
                .collect();
            Ok(TransferView::Overview(visible))
        }
        Role::Manager | Role::Owner => Ok(TransferView::Overview(
            filter.apply(transfers).into_iter().cloned().collect(),
        )),
    }
}

fn branch_board(
    transfers: &[Transfer],
    actor: &Actor,
    filter: &ListFilter,
) -> Result<BranchBoard, TransferError> {
    let branch = actor
        .branch()
        .ok_or_else(|| TransferError::validation("branch_code", "acting branch has no branch code"))?;

    let mut board = BranchBoard::default();
    let mut senders: BTreeMap<&str, usize> = BTreeMap::new();

    for transfer in filter.apply(transfers) {
        let done = transfer.status == TransferStatus::Received;
        if transfer.from_branch == branch {
            if done {
                board.sent_done.push(transfer.clone());
            } else {
                board.sending_pending.push(transfer.clone());
            }
        }
        if transfer.to_branch == branch {
            *senders.entry(transfer.from_branch.as_str()).or_default() += 1;
            if done {
                board.received_done.push(transfer.clone());
            } else {
                board.receiving_pending.push(transfer.clone());
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (sender, count) in senders {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((sender, count));
        }
    }
    board.most_frequent_sender = best.map(|(sender, _)| sender.to_string());

    Ok(board)
}

fn driver_board(transfers: &[Transfer], actor: &Actor) -> Result<DriverBoard, TransferError> {
    let prefix = region_prefix(actor)?;

    let pickup_pool = transfers
        .iter()
        .filter(|t| t.status == TransferStatus::Pending && t.touches_prefix(prefix))
        .cloned()
        .collect();
    let holding = transfers
        .iter()
        .filter(|t| t.is_held_by(&actor.username))
        .cloned()
        .collect();

    Ok(DriverBoard {
        pickup_pool,
        holding,
    })
}
