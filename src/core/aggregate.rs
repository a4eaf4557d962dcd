//! Read-only totals over a set of transfers
//!
//! Grouping keys:
//! - branch code (both directions, see [`BranchTotals`])
//! - reporting region of the origin branch ([`RegionLabel`])
//! - calendar month of `created_at`, as `YYYY-MM`
//! - lifecycle status
//!
//! "Pending" in the per-branch figures means anything not yet received.

use crate::types::{RegionLabel, Transfer, TransferStatus};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Summed value and number of transfers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub value: Decimal,
    pub count: usize,
}

impl Totals {
    fn add(&mut self, value: Decimal) {
        self.value = self.value.saturating_add(value);
        self.count += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchTotals {
    /// Transfers originating at the branch
    pub sent: Totals,
    /// Transfers addressed to the branch
    pub received: Totals,
    /// Value sent but not yet received at the destination
    pub pending_sent_value: Decimal,
    /// Value addressed to the branch but not yet received
    pub pending_received_value: Decimal,
}

/// Company-wide value by lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTotals {
    pub pending_value: Decimal,
    pub picked_up_value: Decimal,
    pub received_value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub by_branch: BTreeMap<String, BranchTotals>,
    pub by_region: BTreeMap<RegionLabel, Totals>,
    pub by_month: BTreeMap<String, Totals>,
    pub by_status: StatusTotals,
}

/// Compute every grouping in one pass
pub fn aggregate<'a, I>(transfers: I) -> Aggregates
where
    I: IntoIterator<Item = &'a Transfer>,
{
    let mut aggregates = Aggregates::default();

    for transfer in transfers {
        let value = transfer.value;
        let open = transfer.status != TransferStatus::Received;

        let sender = aggregates
            .by_branch
            .entry(transfer.from_branch.clone())
            .or_default();
        sender.sent.add(value);
        if open {
            sender.pending_sent_value = sender.pending_sent_value.saturating_add(value);
        }

        let receiver = aggregates
            .by_branch
            .entry(transfer.to_branch.clone())
            .or_default();
        receiver.received.add(value);
        if open {
            receiver.pending_received_value = receiver.pending_received_value.saturating_add(value);
        }

        aggregates
            .by_region
            .entry(RegionLabel::for_branch(&transfer.from_branch))
            .or_default()
            .add(value);

        aggregates
            .by_month
            .entry(transfer.created_at.format("%Y-%m").to_string())
            .or_default()
            .add(value);

        let status = &mut aggregates.by_status;
        match transfer.status {
            TransferStatus::Pending => {
                status.pending_value = status.pending_value.saturating_add(value)
            }
            TransferStatus::PickedUp => {
                status.picked_up_value = status.picked_up_value.saturating_add(value)
            }
            TransferStatus::Received => {
                status.received_value = status.received_value.saturating_add(value)
            }
        }
    }

    aggregates
}
