//! Benchmark suite for role views and aggregation
//!
//! Measures the read paths every command goes through on a synthetic
//! transfer table spread over all regions and statuses.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use transfer_tracker::core::{aggregate, list_view, ListFilter};
use transfer_tracker::{Actor, Region, Role, Transfer, TransferStatus, TransferType};

fn main() {
    divan::main();
}

const SIZES: &[usize] = &[100, 1_000, 100_000];

fn synthetic_table(size: usize) -> Vec<Transfer> {
    let base = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("valid base timestamp");
    let statuses = [
        TransferStatus::Pending,
        TransferStatus::PickedUp,
        TransferStatus::Received,
    ];

    (0..size)
        .map(|i| {
            let from = Region::ALL[i % 5].prefix();
            let to = Region::ALL[(i / 5) % 5].prefix();
            let status = statuses[i % 3];
            Transfer {
                transfer_id: format!("TR-{:06}", i),
                from_branch: format!("{}-{:02}", from, i % 17),
                to_branch: format!("{}-{:02}", to, (i + 1) % 17),
                value: Decimal::new((i as i64 % 9_000) + 100, 2),
                transfer_type: TransferType::Normal,
                status,
                created_at: base + chrono::Duration::hours(i as i64),
                picked_up_at: None,
                received_at: None,
                driver: if status == TransferStatus::PickedUp {
                    format!("driver{}", i % 4)
                } else {
                    String::new()
                },
                handled_by_wh: false,
                attachment: None,
                notes: None,
            }
        })
        .collect()
}

#[divan::bench(args = SIZES)]
fn branch_view(bencher: divan::Bencher, size: usize) {
    let table = synthetic_table(size);
    let actor = Actor::new("branch", Role::Branch, "Riyadh").with_branch("P00-03");
    bencher.bench(|| list_view(&table, &actor, &ListFilter::default()));
}

#[divan::bench(args = SIZES)]
fn driver_view(bencher: divan::Bencher, size: usize) {
    let table = synthetic_table(size);
    let actor = Actor::new("driver1", Role::Driver, "Taif");
    bencher.bench(|| list_view(&table, &actor, &ListFilter::default()));
}

#[divan::bench(args = SIZES)]
fn filtered_overview(bencher: divan::Bencher, size: usize) {
    let table = synthetic_table(size);
    let actor = Actor::new("owner", Role::Owner, "");
    let filter = ListFilter {
        id_substring: Some("tr-00".to_string()),
        ..Default::default()
    };
    bencher.bench(|| list_view(&table, &actor, &filter));
}

#[divan::bench(args = SIZES)]
fn aggregate_all(bencher: divan::Bencher, size: usize) {
    let table = synthetic_table(size);
    bencher.bench(|| aggregate(&table));
}
