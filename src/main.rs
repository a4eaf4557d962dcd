//! Transfer Tracker CLI
//!
//! Command-line interface over the transfer and user CSV tables.
//!
//! # Usage
//!
//! ```bash
//! transfer-tracker -u branch1 -p secret create --id T-100 --to P01-02 --value 500.00
//! transfer-tracker -u driver1 -p secret pickup T-100
//! transfer-tracker -u driver1 -p secret route-to-warehouse T-100
//! transfer-tracker -u branch2 -p secret confirm-receipt T-100
//! transfer-tracker -u owner -p secret --strategy async aggregate --branch P00-01
//! ```
//!
//! Results are written to stdout as CSV; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad credentials, rejected operation, unreadable table, etc.)

use std::process;
use transfer_tracker::{cli, logging, strategy};

fn main() {
    let args = cli::parse_args();
    logging::init_logging(&args.log_level);

    let strategy = strategy::create_strategy(args.strategy.clone());
    let request = args.to_request();

    let mut output = std::io::stdout();
    if let Err(e) = strategy.execute(&request, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
