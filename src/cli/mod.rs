// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, Command, FilterArgs, StrategyType};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Every option can also come from its `TRANSFER_TRACKER_*` environment
/// variable. On invalid arguments or `--help`, clap prints the message and
/// exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
