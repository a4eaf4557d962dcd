use crate::core::{ListFilter, NewTransfer};
use crate::strategy::{Action, Request};
use crate::types::TransferType;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Track inter-branch transfers from creation to receipt
#[derive(Parser, Debug)]
#[command(name = "transfer-tracker")]
#[command(about = "Track inter-branch transfers from creation to receipt", long_about = None)]
pub struct CliArgs {
    /// Transfer table CSV path
    #[arg(
        long = "transfers",
        value_name = "PATH",
        env = "TRANSFER_TRACKER_TRANSFERS",
        default_value = "transfers.csv"
    )]
    pub transfers: PathBuf,

    /// User table CSV path
    #[arg(
        long = "users",
        value_name = "PATH",
        env = "TRANSFER_TRACKER_USERS",
        default_value = "users.csv"
    )]
    pub users: PathBuf,

    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        env = "TRANSFER_TRACKER_STRATEGY",
        default_value = "sync",
        help = "Execution strategy: 'sync' for synchronous or 'async' for tokio-based"
    )]
    pub strategy: StrategyType,

    /// Default log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        env = "TRANSFER_TRACKER_LOG",
        default_value = "info"
    )]
    pub log_level: String,

    #[arg(short = 'u', long = "username", env = "TRANSFER_TRACKER_USERNAME")]
    pub username: String,

    #[arg(
        short = 'p',
        long = "password",
        env = "TRANSFER_TRACKER_PASSWORD",
        hide_env_values = true
    )]
    pub password: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available execution strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a transfer from the signed-in branch
    Create {
        #[arg(long = "id")]
        transfer_id: String,

        /// Destination branch code
        #[arg(long = "to")]
        to_branch: String,

        #[arg(long = "value", allow_negative_numbers = true)]
        value: Decimal,

        /// NORMAL, RETURN or RECALL
        #[arg(long = "type", default_value = "NORMAL")]
        transfer_type: TransferType,

        #[arg(long = "notes")]
        notes: Option<String>,

        #[arg(long = "attachment")]
        attachment: Option<String>,
    },
    /// Take a Pending transfer in your region
    Pickup { transfer_id: String },
    /// Hand a transfer you hold over to the warehouse
    RouteToWarehouse { transfer_id: String },
    /// Confirm a transfer addressed to your branch has arrived
    ConfirmReceipt { transfer_id: String },
    /// Show the transfers your role can see
    List(FilterArgs),
    /// Totals by branch, region, month and status over what you can see
    Aggregate(FilterArgs),
    /// Show the signed-in identity
    Whoami,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    /// Keep transfers sent from or to this branch
    #[arg(long = "branch")]
    pub branch: Option<String>,

    /// Keep transfers created on this date (YYYY-MM-DD)
    #[arg(long = "date")]
    pub date: Option<NaiveDate>,

    /// Keep transfers whose id contains this text
    #[arg(long = "search")]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ListFilter {
        ListFilter {
            branch: self.branch.clone(),
            date: self.date,
            id_substring: self.search.clone(),
        }
    }
}

impl Command {
    pub fn to_action(&self) -> Action {
        match self {
            Command::Create {
                transfer_id,
                to_branch,
                value,
                transfer_type,
                notes,
                attachment,
            } => {
                let mut new_transfer =
                    NewTransfer::new(transfer_id, to_branch, *value, *transfer_type);
                new_transfer.notes = notes.clone();
                new_transfer.attachment = attachment.clone();
                Action::Create(new_transfer)
            }
            Command::Pickup { transfer_id } => Action::Pickup(transfer_id.clone()),
            Command::RouteToWarehouse { transfer_id } => {
                Action::RouteToWarehouse(transfer_id.clone())
            }
            Command::ConfirmReceipt { transfer_id } => Action::ConfirmReceipt(transfer_id.clone()),
            Command::List(filter) => Action::List(filter.to_filter()),
            Command::Aggregate(filter) => Action::Aggregate(filter.to_filter()),
            Command::Whoami => Action::Whoami,
        }
    }
}

impl CliArgs {
    /// Resolve the parsed arguments into a strategy request
    pub fn to_request(&self) -> Request {
        Request {
            transfers_path: self.transfers.clone(),
            users_path: self.users.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            action: self.command.to_action(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> CliArgs {
        let mut full = vec!["program", "-u", "someone", "-p", "pw"];
        full.extend_from_slice(args);
        CliArgs::try_parse_from(full).unwrap()
    }

    #[rstest]
    #[case::default_strategy(&["whoami"], StrategyType::Sync)]
    #[case::explicit_sync(&["--strategy", "sync", "whoami"], StrategyType::Sync)]
    #[case::explicit_async(&["--strategy", "async", "whoami"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        assert_eq!(parse(args).strategy, expected);
    }

    #[test]
    fn test_defaults() {
        let parsed = parse(&["whoami"]);
        assert_eq!(parsed.transfers, PathBuf::from("transfers.csv"));
        assert_eq!(parsed.users, PathBuf::from("users.csv"));
        assert_eq!(parsed.log_level, "info");
        assert_eq!(parsed.to_request().action, Action::Whoami);
    }

    #[test]
    fn test_create_command() {
        let parsed = parse(&[
            "create", "--id", "T9", "--to", "P01-02", "--value", "125.50", "--type", "return",
            "--notes", "two boxes",
        ]);

        let Action::Create(new_transfer) = parsed.to_request().action else {
            panic!("Expected create action");
        };
        assert_eq!(new_transfer.transfer_id, "T9");
        assert_eq!(new_transfer.to_branch, "P01-02");
        assert_eq!(new_transfer.value, Decimal::new(12550, 2));
        assert_eq!(new_transfer.transfer_type, TransferType::Return);
        assert_eq!(new_transfer.notes.as_deref(), Some("two boxes"));
        assert_eq!(new_transfer.attachment, None);
    }

    #[test]
    fn test_create_accepts_negative_value_for_core_validation() {
        let parsed = parse(&["create", "--id", "T9", "--to", "P01-02", "--value", "-5"]);
        let Action::Create(new_transfer) = parsed.to_request().action else {
            panic!("Expected create action");
        };
        assert_eq!(new_transfer.value, Decimal::from(-5));
        assert_eq!(new_transfer.transfer_type, TransferType::Normal);
    }

    #[rstest]
    #[case::pickup(&["pickup", "T1"], Action::Pickup("T1".to_string()))]
    #[case::route(&["route-to-warehouse", "T1"], Action::RouteToWarehouse("T1".to_string()))]
    #[case::receipt(&["confirm-receipt", "T1"], Action::ConfirmReceipt("T1".to_string()))]
    #[case::list_unfiltered(&["list"], Action::List(ListFilter::default()))]
    #[case::aggregate_by_branch(
        &["aggregate", "--branch", "P00-01"],
        Action::Aggregate(ListFilter { branch: Some("P00-01".to_string()), ..Default::default() })
    )]
    fn test_command_actions(#[case] args: &[&str], #[case] expected: Action) {
        assert_eq!(parse(args).to_request().action, expected);
    }

    #[test]
    fn test_list_filters() {
        let parsed = parse(&["list", "--date", "2025-04-01", "--search", "tr-"]);
        assert_eq!(
            parsed.to_request().action,
            Action::List(ListFilter {
                branch: None,
                date: NaiveDate::from_ymd_opt(2025, 4, 1),
                id_substring: Some("tr-".to_string()),
            })
        );
    }

    #[rstest]
    #[case::bad_type(&["create", "--id", "T1", "--to", "P01-02", "--value", "1", "--type", "EXPRESS"])]
    #[case::bad_value(&["create", "--id", "T1", "--to", "P01-02", "--value", "lots"])]
    #[case::bad_date(&["list", "--date", "yesterday"])]
    #[case::missing_command(&[])]
    fn test_invalid_arguments(#[case] args: &[&str]) {
        let mut full = vec!["program", "-u", "someone", "-p", "pw"];
        full.extend_from_slice(args);
        assert!(CliArgs::try_parse_from(full).is_err());
    }
}
