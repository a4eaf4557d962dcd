//! Execution strategy module
//!
//! This module defines the Strategy pattern for one complete command run:
//! open the record store, authenticate, perform the requested action and
//! write the result as CSV. The synchronous and asynchronous
//! implementations share everything except the store and service they
//! drive, and are selected at runtime.

use crate::cli::StrategyType;
use crate::core::{Aggregates, ListFilter, NewTransfer, TransferView};
use crate::io::csv_format::{
    write_actor_csv, write_aggregates_csv, write_transfers_csv, write_view_csv,
};
use crate::types::{Actor, Transfer, TransferError};
use std::io::Write;
use std::path::PathBuf;

pub mod r#async;
pub mod sync;

pub use self::r#async::AsyncExecutionStrategy;
pub use sync::SyncExecutionStrategy;

/// What the caller asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create(NewTransfer),
    Pickup(String),
    RouteToWarehouse(String),
    ConfirmReceipt(String),
    List(ListFilter),
    Aggregate(ListFilter),
    Whoami,
}

/// A fully resolved command: where the tables live, who is acting, and what
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub transfers_path: PathBuf,
    pub users_path: PathBuf,
    pub username: String,
    pub password: String,
    pub action: Action,
}

/// Result of a successful action, before rendering
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The transfer as it stands after a mutation
    Transfer(Transfer),
    View(TransferView),
    Aggregates(Aggregates),
    Actor(Actor),
}

/// Render an outcome as CSV
pub fn write_outcome(outcome: &CommandOutcome, output: &mut dyn Write) -> Result<(), TransferError> {
    match outcome {
        CommandOutcome::Transfer(transfer) => {
            write_transfers_csv(std::slice::from_ref(transfer), output)
        }
        CommandOutcome::View(view) => write_view_csv(view, output),
        CommandOutcome::Aggregates(aggregates) => write_aggregates_csv(aggregates, output),
        CommandOutcome::Actor(actor) => write_actor_csv(actor, output),
    }
}

/// Execution strategy trait for complete command runs
pub trait ExecutionStrategy: Send + Sync {
    /// Run `request` against its record store and write the result to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A table cannot be read, or a stored row is invalid
    /// - The credentials do not match a user
    /// - The action is rejected by the lifecycle rules or the role views
    /// - The updated table cannot be saved, or output cannot be written
    ///
    /// Nothing is saved unless the action succeeded.
    fn execute(&self, request: &Request, output: &mut dyn Write) -> Result<(), TransferError>;
}

/// Create an execution strategy based on the specified strategy type
pub fn create_strategy(strategy_type: StrategyType) -> Box<dyn ExecutionStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncExecutionStrategy),
        StrategyType::Async => Box::new(AsyncExecutionStrategy::default()),
    }
}
