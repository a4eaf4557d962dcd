//! Synchronous execution strategy
//!
//! Drives a [`TransferService`] over a [`CsvRecordStore`] on the calling
//! thread. The service loads both tables, authenticates the caller, applies
//! the action and, for mutations, saves the transfer table before
//! returning.

use crate::core::clock::Clock;
use crate::core::traits::RecordStore;
use crate::core::TransferService;
use crate::io::CsvRecordStore;
use crate::strategy::{write_outcome, Action, CommandOutcome, ExecutionStrategy, Request};
use crate::types::TransferError;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncExecutionStrategy;

impl SyncExecutionStrategy {
    /// Run the action against an already opened service
    pub fn run<S: RecordStore, C: Clock>(
        service: &TransferService<S, C>,
        request: &Request,
    ) -> Result<CommandOutcome, TransferError> {
        let actor = service.authenticate(&request.username, &request.password)?;

        let outcome = match &request.action {
            Action::Create(new_transfer) => {
                CommandOutcome::Transfer(service.create_transfer(&actor, new_transfer.clone())?)
            }
            Action::Pickup(id) => CommandOutcome::Transfer(service.pickup(&actor, id)?),
            Action::RouteToWarehouse(id) => {
                CommandOutcome::Transfer(service.route_to_warehouse(&actor, id)?)
            }
            Action::ConfirmReceipt(id) => {
                CommandOutcome::Transfer(service.confirm_receipt(&actor, id)?)
            }
            Action::List(filter) => CommandOutcome::View(service.list_view(&actor, filter)?),
            Action::Aggregate(filter) => {
                CommandOutcome::Aggregates(service.aggregate(&actor, filter)?)
            }
            Action::Whoami => CommandOutcome::Actor(actor),
        };

        Ok(outcome)
    }
}

impl ExecutionStrategy for SyncExecutionStrategy {
    fn execute(&self, request: &Request, output: &mut dyn Write) -> Result<(), TransferError> {
        let store = CsvRecordStore::new(&request.transfers_path, &request.users_path);
        let service = TransferService::open(store)?;
        let outcome = Self::run(&service, request)?;
        write_outcome(&outcome, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ListFilter;
    use std::fs;
    use tempfile::TempDir;

    fn request(dir: &TempDir, username: &str, action: Action) -> Request {
        Request {
            transfers_path: dir.path().join("transfers.csv"),
            users_path: dir.path().join("users.csv"),
            username: username.to_string(),
            password: "pw".to_string(),
            action,
        }
    }

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("users.csv"),
            "Username,Password,Role,Region,Branch Code\n\
             branch1,pw,Branch,Riyadh,P00-01\n\
             owner,pw,Owner,,\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_whoami() {
        let dir = setup();
        let mut output = Vec::new();

        SyncExecutionStrategy
            .execute(&request(&dir, "branch1", Action::Whoami), &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Username,Role,Region,Branch Code\nbranch1,Branch,Riyadh,P00-01\n"
        );
    }

    #[test]
    fn test_bad_credentials_write_nothing() {
        let dir = setup();
        let mut req = request(&dir, "owner", Action::List(ListFilter::default()));
        req.password = "wrong".to_string();
        let mut output = Vec::new();

        let err = SyncExecutionStrategy.execute(&req, &mut output).unwrap_err();

        assert_eq!(err, TransferError::invalid_credentials("owner"));
        assert!(output.is_empty());
        assert!(!dir.path().join("transfers.csv").exists());
    }

    #[test]
    fn test_owner_lists_empty_table() {
        let dir = setup();
        let mut output = Vec::new();

        SyncExecutionStrategy
            .execute(
                &request(&dir, "owner", Action::List(ListFilter::default())),
                &mut output,
            )
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("Section,Transfer ID,"));
    }
}
