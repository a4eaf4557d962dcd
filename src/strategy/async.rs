//! Asynchronous execution strategy
//!
//! Same pipeline as the sync strategy, driven on a tokio runtime:
//!
//! ```text
//! AsyncExecutionStrategy
//!     ├── tokio multi-thread runtime (block_on)
//!     └── AsyncTransferService
//!         └── AsyncCsvStore (csv-async over tokio::fs, temp file + rename)
//! ```
//!
//! The runtime is built per call, so the strategy can be used from plain
//! synchronous code such as `main`.

use crate::core::clock::Clock;
use crate::core::traits::AsyncRecordStore;
use crate::core::AsyncTransferService;
use crate::io::AsyncCsvStore;
use crate::strategy::{write_outcome, Action, CommandOutcome, ExecutionStrategy, Request};
use crate::types::TransferError;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct AsyncExecutionStrategy {
    /// Worker threads for the runtime; tokio's default when `None`
    worker_threads: Option<usize>,
}

impl AsyncExecutionStrategy {
    pub fn with_worker_threads(worker_threads: usize) -> Self {
        Self {
            worker_threads: Some(worker_threads.max(1)),
        }
    }

    /// Run the action against an already opened service
    pub async fn run<S: AsyncRecordStore, C: Clock>(
        service: &AsyncTransferService<S, C>,
        request: &Request,
    ) -> Result<CommandOutcome, TransferError> {
        let actor = service.authenticate(&request.username, &request.password)?;

        let outcome = match &request.action {
            Action::Create(new_transfer) => CommandOutcome::Transfer(
                service
                    .create_transfer(&actor, new_transfer.clone())
                    .await?,
            ),
            Action::Pickup(id) => CommandOutcome::Transfer(service.pickup(&actor, id).await?),
            Action::RouteToWarehouse(id) => {
                CommandOutcome::Transfer(service.route_to_warehouse(&actor, id).await?)
            }
            Action::ConfirmReceipt(id) => {
                CommandOutcome::Transfer(service.confirm_receipt(&actor, id).await?)
            }
            Action::List(filter) => {
                CommandOutcome::View(service.list_view(&actor, filter).await?)
            }
            Action::Aggregate(filter) => {
                CommandOutcome::Aggregates(service.aggregate(&actor, filter).await?)
            }
            Action::Whoami => CommandOutcome::Actor(actor),
        };

        Ok(outcome)
    }
}

impl ExecutionStrategy for AsyncExecutionStrategy {
    fn execute(&self, request: &Request, output: &mut dyn Write) -> Result<(), TransferError> {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        if let Some(threads) = self.worker_threads {
            builder.worker_threads(threads);
        }
        let runtime = builder.enable_all().build().map_err(|e| TransferError::Io {
            message: format!("Failed to create tokio runtime: {}", e),
        })?;

        let outcome = runtime.block_on(async {
            let store = AsyncCsvStore::new(&request.transfers_path, &request.users_path);
            let service = AsyncTransferService::open(store).await?;
            Self::run(&service, request).await
        })?;

        write_outcome(&outcome, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NewTransfer;
    use crate::types::TransferType;
    use rust_decimal::Decimal;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("users.csv"),
            "Username,Password,Role,Region,Branch Code\n\
             branch1,pw,Branch,Riyadh,P00-01\n\
             branch2,pw,Branch,Taif,P01-02\n",
        )
        .unwrap();
        dir
    }

    fn request(dir: &TempDir, action: Action) -> Request {
        Request {
            transfers_path: dir.path().join("transfers.csv"),
            users_path: dir.path().join("users.csv"),
            username: "branch1".to_string(),
            password: "pw".to_string(),
            action,
        }
    }

    #[test]
    fn test_create_persists_and_echoes_transfer() {
        let dir = setup();
        let new_transfer =
            NewTransfer::new("T1", "P01-02", Decimal::new(1250, 2), TransferType::Recall);
        let mut output = Vec::new();

        AsyncExecutionStrategy::with_worker_threads(2)
            .execute(&request(&dir, Action::Create(new_transfer)), &mut output)
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        let stored = fs::read_to_string(dir.path().join("transfers.csv")).unwrap();
        assert_eq!(output, stored);
        assert!(stored.contains("T1,P00-01,P01-02,12.50,RECALL,Pending,"));
    }

    #[test]
    fn test_rejected_create_leaves_no_file() {
        let dir = setup();
        let new_transfer = NewTransfer::new("T1", "P00-01", Decimal::ONE, TransferType::Normal);
        let mut output = Vec::new();

        let err = AsyncExecutionStrategy::default()
            .execute(&request(&dir, Action::Create(new_transfer)), &mut output)
            .unwrap_err();

        assert!(matches!(err, TransferError::Validation { .. }));
        assert!(!dir.path().join("transfers.csv").exists());
    }
}
