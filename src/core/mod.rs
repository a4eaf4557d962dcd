//! Core business logic module
//!
//! This module contains the transfer lifecycle components:
//! - `traits` - Record store abstractions
//! - `clock` - Time source for transition timestamps
//! - `capability` - Role/operation permission table and region scoping
//! - `lifecycle` - Transition rules (create, pickup, re-route, receipt)
//! - `views` - Role-gated list views and filters
//! - `aggregate` - Totals by branch, region, month and status
//! - `session` - Credential check producing an actor
//! - `service` - Synchronous service over a record store
//! - `async` - Asynchronous service over an async record store

pub mod aggregate;
pub mod r#async;
pub mod capability;
pub mod clock;
pub mod lifecycle;
pub mod service;
pub mod session;
pub mod traits;
pub mod views;

pub use aggregate::{aggregate, Aggregates, BranchTotals, StatusTotals, Totals};
pub use capability::{permits, Operation};
pub use clock::{Clock, FixedClock, SystemClock};
pub use lifecycle::{LifecycleManager, NewTransfer};
pub use r#async::AsyncTransferService;
pub use service::TransferService;
pub use session::authenticate;
pub use traits::{AsyncRecordStore, RecordStore};
pub use views::{list_view, BranchBoard, DriverBoard, ListFilter, TransferView};
