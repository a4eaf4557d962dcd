//! Transfer Tracker Library
//! # Overview
//!
//! This library tracks shipments of value ("transfers") between the
//! branches of a logistics network, from creation at the sending branch to
//! confirmed receipt at the destination, with both a sync and an async
//! execution strategy over CSV-backed tables.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transfer, User, Actor, regions, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::lifecycle`] - Transition rules for create, pickup, re-route and receipt
//!   - [`core::capability`] - Which role may perform which operation
//!   - [`core::views`] - Role-gated list views and filters
//!   - [`core::aggregate`] - Totals by branch, region, month and status
//!   - [`core::service`] - Serialized mutations over a record store
//! - [`io`] - CSV tables, readers and record stores
//! - [`strategy`] - Sync and async command execution
//!
//! # Lifecycle
//!
//! ```text
//!            pickup (driver)            confirm receipt (destination)
//! Pending ───────────────────▶ Picked Up ─────────────────────────▶ Received
//!    ▲                            │
//!    └── route to warehouse ──────┘   (origin becomes WH)
//! ```
//!
//! A Pending transfer may also be confirmed directly by its destination.
//!
//! # Roles
//!
//! - **Branch**: creates transfers and confirms receipt of its own
//! - **Driver**: picks up and re-routes within its region
//! - **Supervisor**: reads its region, excluding the warehouse leg
//! - **Manager / Owner**: read everything

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use crate::core::{
    aggregate, list_view, Aggregates, AsyncTransferService, LifecycleManager, ListFilter,
    NewTransfer, TransferService, TransferView,
};
pub use crate::io::{AsyncCsvStore, CsvRecordStore, MemoryStore};
pub use crate::types::{
    Actor, ErrorKind, Region, RegionLabel, Role, Transfer, TransferError, TransferId,
    TransferStatus, TransferType, User, WAREHOUSE_BRANCH,
};
