//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transfer`: Transfer records, status and transfer kinds
//! - `user`: Users, roles and the acting identity
//! - `region`: Region names, branch-code prefixes and reporting buckets
//! - `error`: Error types for the transfer tracker

pub mod error;
pub mod region;
pub mod transfer;
pub mod user;

pub use error::{ErrorKind, TransferError};
pub use region::{Region, RegionLabel};
pub use transfer::{Transfer, TransferId, TransferStatus, TransferType, WAREHOUSE_BRANCH};
pub use user::{Actor, Role, User};
