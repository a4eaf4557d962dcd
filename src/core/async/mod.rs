//! Asynchronous implementations of core components
//!
//! The async service shares the lifecycle rules, views and aggregation with
//! the synchronous one and differs only in how it locks and persists:
//!
//! - **AsyncTransferService**: `tokio::sync::RwLock` over the table, awaited
//!   saves through an [`AsyncRecordStore`](crate::core::traits::AsyncRecordStore)

pub mod service;

pub use service::AsyncTransferService;
