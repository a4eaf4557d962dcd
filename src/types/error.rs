//! Error types for the transfer tracker
//!
//! This module defines all error types that can occur while creating,
//! moving or reporting on transfers. Errors are descriptive enough to be
//! shown directly to the person at the terminal.
//!
//! # Error Categories
//!
//! - **Validation**: malformed or missing create inputs, duplicate ids
//! - **Invalid transitions**: operation not legal from the current status,
//!   for the acting role, or for this actor's ownership of the transfer
//! - **Lookup**: referenced transfer does not exist
//! - **Configuration**: a driver or supervisor region without a prefix
//! - **Authentication**: unknown username/password pair
//! - **Persistence**: I/O failures and malformed stored rows

use thiserror::Error;

/// Coarse classification of a [`TransferError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidTransition,
    NotFound,
    Configuration,
    Authentication,
    Io,
}

/// Main error type for the transfer tracker
///
/// Every failing operation leaves both the in-memory table and the
/// persisted table exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    /// A create input is missing or malformed
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending input
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// A transfer with this id already exists
    #[error("Transfer {transfer_id} already exists")]
    DuplicateTransfer { transfer_id: String },

    /// The operation is not legal for this transfer and actor
    #[error("Cannot {operation} transfer {transfer_id}: {reason}")]
    InvalidTransition {
        transfer_id: String,
        /// Operation that was attempted
        operation: String,
        /// Why it was rejected
        reason: String,
    },

    /// No transfer with this id exists
    #[error("Transfer {transfer_id} not found")]
    NotFound { transfer_id: String },

    /// The actor's region has no branch-code prefix
    #[error("Region '{region}' has no branch-code prefix configured")]
    UnknownRegion { region: String },

    /// Username/password pair does not match any user
    #[error("Invalid username or password for '{username}'")]
    InvalidCredentials { username: String },

    /// I/O error while reading or writing the record store
    #[error("I/O error: {message}")]
    Io { message: String },

    /// A stored row could not be understood
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },
}

impl From<std::io::Error> for TransferError {
    fn from(error: std::io::Error) -> Self {
        TransferError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for TransferError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return TransferError::Io {
                message: error.to_string(),
            };
        }
        let line = error.position().map(|pos| pos.line());
        TransferError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for TransferError {
    fn from(error: csv_async::Error) -> Self {
        if error.is_io_error() {
            return TransferError::Io {
                message: error.to_string(),
            };
        }
        let line = error.position().map(|pos| pos.line());
        TransferError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<tempfile::PersistError> for TransferError {
    fn from(error: tempfile::PersistError) -> Self {
        TransferError::Io {
            message: error.error.to_string(),
        }
    }
}

impl TransferError {
    pub fn validation(field: &str, message: &str) -> Self {
        TransferError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn duplicate_transfer(transfer_id: &str) -> Self {
        TransferError::DuplicateTransfer {
            transfer_id: transfer_id.to_string(),
        }
    }

    pub fn invalid_transition(transfer_id: &str, operation: &str, reason: &str) -> Self {
        TransferError::InvalidTransition {
            transfer_id: transfer_id.to_string(),
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(transfer_id: &str) -> Self {
        TransferError::NotFound {
            transfer_id: transfer_id.to_string(),
        }
    }

    pub fn unknown_region(region: &str) -> Self {
        TransferError::UnknownRegion {
            region: region.to_string(),
        }
    }

    pub fn invalid_credentials(username: &str) -> Self {
        TransferError::InvalidCredentials {
            username: username.to_string(),
        }
    }

    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        TransferError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::Validation { .. } | TransferError::DuplicateTransfer { .. } => {
                ErrorKind::Validation
            }
            TransferError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            TransferError::NotFound { .. } => ErrorKind::NotFound,
            TransferError::UnknownRegion { .. } => ErrorKind::Configuration,
            TransferError::InvalidCredentials { .. } => ErrorKind::Authentication,
            TransferError::Io { .. } | TransferError::Parse { .. } => ErrorKind::Io,
        }
    }
}
