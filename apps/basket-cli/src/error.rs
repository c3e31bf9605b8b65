//! # CLI Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Error Flow in the CLI                             │
//! │                                                                         │
//! │  CartError ────────┐                                                    │
//! │  StorageError ─────┤                                                    │
//! │  ValidationError ──┼──► CliError ──► ErrorReport { code, message }     │
//! │  serde_json / io ──┘                      │                             │
//! │                                           ▼                             │
//! │                                 stderr (JSON), exit status 1            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::ValidationError;
use basket_storage::StorageError;
use basket_store::CartError;
use serde::Serialize;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A `--price` that is not a representable amount.
    #[error("Invalid price: {0}")]
    Price(#[from] ValidationError),

    /// The cart changed in memory but some writes did not reach the file.
    #[error("{0} cart write(s) failed")]
    PersistFailed(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Machine-readable error codes printed on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    CorruptState,
    StorageError,
    ConfigError,
    PersistFailed,
    Internal,
}

/// What the CLI prints to stderr when a command fails.
///
/// ```json
/// { "code": "CORRUPT_STATE", "message": "Stored cart under '@GoMarketPlace' is corrupt: ..." }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Cart(err) => match err {
                CartError::CorruptState { .. } => ErrorCode::CorruptState,
                CartError::Storage(_) | CartError::WriterClosed => ErrorCode::StorageError,
                CartError::InvalidItem(_) => ErrorCode::ValidationError,
                CartError::Config(_) => ErrorCode::ConfigError,
                CartError::NotInitialized | CartError::AlreadyInitialized => ErrorCode::Internal,
            },
            CliError::Storage(_) => ErrorCode::StorageError,
            CliError::Price(_) => ErrorCode::ValidationError,
            CliError::PersistFailed(_) => ErrorCode::PersistFailed,
            CliError::Io(_) => ErrorCode::ConfigError,
            CliError::Output(_) => ErrorCode::Internal,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
        }
    }
}
