//! Error types for the client.

use crate::config::ConfigError;
use crate::leads::BatchDeleteReport;
use crate::persistence::PersistenceError;
use crate::telemetry::TelemetryError;
use leadbook_core::{ImportError, LeadbookError, StoreError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Leadbook(#[from] LeadbookError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{} of {} deletes failed", .report.failed.len(), .report.attempted())]
    BatchDelete { report: BatchDeleteReport },
    #[error("Unknown user '{name}'; known users: {}", .known.join(", "))]
    UnknownUser { name: String, known: Vec<String> },
}

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        Self::Leadbook(err.into())
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        Self::Leadbook(err.into())
    }
}

impl From<ImportError> for ClientError {
    fn from(err: ImportError) -> Self {
        Self::Leadbook(err.into())
    }
}

impl ClientError {
    /// Underlying store error, if this failure came from a remote call.
    pub fn as_store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Leadbook(LeadbookError::Store(err)) => Some(err),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
