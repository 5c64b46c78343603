//! Error types for Leadbook operations

use thiserror::Error;

/// Remote record store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Request to record store failed: {reason}")]
    Http { reason: String },

    #[error("Record store rejected request with status {status}: {message}")]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("No {table} record with id {id}")]
    NotFound { table: String, id: String },

    #[error("Constraint violation on {table}: {reason}")]
    Constraint { table: String, reason: String },

    #[error("Failed to decode {table} record: {reason}")]
    Decode { table: String, reason: String },

    #[error("Injected failure: {operation} on {table}")]
    Injected { operation: String, table: String },
}

/// Validation errors raised before any remote call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown lead status: {value}")]
    UnknownRemark { value: String },
}

/// CSV import structural failures. No record reaches the store when one of
/// these is raised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Failed to parse CSV: {reason}")]
    Parse { reason: String },

    #[error("The file is empty or does not contain valid lead data")]
    NoValidRows,
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Parse {
            reason: err.to_string(),
        }
    }
}

/// Master error type for all Leadbook errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LeadbookError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}

/// Result type alias for Leadbook operations.
pub type LeadbookResult<T> = Result<T, LeadbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_column() {
        let err = ImportError::MissingColumns {
            columns: vec!["First Name".to_string(), "Last Name".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required columns: First Name, Last Name"
        );
    }

    #[test]
    fn store_error_display_remote() {
        let err = StoreError::Remote {
            status: 409,
            code: Some("23505".to_string()),
            message: "duplicate key value".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("409"));
        assert!(msg.contains("duplicate key value"));
    }

    #[test]
    fn leadbook_error_from_variants() {
        let store = LeadbookError::from(StoreError::Http {
            reason: "timeout".to_string(),
        });
        assert!(matches!(store, LeadbookError::Store(_)));

        let validation = LeadbookError::from(ValidationError::RequiredFieldMissing {
            field: "firstname".to_string(),
        });
        assert!(matches!(validation, LeadbookError::Validation(_)));

        let import = LeadbookError::from(ImportError::NoValidRows);
        assert!(matches!(import, LeadbookError::Import(_)));
    }
}
