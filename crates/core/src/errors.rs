//! Error types shared by the core crate and its storage/gateway implementations.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for core services and repository contracts.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

}

/// Failures raised by the local durable store.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when the error came from the local store rather than from caller input.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_are_storage_failures() {
        let err = Error::from(DatabaseError::QueryFailed("disk I/O error".to_string()));
        assert!(err.is_storage_failure());
        assert_eq!(
            err.to_string(),
            "Database operation failed: Query failed: disk I/O error"
        );
    }

    #[test]
    fn validation_errors_are_not_storage_failures() {
        assert!(!Error::validation("amount must not be negative").is_storage_failure());
    }
}
