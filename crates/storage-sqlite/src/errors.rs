use fintrack_core::errors::{DatabaseError, Error};
use thiserror::Error;

/// Failures raised inside the SQLite layer. Converted into the core error at
/// the repository boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Connection failed: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Writer unavailable: {0}")]
    Writer(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let db_error = match err {
            StorageError::Query(diesel::result::Error::NotFound) => {
                DatabaseError::NotFound("Record not found".to_string())
            }
            StorageError::Query(e) => DatabaseError::QueryFailed(e.to_string()),
            StorageError::Connection(e) => DatabaseError::ConnectionFailed(e.to_string()),
            StorageError::Pool(e) => DatabaseError::ConnectionFailed(e.to_string()),
            StorageError::Migration(msg) => DatabaseError::MigrationFailed(msg),
            StorageError::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            StorageError::Writer(msg) => DatabaseError::Internal(msg),
        };
        Error::Database(db_error)
    }
}
