//! SQLite persistence for the fintrack client: the offline record queue and
//! the persisted session credential.

pub mod db;
pub mod errors;
pub mod records;
pub mod schema;
pub mod session;

pub use db::{create_pool, get_connection, init, run_migrations, DbPool, WriteHandle};
pub use errors::StorageError;
pub use records::LocalRecordRepository;
pub use session::SessionRepository;
