//! Single writer thread. Every write job runs inside its own transaction on
//! one dedicated connection, so writes never contend with each other.

use std::sync::mpsc;
use std::thread;

use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use log::{debug, error};
use tokio::sync::oneshot;

use fintrack_core::{Error, Result};

use crate::db::DbPool;
use crate::errors::StorageError;

type Job = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

enum TxError {
    Core(Error),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        TxError::Diesel(err)
    }
}

impl From<TxError> for Error {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Core(e) => e,
            TxError::Diesel(e) => StorageError::from(e).into(),
        }
    }
}

#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Job>,
}

impl WriteHandle {
    /// Runs `job` on the writer connection inside a transaction. An error
    /// returned by the job rolls the transaction back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let boxed: Job = Box::new(move |conn| {
            let result = conn
                .transaction::<T, TxError, _>(|tx_conn| job(tx_conn).map_err(TxError::Core))
                .map_err(Error::from);
            // The caller may have gone away; nothing to report to.
            let _ = reply_tx.send(result);
        });

        self.tx
            .send(boxed)
            .map_err(|_| StorageError::Writer("writer thread has stopped".to_string()))?;

        reply_rx
            .await
            .map_err(|_| StorageError::Writer("writer dropped the job".to_string()))?
    }
}

/// Starts the writer thread on a connection taken from `pool`.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, rx) = mpsc::channel::<Job>();

    let spawned = thread::Builder::new()
        .name("fintrack-db-writer".to_string())
        .spawn(move || {
            let mut conn = match pool.get() {
                Ok(conn) => conn,
                Err(e) => {
                    error!("[Storage] Writer could not acquire a connection: {}", e);
                    return;
                }
            };
            debug!("[Storage] Writer thread started");
            for job in rx {
                job(&mut conn);
            }
            debug!("[Storage] Writer thread stopped");
        });

    if let Err(e) = spawned {
        error!("[Storage] Failed to spawn writer thread: {}", e);
    }

    WriteHandle { tx }
}
