use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;

use fintrack_core::balances::LocalBalance;
use fintrack_core::sync::{
    LocalRecord, LocalStoreTrait, PendingCounts, SyncCollection, SyncFlag,
};
use fintrack_core::transactions::LocalTransaction;
use fintrack_core::Result;

use super::model::{
    LocalBalanceChangesetDB, LocalBalanceDB, LocalTransactionChangesetDB, LocalTransactionDB,
};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{local_balances, local_transactions};

const SYNCED: i32 = 1;

/// SQLite-backed offline queue for transactions and balances.
pub struct LocalRecordRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl LocalRecordRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn load_unsynced_transactions(&self) -> Result<Vec<LocalRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = local_transactions::table
            .filter(local_transactions::synced.ne(SYNCED))
            .order(local_transactions::seq.asc())
            .select(LocalTransactionDB::as_select())
            .load::<LocalTransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| LocalRecord::Transaction(row.into()))
            .collect())
    }

    fn load_unsynced_balances(&self) -> Result<Vec<LocalRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = local_balances::table
            .filter(local_balances::synced.ne(SYNCED))
            .order(local_balances::seq.asc())
            .select(LocalBalanceDB::as_select())
            .load::<LocalBalanceDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| LocalRecord::Balance(row.into()))
            .collect())
    }
}

fn upsert_transaction(conn: &mut SqliteConnection, record: &LocalTransaction) -> Result<()> {
    let next_seq = local_transactions::table
        .select(max(local_transactions::seq))
        .first::<Option<i64>>(conn)
        .map_err(StorageError::from)?
        .unwrap_or(0)
        + 1;
    let row = LocalTransactionDB::from_domain(record, next_seq);
    let changes = LocalTransactionChangesetDB::from(record);

    diesel::insert_into(local_transactions::table)
        .values(&row)
        .on_conflict(local_transactions::local_id)
        .do_update()
        .set(&changes)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

fn upsert_balance(conn: &mut SqliteConnection, record: &LocalBalance) -> Result<()> {
    let next_seq = local_balances::table
        .select(max(local_balances::seq))
        .first::<Option<i64>>(conn)
        .map_err(StorageError::from)?
        .unwrap_or(0)
        + 1;
    let row = LocalBalanceDB::from_domain(record, next_seq);
    let changes = LocalBalanceChangesetDB::from(record);

    diesel::insert_into(local_balances::table)
        .values(&row)
        .on_conflict(local_balances::local_id)
        .do_update()
        .set(&changes)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

fn mark_transaction_synced(
    conn: &mut SqliteConnection,
    local_id: &str,
    server_id: Option<String>,
) -> Result<()> {
    let existing = local_transactions::table
        .find(local_id)
        .select(LocalTransactionDB::as_select())
        .first::<LocalTransactionDB>(conn)
        .optional()
        .map_err(StorageError::from)?;

    let Some(row) = existing else {
        debug!("[Storage] mark_synced: no transaction {}", local_id);
        return Ok(());
    };
    if SyncFlag::from_db(row.synced).is_synced() {
        return Ok(());
    }

    diesel::update(local_transactions::table.find(local_id))
        .set((
            local_transactions::synced.eq(SYNCED),
            local_transactions::server_id.eq(server_id.or(row.server_id)),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

fn mark_balance_synced(
    conn: &mut SqliteConnection,
    local_id: &str,
    server_id: Option<String>,
) -> Result<()> {
    let existing = local_balances::table
        .find(local_id)
        .select(LocalBalanceDB::as_select())
        .first::<LocalBalanceDB>(conn)
        .optional()
        .map_err(StorageError::from)?;

    let Some(row) = existing else {
        debug!("[Storage] mark_synced: no balance {}", local_id);
        return Ok(());
    };
    if SyncFlag::from_db(row.synced).is_synced() {
        return Ok(());
    }

    diesel::update(local_balances::table.find(local_id))
        .set((
            local_balances::synced.eq(SYNCED),
            local_balances::server_id.eq(server_id.or(row.server_id)),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

#[async_trait]
impl LocalStoreTrait for LocalRecordRepository {
    async fn upsert(&self, record: LocalRecord) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                match &record {
                    LocalRecord::Transaction(txn) => upsert_transaction(conn, txn),
                    LocalRecord::Balance(balance) => upsert_balance(conn, balance),
                }
            })
            .await
    }

    async fn query_unsynced(&self, collection: SyncCollection) -> Result<Vec<LocalRecord>> {
        match collection {
            SyncCollection::Transactions => self.load_unsynced_transactions(),
            SyncCollection::Balances => self.load_unsynced_balances(),
        }
    }

    async fn mark_synced(
        &self,
        collection: SyncCollection,
        local_id: &str,
        server_id: Option<String>,
    ) -> Result<()> {
        let local_id = local_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                match collection {
                    SyncCollection::Transactions => {
                        mark_transaction_synced(conn, &local_id, server_id)
                    }
                    SyncCollection::Balances => mark_balance_synced(conn, &local_id, server_id),
                }
            })
            .await
    }

    async fn find(
        &self,
        collection: SyncCollection,
        local_id: &str,
    ) -> Result<Option<LocalRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let record = match collection {
            SyncCollection::Transactions => local_transactions::table
                .find(local_id)
                .select(LocalTransactionDB::as_select())
                .first::<LocalTransactionDB>(&mut conn)
                .optional()
                .map_err(StorageError::from)?
                .map(|row| LocalRecord::Transaction(row.into())),
            SyncCollection::Balances => local_balances::table
                .find(local_id)
                .select(LocalBalanceDB::as_select())
                .first::<LocalBalanceDB>(&mut conn)
                .optional()
                .map_err(StorageError::from)?
                .map(|row| LocalRecord::Balance(row.into())),
        };
        Ok(record)
    }

    async fn pending_counts(&self) -> Result<PendingCounts> {
        let mut conn = get_connection(&self.pool)?;
        let transactions: i64 = local_transactions::table
            .filter(local_transactions::synced.ne(SYNCED))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        let balances: i64 = local_balances::table
            .filter(local_balances::synced.ne(SYNCED))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;

        Ok(PendingCounts {
            transactions: transactions.max(0) as usize,
            balances: balances.max(0) as usize,
        })
    }
}
