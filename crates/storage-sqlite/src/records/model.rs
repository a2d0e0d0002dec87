//! Database rows for the offline record queues.

use std::str::FromStr;

use diesel::prelude::*;
use log::warn;
use rust_decimal::Decimal;

use fintrack_core::balances::LocalBalance;
use fintrack_core::sync::SyncFlag;
use fintrack_core::transactions::LocalTransaction;

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::local_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LocalTransactionDB {
    pub local_id: String,
    pub seq: i64,
    pub server_id: Option<String>,
    pub user_id: String,
    pub kind: String,
    pub amount: String,
    pub note: Option<String>,
    pub created_at: String,
    pub synced: i32,
}

/// Overwrite set for an existing row. Keeps the key and queue position.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::local_transactions)]
#[diesel(treat_none_as_null = true)]
pub struct LocalTransactionChangesetDB {
    pub server_id: Option<String>,
    pub user_id: String,
    pub kind: String,
    pub amount: String,
    pub note: Option<String>,
    pub created_at: String,
    pub synced: i32,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::local_balances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LocalBalanceDB {
    pub local_id: String,
    pub seq: i64,
    pub server_id: Option<String>,
    pub user_id: String,
    pub amount: String,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub synced: i32,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::local_balances)]
#[diesel(treat_none_as_null = true)]
pub struct LocalBalanceChangesetDB {
    pub server_id: Option<String>,
    pub user_id: String,
    pub amount: String,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub synced: i32,
}

fn amount_from_db(local_id: &str, raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or_else(|_| {
        warn!(
            "[Storage] Unreadable amount '{}' on record {}, using 0",
            raw, local_id
        );
        Decimal::ZERO
    })
}

impl LocalTransactionDB {
    pub fn from_domain(record: &LocalTransaction, seq: i64) -> Self {
        Self {
            local_id: record.local_id.clone(),
            seq,
            server_id: record.server_id.clone(),
            user_id: record.user_id.clone(),
            kind: record.kind.clone(),
            amount: record.amount.to_string(),
            note: record.note.clone(),
            created_at: record.created_at.clone(),
            synced: record.synced.as_db(),
        }
    }
}

impl From<&LocalTransaction> for LocalTransactionChangesetDB {
    fn from(record: &LocalTransaction) -> Self {
        Self {
            server_id: record.server_id.clone(),
            user_id: record.user_id.clone(),
            kind: record.kind.clone(),
            amount: record.amount.to_string(),
            note: record.note.clone(),
            created_at: record.created_at.clone(),
            synced: record.synced.as_db(),
        }
    }
}

impl From<LocalTransactionDB> for LocalTransaction {
    fn from(row: LocalTransactionDB) -> Self {
        let amount = amount_from_db(&row.local_id, &row.amount);
        Self {
            local_id: row.local_id,
            server_id: row.server_id,
            user_id: row.user_id,
            kind: row.kind,
            amount,
            note: row.note,
            created_at: row.created_at,
            synced: SyncFlag::from_db(row.synced),
        }
    }
}

impl LocalBalanceDB {
    pub fn from_domain(record: &LocalBalance, seq: i64) -> Self {
        Self {
            local_id: record.local_id.clone(),
            seq,
            server_id: record.server_id.clone(),
            user_id: record.user_id.clone(),
            amount: record.amount.to_string(),
            note: record.note.clone(),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
            synced: record.synced.as_db(),
        }
    }
}

impl From<&LocalBalance> for LocalBalanceChangesetDB {
    fn from(record: &LocalBalance) -> Self {
        Self {
            server_id: record.server_id.clone(),
            user_id: record.user_id.clone(),
            amount: record.amount.to_string(),
            note: record.note.clone(),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
            synced: record.synced.as_db(),
        }
    }
}

impl From<LocalBalanceDB> for LocalBalance {
    fn from(row: LocalBalanceDB) -> Self {
        let amount = amount_from_db(&row.local_id, &row.amount);
        Self {
            local_id: row.local_id,
            server_id: row.server_id,
            user_id: row.user_id,
            amount,
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
            synced: SyncFlag::from_db(row.synced),
        }
    }
}
