//! Local durable store domain models.

use serde::{Deserialize, Serialize};

use crate::balances::LocalBalance;
use crate::transactions::LocalTransaction;

/// Whether a locally persisted record has been accepted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncFlag {
    #[default]
    Unsynced,
    Synced,
}

impl SyncFlag {
    pub fn as_db(&self) -> i32 {
        match self {
            SyncFlag::Unsynced => 0,
            SyncFlag::Synced => 1,
        }
    }

    /// Only `1` counts as synced; any other stored value is still pending.
    pub fn from_db(value: i32) -> Self {
        if value == 1 {
            SyncFlag::Synced
        } else {
            SyncFlag::Unsynced
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, SyncFlag::Synced)
    }
}

/// Record collections held by the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncCollection {
    Transactions,
    Balances,
}

impl SyncCollection {
    /// Drain order: transactions before balances.
    pub const ALL: [SyncCollection; 2] = [SyncCollection::Transactions, SyncCollection::Balances];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncCollection::Transactions => "transactions",
            SyncCollection::Balances => "balances",
        }
    }
}

/// A record of either collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalRecord {
    Transaction(LocalTransaction),
    Balance(LocalBalance),
}

impl LocalRecord {
    pub fn collection(&self) -> SyncCollection {
        match self {
            LocalRecord::Transaction(_) => SyncCollection::Transactions,
            LocalRecord::Balance(_) => SyncCollection::Balances,
        }
    }

    pub fn local_id(&self) -> &str {
        match self {
            LocalRecord::Transaction(txn) => &txn.local_id,
            LocalRecord::Balance(balance) => &balance.local_id,
        }
    }

    pub fn synced(&self) -> SyncFlag {
        match self {
            LocalRecord::Transaction(txn) => txn.synced,
            LocalRecord::Balance(balance) => balance.synced,
        }
    }

    pub fn into_transaction(self) -> Option<LocalTransaction> {
        match self {
            LocalRecord::Transaction(txn) => Some(txn),
            LocalRecord::Balance(_) => None,
        }
    }

    pub fn into_balance(self) -> Option<LocalBalance> {
        match self {
            LocalRecord::Balance(balance) => Some(balance),
            LocalRecord::Transaction(_) => None,
        }
    }
}

impl From<LocalTransaction> for LocalRecord {
    fn from(value: LocalTransaction) -> Self {
        LocalRecord::Transaction(value)
    }
}

impl From<LocalBalance> for LocalRecord {
    fn from(value: LocalBalance) -> Self {
        LocalRecord::Balance(value)
    }
}

/// Number of records still waiting for a drain cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCounts {
    pub transactions: usize,
    pub balances: usize,
}

impl PendingCounts {
    pub fn total(&self) -> usize {
        self.transactions + self.balances
    }
}
