//! Balance snapshot domain models.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sync::SyncFlag;
use crate::transactions::format_timestamp;
use crate::utils::decimal_ops::saturating_sum;
use crate::utils::number_coercion::deserialize_lenient_decimal;

/// Balance snapshot as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub amount: Decimal,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Creation payload for `POST /balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBalance {
    pub user_id: String,
    pub amount: Decimal,
    pub note: String,
}

impl NewBalance {
    pub fn new(user_id: impl Into<String>, amount: Decimal, note: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            note: note.unwrap_or_default(),
        }
    }
}

/// Balance snapshot persisted locally while it waits for synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBalance {
    pub local_id: String,
    pub server_id: Option<String>,
    pub user_id: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub synced: SyncFlag,
}

impl LocalBalance {
    pub fn queued(user_id: impl Into<String>, amount: Decimal, note: Option<String>) -> Self {
        Self {
            local_id: Uuid::new_v4().to_string(),
            server_id: None,
            user_id: user_id.into(),
            amount,
            note,
            created_at: format_timestamp(Utc::now()),
            updated_at: None,
            synced: SyncFlag::Unsynced,
        }
    }

    pub fn to_create_payload(&self, fallback_user_id: Option<&str>) -> NewBalance {
        let user_id = if self.user_id.is_empty() {
            fallback_user_id.unwrap_or_default().to_string()
        } else {
            self.user_id.clone()
        };
        NewBalance {
            user_id,
            amount: self.amount,
            note: self.note.clone().unwrap_or_default(),
        }
    }
}

/// Aggregate figures over a balance list, in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub total: Decimal,
    pub average: Decimal,
    /// First entry of the list; the server returns newest first.
    pub latest: Option<Balance>,
}

impl BalanceSummary {
    pub fn from_balances(balances: &[Balance]) -> Self {
        let total = saturating_sum(balances.iter().map(|b| b.amount), "Balance total");
        let average = if balances.is_empty() {
            Decimal::ZERO
        } else {
            total / Decimal::from(balances.len())
        };
        Self {
            total,
            average,
            latest: balances.first().cloned(),
        }
    }
}
