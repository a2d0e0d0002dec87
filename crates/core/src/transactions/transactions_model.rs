//! Transaction domain models.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::sync::SyncFlag;
use crate::utils::decimal_ops::{saturating_add, saturating_sub};
use crate::utils::number_coercion::deserialize_lenient_decimal;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Reads a kind, treating anything unrecognized as an expense.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => TransactionKind::Income,
            _ => TransactionKind::Expense,
        }
    }
}

impl<'de> Deserialize<'de> for TransactionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(kind)) => TransactionKind::parse_or_default(&kind),
            _ => TransactionKind::Expense,
        })
    }
}

/// Transaction as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub amount: Decimal,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Creation payload for `POST /transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub note: String,
    pub created_at: String,
}

impl NewTransaction {
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount: Decimal,
        note: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            amount,
            note: note.unwrap_or_default(),
            created_at: format_timestamp(Utc::now()),
        }
    }
}

/// Transaction persisted locally while it waits for synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTransaction {
    pub local_id: String,
    pub server_id: Option<String>,
    pub user_id: String,
    /// Raw kind as captured; validated when the record is pushed.
    pub kind: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: String,
    pub synced: SyncFlag,
}

impl LocalTransaction {
    /// Builds an unsynced record with a fresh local id.
    pub fn queued(
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount: Decimal,
        note: Option<String>,
    ) -> Self {
        Self {
            local_id: Uuid::new_v4().to_string(),
            server_id: None,
            user_id: user_id.into(),
            kind: kind.as_str().to_string(),
            amount,
            note,
            created_at: format_timestamp(Utc::now()),
            synced: SyncFlag::Unsynced,
        }
    }

    /// Projects the record into the creation payload sent during a drain cycle.
    ///
    /// The creation time is the push time, not `created_at`.
    pub fn to_create_payload(
        &self,
        fallback_user_id: Option<&str>,
        pushed_at: DateTime<Utc>,
    ) -> NewTransaction {
        let user_id = if self.user_id.is_empty() {
            fallback_user_id.unwrap_or_default().to_string()
        } else {
            self.user_id.clone()
        };

        NewTransaction {
            user_id,
            kind: TransactionKind::parse_or_default(&self.kind),
            amount: self.amount,
            note: self.note.clone().unwrap_or_default(),
            created_at: format_timestamp(pushed_at),
        }
    }
}

/// Kind selector for client-side filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Income => kind == TransactionKind::Income,
            KindFilter::Expense => kind == TransactionKind::Expense,
        }
    }
}

/// Client-side filter over a fetched transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub kind: KindFilter,
    pub query: Option<String>,
}

impl TransactionFilter {
    /// Keeps transactions matching the kind selector and, when set, whose kind
    /// or note contains the query (case-insensitive).
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let query = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        transactions
            .iter()
            .filter(|txn| self.kind.matches(txn.kind))
            .filter(|txn| match &query {
                None => true,
                Some(q) => {
                    txn.kind.as_str().contains(q.as_str())
                        || txn
                            .note
                            .as_deref()
                            .is_some_and(|note| note.to_lowercase().contains(q.as_str()))
                }
            })
            .cloned()
            .collect()
    }
}

/// Income and expense sums over a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl TransactionTotals {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |mut totals, txn| {
                match txn.kind {
                    TransactionKind::Income => {
                        totals.income = saturating_add(totals.income, txn.amount, "Income total")
                    }
                    TransactionKind::Expense => {
                        totals.expense =
                            saturating_add(totals.expense, txn.amount, "Expense total")
                    }
                }
                totals
            })
    }

    pub fn net(&self) -> Decimal {
        saturating_sub(self.income, self.expense, "Net total")
    }
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn txn(id: &str, kind: TransactionKind, amount: Decimal, note: Option<&str>) -> Transaction {
        Transaction {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            kind,
            amount,
            note: note.map(str::to_string),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn unknown_kinds_default_to_expense() {
        assert_eq!(TransactionKind::parse_or_default("income"), TransactionKind::Income);
        assert_eq!(TransactionKind::parse_or_default(" Income "), TransactionKind::Income);
        assert_eq!(TransactionKind::parse_or_default("salary"), TransactionKind::Expense);
        assert_eq!(TransactionKind::parse_or_default(""), TransactionKind::Expense);
    }

    #[test]
    fn server_transaction_deserializes_with_loose_fields() {
        let parsed: Transaction = serde_json::from_str(
            r#"{"_id":"s1","userId":"u-1","type":"bonus","amount":"120.5","createdAt":"2026-02-01T10:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(parsed.id, "s1");
        assert_eq!(parsed.kind, TransactionKind::Expense);
        assert_eq!(parsed.amount, dec!(120.5));
        assert_eq!(parsed.note, None);
    }

    #[test]
    fn create_payload_serializes_wire_names() {
        let payload = NewTransaction {
            user_id: "u-1".to_string(),
            kind: TransactionKind::Income,
            amount: dec!(50000),
            note: String::new(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["userId"], "u-1");
        assert_eq!(value["type"], "income");
        assert_eq!(value["amount"].as_f64(), Some(50000.0));
        assert_eq!(value["note"], "");
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn local_record_projection_uses_push_time_and_defaults() {
        let mut local = LocalTransaction::queued("", TransactionKind::Income, dec!(10), None);
        local.kind = "refund".to_string();
        local.created_at = "2025-12-31T23:59:59.000Z".to_string();
        let pushed_at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).single().unwrap();

        let payload = local.to_create_payload(Some("session-user"), pushed_at);

        assert_eq!(payload.user_id, "session-user");
        assert_eq!(payload.kind, TransactionKind::Expense);
        assert_eq!(payload.note, "");
        assert_eq!(payload.created_at, "2026-03-01T08:30:00.000Z");
    }

    #[test]
    fn filter_by_kind_and_query() {
        let list = vec![
            txn("1", TransactionKind::Income, dec!(100), Some("Salary March")),
            txn("2", TransactionKind::Expense, dec!(20), Some("Groceries")),
            txn("3", TransactionKind::Expense, dec!(5), None),
        ];

        let incomes = TransactionFilter {
            kind: KindFilter::Income,
            query: None,
        }
        .apply(&list);
        assert_eq!(incomes.len(), 1);

        let searched = TransactionFilter {
            kind: KindFilter::All,
            query: Some("grocer".to_string()),
        }
        .apply(&list);
        assert_eq!(searched.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["2"]);

        let by_kind_text = TransactionFilter {
            kind: KindFilter::All,
            query: Some("EXP".to_string()),
        }
        .apply(&list);
        assert_eq!(by_kind_text.len(), 2);
    }

    #[test]
    fn totals_split_income_and_expense() {
        let list = vec![
            txn("1", TransactionKind::Income, dec!(100), None),
            txn("2", TransactionKind::Expense, dec!(20), None),
            txn("3", TransactionKind::Expense, dec!(5.5), None),
        ];
        let totals = TransactionTotals::from_transactions(&list);
        assert_eq!(totals.income, dec!(100));
        assert_eq!(totals.expense, dec!(25.5));
        assert_eq!(totals.net(), dec!(74.5));
    }

    #[test]
    fn totals_saturate_on_huge_amounts() {
        let list = vec![
            txn("1", TransactionKind::Income, Decimal::MAX, None),
            txn("2", TransactionKind::Income, dec!(1), None),
            txn("3", TransactionKind::Expense, Decimal::MAX, None),
        ];
        let totals = TransactionTotals::from_transactions(&list);
        assert_eq!(totals.income, Decimal::MAX);
        assert_eq!(totals.net(), Decimal::ZERO);

        let lopsided = TransactionTotals {
            income: Decimal::MAX,
            expense: Decimal::MIN,
        };
        assert_eq!(lopsided.net(), Decimal::MAX);
    }
}
