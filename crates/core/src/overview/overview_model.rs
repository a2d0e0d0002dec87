use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::decimal_ops::{saturating_add, saturating_sub};
use crate::utils::number_coercion::coerce_decimal;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Reads an ISO-8601 timestamp. Values without an offset are taken as UTC and
/// a bare date as midnight UTC.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Aggregate figures shown on the overview screen. Rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewData {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub base_balance: Decimal,
    pub current_balance: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl OverviewData {
    /// Builds a fully numeric overview from an untyped payload.
    ///
    /// Missing or non-numeric figures read as zero; a missing or unparseable
    /// `lastUpdated` reads as `now`. Offset-less timestamps and bare dates are
    /// kept as UTC.
    pub fn from_raw(raw: &Value, now: DateTime<Utc>) -> Self {
        let last_updated = match raw.get("lastUpdated").and_then(Value::as_str) {
            Some(text) => parse_timestamp(text).unwrap_or_else(|| {
                warn!("[Overview] Unreadable lastUpdated '{}', using now", text);
                now
            }),
            None => now,
        };

        Self {
            total_income: coerce_decimal(raw.get("totalIncome")),
            total_expense: coerce_decimal(raw.get("totalExpense")),
            base_balance: coerce_decimal(raw.get("baseBalance")),
            current_balance: coerce_decimal(raw.get("currentBalance")),
            last_updated,
        }
    }

    pub fn net_flow(&self) -> Decimal {
        saturating_sub(self.total_income, self.total_expense, "Overview net flow")
    }

    pub fn is_net_positive(&self) -> bool {
        self.net_flow() >= Decimal::ZERO
    }

    /// Income as a percentage of income plus expense.
    pub fn income_share(&self) -> Decimal {
        self.share_of_turnover(self.total_income)
    }

    /// Expense as a percentage of income plus expense.
    pub fn expense_share(&self) -> Decimal {
        self.share_of_turnover(self.total_expense)
    }

    fn share_of_turnover(&self, part: Decimal) -> Decimal {
        // Shares are ratios, so halving every figure keeps a turnover that
        // exceeds the decimal range representable.
        let (part, turnover) = match self.total_income.checked_add(self.total_expense) {
            Some(turnover) => (part, turnover),
            None => {
                let two = Decimal::from(2);
                (
                    part / two,
                    saturating_add(
                        self.total_income / two,
                        self.total_expense / two,
                        "Overview turnover",
                    ),
                )
            }
        };
        if turnover.is_zero() {
            return Decimal::ZERO;
        }
        part.checked_div(turnover)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|share| share.round_dp(2))
            .unwrap_or_else(|| {
                warn!("[Overview] Share of turnover out of range, reading as zero");
                Decimal::ZERO
            })
    }
}
