//! Overflow-safe arithmetic for server-supplied figures.
//!
//! Plain `Decimal` operators panic past `Decimal::MAX`; these saturate instead
//! and log the figure that overflowed.

use log::warn;
use rust_decimal::Decimal;

pub fn saturating_add(lhs: Decimal, rhs: Decimal, what: &str) -> Decimal {
    lhs.checked_add(rhs).unwrap_or_else(|| {
        warn!("[Numbers] {} overflowed the decimal range, saturating", what);
        lhs.saturating_add(rhs)
    })
}

pub fn saturating_sub(lhs: Decimal, rhs: Decimal, what: &str) -> Decimal {
    lhs.checked_sub(rhs).unwrap_or_else(|| {
        warn!("[Numbers] {} overflowed the decimal range, saturating", what);
        lhs.saturating_sub(rhs)
    })
}

/// Sums the values, saturating at the decimal bounds.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>, what: &str) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| saturating_add(acc, value, what))
}
