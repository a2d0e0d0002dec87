//! Lenient numeric coercion for server payloads.
//!
//! The remote API is not strict about numeric types: amounts and totals arrive
//! as JSON numbers, numeric strings, `null`, or are missing altogether. These
//! helpers turn any of those into a `Decimal`, falling back to zero when the
//! value has no numeric reading.

use log::warn;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parses a JSON value into a decimal, returning `None` when it has no numeric reading.
///
/// Rules:
/// - numbers convert directly; finite floats beyond the decimal range saturate
///   to `Decimal::MAX`/`Decimal::MIN`, non-finite ones have no reading
/// - strings are trimmed; an empty string reads as zero; otherwise plain and
///   scientific notation are accepted
/// - `true`/`false` read as one/zero
/// - `null`, arrays and objects have no reading
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            if let Some(v) = number.as_i64() {
                Some(Decimal::from(v))
            } else if let Some(v) = number.as_u64() {
                Some(Decimal::from(v))
            } else {
                number.as_f64().and_then(decimal_from_f64)
            }
        }
        Value::String(text) => parse_decimal_str(text),
        Value::Bool(flag) => Some(if *flag { Decimal::ONE } else { Decimal::ZERO }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).or_else(|| {
        warn!("[Numbers] {} is outside the decimal range, saturating", value);
        Some(if value.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
    })
}

/// Parses a decimal from text, accepting scientific notation.
pub fn parse_decimal_str(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Coerces an optional JSON value into a decimal with a zero fallback.
pub fn coerce_decimal(value: Option<&Value>) -> Decimal {
    value.and_then(parse_decimal).unwrap_or(Decimal::ZERO)
}

/// Serde helper for amount fields that may arrive as numbers or numeric strings.
pub fn deserialize_lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_decimal(value.as_ref()))
}
