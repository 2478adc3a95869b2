//! Serde helpers for decimal amounts, used as `#[serde(with = "crate::domain::amount")]`.
//!
//! Amounts are written as JSON numbers. On input both numbers and decimal strings are
//! accepted; numbers are read through their shortest textual form, so `0.1` becomes
//! exactly `0.1` rather than the nearest f64 expansion.

use bigdecimal::BigDecimal;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::Serializer;
use serde_json::{Number, Value};
use std::str::FromStr;

pub fn serialize<S>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match Number::from_str(&amount.to_string()) {
        Ok(number) => serde::Serialize::serialize(&number, serializer),
        Err(_) => serializer.collect_str(amount),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => {
            return Err(de::Error::custom(format!(
                "amount must be a number, got {}",
                other
            )))
        }
    };

    BigDecimal::from_str(&raw)
        .map_err(|e| de::Error::custom(format!("invalid amount {:?}: {}", raw, e)))
}
