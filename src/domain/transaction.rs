//! Transaction domain entity.
//! Framework-agnostic representation of a webhook-delivered transaction.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Processing,
    Processed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Processing => "PROCESSING",
            TransactionStatus::Processed => "PROCESSED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSING" => Ok(TransactionStatus::Processing),
            "PROCESSED" => Ok(TransactionStatus::Processed),
            other => Err(format!("unknown transaction status: {}", other)),
        }
    }
}

/// Domain entity representing a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub source_account: String,
    pub destination_account: String,
    #[serde(with = "crate::domain::amount")]
    pub amount: BigDecimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// A freshly received transaction, still waiting for its deferred transition.
    pub fn new(
        transaction_id: String,
        source_account: String,
        destination_account: String,
        amount: BigDecimal,
        currency: String,
    ) -> Self {
        Self {
            transaction_id,
            source_account,
            destination_account,
            amount,
            currency,
            status: TransactionStatus::Processing,
            created_at: Utc::now(),
            processed_at: None,
        }
    }

    /// Moves the record to PROCESSED. Returns false, leaving the record untouched,
    /// if it was already processed.
    pub fn mark_processed(&mut self, at: DateTime<Utc>) -> bool {
        if self.status != TransactionStatus::Processing {
            return false;
        }
        self.status = TransactionStatus::Processed;
        self.processed_at = Some(at);
        true
    }
}
