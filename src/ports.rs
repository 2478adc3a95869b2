//! Storage port for transactions.
//! Adapters live in `crate::adapters`; everything above them depends only on this trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::Transaction;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("corrupt record {transaction_id}: {reason}")]
    Corrupt {
        transaction_id: String,
        reason: String,
    },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result of a conditional insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Created(Transaction),
    /// A record with this id already existed and was left untouched.
    Duplicate,
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Inserts `tx` unless a record with the same `transaction_id` exists.
    /// Concurrent calls for one id must let at most one of them report `Created`.
    async fn insert_if_absent(&self, tx: &Transaction) -> RepositoryResult<InsertOutcome>;

    async fn get(&self, transaction_id: &str) -> RepositoryResult<Option<Transaction>>;

    /// Flips a PROCESSING record to PROCESSED. Returns false when no record
    /// matched (missing, or already processed).
    async fn mark_processed(
        &self,
        transaction_id: &str,
        processed_at: DateTime<Utc>,
    ) -> RepositoryResult<bool>;
}
