//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Transaction, TransactionStatus};
use crate::ports::{InsertOutcome, RepositoryError, RepositoryResult, TransactionRepository};

const TRANSACTION_COLUMNS: &str = "transaction_id, source_account, destination_account, amount, \
     currency, status, created_at, processed_at";

/// Postgres-backed transaction repository. Idempotency rests on the
/// primary key over `transaction_id`.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert_if_absent(&self, tx: &Transaction) -> RepositoryResult<InsertOutcome> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions (
                transaction_id, source_account, destination_account, amount,
                currency, status, created_at, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (transaction_id) DO NOTHING
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(&tx.transaction_id)
        .bind(&tx.source_account)
        .bind(&tx.destination_account)
        .bind(&tx.amount)
        .bind(&tx.currency)
        .bind(tx.status.as_str())
        .bind(tx.created_at)
        .bind(tx.processed_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(InsertOutcome::Created(row.into_domain()?)),
            None => Ok(InsertOutcome::Duplicate),
        }
    }

    async fn get(&self, transaction_id: &str) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {} FROM transactions WHERE transaction_id = $1",
            TRANSACTION_COLUMNS
        ))
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn mark_processed(
        &self,
        transaction_id: &str,
        processed_at: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $2, processed_at = $3
            WHERE transaction_id = $1 AND status = $4
            "#,
        )
        .bind(transaction_id)
        .bind(TransactionStatus::Processed.as_str())
        .bind(processed_at)
        .bind(TransactionStatus::Processing.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    transaction_id: String,
    source_account: String,
    destination_account: String,
    amount: BigDecimal,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let status = self
            .status
            .parse::<TransactionStatus>()
            .map_err(|reason| RepositoryError::Corrupt {
                transaction_id: self.transaction_id.clone(),
                reason,
            })?;

        Ok(Transaction {
            transaction_id: self.transaction_id,
            source_account: self.source_account,
            destination_account: self.destination_account,
            amount: self.amount,
            currency: self.currency,
            status,
            created_at: self.created_at,
            processed_at: self.processed_at,
        })
    }
}
