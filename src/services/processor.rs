use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{error, info, info_span, warn, Instrument};

use crate::ports::TransactionRepository;

/// How long a received transaction stays PROCESSING before it is flipped.
pub const PROCESSING_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Processed,
    /// The record was gone or no longer PROCESSING.
    Skipped,
    /// The store update failed. Not retried.
    Failed,
}

/// Spawns one detached task per newly received transaction. Each task sleeps for
/// the fixed delay and then performs a single status transition.
///
/// Nothing survives a restart: a task lost with the process leaves its record
/// PROCESSING.
#[derive(Clone)]
pub struct DeferredProcessor {
    repository: Arc<dyn TransactionRepository>,
    delay: Duration,
}

impl DeferredProcessor {
    pub fn new(repository: Arc<dyn TransactionRepository>, delay: Duration) -> Self {
        Self { repository, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The delay is measured from this call, not from when the runtime first polls the task.
    pub fn schedule(&self, transaction_id: String) -> JoinHandle<ProcessOutcome> {
        let deadline = Instant::now() + self.delay;
        let repository = Arc::clone(&self.repository);
        let span = info_span!("deferred_processor", transaction_id = %transaction_id);

        info!(
            transaction_id = %transaction_id,
            delay_secs = self.delay.as_secs_f64(),
            "Deferred processing scheduled"
        );

        tokio::spawn(
            async move {
                sleep_until(deadline).await;
                process_transaction(repository.as_ref(), &transaction_id).await
            }
            .instrument(span),
        )
    }
}

/// Performs the PROCESSING -> PROCESSED transition. Errors end here: they are
/// logged and never reach a caller.
pub async fn process_transaction(
    repository: &dyn TransactionRepository,
    transaction_id: &str,
) -> ProcessOutcome {
    match repository.mark_processed(transaction_id, Utc::now()).await {
        Ok(true) => {
            info!(transaction_id = %transaction_id, "Transaction processed");
            ProcessOutcome::Processed
        }
        Ok(false) => {
            warn!(
                transaction_id = %transaction_id,
                "No PROCESSING record to update; skipping"
            );
            ProcessOutcome::Skipped
        }
        Err(e) => {
            error!(transaction_id = %transaction_id, error = %e, "Deferred processing failed");
            ProcessOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransactionRepository;
    use crate::domain::{Transaction, TransactionStatus};
    use crate::ports::{InsertOutcome, RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use bigdecimal::BigDecimal;
    use chrono::DateTime;

    struct UnavailableRepository;

    #[async_trait]
    impl TransactionRepository for UnavailableRepository {
        async fn insert_if_absent(&self, _tx: &Transaction) -> RepositoryResult<InsertOutcome> {
            Err(RepositoryError::Unavailable(sqlx::Error::PoolTimedOut))
        }

        async fn get(&self, _transaction_id: &str) -> RepositoryResult<Option<Transaction>> {
            Err(RepositoryError::Unavailable(sqlx::Error::PoolTimedOut))
        }

        async fn mark_processed(
            &self,
            _transaction_id: &str,
            _processed_at: DateTime<Utc>,
        ) -> RepositoryResult<bool> {
            Err(RepositoryError::Unavailable(sqlx::Error::PoolTimedOut))
        }
    }

    async fn seeded_repo(id: &str) -> Arc<InMemoryTransactionRepository> {
        let repo = Arc::new(InMemoryTransactionRepository::new());
        repo.insert_if_absent(&Transaction::new(
            id.to_string(),
            "a".to_string(),
            "b".to_string(),
            BigDecimal::from(10),
            "USD".to_string(),
        ))
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_scheduled_task_processes_after_delay() {
        let repo = seeded_repo("t1").await;
        let processor = DeferredProcessor::new(repo.clone(), Duration::from_millis(50));

        let handle = processor.schedule("t1".to_string());
        assert_eq!(
            repo.get("t1").await.unwrap().unwrap().status,
            TransactionStatus::Processing
        );

        assert_eq!(handle.await.unwrap(), ProcessOutcome::Processed);
        let stored = repo.get("t1").await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Processed);
        let earliest = stored.created_at + chrono::Duration::milliseconds(50);
        assert!(stored.processed_at.unwrap() >= earliest);
    }

    #[tokio::test]
    async fn test_second_run_is_skipped() {
        let repo = seeded_repo("t1").await;
        assert_eq!(process_transaction(repo.as_ref(), "t1").await, ProcessOutcome::Processed);
        assert_eq!(process_transaction(repo.as_ref(), "t1").await, ProcessOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_missing_record_is_skipped() {
        let repo = InMemoryTransactionRepository::new();
        assert_eq!(process_transaction(&repo, "ghost").await, ProcessOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_store_failure_is_contained() {
        let processor =
            DeferredProcessor::new(Arc::new(UnavailableRepository), Duration::from_millis(1));
        let outcome = processor.schedule("t1".to_string()).await.unwrap();
        assert_eq!(outcome, ProcessOutcome::Failed);
    }
}
