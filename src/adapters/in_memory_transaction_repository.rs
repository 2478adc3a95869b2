use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::Transaction;
use crate::ports::{InsertOutcome, RepositoryResult, TransactionRepository};

/// A thread-safe in-memory transaction store.
///
/// The write lock around the map plays the role the primary key plays in Postgres:
/// only one concurrent insert for a given id can observe a vacant entry.
#[derive(Default, Clone)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transactions.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert_if_absent(&self, tx: &Transaction) -> RepositoryResult<InsertOutcome> {
        let mut transactions = self.transactions.write().await;
        match transactions.entry(tx.transaction_id.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(tx.clone());
                Ok(InsertOutcome::Created(tx.clone()))
            }
        }
    }

    async fn get(&self, transaction_id: &str) -> RepositoryResult<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(transaction_id).cloned())
    }

    async fn mark_processed(
        &self,
        transaction_id: &str,
        processed_at: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let mut transactions = self.transactions.write().await;
        Ok(transactions
            .get_mut(transaction_id)
            .map(|tx| tx.mark_processed(processed_at))
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;
    use bigdecimal::BigDecimal;

    fn tx(id: &str, amount: i64) -> Transaction {
        Transaction::new(
            id.to_string(),
            "a".to_string(),
            "b".to_string(),
            BigDecimal::from(amount),
            "USD".to_string(),
        )
    }

    #[tokio::test]
    async fn test_insert_then_duplicate_leaves_original() {
        let repo = InMemoryTransactionRepository::new();

        let first = repo.insert_if_absent(&tx("t1", 100)).await.unwrap();
        assert!(matches!(first, InsertOutcome::Created(_)));

        let second = repo.insert_if_absent(&tx("t1", 999)).await.unwrap();
        assert_eq!(second, InsertOutcome::Duplicate);

        let stored = repo.get("t1").await.unwrap().unwrap();
        assert_eq!(stored.amount, BigDecimal::from(100));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = InMemoryTransactionRepository::new();
        assert!(repo.get("nope").await.unwrap().is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_mark_processed_only_once() {
        let repo = InMemoryTransactionRepository::new();
        repo.insert_if_absent(&tx("t1", 1)).await.unwrap();

        assert!(repo.mark_processed("t1", Utc::now()).await.unwrap());
        assert!(!repo.mark_processed("t1", Utc::now()).await.unwrap());
        assert!(!repo.mark_processed("missing", Utc::now()).await.unwrap());

        let stored = repo.get("t1").await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Processed);
        assert!(stored.processed_at.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_create_once() {
        let repo = InMemoryTransactionRepository::new();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.insert_if_absent(&tx("race", 5)).await.unwrap() })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if let InsertOutcome::Created(_) = handle.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }
}
