//! Receive webhook use case.
//! Conditional insert keyed by transaction id, then deferred processing for new records only.

use bigdecimal::BigDecimal;
use std::sync::Arc;

use crate::domain::Transaction;
use crate::ports::{InsertOutcome, RepositoryError, TransactionRepository};
use crate::services::DeferredProcessor;

/// Input for the ReceiveWebhook use case. Already validated.
#[derive(Debug)]
pub struct WebhookInput {
    pub transaction_id: String,
    pub source_account: String,
    pub destination_account: String,
    pub amount: BigDecimal,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Accepted,
    Duplicate,
}

pub struct ReceiveWebhook {
    transaction_repository: Arc<dyn TransactionRepository>,
    processor: DeferredProcessor,
}

impl ReceiveWebhook {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepository>,
        processor: DeferredProcessor,
    ) -> Self {
        Self {
            transaction_repository,
            processor,
        }
    }

    pub async fn execute(&self, input: WebhookInput) -> Result<WebhookOutcome, RepositoryError> {
        let tx = Transaction::new(
            input.transaction_id,
            input.source_account,
            input.destination_account,
            input.amount,
            input.currency,
        );

        match self.transaction_repository.insert_if_absent(&tx).await? {
            InsertOutcome::Created(created) => {
                tracing::info!(transaction_id = %created.transaction_id, "New transaction created");
                // Detached: the handle is dropped and the task keeps running.
                self.processor.schedule(created.transaction_id);
                Ok(WebhookOutcome::Accepted)
            }
            InsertOutcome::Duplicate => {
                tracing::info!(transaction_id = %tx.transaction_id, "Duplicate webhook ignored");
                Ok(WebhookOutcome::Duplicate)
            }
        }
    }
}
