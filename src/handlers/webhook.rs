use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::use_cases::{ReceiveWebhook, WebhookInput};
use crate::validation::{
    validate_account, validate_non_negative_amount, validate_required, validate_transaction_id,
    ValidationResult,
};
use crate::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct WebhookPayload {
    pub transaction_id: String,
    pub source_account: String,
    pub destination_account: String,
    #[serde(with = "crate::domain::amount")]
    pub amount: BigDecimal,
    pub currency: String,
}

impl WebhookPayload {
    pub fn validate(&self) -> ValidationResult {
        validate_transaction_id(&self.transaction_id)?;
        validate_account("source_account", &self.source_account)?;
        validate_account("destination_account", &self.destination_account)?;
        validate_non_negative_amount(&self.amount)?;
        validate_required("currency", &self.currency)
    }
}

impl From<WebhookPayload> for WebhookInput {
    fn from(payload: WebhookPayload) -> Self {
        WebhookInput {
            transaction_id: payload.transaction_id,
            source_account: payload.source_account,
            destination_account: payload.destination_account,
            amount: payload.amount,
            currency: payload.currency,
        }
    }
}

/// Acknowledges as soon as the conditional insert returns; the status flip happens
/// later on a detached task.
pub async fn receive_transaction(
    State(state): State<AppState>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    tracing::info!(transaction_id = %payload.transaction_id, "Received webhook");

    let receive = ReceiveWebhook::new(state.repository.clone(), state.processor.clone());
    receive.execute(payload.into()).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": "Webhook received" })),
    ))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .repository
        .get(&transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", transaction_id)))?;

    Ok(Json(tx))
}
