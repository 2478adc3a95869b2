pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod startup;
pub mod use_cases;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::ports::TransactionRepository;
use crate::services::DeferredProcessor;

/// Shared by every handler. The repository is the only stateful piece and is
/// the same one handed to the deferred processor.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TransactionRepository>,
    pub processor: DeferredProcessor,
}

impl AppState {
    pub fn new(repository: Arc<dyn TransactionRepository>, delay: std::time::Duration) -> Self {
        let processor = DeferredProcessor::new(Arc::clone(&repository), delay);
        Self {
            repository,
            processor,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route(
            "/v1/webhooks/transactions",
            post(handlers::webhook::receive_transaction),
        )
        .route(
            "/v1/transactions/:transaction_id",
            get(handlers::webhook::get_transaction),
        )
        .layer(axum::middleware::from_fn(
            middleware::request_logger_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
