pub mod receive_webhook;

pub use receive_webhook::{ReceiveWebhook, WebhookInput, WebhookOutcome};
