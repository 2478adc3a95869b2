pub mod processor;

pub use processor::{process_transaction, DeferredProcessor, ProcessOutcome, PROCESSING_DELAY};
