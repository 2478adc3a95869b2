use bigdecimal::BigDecimal;
use std::fmt;

pub const TRANSACTION_ID_MAX_LEN: usize = 255;
pub const ACCOUNT_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_transaction_id(transaction_id: &str) -> ValidationResult {
    validate_required("transaction_id", transaction_id)?;
    validate_max_len("transaction_id", transaction_id, TRANSACTION_ID_MAX_LEN)
}

pub fn validate_account(field: &'static str, account: &str) -> ValidationResult {
    validate_required(field, account)?;
    validate_max_len(field, account, ACCOUNT_MAX_LEN)
}

pub fn validate_non_negative_amount(amount: &BigDecimal) -> ValidationResult {
    if amount < &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must not be negative"));
    }

    Ok(())
}
