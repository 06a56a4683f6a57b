use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid transaction payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("Transaction id must not be blank")]
    MissingTransactionId
}
