use serde::Serialize;

use crate::models::ProcessingOutcome;
use crate::types::TransactionId;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub transaction_id: TransactionId
}

impl SubmitResponse {
    pub fn queued(transaction_id: TransactionId) -> Self {
        Self { status: "queued", transaction_id }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct BatchResponse {
    pub results: Vec<ProcessingOutcome>
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "healthy" }
    }
}
