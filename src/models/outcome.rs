use serde::Serialize;

use crate::types::TransactionId;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error
}

/// The result of one batch attempt for one queued transaction.
///
/// This is distinct from the transaction's own status, which lives upstream.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ProcessingOutcome {
    pub transaction_id: TransactionId,
    pub status: OutcomeStatus,
    pub message: String
}

impl ProcessingOutcome {
    pub fn success(transaction_id: impl Into<TransactionId>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            status: OutcomeStatus::Success,
            message: "Transaction processed".to_string()
        }
    }

    pub fn error(transaction_id: impl Into<TransactionId>, message: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            status: OutcomeStatus::Error,
            message: message.into()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}
