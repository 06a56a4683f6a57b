use rust_decimal::Decimal;
use serde::Serialize;

pub const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

/// Aggregated metrics over a non-empty transaction set.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_transactions: usize,
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
    /// Sum of completed deposits.
    pub total_deposits: Decimal,
    /// Sum of completed withdrawals.
    pub total_withdrawals: Decimal,
    /// `total_deposits - total_withdrawals`.
    pub net_flow: Decimal
}

/// The three mutually exclusive shapes an analytics request can produce.
///
/// Serialized flat, so each variant only emits its own fields.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsResult {
    Summary(AnalyticsSummary),
    Empty {
        total_transactions: usize,
        message: String
    },
    Failed {
        error: String
    }
}

impl AnalyticsResult {
    pub fn empty() -> Self {
        Self::Empty {
            total_transactions: 0,
            message: NO_TRANSACTIONS_MESSAGE.to_string()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed { error: error.into() }
    }

    pub fn summary(&self) -> Option<&AnalyticsSummary> {
        match self {
            Self::Summary(summary) => Some(summary),
            _ => None
        }
    }
}
