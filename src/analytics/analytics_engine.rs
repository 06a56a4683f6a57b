use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::analytics::AnalyticsError;
use crate::models::{AnalyticsResult, AnalyticsSummary, TransactionView};
use crate::fault::panic_message;
use crate::types::{is_value, STATUS_COMPLETED, STATUS_FAILED, STATUS_PENDING, TYPE_DEPOSIT, TYPE_WITHDRAWAL};
use crate::upstream::UpstreamClient;

/// Computes summary metrics over a freshly fetched copy of the upstream records.
pub struct AnalyticsEngine<U: UpstreamClient> {
    upstream: Arc<U>
}

impl<U: UpstreamClient> AnalyticsEngine<U> {
    pub fn new(upstream: Arc<U>) -> Self {
        Self { upstream }
    }

    /// Fetches all transactions, keeps those for `account_id` when given, and aggregates them.
    ///
    /// Never fails: fetch errors, aggregation errors and panics all come back as
    /// `AnalyticsResult::Failed`.
    pub async fn compute(&self, account_id: Option<&str>) -> AnalyticsResult {
        let fetched = AssertUnwindSafe(self.upstream.fetch_all()).catch_unwind().await;

        let transactions = match fetched {
            Ok(Ok(transactions)) => transactions,
            Ok(Err(error)) => {
                error!("Failed to fetch transactions: {error}");
                return AnalyticsResult::failed(format!("Failed to fetch transactions: {error}"));
            },
            Err(payload) => {
                let fault = panic_message(&*payload);
                error!("Error analyzing transactions: {fault}");
                return AnalyticsResult::failed(fault);
            }
        };

        let aggregated = catch_unwind(AssertUnwindSafe(|| aggregate(&transactions, account_id)));

        match aggregated {
            Ok(Ok(result)) => result,
            Ok(Err(error)) => {
                error!("Error analyzing transactions: {error}");
                AnalyticsResult::failed(error.to_string())
            },
            Err(payload) => {
                let fault = panic_message(&*payload);
                error!("Error analyzing transactions: {fault}");
                AnalyticsResult::failed(fault)
            }
        }
    }
}

fn aggregate(transactions: &[TransactionView], account_id: Option<&str>) -> Result<AnalyticsResult, AnalyticsError> {
    let selected: Vec<&TransactionView> = transactions.iter()
        .filter(|transaction| account_id.is_none_or(|account_id| is_value(transaction.account_id.as_deref(), account_id)))
        .collect();

    if selected.is_empty() {
        info!("No transactions found for analytics (account filter: {account_id:?})");
        return Ok(AnalyticsResult::empty());
    }

    Ok(AnalyticsResult::Summary(summarize(selected)?))
}

/// Aggregates an already filtered, non-empty transaction set.
///
/// Counts are by exact status; unrecognized statuses count toward the total only.
/// Monetary totals include completed transactions only, with a missing amount as zero.
pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a TransactionView>) -> Result<AnalyticsSummary, AnalyticsError> {
    let mut summary = AnalyticsSummary {
        total_transactions: 0,
        completed: 0,
        pending: 0,
        failed: 0,
        total_deposits: Decimal::ZERO,
        total_withdrawals: Decimal::ZERO,
        net_flow: Decimal::ZERO
    };

    for transaction in transactions {
        let status = transaction.status.as_deref();
        let transaction_type = transaction.transaction_type.as_deref();

        summary.total_transactions += 1;

        if is_value(status, STATUS_COMPLETED) {
            summary.completed += 1;

            if is_value(transaction_type, TYPE_DEPOSIT) {
                summary.total_deposits = summary.total_deposits.checked_add(amount_of(transaction)?)
                    .ok_or(AnalyticsError::Overflow { total: "total_deposits" })?;
            } else if is_value(transaction_type, TYPE_WITHDRAWAL) {
                summary.total_withdrawals = summary.total_withdrawals.checked_add(amount_of(transaction)?)
                    .ok_or(AnalyticsError::Overflow { total: "total_withdrawals" })?;
            }
        } else if is_value(status, STATUS_PENDING) {
            summary.pending += 1;
        } else if is_value(status, STATUS_FAILED) {
            summary.failed += 1;
        }
    }

    summary.net_flow = summary.total_deposits.checked_sub(summary.total_withdrawals)
        .ok_or(AnalyticsError::Overflow { total: "net_flow" })?;

    Ok(summary)
}

fn amount_of(transaction: &TransactionView) -> Result<Decimal, AnalyticsError> {
    transaction.amount_or_zero().ok_or_else(|| AnalyticsError::UnrepresentableAmount {
        transaction_id: transaction.id.clone().unwrap_or_default(),
        amount: transaction.amount.unwrap_or_default()
    })
}
