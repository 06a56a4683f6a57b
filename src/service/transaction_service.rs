use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::analytics::AnalyticsEngine;
use crate::models::{AnalyticsResult, BatchResponse, HealthResponse, SubmitResponse, Transaction};
use crate::processor::BatchProcessor;
use crate::service::ServiceError;
use crate::upstream::UpstreamClient;

/// Request-handling boundary over the batch processor and analytics engine.
///
/// This is the composition root: it owns the only queue, and every queue operation goes
/// through the mutex so concurrent callers are served one at a time.
pub struct TransactionService<U: UpstreamClient> {
    processor: Mutex<BatchProcessor<U>>,
    analytics: AnalyticsEngine<U>
}

impl<U: UpstreamClient> TransactionService<U> {
    pub fn new(upstream: Arc<U>, processing_delay: Duration) -> Self {
        Self {
            processor: Mutex::new(BatchProcessor::new(upstream.clone()).with_processing_delay(processing_delay)),
            analytics: AnalyticsEngine::new(upstream)
        }
    }

    /// Queues a transaction for the next batch.
    pub async fn submit(&self, transaction: Transaction) -> Result<SubmitResponse, ServiceError> {
        if transaction.id.trim().is_empty() {
            warn!("Rejected transaction without an id");
            return Err(ServiceError::MissingTransactionId);
        }

        let transaction_id = transaction.id.clone();
        self.processor.lock().await.enqueue(transaction);

        Ok(SubmitResponse::queued(transaction_id))
    }

    /// Parses a JSON transaction payload and queues it.
    pub async fn submit_json(&self, payload: &str) -> Result<SubmitResponse, ServiceError> {
        let transaction: Transaction = serde_json::from_str(payload)?;
        self.submit(transaction).await
    }

    /// Drains and processes everything queued so far.
    pub async fn trigger_batch(&self) -> BatchResponse {
        let results = self.processor.lock().await.drain_and_process().await;
        let succeeded = results.iter().filter(|outcome| outcome.is_success()).count();

        info!("Batch finished: {succeeded}/{} succeeded", results.len());

        BatchResponse { results }
    }

    /// Computes analytics, optionally for one account. A blank account id means no filter.
    pub async fn analytics(&self, account_id: Option<&str>) -> AnalyticsResult {
        let account_id = account_id.filter(|account_id| !account_id.trim().is_empty());
        self.analytics.compute(account_id).await
    }

    pub async fn queue_depth(&self) -> usize {
        self.processor.lock().await.len()
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::healthy()
    }
}
