use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::models::{ProcessingOutcome, Transaction};
use crate::config::DEFAULT_PROCESSING_DELAY;
use crate::fault::panic_message;
use crate::types::STATUS_COMPLETED;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Owns the pending-transaction queue and drains it against the upstream system.
///
/// Mutating calls take `&mut self`; callers that share a processor across tasks must
/// serialize access themselves (the service wraps it in a mutex).
pub struct BatchProcessor<U: UpstreamClient> {
    upstream: Arc<U>,
    queue: Vec<Transaction>,
    processing_delay: Duration
}

impl<U: UpstreamClient> BatchProcessor<U> {
    pub fn new(upstream: Arc<U>) -> Self {
        Self {
            upstream,
            queue: Vec::new(),
            processing_delay: DEFAULT_PROCESSING_DELAY
        }
    }

    /// Sets the simulated per-item work delay. Zero disables it.
    pub fn with_processing_delay(mut self, processing_delay: Duration) -> Self {
        self.processing_delay = processing_delay;
        self
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Appends a transaction to the back of the queue.
    pub fn enqueue(&mut self, transaction: Transaction) {
        info!("Added transaction [{}] to queue", transaction.id);
        self.queue.push(transaction);
        debug!("Queue depth is now {}", self.queue.len());
    }

    /// Drains the queue, marking each transaction completed upstream in insertion order.
    ///
    /// Returns exactly one outcome per drained transaction, in the same order. A failure
    /// or panic while handling one item is recorded in that item's outcome and never
    /// stops the rest of the batch. The queue is always empty afterwards; failed items
    /// are not re-queued.
    pub async fn drain_and_process(&mut self) -> Vec<ProcessingOutcome> {
        if self.is_empty() {
            info!("No transactions to process");
            return Vec::new();
        }

        let batch = std::mem::take(&mut self.queue);
        let mut outcomes = Vec::with_capacity(batch.len());

        info!("Processing batch of {} transactions", batch.len());

        for transaction in &batch {
            let attempt = AssertUnwindSafe(self.process_one(transaction)).catch_unwind().await;

            let outcome = attempt.unwrap_or_else(|payload| {
                let fault = panic_message(&*payload);
                error!("Error processing transaction [{}]: {fault}", transaction.id);
                ProcessingOutcome::error(transaction.id.clone(), format!("Processing fault: {fault}"))
            });

            outcomes.push(outcome);
        }

        outcomes
    }

    async fn process_one(&self, transaction: &Transaction) -> ProcessingOutcome {
        if !self.processing_delay.is_zero() {
            sleep(self.processing_delay).await;
        }

        match self.upstream.update_status(&transaction.id, STATUS_COMPLETED).await {
            Ok(ack) => {
                info!("Successfully processed transaction [{}] ({})", transaction.id, ack.status_code);

                if let Some(status) = ack.record.and_then(|record| record.status) {
                    debug!("Upstream reports transaction [{}] as [{status}]", transaction.id);
                }

                ProcessingOutcome::success(transaction.id.clone())
            },
            Err(UpstreamError::Rejected { status, body }) => {
                warn!("Failed to update transaction [{}] ({status}): {body}", transaction.id);
                ProcessingOutcome::error(transaction.id.clone(), format!("API error: {body}"))
            },
            Err(error) => {
                error!("Exception during API call for transaction [{}]: {error}", transaction.id);
                ProcessingOutcome::error(transaction.id.clone(), format!("API error: {error}"))
            }
        }
    }
}
