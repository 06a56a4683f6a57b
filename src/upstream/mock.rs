use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::TransactionView;
use crate::upstream::{Ack, UpstreamClient, UpstreamError};

/// In-process upstream double with per-id scripted behavior.
#[derive(Default)]
pub struct ScriptedUpstream {
    transactions: Vec<TransactionView>,
    rejected: HashSet<String>,
    panicking: HashSet<String>,
    unreachable: bool,
    panic_on_fetch: bool,
    updates: Mutex<Vec<(String, String)>>,
    fetches: Mutex<usize>
}

impl ScriptedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(mut self, transactions: Vec<TransactionView>) -> Self {
        self.transactions = transactions;
        self
    }

    /// Answers updates for `transaction_id` with a 404.
    pub fn rejecting(mut self, transaction_id: &str) -> Self {
        self.rejected.insert(transaction_id.to_string());
        self
    }

    /// Panics instead of answering updates for `transaction_id`.
    pub fn panicking_on(mut self, transaction_id: &str) -> Self {
        self.panicking.insert(transaction_id.to_string());
        self
    }

    /// Fails every call with a transport error.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn panicking_on_fetch(mut self) -> Self {
        self.panic_on_fetch = true;
        self
    }

    pub fn update_calls(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl UpstreamClient for ScriptedUpstream {
    async fn update_status(&self, transaction_id: &str, status: &str) -> Result<Ack, UpstreamError> {
        self.updates.lock().unwrap().push((transaction_id.to_string(), status.to_string()));

        if self.panicking.contains(transaction_id) {
            panic!("upstream client crashed on {transaction_id}");
        }

        if self.unreachable {
            return Err(UpstreamError::Transport("connection refused".to_string()));
        }

        if self.rejected.contains(transaction_id) {
            return Err(UpstreamError::Rejected { status: 404, body: "Transaction not found".to_string() });
        }

        Ok(Ack { status_code: 200, record: None })
    }

    async fn fetch_all(&self) -> Result<Vec<TransactionView>, UpstreamError> {
        *self.fetches.lock().unwrap() += 1;

        if self.panic_on_fetch {
            panic!("upstream client crashed while listing");
        }

        if self.unreachable {
            return Err(UpstreamError::Timeout(Duration::from_secs(10)));
        }

        Ok(self.transactions.clone())
    }
}
