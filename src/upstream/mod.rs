mod errors;
mod http_client;
#[cfg(test)]
pub mod mock;
#[cfg(test)]
mod tests;

use async_trait::async_trait;

use crate::models::TransactionView;

pub use errors::UpstreamError;
pub use http_client::HttpUpstreamClient;

/// Acknowledgement of a successful status update.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    /// The 2xx status code the upstream answered with.
    pub status_code: u16,
    /// The updated record, when the upstream echoed one back.
    pub record: Option<TransactionView>
}

/// Read/write access to the authoritative transaction records.
///
/// Each call is a single attempt. Implementations must bound how long a call can take
/// and report every failure, including timeouts, as an `UpstreamError`.
#[async_trait]
pub trait UpstreamClient: Send + Sync + 'static {
    async fn update_status(&self, transaction_id: &str, status: &str) -> Result<Ack, UpstreamError>;
    async fn fetch_all(&self) -> Result<Vec<TransactionView>, UpstreamError>;
}
