use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::json;
use tracing::debug;

use crate::models::TransactionView;
use crate::upstream::{Ack, UpstreamClient, UpstreamError};

const TRANSACTIONS_PATH: &str = "transactions";

/// `UpstreamClient` backed by the record-keeping REST API.
pub struct HttpUpstreamClient {
    client: Client,
    base_url: Url,
    timeout: Duration
}

impl HttpUpstreamClient {
    /// Builds a client for `base_url` (e.g. `http://api:8080`) with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url)
            .map_err(|error| UpstreamError::InvalidUrl(format!("{base_url}: {error}")))?;

        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| UpstreamError::Client(error.to_string()))?;

        Ok(Self { client, base_url, timeout })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(super) fn transactions_url(&self, transaction_id: Option<&str>) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();

        {
            let mut segments = url.path_segments_mut()
                .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?;

            segments.pop_if_empty().push(TRANSACTIONS_PATH);

            if let Some(transaction_id) = transaction_id {
                segments.push(transaction_id);
            }
        }

        Ok(url)
    }

    async fn reject_unless_success(&self, response: Response) -> Result<Response, UpstreamError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await
            .map_err(|error| UpstreamError::from_reqwest(error, self.timeout))?;

        Err(UpstreamError::Rejected { status: status.as_u16(), body: body.trim_end().to_string() })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn update_status(&self, transaction_id: &str, status: &str) -> Result<Ack, UpstreamError> {
        let url = self.transactions_url(Some(transaction_id))?;
        debug!("PUT {url} status [{status}]");

        let response = self.client.put(url)
            .json(&json!({ "status": status }))
            .send()
            .await
            .map_err(|error| UpstreamError::from_reqwest(error, self.timeout))?;

        let response = self.reject_unless_success(response).await?;
        let status_code = response.status().as_u16();

        //NOTE: The echoed record is informational only, an unparsable body still counts as an ack
        let record = response.json::<TransactionView>().await.ok();

        Ok(Ack { status_code, record })
    }

    async fn fetch_all(&self) -> Result<Vec<TransactionView>, UpstreamError> {
        let url = self.transactions_url(None)?;
        debug!("GET {url}");

        let response = self.client.get(url)
            .send()
            .await
            .map_err(|error| UpstreamError::from_reqwest(error, self.timeout))?;

        let response = self.reject_unless_success(response).await?;
        let body = response.bytes().await
            .map_err(|error| UpstreamError::from_reqwest(error, self.timeout))?;

        serde_json::from_slice::<Vec<TransactionView>>(&body)
            .map_err(|error| UpstreamError::Decode(error.to_string()))
    }
}
