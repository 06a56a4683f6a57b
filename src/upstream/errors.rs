use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    #[error("{body} (status {status})")]
    Rejected {
        status: u16,
        body: String
    },
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Connection error: {0}")]
    Transport(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP client error: {0}")]
    Client(String)
}

impl UpstreamError {
    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}
