//! Transport layer between the [`Client`](crate::Client) and the network.
//!
//! The [`Transport`] trait takes a fully built [`RequestDescriptor`] and the
//! client's [`Endpoint`], performs exactly one exchange and hands back the raw
//! status and body. It never retries and never interprets the body; status
//! classification and decoding happen in the client.
//!
//! [`HttpTransport`] is the production implementation over `reqwest`.
//! [`MockTransport`] replays canned responses and records what it was asked
//! to send, for tests.

mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use std::time::Duration;

use crate::client::RequestDescriptor;
use crate::config::Endpoint;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Value of both the `accept` and `content-type` headers
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status code the service uses for a successful call
pub const SUCCESS_STATUS: u16 = 200;

/// Status and fully buffered body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is the service's success code
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// Sends one request to the service.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send `request` to `endpoint` with the API key and JSON headers attached
    /// and return the buffered response.
    async fn send(
        &self,
        endpoint: &Endpoint,
        request: &RequestDescriptor,
    ) -> Result<RawResponse, TransportError>;
}

/// Failures below the HTTP status level
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network, TLS or body-read failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The caller's deadline passed before the exchange completed
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the call
    #[error("Request was cancelled")]
    Cancelled,
}
