//! Metaphor API client.
//!
//! Each public operation runs the same pipeline exactly once:
//!
//! 1. build fresh base parameters and fold the client's default options, then
//!    the per-call options, over them ([`crate::options`]);
//! 2. turn the parameters into a [`RequestDescriptor`] (no I/O);
//! 3. send it through the [`Transport`] under the caller's [`CallContext`];
//! 4. decode the body and classify failures into a [`ClientError`].
//!
//! The client itself is immutable. Options passed to one call never leak into
//! the next, so a single `Client` can be shared freely between tasks.

mod context;
mod decode;
mod request;

pub use context::CallContext;
pub use decode::{decode_contents, decode_search};
pub use request::{build_contents, build_find_similar, build_search, Operation, RequestDescriptor};

use std::fmt;
use std::sync::Arc;

use crate::config::{ClientConfig, Endpoint};
use crate::models::{ContentsRequest, ContentsResponse, RequestBody, SearchResponse};
use crate::options::{apply_options, RequestOption};
use crate::transport::{HttpTransport, RawResponse, Transport, TransportError};

/// Client for the Metaphor search API
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Endpoint,
    defaults: Vec<RequestOption>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client for `api_key` against the default service root.
    ///
    /// Fails with [`ClientError::Configuration`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client from a full configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config).map_err(|e| {
            ClientError::Configuration(format!("failed to create HTTP client: {}", e))
        })?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends through a custom transport
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let endpoint = config.validate()?;
        Ok(Self {
            endpoint,
            defaults: Vec::new(),
            transport,
        })
    }

    /// Options applied to every search and find-similar call, before the
    /// per-call options
    pub fn with_default_options(mut self, options: impl IntoIterator<Item = RequestOption>) -> Self {
        self.defaults = options.into_iter().collect();
        self
    }

    /// Point the client at a different service root
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ClientError> {
        self.endpoint = Endpoint::new(base_url, self.endpoint.api_key())?;
        Ok(self)
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn default_options(&self) -> &[RequestOption] {
        &self.defaults
    }

    /// Parameters a search for `query` with `options` would send
    pub fn search_body(&self, query: &str, options: &[RequestOption]) -> RequestBody {
        self.layer(RequestBody::search(query), options)
    }

    /// Parameters a find-similar for `url` with `options` would send
    pub fn find_similar_body(&self, url: &str, options: &[RequestOption]) -> RequestBody {
        self.layer(RequestBody::find_similar(url), options)
    }

    fn layer(&self, base: RequestBody, options: &[RequestOption]) -> RequestBody {
        apply_options(apply_options(base, &self.defaults), options)
    }

    /// Semantic search for `query`
    pub async fn search(
        &self,
        query: &str,
        options: &[RequestOption],
    ) -> Result<SearchResponse, ClientError> {
        self.search_with_context(&CallContext::background(), query, options)
            .await
    }

    /// Semantic search for `query` under a deadline or cancellation token
    pub async fn search_with_context(
        &self,
        ctx: &CallContext,
        query: &str,
        options: &[RequestOption],
    ) -> Result<SearchResponse, ClientError> {
        let descriptor = build_search(&self.search_body(query, options))?;
        let response = self.execute(ctx, &descriptor).await?;
        decode_search(Operation::Search, &response)
    }

    /// Find pages similar to `url`
    pub async fn find_similar(
        &self,
        url: &str,
        options: &[RequestOption],
    ) -> Result<SearchResponse, ClientError> {
        self.find_similar_with_context(&CallContext::background(), url, options)
            .await
    }

    /// Find pages similar to `url` under a deadline or cancellation token
    pub async fn find_similar_with_context(
        &self,
        ctx: &CallContext,
        url: &str,
        options: &[RequestOption],
    ) -> Result<SearchResponse, ClientError> {
        let descriptor = build_find_similar(&self.find_similar_body(url, options))?;
        let response = self.execute(ctx, &descriptor).await?;
        decode_search(Operation::FindSimilar, &response)
    }

    /// Fetch extracted contents for the given result identifiers
    pub async fn get_contents<I, S>(&self, ids: I) -> Result<ContentsResponse, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.get_contents_with_context(&CallContext::background(), ids)
            .await
    }

    /// Fetch extracted contents under a deadline or cancellation token
    pub async fn get_contents_with_context<I, S>(
        &self,
        ctx: &CallContext,
        ids: I,
    ) -> Result<ContentsResponse, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let descriptor = build_contents(&ContentsRequest::new(ids));
        let response = self.execute(ctx, &descriptor).await?;
        decode_contents(&response)
    }

    /// Fetch extracted contents for every result of a previous search
    pub async fn contents_for(
        &self,
        response: &SearchResponse,
    ) -> Result<ContentsResponse, ClientError> {
        self.get_contents(response.ids()).await
    }

    async fn execute(
        &self,
        ctx: &CallContext,
        descriptor: &RequestDescriptor,
    ) -> Result<RawResponse, ClientError> {
        tracing::debug!(
            "Sending Metaphor {} request: {} {}",
            descriptor.operation,
            descriptor.method,
            descriptor.path
        );

        let response = ctx
            .run(self.transport.send(&self.endpoint, descriptor))
            .await?;

        tracing::debug!(
            "Metaphor {} returned status {} ({} bytes)",
            descriptor.operation,
            response.status,
            response.body.len()
        );

        Ok(response)
    }
}

/// Which operation came back successfully but empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmptyResultKind {
    NoSearchResults,
    NoSimilarLinks,
    NoContentExtracted,
}

impl fmt::Display for EmptyResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            EmptyResultKind::NoSearchResults => "no search results were found",
            EmptyResultKind::NoSimilarLinks => "no similar links were found",
            EmptyResultKind::NoContentExtracted => "no content was extracted",
        };
        f.write_str(message)
    }
}

/// Errors returned by the client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing API key or unusable endpoint settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request parameters could not be serialized.
    ///
    /// `RequestBody` always serializes; this covers any body handed to the
    /// JSON request builder.
    #[error("Failed to build {operation} request: {source}")]
    RequestBuild {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// Network failure, timeout or cancellation
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-success status with a readable error envelope
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Non-success status whose body is not an error envelope
    #[error("Malformed error response ({status}): {source}")]
    MalformedErrorResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Success status whose body does not match the expected shape
    #[error("Failed to decode {operation} response: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// Success status with an empty result collection
    #[error("{0}")]
    EmptyResult(EmptyResultKind),
}

impl ClientError {
    /// HTTP status attached to the error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } | ClientError::MalformedErrorResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, ClientError::EmptyResult(_))
    }
}
