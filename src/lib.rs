//! # Metaphor Client
//!
//! A client for the Metaphor web search API: semantic search, find-similar by
//! URL and content retrieval by result identifier.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`]: Endpoint defaults, [`ClientConfig`](config::ClientConfig) and config-file loading
//! - [`models`]: Request payloads and response types
//! - [`options`]: Composable request options and bulk overrides
//! - [`client`]: The [`Client`] pipeline, request building, decoding and errors
//! - [`transport`]: The HTTP seam, with a `reqwest` implementation and a mock
//! - [`ui`]: Terminal rendering used by the `metaphor` binary
//!
//! ```rust,no_run
//! use metaphor::{Client, RequestOption};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(std::env::var("METAPHOR_API_KEY")?)?;
//! let results = client
//!     .search("what is tokio?", &[RequestOption::Autoprompt(true)])
//!     .await?;
//! let contents = client.contents_for(&results).await?;
//! for record in &contents.contents {
//!     println!("{}: {}", record.url, record.extract);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod models;
pub mod options;
pub mod transport;
pub mod ui;

// Re-export commonly used types
pub use client::{CallContext, Client, ClientError, EmptyResultKind};
pub use config::ClientConfig;
pub use options::{RequestOption, RequestOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
