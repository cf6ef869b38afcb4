//! brp-wait HTTP Client
//!
//! A small JSON-RPC client for a Bevy Remote Protocol endpoint.
//!
//! # Example
//!
//! ```no_run
//! use brp_wait_client::RemoteClient;
//! use std::time::Duration;
//!
//! # async fn example() -> brp_wait_client::Result<()> {
//! let client = RemoteClient::new("http://127.0.0.1:15721", Duration::from_secs(1))?;
//! let body = client.list_methods().await?;
//! println!("{}", body);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod rpc;

pub use error::{ClientError, Result};
pub use reqwest::Url;

use reqwest::Client;
use std::time::Duration;

/// HTTP client for a JSON-RPC endpoint
#[derive(Debug, Clone)]
pub struct RemoteClient {
    /// Endpoint URL requests are posted to (e.g., "http://127.0.0.1:15721")
    endpoint: String,
    /// HTTP client instance
    client: Client,
}

impl RemoteClient {
    /// Create a new client whose every request is bounded by `timeout`
    ///
    /// # Arguments
    /// * `endpoint` - URL of the JSON-RPC endpoint
    /// * `timeout` - Per-request timeout, covering connect through body
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(endpoint, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// # Example
    /// ```
    /// use brp_wait_client::RemoteClient;
    /// use reqwest::Client;
    ///
    /// let client = RemoteClient::with_client("http://127.0.0.1:15721", Client::new());
    /// assert_eq!(client.endpoint(), "http://127.0.0.1:15721");
    /// ```
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
