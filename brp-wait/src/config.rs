//! Poller configuration
//!
//! Defines the endpoint and the three timings of the poll loop. Defaults
//! match what the pipeline expects when no flags or environment are given.

use brp_wait_client::Url;
use std::time::Duration;

/// Default Bevy Remote Protocol endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:15721";

/// Default overall wait, long enough for a cold game build
pub const DEFAULT_MAX_WAIT_SECS: u64 = 300;

/// Default pause between attempts
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Default bound on a single attempt
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Upper bound for every timing, one week
pub const MAX_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Poller configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint to poll (e.g., "http://127.0.0.1:15721")
    pub endpoint: String,

    /// Give up once this much time has passed since the first attempt
    pub max_wait: Duration,

    /// Sleep between unsuccessful attempts
    pub poll_interval: Duration,

    /// Timeout applied to each attempt
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a new configuration with default timings
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Creates a configuration from whole-second values, as given on the command line
    pub fn from_secs(
        endpoint: String,
        max_wait: u64,
        poll_interval: u64,
        request_timeout: u64,
    ) -> Self {
        Self {
            endpoint,
            max_wait: Duration::from_secs(max_wait),
            poll_interval: Duration::from_secs(poll_interval),
            request_timeout: Duration::from_secs(request_timeout),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.is_empty() {
            anyhow::bail!("endpoint cannot be empty");
        }

        let url = Url::parse(&self.endpoint)
            .map_err(|e| anyhow::anyhow!("endpoint is not a valid URL: {}", e))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("endpoint must start with http:// or https://");
        }

        if url.host_str().is_none_or(str::is_empty) {
            anyhow::bail!("endpoint must name a host");
        }

        if self.max_wait.is_zero() {
            anyhow::bail!("max_wait must be greater than 0");
        }

        let ceiling = Duration::from_secs(MAX_DURATION_SECS);
        for (name, value) in [
            ("max_wait", self.max_wait),
            ("poll_interval", self.poll_interval),
            ("request_timeout", self.request_timeout),
        ] {
            if value > ceiling {
                anyhow::bail!("{} cannot exceed {} seconds", name, MAX_DURATION_SECS);
            }
        }

        // A zero interval would turn the loop into a busy spin
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT.to_string())
    }
}
