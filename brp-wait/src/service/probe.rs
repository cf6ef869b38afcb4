//! Readiness probe
//!
//! Makes one attempt against the endpoint and classifies the result.

use async_trait::async_trait;
use brp_wait_client::{ClientError, RemoteClient};
use brp_wait_core::domain::attempt::AttemptOutcome;
use std::error::Error as StdError;
use tracing::debug;

/// Service trait for probing the remote once
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Makes a single attempt; never fails, every error is an outcome
    async fn probe(&self) -> AttemptOutcome;
}

/// Probe that sends the `bevy/list` JSON-RPC request
pub struct RpcProbe {
    client: RemoteClient,
}

impl RpcProbe {
    /// Creates a new probe over a configured client
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReadinessProbe for RpcProbe {
    async fn probe(&self) -> AttemptOutcome {
        match self.client.list_methods().await {
            Ok(body) => AttemptOutcome::Ready { body },
            Err(e) => classify(&e),
        }
    }
}

/// Maps a client error onto an attempt outcome
fn classify(err: &ClientError) -> AttemptOutcome {
    if err.is_connection_refused() {
        debug!("Connection refused");
        return AttemptOutcome::Refused;
    }

    if let Some(status) = err.status() {
        debug!("Endpoint answered with status {}", status);
        return AttemptOutcome::Rejected { status };
    }

    if err.is_timeout() {
        return AttemptOutcome::Failed {
            error: format!("Request timed out ({})", describe(err)),
        };
    }

    AttemptOutcome::Failed {
        error: describe(err),
    }
}

/// Renders an error with its source chain, e.g. "HTTP request failed: ...: operation timed out"
fn describe(err: &ClientError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}
