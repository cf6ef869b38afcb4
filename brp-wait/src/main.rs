//! brp-wait
//!
//! Blocks a build or test pipeline until a Bevy app's remote-control
//! (Bevy Remote Protocol) server answers JSON-RPC requests.
//!
//! Architecture:
//! - Configuration: Flags with environment fallbacks, validated up front
//! - Services: Readiness probe (HTTP JSON-RPC) and console progress reporter
//! - Scheduler: The poll loop, bounded by an overall deadline
//!
//! Exits 0 once the endpoint answers, 1 if it never does.

mod config;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use brp_wait_client::RemoteClient;
use brp_wait_core::domain::poll::PollOutcome;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{
    Config, DEFAULT_ENDPOINT, DEFAULT_MAX_WAIT_SECS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::scheduler::ReadinessPoller;
use crate::service::{ConsoleReporter, RpcProbe};

#[derive(Parser)]
#[command(name = "brp-wait")]
#[command(about = "Wait for a Bevy Remote Protocol endpoint to come online", long_about = None)]
struct Cli {
    /// JSON-RPC endpoint to poll
    #[arg(long, env = "BRP_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Seconds to wait before giving up
    #[arg(long, env = "BRP_MAX_WAIT", default_value_t = DEFAULT_MAX_WAIT_SECS)]
    max_wait: u64,

    /// Seconds to sleep between attempts
    #[arg(long, env = "BRP_POLL_INTERVAL", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    poll_interval: u64,

    /// Seconds allowed for a single attempt
    #[arg(long, env = "BRP_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config::from_secs(
            self.endpoint,
            self.max_wait,
            self.poll_interval,
            self.request_timeout,
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for the banners and the response
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brp_wait=info,brp_wait_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli.into_config()).await {
        Ok(outcome) => {
            info!(
                "Finished after {} attempt(s) with exit status {}",
                outcome.attempts(),
                outcome.exit_status()
            );
            ExitCode::from(outcome.exit_status())
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Validates the configuration and polls until ready or timed out
async fn run(config: Config) -> Result<PollOutcome> {
    config.validate().context("Invalid configuration")?;
    info!("Loaded configuration: endpoint={}", config.endpoint);

    let client = RemoteClient::new(config.endpoint.clone(), config.request_timeout)
        .context("Failed to build HTTP client")?;
    let poller = ReadinessPoller::new(config, Arc::new(RpcProbe::new(client)));

    let mut reporter = ConsoleReporter::stdout();
    Ok(poller.run(&mut reporter).await)
}
