//! Readiness poller
//!
//! Probes the endpoint repeatedly until it answers or the overall wait
//! elapses. Attempts never overlap; each unsuccessful one is followed by a
//! full poll interval of sleep.

use brp_wait_core::domain::attempt::AttemptOutcome;
use brp_wait_core::domain::poll::PollOutcome;
use brp_wait_core::dto::rpc::{JsonRpcResponse, LIST_REQUEST_ID};
use std::sync::Arc;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::service::{ProgressReporter, ReadinessProbe};

/// Poller that waits for the remote to come online
pub struct ReadinessPoller {
    config: Config,
    probe: Arc<dyn ReadinessProbe>,
}

impl ReadinessPoller {
    /// Creates a new poller
    pub fn new(config: Config, probe: Arc<dyn ReadinessProbe>) -> Self {
        Self { config, probe }
    }

    /// Runs the poll loop to completion
    ///
    /// The deadline is fixed before the first attempt. Refusals are silent,
    /// other failures are reported, and neither ends the loop early.
    pub async fn run(&self, reporter: &mut dyn ProgressReporter) -> PollOutcome {
        // An unrepresentable deadline means none in practice
        let deadline = Instant::now().checked_add(self.config.max_wait);
        let mut attempts = 0u32;

        info!(
            "Polling {} (max wait: {:?}, interval: {:?}, request timeout: {:?})",
            self.config.endpoint,
            self.config.max_wait,
            self.config.poll_interval,
            self.config.request_timeout
        );
        reporter.waiting(&self.config.endpoint);

        while deadline.is_none_or(|deadline| Instant::now() < deadline) {
            attempts += 1;
            debug!("Attempt {}", attempts);

            match self.probe.probe().await {
                AttemptOutcome::Ready { body } => {
                    info!("Endpoint ready after {} attempt(s)", attempts);
                    log_reply(&body);
                    reporter.ready(&body);
                    return PollOutcome::Ready { body, attempts };
                }
                AttemptOutcome::Refused => {}
                AttemptOutcome::Rejected { status } => {
                    debug!("Attempt {} rejected with status {}", attempts, status);
                }
                AttemptOutcome::Failed { error } => {
                    debug!("Attempt {} failed: {}", attempts, error);
                    reporter.error(&error);
                }
            }

            time::sleep(self.config.poll_interval).await;
            reporter.progress();
        }

        warn!(
            "Endpoint did not come online within {:?} ({} attempts)",
            self.config.max_wait, attempts
        );
        reporter.timed_out(self.config.max_wait);

        PollOutcome::TimedOut { attempts }
    }
}

/// Logs what the remote said, without affecting readiness
fn log_reply(body: &str) {
    let Ok(reply) = serde_json::from_str::<JsonRpcResponse>(body) else {
        debug!("Reply is not a JSON-RPC envelope");
        return;
    };

    if !reply.answers(LIST_REQUEST_ID) {
        warn!("Reply id {} does not match request id {}", reply.id, LIST_REQUEST_ID);
    }

    if let Some(error) = &reply.error {
        warn!(
            "Remote answered with JSON-RPC error: code={}, message={}",
            error.code, error.message
        );
    }

    if let Some(count) = reply.result_len() {
        info!("Remote lists {} method(s)", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::RpcProbe;
    use async_trait::async_trait;
    use axum::Router;
    use axum::routing::post;
    use brp_wait_client::RemoteClient;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    const LIST_REPLY: &str = r#"{"jsonrpc":"2.0","id":1,"result":[]}"#;

    /// Probe that plays back a script, then refuses forever
    struct ScriptedProbe {
        outcomes: Mutex<VecDeque<AttemptOutcome>>,
    }

    impl ScriptedProbe {
        fn new(outcomes: Vec<AttemptOutcome>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
            })
        }
    }

    #[async_trait]
    impl ReadinessProbe for ScriptedProbe {
        async fn probe(&self) -> AttemptOutcome {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(AttemptOutcome::Refused)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Waiting,
        Progress,
        Error(String),
        Ready(String),
        TimedOut,
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Vec<Event>,
    }

    impl RecordingReporter {
        fn count(&self, wanted: fn(&Event) -> bool) -> usize {
            self.events.iter().filter(|e| wanted(e)).count()
        }

        fn dots(&self) -> usize {
            self.count(|e| matches!(e, Event::Progress))
        }
    }

    impl ProgressReporter for RecordingReporter {
        fn waiting(&mut self, _endpoint: &str) {
            self.events.push(Event::Waiting);
        }

        fn progress(&mut self) {
            self.events.push(Event::Progress);
        }

        fn error(&mut self, message: &str) {
            self.events.push(Event::Error(message.to_string()));
        }

        fn ready(&mut self, body: &str) {
            self.events.push(Event::Ready(body.to_string()));
        }

        fn timed_out(&mut self, _max_wait: Duration) {
            self.events.push(Event::TimedOut);
        }
    }

    fn fast_config(endpoint: &str, max_wait: Duration, poll_interval: Duration) -> Config {
        Config {
            endpoint: endpoint.to_string(),
            max_wait,
            poll_interval,
            request_timeout: Duration::from_millis(500),
        }
    }

    fn ready(body: &str) -> AttemptOutcome {
        AttemptOutcome::Ready {
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ready_on_first_attempt() {
        let config = fast_config(
            "http://127.0.0.1:15721",
            Duration::from_secs(5),
            Duration::from_millis(20),
        );
        let poller = ReadinessPoller::new(config, ScriptedProbe::new(vec![ready(LIST_REPLY)]));
        let mut reporter = RecordingReporter::default();

        let outcome = poller.run(&mut reporter).await;

        assert_eq!(
            outcome,
            PollOutcome::Ready {
                body: LIST_REPLY.to_string(),
                attempts: 1
            }
        );
        assert_eq!(outcome.exit_status(), 0);
        assert_eq!(
            reporter.events,
            vec![Event::Waiting, Event::Ready(LIST_REPLY.to_string())]
        );
    }

    #[tokio::test]
    async fn test_ready_after_refusals() {
        let interval = Duration::from_millis(20);
        let config = fast_config("http://127.0.0.1:15721", Duration::from_secs(5), interval);
        let probe = ScriptedProbe::new(vec![
            AttemptOutcome::Refused,
            AttemptOutcome::Refused,
            AttemptOutcome::Refused,
            ready(LIST_REPLY),
        ]);
        let poller = ReadinessPoller::new(config, probe);
        let mut reporter = RecordingReporter::default();

        let started = Instant::now();
        let outcome = poller.run(&mut reporter).await;

        assert_eq!(outcome.exit_status(), 0);
        assert_eq!(outcome.attempts(), 4);
        assert_eq!(reporter.dots(), 3);
        assert_eq!(reporter.count(|e| matches!(e, Event::Ready(_))), 1);
        assert_eq!(reporter.count(|e| matches!(e, Event::Error(_))), 0);
        assert!(started.elapsed() >= interval * 3);
    }

    #[tokio::test]
    async fn test_unbounded_wait_does_not_overflow() {
        let config = fast_config(
            "http://127.0.0.1:15721",
            Duration::MAX,
            Duration::from_millis(10),
        );
        let probe = ScriptedProbe::new(vec![AttemptOutcome::Refused, ready(LIST_REPLY)]);
        let poller = ReadinessPoller::new(config, probe);
        let mut reporter = RecordingReporter::default();

        let outcome = poller.run(&mut reporter).await;

        assert_eq!(outcome.exit_status(), 0);
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(reporter.dots(), 1);
    }

    #[tokio::test]
    async fn test_times_out_when_never_ready() {
        let interval = Duration::from_millis(20);
        let config = fast_config("http://127.0.0.1:15721", Duration::from_millis(100), interval);
        let poller = ReadinessPoller::new(config, ScriptedProbe::new(vec![]));
        let mut reporter = RecordingReporter::default();

        let started = Instant::now();
        let outcome = poller.run(&mut reporter).await;

        assert!(matches!(outcome, PollOutcome::TimedOut { .. }));
        assert_eq!(outcome.exit_status(), 1);
        assert_eq!(reporter.count(|e| matches!(e, Event::TimedOut)), 1);
        assert_eq!(reporter.count(|e| matches!(e, Event::Ready(_))), 0);
        assert_eq!(reporter.count(|e| matches!(e, Event::Error(_))), 0);
        assert_eq!(reporter.events.last(), Some(&Event::TimedOut));

        // Every attempt waits out a full interval, so at most five fit in 100ms
        let attempts = outcome.attempts();
        assert!((1..=5).contains(&attempts), "attempts: {}", attempts);
        assert_eq!(reporter.dots(), attempts as usize);
        assert!(started.elapsed() >= interval * attempts);
    }

    #[tokio::test]
    async fn test_failures_are_reported_and_retried() {
        let config = fast_config(
            "http://127.0.0.1:15721",
            Duration::from_secs(5),
            Duration::from_millis(10),
        );
        let probe = ScriptedProbe::new(vec![
            AttemptOutcome::Failed {
                error: "operation timed out".to_string(),
            },
            AttemptOutcome::Rejected { status: 503 },
            AttemptOutcome::Failed {
                error: "Failed to parse response".to_string(),
            },
            ready(LIST_REPLY),
        ]);
        let poller = ReadinessPoller::new(config, probe);
        let mut reporter = RecordingReporter::default();

        let outcome = poller.run(&mut reporter).await;

        assert_eq!(outcome.exit_status(), 0);
        assert_eq!(
            reporter.events,
            vec![
                Event::Waiting,
                Event::Error("operation timed out".to_string()),
                Event::Progress,
                Event::Progress,
                Event::Error("Failed to parse response".to_string()),
                Event::Progress,
                Event::Ready(LIST_REPLY.to_string()),
            ]
        );
    }

    #[test]
    fn test_log_reply_tolerates_any_body() {
        log_reply(LIST_REPLY);
        log_reply(r#"{"jsonrpc":"2.0","id":7,"error":{"code":-32601,"message":"nope"}}"#);
        log_reply("[1, 2, 3]");
    }

    async fn serve_on(listener: tokio::net::TcpListener) {
        let router = Router::new().route("/", post(|| async { LIST_REPLY }));
        axum::serve(listener, router).await.unwrap();
    }

    fn rpc_probe(endpoint: &str) -> Arc<RpcProbe> {
        Arc::new(RpcProbe::new(
            RemoteClient::new(endpoint, Duration::from_millis(500)).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_end_to_end_server_already_up() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(serve_on(listener));

        let config = fast_config(&endpoint, Duration::from_secs(5), Duration::from_millis(50));
        let poller = ReadinessPoller::new(config, rpc_probe(&endpoint));
        let mut reporter = RecordingReporter::default();

        let outcome = poller.run(&mut reporter).await;

        assert_eq!(outcome.exit_status(), 0);
        assert_eq!(reporter.dots(), 0);
        assert_eq!(
            reporter.count(|e| *e == Event::Ready(LIST_REPLY.to_string())),
            1
        );
    }

    #[tokio::test]
    async fn test_end_to_end_server_comes_up_late() {
        let reserved = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = reserved.local_addr().unwrap();
        drop(reserved);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
            serve_on(listener).await;
        });

        let endpoint = format!("http://{}", addr);
        let config = fast_config(&endpoint, Duration::from_secs(5), Duration::from_millis(50));
        let poller = ReadinessPoller::new(config, rpc_probe(&endpoint));
        let mut reporter = RecordingReporter::default();

        let outcome = poller.run(&mut reporter).await;

        assert_eq!(outcome.exit_status(), 0);
        assert!(reporter.dots() >= 1);
        assert_eq!(reporter.count(|e| matches!(e, Event::Ready(_))), 1);
        // Refusals while the server boots stay silent
        assert_eq!(reporter.count(|e| matches!(e, Event::Error(_))), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_server_never_listens() {
        let reserved = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}", reserved.local_addr().unwrap());
        drop(reserved);

        let config = fast_config(&endpoint, Duration::from_millis(200), Duration::from_millis(50));
        let poller = ReadinessPoller::new(config, rpc_probe(&endpoint));
        let mut reporter = RecordingReporter::default();

        let outcome = poller.run(&mut reporter).await;

        assert_eq!(outcome.exit_status(), 1);
        assert_eq!(reporter.count(|e| matches!(e, Event::TimedOut)), 1);
        assert_eq!(reporter.count(|e| matches!(e, Event::Ready(_))), 0);
        assert_eq!(reporter.count(|e| matches!(e, Event::Error(_))), 0);
    }
}
