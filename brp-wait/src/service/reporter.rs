//! Progress reporter
//!
//! User-facing output of the poll loop: banners, progress dots and the
//! response body. Diagnostics go through `tracing` instead.

use colored::*;
use std::io::{self, Write};
use std::time::Duration;
use tracing::warn;

/// Receives the visible events of a poll run
pub trait ProgressReporter {
    /// Polling is about to start
    fn waiting(&mut self, endpoint: &str);

    /// An unsuccessful attempt has been waited out
    fn progress(&mut self);

    /// An attempt failed for a reason worth showing
    fn error(&mut self, message: &str);

    /// The endpoint answered; `body` is the raw response
    fn ready(&mut self, body: &str);

    /// The deadline passed
    fn timed_out(&mut self, max_wait: Duration);
}

/// Reporter that writes colored text to a terminal
///
/// Progress dots share one line; any other output first ends that line.
pub struct ConsoleReporter<W: Write> {
    out: W,
    mid_line: bool,
}

impl ConsoleReporter<io::Stdout> {
    /// Creates a reporter on standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter on any writer
    pub fn new(out: W) -> Self {
        Self {
            out,
            mid_line: false,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl std::fmt::Display) {
        let result = if self.mid_line {
            writeln!(self.out).and_then(|_| writeln!(self.out, "{}", text))
        } else {
            writeln!(self.out, "{}", text)
        };
        self.mid_line = false;

        if let Err(e) = result.and_then(|_| self.out.flush()) {
            warn!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write> ProgressReporter for ConsoleReporter<W> {
    fn waiting(&mut self, endpoint: &str) {
        self.line(format!(
            "Waiting for Bevy Remote to come online at {}...",
            endpoint.bold()
        ));
    }

    fn progress(&mut self) {
        self.mid_line = true;
        if let Err(e) = write!(self.out, ".").and_then(|_| self.out.flush()) {
            warn!("Failed to write to console: {}", e);
        }
    }

    fn error(&mut self, message: &str) {
        self.line(format!("{} {}", "Error:".yellow(), message));
    }

    fn ready(&mut self, body: &str) {
        self.line("SUCCESS: Connected to Bevy Remote!".green().bold());
        self.line(format!("Response: {}", body.trim_end()));
    }

    fn timed_out(&mut self, max_wait: Duration) {
        self.line(
            format!(
                "Timeout: Bevy Remote did not start in time ({}s).",
                max_wait.as_secs()
            )
            .red()
            .bold(),
        );
    }
}
