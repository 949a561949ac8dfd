//! # vectex-exec
//!
//! Runs an external command line, captures its combined stdout/stderr and
//! enforces a wall-clock timeout without deadlocking or leaking the child.
//!
//! ## Architecture
//!
//! The per-platform spawning details live behind the [`ProcessRunner`]
//! capability, with [`SystemProcessRunner`] as the production adapter:
//!
//! ```text
//! ┌──────────────┐
//! │   Executor   │  ← facade: quiet flag, default timeout, error sink
//! └──────┬───────┘
//!        │ Arc<dyn ProcessRunner>
//!        ▼
//! ┌──────────────────────┐
//! │ ProcessRunner (trait)│
//! └──────┬───────────────┘
//!        │
//!  SystemProcessRunner   (MockRunner in tests)
//! ```
//!
//! ## Failure model
//!
//! `run` never returns an error. A process that could not be started yields
//! a [`CommandResult`] carrying [`SPAWN_FAILURE_EXIT_STATUS`] and a
//! human-readable reason - batch callers inspect it as data, while
//! [`Executor::execute`] additionally pushes it through the [`ErrorSink`]
//! unless the `quiet` flag is set. A timeout, by contrast, is an expected
//! operational outcome: it only shapes the returned exit status and is never
//! reported as an error.
//!
//! ## Concurrency
//!
//! Every call owns its own child handle, capture channel and output buffer,
//! so concurrent calls need no external locking. Within one call, output
//! draining runs concurrently with the exit wait - see [`runner`] for why
//! draining after the wait would deadlock on the OS pipe buffer.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod runner;

#[cfg(test)]
mod tests;

pub use runner::SystemProcessRunner;

/// Exit status reported when the child process could not be started or
/// communicated with. Reserved: distinct from every code a child itself
/// returns, including any failure code of the external tool.
pub const SPAWN_FAILURE_EXIT_STATUS: i32 = -69;

/// Default wall-clock bound on waiting for the child to exit.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Outcome of one external command invocation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// The command's exit status, or [`SPAWN_FAILURE_EXIT_STATUS`] when no
    /// real exit code is available.
    pub exit_status: i32,
    /// Everything the child wrote to stdout and stderr, interleaved in
    /// arrival order.
    pub output: String,
}

impl CommandResult {
    /// Result for a process that could not be started; `reason` is a
    /// human-readable diagnostic.
    pub fn spawn_failure(reason: impl Into<String>) -> Self {
        Self {
            exit_status: SPAWN_FAILURE_EXIT_STATUS,
            output: reason.into(),
        }
    }

    /// True when the process could not be started at all.
    pub fn is_spawn_failure(&self) -> bool {
        self.exit_status == SPAWN_FAILURE_EXIT_STATUS
    }

    /// True when the command ran and exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// Capability for running one external command to completion.
///
/// Production code uses [`SystemProcessRunner`]; tests substitute a mock so
/// the [`Executor`] can be exercised without spawning real processes.
pub trait ProcessRunner: Send + Sync {
    /// Runs `command_line` with combined output capture, bounded by
    /// `timeout`. Never returns an error: failures are encoded in the
    /// result's sentinel status.
    fn run(&self, command_line: &str, timeout: Duration) -> CommandResult;
}

/// Collaborator that surfaces failures to the surrounding application.
///
/// The core only decides *whether* to report (governed by the `quiet` flag);
/// how the message reaches the user - dialog, log, silence - is the
/// implementor's business.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Default sink: forwards to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, message: &str) {
        log::error!("{message}");
    }
}

/// High-level facade for external command execution.
#[derive(Clone)]
pub struct Executor {
    runner: Arc<dyn ProcessRunner>,
    sink: Arc<dyn ErrorSink>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// An executor backed by [`SystemProcessRunner`] and [`LogSink`].
    pub fn new() -> Self {
        Self {
            runner: Arc::new(SystemProcessRunner),
            sink: Arc::new(LogSink),
        }
    }

    /// Replaces the process runner (platform adapters, tests).
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replaces the error-reporting collaborator.
    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Runs `command_line` with the default timeout of
    /// [`DEFAULT_TIMEOUT_MS`] milliseconds.
    pub fn execute(&self, command_line: &str, quiet: bool) -> CommandResult {
        self.execute_with_timeout(
            command_line,
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
            quiet,
        )
    }

    /// Runs `command_line`, bounded by `timeout`.
    ///
    /// A spawn failure is always returned as data; unless `quiet` it is also
    /// reported through the sink. A timeout is only ever reflected in the
    /// returned exit status.
    pub fn execute_with_timeout(
        &self,
        command_line: &str,
        timeout: Duration,
        quiet: bool,
    ) -> CommandResult {
        let result = self.runner.run(command_line, timeout);
        if result.is_spawn_failure() && !quiet {
            self.sink.report(&result.output);
        }
        result
    }
}
