use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::runner::split_command_line;
use crate::{
    CommandResult, ErrorSink, Executor, ProcessRunner, SystemProcessRunner,
    SPAWN_FAILURE_EXIT_STATUS,
};

/// Sink that records every reported message.
#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl ErrorSink for RecordingSink {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Runner returning a canned result, capturing what it was asked to run.
struct MockRunner {
    result: CommandResult,
    seen: Mutex<Vec<String>>,
}

impl MockRunner {
    fn returning(result: CommandResult) -> Self {
        Self {
            result,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, command_line: &str, _timeout: Duration) -> CommandResult {
        self.seen.lock().unwrap().push(command_line.to_string());
        self.result.clone()
    }
}

#[test]
fn test_split_command_line() {
    assert_eq!(split_command_line("pdflatex -v"), ["pdflatex", "-v"]);
    assert_eq!(
        split_command_line("\"C:\\Program Files\\gs\\gs.exe\" -dBATCH input.pdf"),
        ["C:\\Program Files\\gs\\gs.exe", "-dBATCH", "input.pdf"]
    );
    assert_eq!(
        split_command_line("  spaced   out  "),
        ["spaced", "out"]
    );
    assert_eq!(split_command_line("echo \"\""), ["echo", ""]);
    assert!(split_command_line("").is_empty());
    assert!(split_command_line("   ").is_empty());
}

#[test]
fn test_empty_command_line_is_a_spawn_failure() {
    let result = SystemProcessRunner.run("", Duration::from_secs(1));
    assert!(result.is_spawn_failure());
    assert!(!result.output.is_empty());
}

#[test]
fn test_nonexistent_program_returns_sentinel() {
    let result =
        SystemProcessRunner.run("vectex-no-such-program-xyzzy --flag", Duration::from_secs(1));
    assert_eq!(result.exit_status, SPAWN_FAILURE_EXIT_STATUS);
    assert!(result.output.contains("vectex-no-such-program-xyzzy"));
}

#[cfg(unix)]
#[test]
fn test_captures_combined_output_and_exit_code() {
    let result = SystemProcessRunner.run("echo hello", Duration::from_secs(5));
    assert!(result.success());
    assert_eq!(result.output.trim(), "hello");

    let result = SystemProcessRunner.run("sh -c \"exit 3\"", Duration::from_secs(5));
    assert_eq!(result.exit_status, 3);
}

#[cfg(unix)]
#[test]
fn test_stderr_is_captured_too() {
    let result = SystemProcessRunner.run(
        "sh -c \"echo out; echo err 1>&2\"",
        Duration::from_secs(5),
    );
    assert!(result.success());
    assert!(result.output.contains("out"));
    assert!(result.output.contains("err"));
}

#[cfg(unix)]
#[test]
fn test_timeout_returns_promptly_and_reaps_the_child() {
    let started = Instant::now();
    let result = SystemProcessRunner.run("sleep 5", Duration::from_millis(100));
    let elapsed = started.elapsed();

    // Bounded by the timeout, not by the child's five seconds. Generous
    // upper bound for loaded CI machines.
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    // The killed child must not read as success or as a spawn failure.
    assert_ne!(result.exit_status, 0);
    assert!(!result.is_spawn_failure());
}

#[cfg(unix)]
#[test]
fn test_timeout_is_not_extended_by_orphaned_grandchildren() {
    // The backgrounded sleep inherits the pipe write ends and outlives the
    // killed shell; the drain must not wait for it to close them.
    let started = Instant::now();
    let result = SystemProcessRunner.run("sh -c \"sleep 5 & wait\"", Duration::from_millis(100));
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    assert!(!result.is_spawn_failure());
}

#[cfg(unix)]
#[test]
fn test_large_output_is_drained_while_waiting() {
    // 10 MB is far beyond any OS pipe buffer: this only terminates if output
    // draining runs concurrently with the exit wait.
    let result = SystemProcessRunner.run(
        "head -c 10000000 /dev/zero",
        Duration::from_secs(10),
    );
    assert!(result.success());
    assert_eq!(result.output.len(), 10_000_000);
}

#[test]
fn test_spawn_failure_is_reported_unless_quiet() {
    let sink = Arc::new(RecordingSink::default());
    let runner = Arc::new(MockRunner::returning(CommandResult::spawn_failure(
        "could not start",
    )));
    let executor = Executor::new()
        .with_runner(runner)
        .with_sink(sink.clone());

    let result = executor.execute("some-tool --flag", true);
    assert!(result.is_spawn_failure());
    assert!(sink.messages.lock().unwrap().is_empty());

    let result = executor.execute("some-tool --flag", false);
    assert!(result.is_spawn_failure());
    assert_eq!(
        sink.messages.lock().unwrap().as_slice(),
        ["could not start"]
    );
}

#[test]
fn test_successful_run_is_never_reported() {
    let sink = Arc::new(RecordingSink::default());
    let runner = Arc::new(MockRunner::returning(CommandResult {
        exit_status: 0,
        output: "fine".into(),
    }));
    let executor = Executor::new()
        .with_runner(runner.clone())
        .with_sink(sink.clone());

    let result = executor.execute("tool", false);
    assert!(result.success());
    assert!(sink.messages.lock().unwrap().is_empty());
    assert_eq!(runner.seen.lock().unwrap().as_slice(), ["tool"]);
}

#[test]
fn test_command_result_serializes() {
    let result = CommandResult {
        exit_status: 1,
        output: "warning: something".into(),
    };
    let json = serde_json::to_string(&result).unwrap();
    let back: CommandResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
