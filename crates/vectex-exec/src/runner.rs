//! The production process runner.
//!
//! The child's stdout and stderr are piped into one capture channel owned by
//! the call, and draining runs concurrently with the exit wait. Draining only
//! after the wait completes would deadlock: a child that writes more than the
//! OS pipe buffer (a few tens of KiB) before exiting blocks on the full pipe
//! while the parent blocks on the wait.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::{CommandResult, ProcessRunner};

/// Interval between exit polls while the readers drain output.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Idle bound on the post-exit drain. A grandchild of the command can
/// inherit the pipe write ends and hold them open past the child's death;
/// once no output has arrived for this long, the call returns without
/// waiting for EOF.
const DRAIN_IDLE_GRACE: Duration = Duration::from_millis(200);

/// Runs commands through [`std::process::Command`] with piped output.
#[derive(Debug, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command_line: &str, timeout: Duration) -> CommandResult {
        let argv = split_command_line(command_line);
        let Some((program, args)) = argv.split_first() else {
            return CommandResult::spawn_failure("cannot execute an empty command line");
        };

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                return CommandResult::spawn_failure(format!(
                    "the process '{command_line}' could not be created: {err}"
                ));
            }
        };

        // One capture channel per call; both stream readers feed it, so the
        // buffer holds the combined output in arrival order.
        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_drain(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_drain(stderr, tx.clone()));
        }
        drop(tx);

        let status = wait_with_deadline(&mut child, timeout);

        // The child has exited or been killed, so its own pipe write ends
        // are closed. The ends may still be held open by a grandchild it
        // spawned, so the drain is bounded by an idle grace rather than EOF:
        // buffered output arrives far faster than the grace interval, and a
        // silent pipe means nothing more is coming from the child itself.
        let mut output = Vec::new();
        loop {
            match rx.recv_timeout(DRAIN_IDLE_GRACE) {
                Ok(chunk) => output.extend_from_slice(&chunk),
                // Disconnected (EOF on every stream) or idle past the grace.
                Err(_) => break,
            }
        }
        // Readers still blocked on a pipe a grandchild holds open are
        // detached; they exit once that pipe finally closes.
        for reader in readers {
            if reader.is_finished() {
                let _ = reader.join();
            }
        }

        match status {
            Some(status) => CommandResult {
                exit_status: exit_code(status),
                output: String::from_utf8_lossy(&output).into_owned(),
            },
            None => CommandResult::spawn_failure(format!(
                "executed '{command_line}' but could not retrieve an exit code"
            )),
        }
    }
}

/// Reads `stream` to EOF, forwarding chunks as they arrive so the child
/// never blocks on a full pipe.
fn spawn_drain<R: Read + Send + 'static>(
    mut stream: R,
    tx: mpsc::Sender<Vec<u8>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Polls for exit until `timeout` elapses. A child still running at the
/// deadline is killed and reaped, so no process or pipe outlives the call.
/// `None` means the wait itself failed.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) => {}
            Err(_) => return None,
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            return child.wait().ok();
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
}

/// Maps an [`ExitStatus`] to one signed integer. A signal-terminated child
/// (unix) reads as `128 + signal`, the shell convention, so a kill can never
/// look like success.
fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}

/// Splits a command line into argv entries, honoring double quotes so paths
/// with spaces stay one argument. Quote characters themselves are dropped.
pub fn split_command_line(command_line: &str) -> Vec<String> {
    let mut argv = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;
    for ch in command_line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    argv.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        argv.push(current);
    }
    argv
}
