// Trainer subprocess runner
//
// Spawns the trainer with stdout and stderr sharing one pipe, relays its
// output line by line as it arrives, and stops it on Ctrl+C.

use async_trait::async_trait;
use std::future::Future;
use std::io::{self, BufRead, BufReader, Write};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::errors::LaunchError;

use super::command::TrainerCommand;

/// How a trainer run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exited on its own with this code
    Exited(i32),
    /// Killed by a signal, no exit code
    Signaled,
    /// Stopped because the user pressed Ctrl+C
    Interrupted,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        matches!(self, RunOutcome::Exited(0))
    }
}

/// Runs a trainer command to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &TrainerCommand) -> Result<RunOutcome, LaunchError>;
}

/// Runs the trainer as a real child process, relaying output to stdout
pub struct SubprocessRunner {
    /// Wait this long after SIGTERM before killing
    grace: Duration,
}

impl SubprocessRunner {
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    /// Run `command`, writing merged output to `sink` until it exits or
    /// `cancel` resolves
    pub async fn run_streaming<W, C>(
        &self,
        command: &TrainerCommand,
        sink: &mut W,
        cancel: C,
    ) -> Result<RunOutcome, LaunchError>
    where
        W: Write + Send,
        C: Future<Output = ()> + Send,
    {
        let (reader, mut child) = spawn_merged(command)?;
        tracing::debug!(pid = ?child.id(), program = command.program(), "Trainer spawned");

        let mut lines = relay_lines(reader)?;
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                line = lines.recv() => match line {
                    Some(Ok(bytes)) => {
                        sink.write_all(&bytes)?;
                        sink.flush()?;
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Failed to read trainer output");
                        self.terminate(&mut child).await;
                        return Err(LaunchError::Io(e));
                    }
                    // All write ends closed
                    None => break,
                },
                _ = &mut cancel => {
                    self.terminate(&mut child).await;
                    return Ok(RunOutcome::Interrupted);
                }
            }
        }

        let status = tokio::select! {
            status = child.wait() => status?,
            _ = &mut cancel => {
                self.terminate(&mut child).await;
                return Ok(RunOutcome::Interrupted);
            }
        };

        tracing::debug!(?status, "Trainer exited");

        Ok(match status.code() {
            Some(code) => RunOutcome::Exited(code),
            None => RunOutcome::Signaled,
        })
    }

    /// SIGTERM, then kill if the trainer outlives the grace period
    async fn terminate(&self, child: &mut Child) {
        if let Err(e) = request_stop(child) {
            tracing::warn!(error = %e, "Failed to signal trainer");
        }

        match tokio::time::timeout(self.grace, child.wait()).await {
            Ok(Ok(status)) => tracing::info!(?status, "Trainer stopped"),
            Ok(Err(e)) => tracing::warn!(error = %e, "Failed to wait for trainer"),
            Err(_) => {
                tracing::warn!(
                    grace_secs = self.grace.as_secs(),
                    "Trainer did not stop in time, killing"
                );
                if let Err(e) = child.kill().await {
                    tracing::warn!(error = %e, "Failed to kill trainer");
                }
            }
        }
    }
}

#[async_trait]
impl ProcessRunner for SubprocessRunner {
    async fn run(&self, command: &TrainerCommand) -> Result<RunOutcome, LaunchError> {
        let mut stdout = io::stdout();
        self.run_streaming(command, &mut stdout, ctrl_c()).await
    }
}

/// Spawn with stdout and stderr on the same pipe so lines keep arrival order
fn spawn_merged(command: &TrainerCommand) -> Result<(io::PipeReader, Child), LaunchError> {
    let (reader, writer) = io::pipe()?;
    let writer_err = writer.try_clone()?;

    let mut cmd = Command::new(command.program());
    cmd.args(command.args())
        .env("PYTHONUNBUFFERED", "1")
        .stdin(Stdio::inherit())
        .stdout(writer)
        .stderr(writer_err)
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        binary: command.program().to_string(),
        source,
    })?;

    // Parent copies of the write end must close or EOF never arrives
    drop(cmd);

    Ok((reader, child))
}

/// Read lines on a dedicated thread, newline included
fn relay_lines(reader: io::PipeReader) -> io::Result<mpsc::UnboundedReceiver<io::Result<Vec<u8>>>> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("trainer-output".to_string())
        .spawn(move || {
            let mut reader = BufReader::new(reader);
            loop {
                let mut line = Vec::new();
                match reader.read_until(b'\n', &mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

/// Resolves on Ctrl+C; never resolves if the handler can't be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
fn request_stop(child: &mut Child) -> io::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match child.id() {
        Some(pid) => kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(io::Error::from),
        // Already reaped
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn request_stop(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn shell(script: &str) -> TrainerCommand {
        TrainerCommand::from_parts("sh", ["-c", script])
    }

    fn runner() -> SubprocessRunner {
        SubprocessRunner::new(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_relays_stdout_and_stderr_in_order() {
        let mut out = Vec::new();
        let outcome = runner()
            .run_streaming(
                &shell("echo one; echo two >&2; echo three; printf tail"),
                &mut out,
                std::future::pending(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Exited(0));
        assert!(outcome.success());
        assert_eq!(String::from_utf8(out).unwrap(), "one\ntwo\nthree\ntail");
    }

    #[tokio::test]
    async fn test_nonzero_exit_code_reported() {
        let mut out = Vec::new();
        let outcome = runner()
            .run_streaming(&shell("echo failing; exit 3"), &mut out, std::future::pending())
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Exited(3));
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn test_signal_death_has_no_code() {
        let mut out = Vec::new();
        let outcome = runner()
            .run_streaming(&shell("kill -9 $$"), &mut out, std::future::pending())
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Signaled);
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let cmd = TrainerCommand::from_parts("boxpack-no-such-trainer", Vec::<String>::new());
        let mut out = Vec::new();
        let err = runner()
            .run_streaming(&cmd, &mut out, std::future::pending())
            .await
            .unwrap_err();

        match err {
            LaunchError::Spawn { binary, source } => {
                assert_eq!(binary, "boxpack-no-such-trainer");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_terminates_child() {
        let mut out = Vec::new();
        let started = Instant::now();
        let outcome = runner()
            .run_streaming(
                &shell("echo ready; exec sleep 30"),
                &mut out,
                tokio::time::sleep(Duration::from_millis(300)),
            )
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_trap_ignoring_term_is_killed_after_grace() {
        let mut out = Vec::new();
        let started = Instant::now();
        let outcome = runner()
            .run_streaming(
                &shell("trap '' TERM; echo ready; while true; do sleep 1; done"),
                &mut out,
                tokio::time::sleep(Duration::from_millis(300)),
            )
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
