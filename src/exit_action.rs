//! What happens when the detach sequence fires.

use std::io;
use std::process::{Command, Stdio};
use std::thread;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable carrying the child's process id to the exit command.
pub const TARGET_PID_ENV: &str = "TARGET_PID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitAction {
    /// `<shell> -c <command>` with `TARGET_PID` set.
    RunCommand { shell: String, command: String },
    /// SIGTERM straight to the child.
    Terminate,
}

#[derive(Debug, Error)]
pub enum ExitActionError {
    #[error("process id {0} is out of range")]
    InvalidPid(u32),

    #[error("failed to signal process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::Error,
    },

    #[error("failed to start exit command thread: {0}")]
    Spawn(#[source] io::Error),
}

pub struct ExitDispatcher {
    action: ExitAction,
    target: u32,
}

impl ExitDispatcher {
    pub fn new(action: ExitAction, target: u32) -> Self {
        Self { action, target }
    }

    pub fn action(&self) -> &ExitAction {
        &self.action
    }

    /// Run the configured action once. Never blocks on the exit command.
    pub fn dispatch(&self) -> Result<(), ExitActionError> {
        match &self.action {
            ExitAction::RunCommand { shell, command } => {
                run_detached(shell, command, self.target)
            }
            ExitAction::Terminate => terminate(self.target),
        }
    }
}

/// Best-effort: the command's outcome is only logged.
fn run_detached(shell: &str, command: &str, target: u32) -> Result<(), ExitActionError> {
    let mut cmd = Command::new(shell);
    cmd.arg("-c")
        .arg(command)
        .env(TARGET_PID_ENV, target.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    info!(target_pid = target, command, "running exit command");
    thread::Builder::new()
        .name("exit-command".to_string())
        .spawn(move || match cmd.status() {
            Ok(status) => debug!(?status, "exit command finished"),
            Err(err) => warn!(%err, "exit command failed to start"),
        })
        .map_err(ExitActionError::Spawn)?;
    Ok(())
}

fn terminate(target: u32) -> Result<(), ExitActionError> {
    let raw = i32::try_from(target).map_err(|_| ExitActionError::InvalidPid(target))?;
    info!(target_pid = target, "sending SIGTERM");
    kill(Pid::from_raw(raw), Signal::SIGTERM)
        .map_err(|source| ExitActionError::Signal { pid: target, source })
}
