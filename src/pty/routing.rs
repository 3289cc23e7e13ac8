//! Decides which of the child's standard streams land on the PTY slave.
//!
//! A stream that is a terminal in the launcher is replaced by the slave; any
//! other stream (file, pipe, /dev/null) is inherited untouched. The decision
//! is made once, before the child starts.

use std::io::{self, IsTerminal};
use std::os::fd::OwnedFd;
use std::process::Stdio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Wired to the PTY slave.
    Slave,
    /// The launcher's own stream, inherited as-is.
    Passthrough,
}

impl Route {
    pub fn for_terminal(is_terminal: bool) -> Self {
        if is_terminal {
            Route::Slave
        } else {
            Route::Passthrough
        }
    }

    pub(crate) fn stdio(self, slave: &OwnedFd) -> io::Result<Stdio> {
        match self {
            Route::Slave => Ok(Stdio::from(slave.try_clone()?)),
            Route::Passthrough => Ok(Stdio::inherit()),
        }
    }
}

/// Real stream that receives the bytes read from the PTY master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSource {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRouting {
    pub stdin: Route,
    pub stdout: Route,
    pub stderr: Route,
}

impl StreamRouting {
    pub fn new(stdin_is_tty: bool, stdout_is_tty: bool, stderr_is_tty: bool) -> Self {
        Self {
            stdin: Route::for_terminal(stdin_is_tty),
            stdout: Route::for_terminal(stdout_is_tty),
            stderr: Route::for_terminal(stderr_is_tty),
        }
    }

    /// Inspect the launcher's own standard streams.
    pub fn detect() -> Self {
        Self::new(
            io::stdin().is_terminal(),
            io::stdout().is_terminal(),
            io::stderr().is_terminal(),
        )
    }

    /// Stdout wins over stderr when both are on the slave.
    pub fn output_source(&self) -> Option<OutputSource> {
        match (self.stdout, self.stderr) {
            (Route::Slave, _) => Some(OutputSource::Stdout),
            (Route::Passthrough, Route::Slave) => Some(OutputSource::Stderr),
            (Route::Passthrough, Route::Passthrough) => None,
        }
    }
}
