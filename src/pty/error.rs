//! Error types for PTY operations

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PtyError {
    /// The OS refused to hand out a master/slave pair
    #[error("failed to allocate pseudo-terminal: {0}")]
    Allocation(#[source] nix::Error),

    #[error("failed to configure pseudo-terminal: {0}")]
    Configure(#[source] nix::Error),

    #[error("failed to set window size: {0}")]
    WindowSize(#[source] io::Error),

    /// Command not found or not executable
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for child: {0}")]
    Wait(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
