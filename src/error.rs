use std::io;

use thiserror::Error;

use crate::pty::PtyError;

/// Fatal errors while setting up or running an attached session.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("standard input is not a terminal")]
    NotATerminal,

    #[error("failed to enter raw mode: {0}")]
    RawMode(#[source] io::Error),

    #[error(transparent)]
    Pty(#[from] PtyError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
