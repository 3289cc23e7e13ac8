//! Run a command under a pseudo-terminal attached to the invoking terminal.
//!
//! Input and output are proxied byte-for-byte. Pressing the detach key
//! (`Ctrl+]`) three times in quick succession either sends SIGTERM to the
//! child or runs a user-supplied shell command with `TARGET_PID` set.

pub mod args;
pub mod attach;
pub mod config;
pub mod detach;
pub mod error;
pub mod exit_action;
pub mod logging;
pub mod proxy;
pub mod pty;
pub mod shutdown;
pub mod terminal_guard;
