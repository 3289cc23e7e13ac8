//! Raw mode on the invoking terminal.

use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::warn;

use crate::error::AttachError;

/// Shared "terminal is raw" flag. Whoever clears it first leaves raw mode.
#[derive(Clone)]
struct RawFlag(Arc<AtomicBool>);

impl RawFlag {
    fn raised() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Runs `leave` only if the flag was still raised.
    fn lower_with(&self, leave: impl FnOnce()) -> bool {
        let was_raised = self.0.swap(false, Ordering::SeqCst);
        if was_raised {
            leave();
        }
        was_raised
    }
}

fn leave_raw_mode() {
    if let Err(err) = disable_raw_mode() {
        warn!(%err, "failed to restore terminal mode");
    }
}

/// Holds the invoking terminal in raw mode until dropped.
///
/// Cooked mode comes back exactly once: on [`RawModeGuard::restore`], on
/// drop, or from the panic hook, whichever comes first.
pub struct RawModeGuard {
    raw: RawFlag,
}

impl RawModeGuard {
    /// Switch standard input to raw mode.
    pub fn enter() -> Result<Self, AttachError> {
        if !io::stdin().is_terminal() {
            return Err(AttachError::NotATerminal);
        }
        enable_raw_mode().map_err(AttachError::RawMode)?;

        let raw = RawFlag::raised();
        let on_panic = raw.clone();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            on_panic.lower_with(leave_raw_mode);
            previous(info);
        }));

        Ok(Self { raw })
    }

    pub fn restore(&self) {
        self.raw.lower_with(leave_raw_mode);
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
