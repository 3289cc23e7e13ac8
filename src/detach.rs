//! Triple-tap detach recognizer.
//!
//! The detach key is `Ctrl+]` (0x1D). Three qualifying input chunks, each
//! arriving less than the debounce window after the previous one, fire the
//! detector. The recognizer never filters bytes; it only reports.

use std::time::{Duration, Instant};

/// Group separator, sent by `Ctrl+]`.
pub const DETACH_BYTE: u8 = 0x1d;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Source of timestamps for the detector.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachState {
    Idle,
    ArmedOnce,
    ArmedTwice,
}

pub struct DetachDetector<C = SystemClock> {
    clock: C,
    window: Duration,
    state: DetachState,
    last: Option<Instant>,
}

impl DetachDetector<SystemClock> {
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, SystemClock)
    }
}

impl<C: Clock> DetachDetector<C> {
    pub fn with_clock(window: Duration, clock: C) -> Self {
        Self {
            clock,
            window,
            state: DetachState::Idle,
            last: None,
        }
    }

    pub fn state(&self) -> DetachState {
        self.state
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record one qualifying chunk at the current clock time.
    ///
    /// Returns `true` when this tap completes the sequence.
    pub fn observe(&mut self) -> bool {
        let now = self.clock.now();
        self.observe_at(now)
    }

    /// Record one qualifying chunk at `now`.
    pub fn observe_at(&mut self, now: Instant) -> bool {
        let within = self
            .last
            .map(|last| now.saturating_duration_since(last) < self.window)
            .unwrap_or(false);

        let (next, fired) = match (self.state, within) {
            (DetachState::Idle, _) => (DetachState::ArmedOnce, false),
            (DetachState::ArmedOnce, true) => (DetachState::ArmedTwice, false),
            (DetachState::ArmedOnce, false) => (DetachState::ArmedOnce, false),
            (DetachState::ArmedTwice, true) => (DetachState::Idle, true),
            (DetachState::ArmedTwice, false) => (DetachState::ArmedOnce, false),
        };

        self.state = next;
        self.last = Some(now);
        fired
    }
}

/// Whether `chunk` contains at least one detach byte.
pub fn contains_detach(chunk: &[u8]) -> bool {
    chunk.contains(&DETACH_BYTE)
}
