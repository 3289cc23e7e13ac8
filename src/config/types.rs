use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detach::DEFAULT_DEBOUNCE;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shell command run when the detach sequence fires.
    /// Unset or empty means SIGTERM is sent to the child instead.
    pub exit_command: Option<String>,
    /// Interpreter for `exit_command`, invoked as `<shell> -c <command>`.
    pub shell: String,
    pub detach: DetachConfig,
}

/// Detach sequence timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetachConfig {
    /// Maximum gap between consecutive taps, in milliseconds.
    pub debounce_ms: u64,
}

fn default_shell() -> String {
    "bash".to_string()
}

const DEFAULT_DEBOUNCE_MS: u64 = DEFAULT_DEBOUNCE.as_millis() as u64;

impl Default for Config {
    fn default() -> Self {
        Self {
            exit_command: None,
            shell: default_shell(),
            detach: DetachConfig::default(),
        }
    }
}

impl Default for DetachConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl DetachConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
