//! Diagnostics go to a file only: the terminal belongs to the child.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Env var naming the log file prefix.
pub const LOG_ENV: &str = "PTYATTACH_LOG";

/// `<prefix>.<unix seconds>.<pid>`, so concurrent launchers never share a file.
pub fn log_file_path(prefix: &str, started: SystemTime, pid: u32) -> PathBuf {
    let secs = started
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    PathBuf::from(format!("{prefix}.{secs}.{pid}"))
}

/// Install the file subscriber when `PTYATTACH_LOG` is set.
///
/// Returns the file being written, or `None` when logging is off. The level
/// comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() -> io::Result<Option<PathBuf>> {
    let Some(prefix) = std::env::var_os(LOG_ENV) else {
        return Ok(None);
    };
    let path = log_file_path(
        &prefix.to_string_lossy(),
        SystemTime::now(),
        std::process::id(),
    );
    let file = File::create(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_thread_names(true),
        )
        .init();

    Ok(Some(path))
}
