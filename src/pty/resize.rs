use std::io;
use std::sync::Arc;
use std::thread;

use signal_hook::consts::signal::SIGWINCH;
use signal_hook::iterator::{Handle, Signals};
use tracing::warn;

use crate::pty::session::PtyMaster;
use crate::pty::size::WindowSize;

/// Copies the invoking terminal's size onto the PTY on every SIGWINCH.
pub struct ResizeWatcher {
    handle: Handle,
    thread: thread::JoinHandle<()>,
}

impl ResizeWatcher {
    /// Start watching. The current size is applied once immediately.
    pub fn start<F>(master: Arc<PtyMaster>, size_source: F) -> io::Result<Self>
    where
        F: Fn() -> io::Result<WindowSize> + Send + 'static,
    {
        let mut signals = Signals::new([SIGWINCH])?;
        let handle = signals.handle();
        let thread = thread::spawn(move || {
            // initial size
            forward_size(&master, &size_source);
            for _ in signals.forever() {
                forward_size(&master, &size_source);
            }
        });
        Ok(Self { handle, thread })
    }

    pub fn stop(self) {
        self.handle.close();
        let _ = self.thread.join();
    }
}

fn forward_size<F>(master: &PtyMaster, size_source: &F)
where
    F: Fn() -> io::Result<WindowSize>,
{
    let size = match size_source() {
        Ok(size) => size,
        Err(err) => {
            warn!(%err, "failed to read terminal size");
            return;
        }
    };
    if let Err(err) = master.resize(size) {
        warn!(%err, cols = size.cols, rows = size.rows, "failed to resize pty");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pty::session::PtyPair;
    use std::sync::atomic::{AtomicU16, Ordering};
    use std::time::{Duration, Instant};

    fn wait_for_size(master: &PtyMaster, expected: WindowSize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if master.size().ok() == Some(expected) {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn applies_initial_size_then_follows_sigwinch() {
        let pair = PtyPair::open(Some(WindowSize::new(10, 5))).unwrap();
        let master = Arc::new(pair.master);
        let cols = Arc::new(AtomicU16::new(120));
        let source_cols = Arc::clone(&cols);

        let watcher = ResizeWatcher::start(Arc::clone(&master), move || {
            Ok(WindowSize::new(source_cols.load(Ordering::SeqCst), 40))
        })
        .unwrap();
        assert!(wait_for_size(&master, WindowSize::new(120, 40)));

        cols.store(90, Ordering::SeqCst);
        signal_hook::low_level::raise(SIGWINCH).unwrap();
        assert!(wait_for_size(&master, WindowSize::new(90, 40)));

        watcher.stop();
    }

    #[test]
    fn size_read_failure_is_not_fatal() {
        let pair = PtyPair::open(Some(WindowSize::new(33, 11))).unwrap();
        let master = Arc::new(pair.master);
        let watcher = ResizeWatcher::start(Arc::clone(&master), || {
            Err(io::Error::new(io::ErrorKind::Other, "no terminal"))
        })
        .unwrap();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(master.size().unwrap(), WindowSize::new(33, 11));
        watcher.stop();
    }
}
