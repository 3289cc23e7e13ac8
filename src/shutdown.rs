//! Relays termination signals aimed at the launcher to the child.
//!
//! The relay is armed before the terminal leaves cooked mode, so the launcher
//! never dies on SIGTERM/SIGHUP/SIGINT/SIGQUIT itself. A signal caught before
//! the child exists is held back and delivered as soon as the child's pid is
//! attached; the child then exits and the normal unwind restores the
//! terminal.

use std::io;
use std::sync::{Arc, Mutex};
use std::thread;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use tracing::{debug, info, warn};

pub const RELAYED_SIGNALS: [libc::c_int; 4] = [SIGTERM, SIGHUP, SIGINT, SIGQUIT];

#[derive(Default)]
struct Target {
    pid: Option<Pid>,
    pending: Vec<Signal>,
}

impl Target {
    fn deliver(&mut self, signal: Signal) {
        match self.pid {
            Some(pid) => send(pid, signal),
            None => {
                debug!(?signal, "holding signal until the child starts");
                self.pending.push(signal);
            }
        }
    }
}

fn send(pid: Pid, signal: Signal) {
    info!(?signal, target_pid = pid.as_raw(), "relaying signal to child");
    if let Err(err) = kill(pid, signal) {
        warn!(%err, ?signal, "failed to relay signal");
    }
}

pub struct TerminationRelay {
    target: Arc<Mutex<Target>>,
    handle: Handle,
    thread: thread::JoinHandle<()>,
}

impl TerminationRelay {
    /// Take over the relayed signals. Nothing is forwarded until
    /// [`TerminationRelay::attach`] names the child.
    pub fn arm() -> io::Result<Self> {
        let mut signals = Signals::new(RELAYED_SIGNALS)?;
        let handle = signals.handle();
        let target = Arc::new(Mutex::new(Target::default()));

        let shared = Arc::clone(&target);
        let thread = thread::Builder::new()
            .name("signal-relay".into())
            .spawn(move || {
                for signal in signals.forever() {
                    let Ok(signal) = Signal::try_from(signal) else {
                        continue;
                    };
                    if let Ok(mut target) = shared.lock() {
                        target.deliver(signal);
                    }
                }
            })?;

        Ok(Self {
            target,
            handle,
            thread,
        })
    }

    /// Point the relay at `pid` and flush anything caught so far.
    pub fn attach(&self, pid: u32) -> io::Result<()> {
        let raw = i32::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
        let pid = Pid::from_raw(raw);

        let Ok(mut target) = self.target.lock() else {
            return Err(io::Error::other("signal relay state poisoned"));
        };
        target.pid = Some(pid);
        for signal in std::mem::take(&mut target.pending) {
            send(pid, signal);
        }
        Ok(())
    }

    pub fn stop(self) {
        self.handle.close();
        let _ = self.thread.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::Command;
    use std::time::Duration;

    // Every armed relay sees every relayed signal in the process.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> std::sync::MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn stop_without_signals_returns_promptly() {
        let _serial = serial();
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let relay = TerminationRelay::arm().unwrap();
        relay.attach(child.id()).unwrap();
        relay.stop();
        child.kill().unwrap();
        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(libc::SIGKILL));
    }

    #[test]
    fn signal_caught_before_attach_reaches_the_child() {
        let _serial = serial();
        let relay = TerminationRelay::arm().unwrap();
        signal_hook::low_level::raise(SIGTERM).unwrap();
        // Let the relay thread pick it up while no child is known.
        thread::sleep(Duration::from_millis(100));

        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        relay.attach(child.id()).unwrap();
        let status = child.wait().unwrap();
        relay.stop();

        assert_eq!(status.signal(), Some(libc::SIGTERM));
    }

    #[test]
    fn signals_without_target_are_held_in_order() {
        let mut target = Target::default();
        target.deliver(Signal::SIGHUP);
        target.deliver(Signal::SIGTERM);
        assert_eq!(target.pending, vec![Signal::SIGHUP, Signal::SIGTERM]);
        assert!(target.pid.is_none());
    }

    #[test]
    fn attach_rejects_pid_out_of_range() {
        let _serial = serial();
        let relay = TerminationRelay::arm().unwrap();
        let err = relay.attach(u32::MAX).unwrap_err();
        relay.stop();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
