//! Wires the session together and waits for the child.

use std::fs::File;
use std::io;
use std::os::fd::AsFd;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::detach::DetachDetector;
use crate::error::AttachError;
use crate::exit_action::{ExitAction, ExitDispatcher};
use crate::proxy::{forward_output, InputProxy};
use crate::pty::{spawn_child, PtyError, PtyPair, ResizeWatcher, StreamRouting, WindowSize};
use crate::shutdown::TerminationRelay;
use crate::terminal_guard::RawModeGuard;

/// Fully resolved launch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub command: String,
    pub args: Vec<String>,
    pub exit_action: ExitAction,
    pub debounce: Duration,
}

/// Run `options.command` attached to the invoking terminal until it exits.
///
/// Termination signals are taken over before raw mode is entered. Raw mode
/// is restored on every return path, after the signal watchers are stopped
/// and the output copy has drained.
pub fn run(options: &LaunchOptions) -> Result<ExitStatus, AttachError> {
    let routing = StreamRouting::detect();
    debug!(?routing, "stream routing");

    // Armed before raw mode, so a termination signal can never skip the
    // restore below.
    let relay = scopeguard::guard(
        TerminationRelay::arm()
            .map_err(|err| warn!(%err, "signal relay disabled"))
            .ok(),
        |relay| {
            if let Some(relay) = relay {
                relay.stop();
            }
        },
    );

    let raw_mode = RawModeGuard::enter()?;

    let pair = PtyPair::open(WindowSize::current().ok())?;
    let master = pair.master;

    // Every handle the proxies need is duplicated before the child exists,
    // so nothing below can fail while an unsupervised child is running.
    let stdin = File::from(io::stdin().as_fd().try_clone_to_owned()?);
    let pty_writer = master.try_clone_writer()?;
    let pty_reader = match routing.output_source() {
        Some(source) => Some((source, master.try_clone_reader()?)),
        None => None,
    };

    let mut child = spawn_child(&options.command, &options.args, &routing, pair.slave)?;
    let pid = child.id();
    info!(pid, command = %options.command, "session started");

    if let Some(relay) = &*relay {
        if let Err(err) = relay.attach(pid) {
            warn!(%err, "signal relay disabled");
        }
    }

    let master = Arc::new(master);
    let resize = scopeguard::guard(
        ResizeWatcher::start(Arc::clone(&master), WindowSize::current)
            .map_err(|err| warn!(%err, "resize forwarding disabled"))
            .ok(),
        |resize| {
            if let Some(resize) = resize {
                resize.stop();
            }
        },
    );

    let dispatcher = ExitDispatcher::new(options.exit_action.clone(), pid);
    let detector = DetachDetector::new(options.debounce);
    // Not joined: it stays blocked on stdin until the process exits.
    thread::spawn(move || {
        let mut proxy = InputProxy::new(detector, move || {
            if let Err(err) = dispatcher.dispatch() {
                warn!(%err, "exit action failed");
            }
        });
        let forwarded = proxy.run(stdin, pty_writer);
        debug!(forwarded, "input proxy finished");
    });

    let output = pty_reader.map(|(source, reader)| {
        thread::spawn(move || {
            let copied = forward_output(reader, source.writer());
            debug!(copied, "output proxy finished");
        })
    });

    let status = child.wait().map_err(PtyError::Wait)?;
    info!(?status, "child exited");

    drop(resize);
    drop(relay);
    if let Some(output) = output {
        let _ = output.join();
    }
    drop(master);
    raw_mode.restore();

    Ok(status)
}

/// Process exit code mirroring the child's status.
pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}
