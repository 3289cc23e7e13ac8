//! PTY allocation and child start-up.

use std::fs::File;
use std::io;
use std::os::fd::{AsFd, AsRawFd, OwnedFd};
use std::os::unix::process::CommandExt;
use std::process::{Child, Command};

use nix::fcntl::{fcntl, FcntlArg, FdFlag};
use nix::pty::{openpty, OpenptyResult};
use tracing::debug;

use crate::pty::error::PtyError;
use crate::pty::routing::StreamRouting;
use crate::pty::size::WindowSize;

/// Master side of the pseudo-terminal.
///
/// The descriptor is closed when the last owner drops it. Readers and
/// writers handed out by this type are independent duplicates.
pub struct PtyMaster {
    fd: OwnedFd,
}

impl PtyMaster {
    pub fn try_clone_reader(&self) -> io::Result<File> {
        Ok(File::from(self.fd.try_clone()?))
    }

    pub fn try_clone_writer(&self) -> io::Result<File> {
        Ok(File::from(self.fd.try_clone()?))
    }

    pub fn resize(&self, size: WindowSize) -> Result<(), PtyError> {
        let ws = size.to_winsize();
        let result = unsafe { libc::ioctl(self.fd.as_raw_fd(), libc::TIOCSWINSZ as _, &ws) };
        if result == -1 {
            return Err(PtyError::WindowSize(io::Error::last_os_error()));
        }
        Ok(())
    }

    pub fn size(&self) -> Result<WindowSize, PtyError> {
        WindowSize::of(self.fd.as_fd()).map_err(PtyError::WindowSize)
    }
}

pub struct PtyPair {
    pub master: PtyMaster,
    pub slave: OwnedFd,
}

impl PtyPair {
    /// Allocate a master/slave pair, optionally sized up front.
    ///
    /// Both ends are close-on-exec so that neither the child nor any exit
    /// command inherits a stray copy.
    pub fn open(size: Option<WindowSize>) -> Result<Self, PtyError> {
        let winsize = size.map(WindowSize::to_winsize);
        let OpenptyResult { master, slave } =
            openpty(winsize.as_ref(), None).map_err(PtyError::Allocation)?;

        for fd in [&master, &slave] {
            fcntl(fd.as_raw_fd(), FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))
                .map_err(PtyError::Configure)?;
        }

        Ok(Self {
            master: PtyMaster { fd: master },
            slave,
        })
    }
}

/// Start `program` as a session leader whose controlling terminal is `slave`.
///
/// Standard streams follow `routing`. The parent's slave handle is consumed
/// and closed before this returns.
pub fn spawn_child(
    program: &str,
    args: &[String],
    routing: &StreamRouting,
    slave: OwnedFd,
) -> Result<Child, PtyError> {
    let slave_fd = slave.as_raw_fd();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(routing.stdin.stdio(&slave)?)
        .stdout(routing.stdout.stdio(&slave)?)
        .stderr(routing.stderr.stdio(&slave)?);

    unsafe {
        cmd.pre_exec(move || {
            if libc::setsid() == -1 {
                return Err(io::Error::last_os_error());
            }
            if libc::ioctl(slave_fd, libc::TIOCSCTTY as _, 0) == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let spawned = cmd.spawn();
    // The command still owns the routed duplicates of the slave.
    drop(cmd);
    drop(slave);

    let child = spawned.map_err(|source| PtyError::Spawn {
        command: program.to_string(),
        source,
    })?;
    debug!(pid = child.id(), program, "child started");
    Ok(child)
}
