//! PTY → terminal direction.

use std::io::{self, Read, Write};

use tracing::debug;

use crate::proxy::input::CHUNK_SIZE;
use crate::pty::OutputSource;

/// Copy everything the child prints to `writer`, flushing per chunk.
///
/// Stops at end-of-stream or on the first error; on Linux the master
/// reports `EIO` once the child has released the slave.
pub fn forward_output<R: Read, W: Write>(mut reader: R, mut writer: W) -> u64 {
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut copied = 0u64;

    loop {
        let count = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(%err, "pty read ended");
                break;
            }
        };
        if let Err(err) = writer.write_all(&buffer[..count]).and_then(|()| writer.flush()) {
            debug!(%err, "output write failed");
            break;
        }
        copied += count as u64;
    }

    copied
}

impl OutputSource {
    pub fn writer(self) -> Box<dyn Write + Send> {
        match self {
            OutputSource::Stdout => Box::new(io::stdout()),
            OutputSource::Stderr => Box::new(io::stderr()),
        }
    }
}
