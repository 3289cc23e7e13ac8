//! Terminal → PTY direction.

use std::io::{self, Read, Write};

use tracing::debug;

use crate::detach::{contains_detach, Clock, DetachDetector};

pub const CHUNK_SIZE: usize = 4096;

/// Forwards keystrokes to the child while watching for the detach sequence.
///
/// The detector is owned here and touched only from the proxy's own thread.
/// Every chunk is forwarded unmodified; detection never swallows bytes.
pub struct InputProxy<C, F> {
    detector: DetachDetector<C>,
    on_detach: F,
}

impl<C, F> InputProxy<C, F>
where
    C: Clock,
    F: FnMut(),
{
    pub fn new(detector: DetachDetector<C>, on_detach: F) -> Self {
        Self {
            detector,
            on_detach,
        }
    }

    pub fn detector(&self) -> &DetachDetector<C> {
        &self.detector
    }

    /// Pump until end-of-input or the first read/write error.
    ///
    /// Returns the number of bytes forwarded.
    pub fn run<R: Read, W: Write>(&mut self, mut reader: R, mut writer: W) -> u64 {
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut forwarded = 0u64;

        loop {
            let count = match reader.read(&mut buffer) {
                Ok(0) => {
                    debug!("input closed");
                    break;
                }
                Ok(count) => count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!(%err, "input read failed");
                    break;
                }
            };

            let chunk = &buffer[..count];
            if contains_detach(chunk) && self.detector.observe() {
                debug!("detach sequence recognized");
                (self.on_detach)();
            }

            if let Err(err) = writer.write_all(chunk).and_then(|()| writer.flush()) {
                debug!(%err, "pty write failed");
                break;
            }
            forwarded += count as u64;
        }

        forwarded
    }
}
