use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use thermolink_protocol::{CamMessage, FrameDecoder};

use crate::error::{LinkError, Result};

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads decoded camera messages from any `Read` stream.
///
/// Owns a [`FrameDecoder`] and pumps read chunks through it — callers always
/// get complete messages, never raw bytes or partial frames. One reader per
/// connection; dropping it discards any in-flight frame, which is the intended
/// reconnect behavior.
pub struct EventReader<T> {
    inner: T,
    decoder: FrameDecoder,
    pending: VecDeque<CamMessage>,
}

impl<T: Read> EventReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
        }
    }

    /// Read the next decoded message (blocking).
    ///
    /// Reads that hit the port's timeout are retried — the camera link is
    /// idle between frames. Returns `Err(LinkError::Disconnected)` at EOF.
    pub fn next_event(&mut self) -> Result<CamMessage> {
        loop {
            if let Some(msg) = self.try_next()? {
                return Ok(msg);
            }
        }
    }

    /// Attempt one read, returning `Ok(None)` if no complete message is
    /// available yet (including timed-out or interrupted reads), so callers
    /// can interleave shutdown checks with a blocking port.
    pub fn try_next(&mut self) -> Result<Option<CamMessage>> {
        if let Some(msg) = self.pending.pop_front() {
            return Ok(Some(msg));
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = match self.inner.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => return Ok(None),
            Err(err) if err.kind() == ErrorKind::TimedOut => return Ok(None),
            Err(err) => return Err(LinkError::Io(err)),
        };

        if read == 0 {
            return Err(LinkError::Disconnected);
        }

        self.pending.extend(self.decoder.push(&chunk[..read]));
        Ok(self.pending.pop_front())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Borrow the frame decoder (e.g. to inspect the debug-log index).
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }
}
