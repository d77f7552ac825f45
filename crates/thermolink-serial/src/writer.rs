use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use thermolink_protocol::{encode_tuning, TuningCommand, TUNING_FRAME_SIZE};
use tracing::debug;

use crate::error::{LinkError, Result};

/// Writes encoded tuning frames to any `Write` stream.
pub struct LinkWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> LinkWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(TUNING_FRAME_SIZE),
        }
    }

    /// Encode and send a tuning command (blocking).
    pub fn send_tuning(&mut self, tuning: &TuningCommand) -> Result<()> {
        self.buf.clear();
        encode_tuning(tuning, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(LinkError::Disconnected),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(LinkError::Io(err)),
            }
        }

        self.flush()?;
        debug!(
            tmin = tuning.tmin,
            tamb_min = tuning.tamb_min,
            tmax = tuning.tmax,
            "sent tuning frame"
        );
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(LinkError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
