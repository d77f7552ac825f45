use std::io::{Read, Write};
use std::time::Duration;

use serialport::{SerialPort, SerialPortInfo};
use tracing::{debug, info};

use crate::error::{LinkError, Result};

/// Baud rate the camera firmware runs its link at.
pub const DEFAULT_BAUD: u32 = 1_500_000;

/// Read timeout on the underlying port. Reads that hit it are retried by
/// [`EventReader`](crate::reader::EventReader); it only bounds how long a
/// single blocking read can sit on an idle line.
const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// How long RTS is held high during the reset pulse.
const RESET_PULSE: Duration = Duration::from_millis(50);

/// An opened serial connection to the camera — implements Read + Write.
pub struct SerialLink {
    inner: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open a serial port at the camera's default baud rate.
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with_baud(path, DEFAULT_BAUD)
    }

    /// Open a serial port at an explicit baud rate.
    pub fn open_with_baud(path: &str, baud: u32) -> Result<Self> {
        let inner = serialport::new(path, baud)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| LinkError::Open {
                path: path.to_string(),
                source,
            })?;
        info!(path, baud, "opened serial link");
        Ok(Self { inner })
    }

    /// Pulse the control lines to reset the device out of its bootloader:
    /// RTS high, a short hold, then DTR and RTS low.
    pub fn pulse_reset(&mut self) -> Result<()> {
        self.inner
            .write_request_to_send(true)
            .map_err(LinkError::Signal)?;
        std::thread::sleep(RESET_PULSE);
        self.inner
            .write_data_terminal_ready(false)
            .map_err(LinkError::Signal)?;
        self.inner
            .write_request_to_send(false)
            .map_err(LinkError::Signal)?;
        debug!("pulsed reset signals");
        Ok(())
    }

    /// Name of the underlying port, if the platform reports one.
    pub fn name(&self) -> Option<String> {
        self.inner.name()
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("port", &self.inner.name())
            .finish()
    }
}

/// Enumerate serial ports visible to the platform.
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    serialport::available_ports().map_err(LinkError::Enumerate)
}
