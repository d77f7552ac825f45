/// Errors that can occur on the serial link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Failed to open the serial port.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: serialport::Error,
    },

    /// Failed to enumerate serial ports.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// Failed to drive the port control signals (RTS/DTR).
    #[error("failed to set control signals: {0}")]
    Signal(serialport::Error),

    /// An I/O error occurred on the open link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link was closed (EOF while reading, or a zero-length write).
    #[error("link closed")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, LinkError>;
