//! Serial I/O shim for the thermal camera link.
//!
//! The protocol core (`thermolink-protocol`) is pure bytes-in, messages-out.
//! This crate supplies the I/O around it: opening the port, pumping read
//! chunks through the decoder, and writing encoded tuning frames back.
//!
//! No partial-read handling in user code — [`EventReader`] always hands back
//! complete decoded messages.

pub mod error;
pub mod port;
pub mod reader;
pub mod writer;

pub use error::{LinkError, Result};
pub use port::{list_ports, SerialLink, DEFAULT_BAUD};
pub use serialport::{SerialPortInfo, SerialPortType};
pub use reader::EventReader;
pub use writer::LinkWriter;
