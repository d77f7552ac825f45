//! Stream framing and message codec for the thermal camera serial link.
//!
//! This is the core protocol layer. Every message from the device is framed with:
//! - A 1-byte sync marker (0xA0) for stream synchronization
//! - A 1-byte message tag
//! - A 2-byte little-endian payload length (0..=5000)
//!
//! [`FrameDecoder`] reassembles frames from arbitrarily chunked byte input and
//! emits typed [`CamMessage`] values. [`codec::encode_tuning`] produces the one
//! outbound frame the host sends back (tuning parameters).
//!
//! No I/O here — bytes in, messages out. The serial shim lives in
//! `thermolink-serial`.

pub mod codec;
pub mod decoder;

pub use codec::{
    decode_message, encode_tuning, Analysis, CamMessage, Timings, TuningCommand, HEADER_SIZE,
    MAX_PAYLOAD, SYNC, TAG_ANALYSIS, TAG_DEBUG_LOG, TAG_IMAGE, TAG_TIMINGS, TAG_TUNING,
    TUNING_FRAME_SIZE,
};
pub use decoder::FrameDecoder;
