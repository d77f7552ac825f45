use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

/// Sync marker: every frame starts with this byte.
pub const SYNC: u8 = 0xA0;

/// Frame header: sync (1) + tag (1) + length (2) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Maximum payload size the device ever sends. A larger declared length means
/// the header is garbage and the stream must resynchronize.
pub const MAX_PAYLOAD: usize = 5000;

/// Tag 0x00: packed little-endian f32 temperature image.
pub const TAG_IMAGE: u8 = 0x00;

/// Tag 0x01, device to host: ASCII debug text.
pub const TAG_DEBUG_LOG: u8 = 0x01;

/// Tag 0x01, host to device: tuning parameter write.
///
/// Same wire value as [`TAG_DEBUG_LOG`], different direction. The firmware
/// interprets 0x01 inbound as a tuning write and emits 0x01 outbound as debug
/// text; the two never cross, so the shared value is safe. Kept as distinct
/// constants rather than one symbol.
pub const TAG_TUNING: u8 = 0x01;

/// Tag 0x03: frame timing counters.
pub const TAG_TIMINGS: u8 = 0x03;

/// Tag 0x04: centroid analysis result.
pub const TAG_ANALYSIS: u8 = 0x04;

/// Tuning payload: three f32 values.
pub const TUNING_PAYLOAD_SIZE: usize = 12;

/// Total wire size of an encoded tuning frame.
pub const TUNING_FRAME_SIZE: usize = HEADER_SIZE + TUNING_PAYLOAD_SIZE;

const TIMINGS_PAYLOAD_SIZE: usize = 12;
const ANALYSIS_PAYLOAD_SIZE: usize = 8;

/// Per-frame timing counters reported by the device (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Time spent fetching raw frame data from the sensor.
    pub frame_fetch: i32,
    /// Time spent transmitting the previous image frame.
    pub frame_tx_time: i32,
    /// Time spent computing temperatures from raw data.
    pub calc_time: i32,
}

/// Centroid of the thresholded image, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis {
    pub cx: f32,
    pub cy: f32,
}

/// Tuning parameters written back to the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningCommand {
    /// Lower temperature threshold (°C).
    pub tmin: f32,
    /// Ambient minimum threshold (°C).
    pub tamb_min: f32,
    /// Upper temperature threshold (°C).
    pub tmax: f32,
}

impl TuningCommand {
    pub fn new(tmin: f32, tamb_min: f32, tmax: f32) -> Self {
        Self {
            tmin,
            tamb_min,
            tmax,
        }
    }
}

/// A decoded message from the device.
#[derive(Debug, Clone, PartialEq)]
pub enum CamMessage {
    /// A full temperature image as f32 pixels in row-major order.
    Image(Vec<f32>),
    /// A line of debug text, with a per-connection monotonic index.
    DebugLog { index: u64, text: String },
    /// Frame timing counters.
    Timings(Timings),
    /// Centroid analysis.
    Analysis(Analysis),
}

impl CamMessage {
    /// Short name of the message kind, for filtering and log output.
    pub fn kind(&self) -> &'static str {
        match self {
            CamMessage::Image(_) => "image",
            CamMessage::DebugLog { .. } => "log",
            CamMessage::Timings(_) => "timings",
            CamMessage::Analysis(_) => "analysis",
        }
    }
}

/// Decode a complete frame payload into a typed message.
///
/// Pure function of `(tag, payload)` aside from `log_index`, which the caller
/// (the decoder) supplies and advances for debug-log messages.
///
/// Returns `None` for unrecognized tags (forward-compatible no-op) and for
/// known tags whose payload is too short to carry the declared structure.
/// An image payload that is not a multiple of 4 bytes is truncated to a whole
/// number of pixels; the remainder is dropped.
pub fn decode_message(tag: u8, payload: &[u8], log_index: u64) -> Option<CamMessage> {
    match tag {
        TAG_IMAGE => {
            let mut pixels = Vec::with_capacity(payload.len() / 4);
            for chunk in payload.chunks_exact(4) {
                pixels.push(f32::from_le_bytes(chunk.try_into().unwrap()));
            }
            Some(CamMessage::Image(pixels))
        }
        TAG_DEBUG_LOG => Some(CamMessage::DebugLog {
            index: log_index,
            text: String::from_utf8_lossy(payload).into_owned(),
        }),
        TAG_TIMINGS => {
            if payload.len() < TIMINGS_PAYLOAD_SIZE {
                debug!(len = payload.len(), "short timings payload, dropping frame");
                return None;
            }
            Some(CamMessage::Timings(Timings {
                frame_fetch: i32::from_le_bytes(payload[0..4].try_into().unwrap()),
                frame_tx_time: i32::from_le_bytes(payload[4..8].try_into().unwrap()),
                calc_time: i32::from_le_bytes(payload[8..12].try_into().unwrap()),
            }))
        }
        TAG_ANALYSIS => {
            if payload.len() < ANALYSIS_PAYLOAD_SIZE {
                debug!(len = payload.len(), "short analysis payload, dropping frame");
                return None;
            }
            Some(CamMessage::Analysis(Analysis {
                cx: f32::from_le_bytes(payload[0..4].try_into().unwrap()),
                cy: f32::from_le_bytes(payload[4..8].try_into().unwrap()),
            }))
        }
        other => {
            trace!(tag = other, "ignoring unrecognized tag");
            None
        }
    }
}

/// Encode a tuning command into the wire format.
///
/// Wire format (mirrors an inbound frame, tag 0x01, 12-byte payload):
/// ```text
/// ┌──────────┬──────────┬────────────┬───────────────────────────┐
/// │ Sync     │ Tag      │ Length     │ tmin, tamb_min, tmax      │
/// │ 0xA0     │ 0x01     │ 0x000C LE  │ (3 × f32 LE)              │
/// └──────────┴──────────┴────────────┴───────────────────────────┘
/// ```
pub fn encode_tuning(tuning: &TuningCommand, dst: &mut BytesMut) {
    dst.reserve(TUNING_FRAME_SIZE);
    dst.put_u8(SYNC);
    dst.put_u8(TAG_TUNING);
    dst.put_u16_le(TUNING_PAYLOAD_SIZE as u16);
    dst.put_f32_le(tuning.tmin);
    dst.put_f32_le(tuning.tamb_min);
    dst.put_f32_le(tuning.tmax);
}
