use tracing::debug;

use crate::codec::{decode_message, CamMessage, MAX_PAYLOAD, SYNC};

/// Where the decoder is within the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Scanning for the sync byte. Anything else is discarded.
    Idle,
    /// The next byte is the message tag.
    ReadTag,
    /// Accumulating the 2-byte little-endian payload length.
    ReadLength,
    /// Accumulating payload bytes until the declared length is reached.
    ReadPayload,
}

/// Byte-by-byte frame reassembly state machine.
///
/// Feed it raw serial bytes in arrival order via [`push`](Self::push) — in any
/// chunking, down to one byte at a time — and it emits one [`CamMessage`] per
/// completed, recognized frame. Malformed input never errors: a garbage sync
/// byte or an oversized declared length just resynchronizes the scan to the
/// next 0xA0.
///
/// One decoder per opened connection. Create it on connect, discard it (or
/// [`reset`](Self::reset) it) on disconnect; a frame cut off by a dropped
/// connection is only recovered by a later sync byte, never by a timeout here.
#[derive(Debug)]
pub struct FrameDecoder {
    phase: Phase,
    tag: u8,
    len_buf: [u8; 2],
    len_cursor: usize,
    expected: usize,
    payload: Vec<u8>,
    log_index: u64,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            tag: 0,
            len_buf: [0; 2],
            len_cursor: 0,
            expected: 0,
            payload: Vec::new(),
            log_index: 0,
        }
    }

    /// Process a chunk of raw bytes, returning the messages completed by it.
    ///
    /// Every byte is consumed exactly once; a frame may span any number of
    /// `push` calls. An empty chunk is a no-op.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<CamMessage> {
        let mut messages = Vec::new();
        for &byte in chunk {
            if let Some(msg) = self.step(byte) {
                messages.push(msg);
            }
        }
        messages
    }

    /// Return to the initial state, dropping any in-flight frame and the
    /// debug-log index. Equivalent to a fresh decoder.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Index the next debug-log message will carry.
    pub fn log_index(&self) -> u64 {
        self.log_index
    }

    fn step(&mut self, byte: u8) -> Option<CamMessage> {
        match self.phase {
            Phase::Idle => {
                if byte == SYNC {
                    self.phase = Phase::ReadTag;
                }
                None
            }
            Phase::ReadTag => {
                self.tag = byte;
                self.len_cursor = 0;
                self.phase = Phase::ReadLength;
                None
            }
            Phase::ReadLength => {
                self.len_buf[self.len_cursor] = byte;
                self.len_cursor += 1;
                if self.len_cursor < 2 {
                    return None;
                }

                let length = u16::from_le_bytes(self.len_buf) as usize;
                if length > MAX_PAYLOAD {
                    debug!(length, tag = self.tag, "oversized frame, resynchronizing");
                    self.phase = Phase::Idle;
                    return None;
                }
                if length == 0 {
                    // Zero-length frames complete without entering ReadPayload.
                    return self.complete();
                }

                self.expected = length;
                self.payload.reserve(length);
                self.phase = Phase::ReadPayload;
                None
            }
            Phase::ReadPayload => {
                self.payload.push(byte);
                if self.payload.len() < self.expected {
                    return None;
                }
                self.complete()
            }
        }
    }

    fn complete(&mut self) -> Option<CamMessage> {
        self.phase = Phase::Idle;
        let payload = std::mem::take(&mut self.payload);
        let msg = decode_message(self.tag, &payload, self.log_index);
        if matches!(msg, Some(CamMessage::DebugLog { .. })) {
            self.log_index += 1;
        }
        msg
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Analysis, Timings, TAG_ANALYSIS, TAG_DEBUG_LOG, TAG_IMAGE, TAG_TIMINGS};

    fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
        let mut wire = vec![SYNC, tag];
        wire.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        wire.extend_from_slice(payload);
        wire
    }

    fn timings_payload(a: i32, b: i32, c: i32) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&a.to_le_bytes());
        p.extend_from_slice(&b.to_le_bytes());
        p.extend_from_slice(&c.to_le_bytes());
        p
    }

    #[test]
    fn decodes_whole_chunk() {
        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&frame(TAG_DEBUG_LOG, b"hello"));

        assert_eq!(
            msgs,
            vec![CamMessage::DebugLog {
                index: 0,
                text: "hello".to_string()
            }]
        );
    }

    #[test]
    fn chunking_is_invariant() {
        let wire = frame(TAG_TIMINGS, &timings_payload(1, 2, 3));
        let expected = CamMessage::Timings(Timings {
            frame_fetch: 1,
            frame_tx_time: 2,
            calc_time: 3,
        });

        // All at once.
        let mut d = FrameDecoder::new();
        assert_eq!(d.push(&wire), vec![expected.clone()]);

        // One byte at a time.
        let mut d = FrameDecoder::new();
        let mut msgs = Vec::new();
        for &b in &wire {
            msgs.extend(d.push(&[b]));
        }
        assert_eq!(msgs, vec![expected.clone()]);

        // Every possible two-way split.
        for split in 0..=wire.len() {
            let mut d = FrameDecoder::new();
            let mut msgs = d.push(&wire[..split]);
            msgs.extend(d.push(&wire[split..]));
            assert_eq!(msgs, vec![expected.clone()], "split at {split}");
        }
    }

    #[test]
    fn empty_push_is_noop() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(&[]).is_empty());
    }

    #[test]
    fn back_to_back_frames_stay_independent() {
        let mut analysis_payload = Vec::new();
        analysis_payload.extend_from_slice(&3.0f32.to_le_bytes());
        analysis_payload.extend_from_slice(&4.0f32.to_le_bytes());

        let mut wire = frame(TAG_DEBUG_LOG, b"first");
        wire.extend(frame(TAG_ANALYSIS, &analysis_payload));

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&wire);

        assert_eq!(msgs.len(), 2);
        assert_eq!(
            msgs[0],
            CamMessage::DebugLog {
                index: 0,
                text: "first".to_string()
            }
        );
        assert_eq!(msgs[1], CamMessage::Analysis(Analysis { cx: 3.0, cy: 4.0 }));
    }

    #[test]
    fn oversized_length_resynchronizes() {
        let mut wire = vec![SYNC, TAG_IMAGE];
        wire.extend_from_slice(&5001u16.to_le_bytes());
        // Next valid frame immediately after the bad header.
        wire.extend(frame(TAG_DEBUG_LOG, b"recovered"));

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&wire);

        assert_eq!(
            msgs,
            vec![CamMessage::DebugLog {
                index: 0,
                text: "recovered".to_string()
            }]
        );
    }

    #[test]
    fn max_length_is_accepted() {
        let payload = vec![0u8; MAX_PAYLOAD];
        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&frame(TAG_IMAGE, &payload));

        assert_eq!(msgs.len(), 1);
        match &msgs[0] {
            CamMessage::Image(pixels) => assert_eq!(pixels.len(), MAX_PAYLOAD / 4),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn zero_length_frame_completes_immediately() {
        let mut wire = frame(TAG_DEBUG_LOG, b"");
        // The byte right after the zero-length frame starts a new frame.
        wire.extend(frame(TAG_DEBUG_LOG, b"next"));

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&wire);

        assert_eq!(msgs.len(), 2);
        assert_eq!(
            msgs[0],
            CamMessage::DebugLog {
                index: 0,
                text: String::new()
            }
        );
        assert_eq!(
            msgs[1],
            CamMessage::DebugLog {
                index: 1,
                text: "next".to_string()
            }
        );
    }

    #[test]
    fn zero_length_analysis_is_dropped_without_crash() {
        let mut wire = frame(TAG_ANALYSIS, b"");
        wire.extend(frame(TAG_DEBUG_LOG, b"still alive"));

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&wire);

        assert_eq!(
            msgs,
            vec![CamMessage::DebugLog {
                index: 0,
                text: "still alive".to_string()
            }]
        );
    }

    #[test]
    fn log_indices_increase_across_interleaved_frames() {
        let mut wire = frame(TAG_DEBUG_LOG, b"a");
        wire.extend(frame(TAG_TIMINGS, &timings_payload(9, 9, 9)));
        wire.extend(frame(TAG_DEBUG_LOG, b"b"));
        wire.extend(frame(0x7F, b"unknown"));
        wire.extend(frame(TAG_DEBUG_LOG, b"c"));

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&wire);

        let indices: Vec<u64> = msgs
            .iter()
            .filter_map(|m| match m {
                CamMessage::DebugLog { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(decoder.log_index(), 3);
    }

    #[test]
    fn leading_noise_is_discarded() {
        let mut wire = vec![0x00, 0xFF, 0x12, 0x9F, 0xA1];
        wire.extend(frame(TAG_DEBUG_LOG, b"clean"));

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&wire);

        assert_eq!(
            msgs,
            vec![CamMessage::DebugLog {
                index: 0,
                text: "clean".to_string()
            }]
        );
    }

    #[test]
    fn image_4000_bytes_decodes_to_1000_pixels() {
        let mut payload = Vec::with_capacity(4000);
        for i in 0..1000 {
            payload.extend_from_slice(&(i as f32).to_le_bytes());
        }

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&frame(TAG_IMAGE, &payload));

        assert_eq!(msgs.len(), 1);
        match &msgs[0] {
            CamMessage::Image(pixels) => {
                assert_eq!(pixels.len(), 1000);
                assert_eq!(pixels[0], 0.0);
                assert_eq!(pixels[999], 999.0);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_frame_is_consumed_silently() {
        let mut wire = frame(0x42, b"opaque");
        wire.extend(frame(TAG_DEBUG_LOG, b"after"));

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&wire);

        assert_eq!(msgs.len(), 1);
        assert_eq!(
            msgs[0],
            CamMessage::DebugLog {
                index: 0,
                text: "after".to_string()
            }
        );
    }

    #[test]
    fn reset_clears_partial_frame_and_log_index() {
        let mut decoder = FrameDecoder::new();
        decoder.push(&frame(TAG_DEBUG_LOG, b"one"));

        // Start a frame but never finish it.
        decoder.push(&[SYNC, TAG_IMAGE, 0x10]);
        decoder.reset();

        let msgs = decoder.push(&frame(TAG_DEBUG_LOG, b"fresh"));
        assert_eq!(
            msgs,
            vec![CamMessage::DebugLog {
                index: 0,
                text: "fresh".to_string()
            }]
        );
    }

    #[test]
    fn payload_byte_equal_to_sync_is_not_a_marker() {
        // A payload full of 0xA0 bytes must not restart the scan.
        let payload = [SYNC; 8];
        let mut wire = frame(TAG_DEBUG_LOG, &payload);
        wire.extend(frame(TAG_DEBUG_LOG, b"tail"));

        let mut decoder = FrameDecoder::new();
        let msgs = decoder.push(&wire);

        assert_eq!(msgs.len(), 2);
        assert_eq!(
            msgs[1],
            CamMessage::DebugLog {
                index: 1,
                text: "tail".to_string()
            }
        );
    }
}
