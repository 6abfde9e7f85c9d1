use crate::{
    constants::Q922_MAX_INFORMATION_FIELD_SIZE,
    q922::{
        Q922DecodeError, Q922Frame,
        q922_hdlc_decoder::{HdlcDeframer, wire_bits},
    },
};
use std::collections::VecDeque;

/// A stateful HDLC decoder for a continuous Q.922 bit stream.
///
/// `Q922StreamDecoder` accepts the stream in arbitrary chunks and keeps its
/// bit-level state between calls, so a frame may be split across chunks and
/// frames may be packed back to back at any bit offset.
///
/// ### Behavior Summary:
/// - Idle fill (repeated flags, all-ones) between frames is skipped.
/// - An abort sequence (seven or more ones) silently discards the frame in
///   progress.
/// - Every other candidate between two flags yields exactly one item: the
///   decoded frame, or the reason it was rejected.
pub struct Q922StreamDecoder {
    deframer: HdlcDeframer,
    max_information_field_size: usize,
}

pub struct Q922DecoderIterator {
    queue: VecDeque<Result<Q922Frame, Q922DecodeError>>,
}

impl Iterator for Q922DecoderIterator {
    type Item = Result<Q922Frame, Q922DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }
}

impl Default for Q922StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Q922StreamDecoder {
    pub fn new() -> Self {
        Self::with_max_information_field_size(Q922_MAX_INFORMATION_FIELD_SIZE)
    }

    /// Candidates whose information field grows beyond `max` octets are
    /// rejected with `InformationFieldTooLarge` as soon as they cross it.
    pub fn with_max_information_field_size(max: usize) -> Self {
        Self {
            deframer: HdlcDeframer::new(max),
            max_information_field_size: max,
        }
    }

    // Reads new bytes and decodes every frame they complete
    pub fn read_bytes(&mut self, data: &[u8]) -> Q922DecoderIterator {
        let mut queue = VecDeque::new();

        for bit in wire_bits(data) {
            if let Some(result) = self.deframer.push_bit(bit) {
                queue.push_back(result.and_then(|content| {
                    Q922Frame::from_content(&content, self.max_information_field_size)
                }));
            }
        }

        Q922DecoderIterator { queue }
    }

    /// Drops any partially received frame and resumes hunting for a flag.
    pub fn reset(&mut self) {
        self.deframer.reset();
    }
}
