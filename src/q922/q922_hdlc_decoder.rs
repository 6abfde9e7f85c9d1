use crate::{
    constants::{Q922_FCS_SIZE, Q922_FLAG, Q922_HEADER_SIZE, Q922_MIN_HDLC_FRAME_SIZE},
    q922::{Q922DecodeError, Q922Frame, calculate_fcs},
};

/// Iterates the bits of `data` in transmission order: MSB of each octet first.
#[inline]
pub(crate) fn wire_bits(data: &[u8]) -> impl Iterator<Item = u8> + '_ {
    data.iter()
        .flat_map(|&octet| (0..8).rev().map(move |i| (octet >> i) & 0x01))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeframerState {
    /// Looking for an opening flag.
    Hunting,

    /// Between flags, destuffing frame content.
    InFrame,
}

/// Bit-level HDLC deframer.
///
/// Hunts for a flag with an 8-bit shift register, then removes stuffed zeros
/// on the fly. A zero is held back until the following run of ones is known,
/// because `0` + six ones + `0` is a flag rather than content. Seven or more
/// consecutive ones abort the current frame and restart the hunt.
#[derive(Debug, Clone)]
pub(crate) struct HdlcDeframer {
    state: DeframerState,
    shift_register: u8,
    ones_counter: u8,
    pending_zero: bool,
    octets: Vec<u8>,
    current_octet: u8,
    current_bits: u8,
    saw_flag: bool,
    max_information_field_size: usize,
}

impl HdlcDeframer {
    pub(crate) fn new(max_information_field_size: usize) -> Self {
        Self {
            state: DeframerState::Hunting,
            // All ones: a flag must be seen in full, leading zero included.
            shift_register: 0xFF,
            ones_counter: 0,
            pending_zero: false,
            octets: Vec::new(),
            current_octet: 0,
            current_bits: 0,
            saw_flag: false,
            max_information_field_size,
        }
    }

    /// Whether a flag sequence has been seen since creation or the last reset.
    pub(crate) fn saw_flag(&self) -> bool {
        self.saw_flag
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.max_information_field_size);
    }

    /// Feeds one wire bit.
    ///
    /// Returns `Some` when a flag closes a non-idle candidate: the verified
    /// header and information field (FCS stripped), or the reason the
    /// candidate was rejected.
    pub(crate) fn push_bit(&mut self, bit: u8) -> Option<Result<Vec<u8>, Q922DecodeError>> {
        match self.state {
            DeframerState::Hunting => {
                self.shift_register = (self.shift_register << 1) | bit;
                if self.shift_register == Q922_FLAG {
                    self.saw_flag = true;
                    self.start_candidate();
                    self.state = DeframerState::InFrame;
                }
                None
            }
            DeframerState::InFrame if bit == 1 => {
                self.ones_counter += 1;
                if self.ones_counter >= 7 {
                    tracing::trace!(
                        octets = self.octets.len(),
                        "HDLC abort sequence, discarding frame"
                    );
                    self.abort();
                }
                None
            }
            DeframerState::InFrame => match self.ones_counter {
                5 => {
                    // Stuffed zero: the run of ones was content, this zero is not.
                    self.flush_pending(5);
                    self.pending_zero = false;
                    self.ones_counter = 0;
                    self.check_overflow()
                }
                6 => {
                    // The held zero and these six ones were a flag.
                    self.pending_zero = false;
                    self.ones_counter = 0;
                    self.close_candidate()
                }
                ones => {
                    self.flush_pending(ones);
                    self.pending_zero = true;
                    self.ones_counter = 0;
                    self.check_overflow()
                }
            },
        }
    }

    fn start_candidate(&mut self) {
        self.ones_counter = 0;
        self.pending_zero = false;
        self.octets.clear();
        self.current_octet = 0;
        self.current_bits = 0;
    }

    fn abort(&mut self) {
        self.start_candidate();
        self.state = DeframerState::Hunting;
        self.shift_register = 0xFF;
    }

    /// Emits the held zero (if any) followed by `ones` one bits.
    #[inline]
    fn flush_pending(&mut self, ones: u8) {
        if self.pending_zero {
            self.emit_bit(0);
        }
        for _ in 0..ones {
            self.emit_bit(1);
        }
    }

    /// Octets are rebuilt LSB first, matching the encoder's transmission order.
    #[inline]
    fn emit_bit(&mut self, bit: u8) {
        self.current_octet |= bit << self.current_bits;
        self.current_bits += 1;

        if self.current_bits == 8 {
            self.octets.push(self.current_octet);
            self.current_octet = 0;
            self.current_bits = 0;
        }
    }

    fn check_overflow(&mut self) -> Option<Result<Vec<u8>, Q922DecodeError>> {
        let max_frame_size = Q922_HEADER_SIZE + self.max_information_field_size + Q922_FCS_SIZE;
        if self.octets.len() <= max_frame_size {
            return None;
        }

        let size = self.octets.len() - Q922_HEADER_SIZE - Q922_FCS_SIZE;
        self.abort();

        Some(Err(Q922DecodeError::InformationFieldTooLarge {
            size,
            max: self.max_information_field_size,
        }))
    }

    fn close_candidate(&mut self) -> Option<Result<Vec<u8>, Q922DecodeError>> {
        let bits = self.octets.len() * 8 + self.current_bits as usize;

        let result = if bits < 8 {
            // Back-to-back flags or sub-octet padding between frames.
            None
        } else if self.current_bits != 0 {
            Some(Err(Q922DecodeError::MisalignedFrame { bits }))
        } else if self.octets.len() < Q922_MIN_HDLC_FRAME_SIZE {
            Some(Err(Q922DecodeError::FrameTooShort {
                size: self.octets.len(),
            }))
        } else {
            let content_size = self.octets.len() - Q922_FCS_SIZE;
            let received =
                u16::from_le_bytes([self.octets[content_size], self.octets[content_size + 1]]);
            let expected = calculate_fcs(&self.octets[..content_size]);

            if received == expected {
                let mut content = std::mem::take(&mut self.octets);
                content.truncate(content_size);
                Some(Ok(content))
            } else {
                Some(Err(Q922DecodeError::FcsMismatch { expected, received }))
            }
        };

        // The closing flag of this candidate opens the next one.
        self.start_candidate();

        result
    }
}

impl Q922Frame {
    /// Decodes the first HDLC frame found in `data`.
    ///
    /// Leading idle fill (repeated flags or all-ones) is skipped, the opening
    /// flag may start at any bit offset, and stuffed zeros are removed before
    /// the trailing FCS is verified. Any later frames in `data` are ignored;
    /// use `Q922StreamDecoder` to decode them all.
    pub fn decode_hdlc(&mut self, data: &[u8]) -> Result<(), Q922DecodeError> {
        let mut deframer = HdlcDeframer::new(self.max_information_field_size());

        for bit in wire_bits(data) {
            if let Some(result) = deframer.push_bit(bit) {
                return self.load(&result?);
            }
        }

        if deframer.saw_flag() {
            Err(Q922DecodeError::IncompleteFrame)
        } else {
            Err(Q922DecodeError::NoFlag)
        }
    }
}
