use crate::{
    constants::{Q922_FCS_SIZE, Q922_FLAG, Q922_OCTET_ALIGNED_BIT_POSITION},
    q922::{Q922EncodeError, Q922Frame, calculate_fcs},
};

/// Outcome of an HDLC encode into a caller supplied buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HdlcEncoded {
    /// Number of octets occupied in the buffer, including a trailing
    /// partially filled octet.
    pub size: usize,

    /// Bit at which the encoded stream ends. `7` means the stream ends on an
    /// octet boundary; any other value means the last octet is partially
    /// filled and the next frame may start at this bit of that octet.
    pub bit_position: u8,
}

/// Raised by the bit writer when the output buffer is exhausted.
struct BufferExhausted;

/// Writes bits MSB first into each output octet.
///
/// Octets of frame content are fed LSB first (HDLC transmission order) and
/// pass through the zero-insertion (bit-stuffing) stage; flags bypass it.
struct HdlcBitWriter<'a> {
    buffer: &'a mut [u8],
    octet_index: usize,
    bit_index: u8,
    ones_counter: u8,
}

impl<'a> HdlcBitWriter<'a> {
    fn new(buffer: &'a mut [u8], bit_position: u8) -> Result<Self, BufferExhausted> {
        let first = buffer.first_mut().ok_or(BufferExhausted)?;

        // Bits above the start position belong to whatever precedes this frame.
        let keep_mask = !(((1u16 << (bit_position + 1)) - 1) as u8);
        *first &= keep_mask;

        Ok(Self {
            buffer,
            octet_index: 0,
            bit_index: bit_position,
            ones_counter: 0,
        })
    }

    #[inline]
    fn write_bit(&mut self, bit: u8) -> Result<(), BufferExhausted> {
        let octet = self
            .buffer
            .get_mut(self.octet_index)
            .ok_or(BufferExhausted)?;

        if self.bit_index == 7 {
            *octet = 0;
        }
        *octet |= (bit & 0x01) << self.bit_index;

        if self.bit_index == 0 {
            self.bit_index = 7;
            self.octet_index += 1;
        } else {
            self.bit_index -= 1;
        }

        Ok(())
    }

    #[inline]
    fn write_octet(&mut self, octet: u8) -> Result<(), BufferExhausted> {
        for i in 0..8 {
            let bit = (octet >> i) & 0x01;
            self.write_bit(bit)?;

            if bit == 1 {
                self.ones_counter += 1;
                if self.ones_counter == 5 {
                    self.write_bit(0)?;
                    self.ones_counter = 0;
                }
            } else {
                self.ones_counter = 0;
            }
        }

        Ok(())
    }

    fn write_flag(&mut self) -> Result<(), BufferExhausted> {
        for i in 0..8 {
            self.write_bit((Q922_FLAG >> i) & 0x01)?;
        }
        self.ones_counter = 0;

        Ok(())
    }

    fn finish(self) -> HdlcEncoded {
        let size = if self.bit_index == Q922_OCTET_ALIGNED_BIT_POSITION {
            self.octet_index
        } else {
            self.octet_index + 1
        };

        HdlcEncoded {
            size,
            bit_position: self.bit_index,
        }
    }
}

impl Q922Frame {
    /// Upper bound on the HDLC encoded size of this frame, valid for any start
    /// bit position.
    ///
    /// Assumes a stuffed bit after every five data bits, which no real frame
    /// reaches, so the figure is conservative rather than exact. Returns 0 if
    /// the bound is not representable.
    pub fn hdlc_encoded_size(&self) -> usize {
        hdlc_size_bound(self.as_bytes().len()).unwrap_or(0)
    }

    /// Encodes this frame as a flag delimited, bit-stuffed HDLC frame starting
    /// on an octet boundary. Returns the number of octets written.
    pub fn encode_hdlc(&self, buffer: &mut [u8]) -> Result<usize, Q922EncodeError> {
        self.encode_hdlc_at(buffer, Q922_OCTET_ALIGNED_BIT_POSITION)
            .map(|encoded| encoded.size)
    }

    /// Encodes this frame as an HDLC frame whose opening flag starts at
    /// `bit_position` (0-7, where 7 is the most significant bit) of
    /// `buffer[0]`.
    ///
    /// Bits of `buffer[0]` above `bit_position` are left untouched, so a
    /// caller can place the partially filled last octet of a previous frame
    /// there and pack frames back to back. The returned bit position tells
    /// where the next frame may start.
    pub fn encode_hdlc_at(
        &self,
        buffer: &mut [u8],
        bit_position: u8,
    ) -> Result<HdlcEncoded, Q922EncodeError> {
        if bit_position > Q922_OCTET_ALIGNED_BIT_POSITION {
            return Err(Q922EncodeError::InvalidBitPosition(bit_position));
        }

        let available = buffer.len();
        let too_small = |_: BufferExhausted| Q922EncodeError::BufferTooSmall {
            required: self.hdlc_encoded_size(),
            available,
        };

        let content = self.as_bytes();
        let fcs = calculate_fcs(content);

        let mut writer = HdlcBitWriter::new(buffer, bit_position).map_err(too_small)?;

        writer.write_flag().map_err(too_small)?;
        for &octet in content {
            writer.write_octet(octet).map_err(too_small)?;
        }
        for octet in fcs.to_le_bytes() {
            writer.write_octet(octet).map_err(too_small)?;
        }
        writer.write_flag().map_err(too_small)?;

        Ok(writer.finish())
    }

    /// Convenience wrapper around `encode_hdlc` returning an owned buffer.
    pub fn encode_hdlc_to_vec(&self) -> Result<Vec<u8>, Q922EncodeError> {
        let mut buf = vec![0; self.hdlc_encoded_size()];
        let size = self.encode_hdlc(&mut buf)?;
        buf.truncate(size);

        Ok(buf)
    }
}

fn hdlc_size_bound(content_size: usize) -> Option<usize> {
    let data_bits = content_size.checked_add(Q922_FCS_SIZE)?.checked_mul(8)?;
    let stuffed_bits = data_bits.checked_add(data_bits / 5)?;
    // Two flags plus up to seven bits of leading offset.
    let total_bits = stuffed_bits.checked_add(2 * 8 + 7)?;

    Some(total_bits.div_ceil(8))
}
