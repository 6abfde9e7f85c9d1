use crate::{
    constants::{
        Q922_ANNEX_Q_LENGTH_FIELD_SIZE, Q922_CONTROL_FIELD_OFFSET, Q922_DEFAULT_INFORMATION_FIELD_SIZE,
        Q922_HEADER_SIZE, Q922_HIGH_ORDER_ADDRESS_OFFSET, Q922_LOW_ORDER_ADDRESS_OFFSET,
        Q922_MAX_INFORMATION_FIELD_SIZE,
    },
    q922::{Q922DecodeError, Q922EncodeError},
};

/// A single Q.922 frame: three header octets followed by the information field.
///
/// The frame owns one contiguous buffer laid out as
/// `[high address][low address][control][information field ...]`. The buffer
/// length always equals the header size plus the information field size; it
/// is resized (never aliased) when the information field changes.
///
/// The same frame can be put on the wire in two ways:
///
/// - **HDLC**: flag delimited, bit-stuffed and protected by a 16-bit FCS
///   (`encode_hdlc`, `encode_hdlc_at`, `decode_hdlc`).
/// - **H.323 Annex Q**: a 2-octet big-endian length followed by the header and
///   information field, for transports that already delimit frames
///   (`encode_annex_q`, `decode_annex_q`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Q922Frame {
    buffer: Vec<u8>,
    max_information_field_size: usize,
}

impl Default for Q922Frame {
    fn default() -> Self {
        Self::new(Q922_DEFAULT_INFORMATION_FIELD_SIZE)
    }
}

impl Q922Frame {
    /// Creates a zeroed frame with the given information field size.
    ///
    /// Sizes beyond `Q922_MAX_INFORMATION_FIELD_SIZE` are clamped to it.
    pub fn new(information_field_size: usize) -> Self {
        let size = information_field_size.min(Q922_MAX_INFORMATION_FIELD_SIZE);

        Self {
            buffer: vec![0; Q922_HEADER_SIZE + size],
            max_information_field_size: Q922_MAX_INFORMATION_FIELD_SIZE,
        }
    }

    /// Creates a zeroed frame whose information field may never grow beyond
    /// `max_information_field_size` octets, neither by resizing nor by decoding.
    pub fn with_max_information_field_size(
        information_field_size: usize,
        max_information_field_size: usize,
    ) -> Result<Self, Q922EncodeError> {
        if information_field_size > max_information_field_size {
            return Err(Q922EncodeError::InformationFieldTooLarge {
                size: information_field_size,
                max: max_information_field_size,
            });
        }

        let mut frame = Self::new(information_field_size);
        frame.max_information_field_size = max_information_field_size;

        Ok(frame)
    }

    pub fn high_order_address_octet(&self) -> u8 {
        self.buffer[Q922_HIGH_ORDER_ADDRESS_OFFSET]
    }

    pub fn set_high_order_address_octet(&mut self, octet: u8) {
        self.buffer[Q922_HIGH_ORDER_ADDRESS_OFFSET] = octet;
    }

    pub fn low_order_address_octet(&self) -> u8 {
        self.buffer[Q922_LOW_ORDER_ADDRESS_OFFSET]
    }

    pub fn set_low_order_address_octet(&mut self, octet: u8) {
        self.buffer[Q922_LOW_ORDER_ADDRESS_OFFSET] = octet;
    }

    pub fn control_field_octet(&self) -> u8 {
        self.buffer[Q922_CONTROL_FIELD_OFFSET]
    }

    pub fn set_control_field_octet(&mut self, octet: u8) {
        self.buffer[Q922_CONTROL_FIELD_OFFSET] = octet;
    }

    pub fn information_field(&self) -> &[u8] {
        &self.buffer[Q922_HEADER_SIZE..]
    }

    pub fn information_field_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[Q922_HEADER_SIZE..]
    }

    pub fn information_field_size(&self) -> usize {
        self.buffer.len() - Q922_HEADER_SIZE
    }

    pub fn max_information_field_size(&self) -> usize {
        self.max_information_field_size
    }

    /// Header and information field as they appear on the wire, before any
    /// framing is applied.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Resizes the information field, preserving the header and the common
    /// prefix of the old information field. New octets are zero.
    pub fn set_information_field_size(&mut self, size: usize) -> Result<(), Q922EncodeError> {
        if size > self.max_information_field_size {
            return Err(Q922EncodeError::InformationFieldTooLarge {
                size,
                max: self.max_information_field_size,
            });
        }

        self.buffer.resize(Q922_HEADER_SIZE + size, 0);

        Ok(())
    }

    /// Like `set_information_field_size`, but clamps to the configured maximum.
    pub(crate) fn resize_information_field_clamped(&mut self, size: usize) {
        self.buffer
            .resize(Q922_HEADER_SIZE + size.min(self.max_information_field_size), 0);
    }

    /// Replaces header and information field with `bytes` (header first).
    ///
    /// Callers guarantee `bytes` holds at least a full header.
    pub(crate) fn load(&mut self, bytes: &[u8]) -> Result<(), Q922DecodeError> {
        debug_assert!(bytes.len() >= Q922_HEADER_SIZE);

        let size = bytes.len() - Q922_HEADER_SIZE;
        if size > self.max_information_field_size {
            return Err(Q922DecodeError::InformationFieldTooLarge {
                size,
                max: self.max_information_field_size,
            });
        }

        self.buffer.clear();
        self.buffer.extend_from_slice(bytes);

        Ok(())
    }

    pub(crate) fn from_content(
        bytes: &[u8],
        max_information_field_size: usize,
    ) -> Result<Self, Q922DecodeError> {
        let mut frame = Self {
            buffer: Vec::new(),
            max_information_field_size,
        };
        frame.load(bytes)?;

        Ok(frame)
    }

    /// Size of this frame once encoded as described in H.323 Annex Q.
    pub fn annex_q_encoded_size(&self) -> usize {
        Q922_ANNEX_Q_LENGTH_FIELD_SIZE + self.buffer.len()
    }

    /// Decodes an H.323 Annex Q frame: `[length: u16 BE][header][information field]`.
    ///
    /// The declared length covers header and information field and must match
    /// exactly the number of octets following the length prefix.
    pub fn decode_annex_q(&mut self, buffer: &[u8]) -> Result<(), Q922DecodeError> {
        if buffer.len() < Q922_ANNEX_Q_LENGTH_FIELD_SIZE + Q922_HEADER_SIZE {
            return Err(Q922DecodeError::Truncated { size: buffer.len() });
        }

        let declared = u16::from_be_bytes([buffer[0], buffer[1]]) as usize;
        let body = &buffer[Q922_ANNEX_Q_LENGTH_FIELD_SIZE..];

        if declared < Q922_HEADER_SIZE {
            return Err(Q922DecodeError::FrameTooShort { size: declared });
        }

        if declared != body.len() {
            return Err(Q922DecodeError::LengthMismatch {
                declared,
                available: body.len(),
            });
        }

        self.load(body)
    }

    /// Encodes this frame as described in H.323 Annex Q into `buffer`.
    ///
    /// Returns the number of octets written.
    pub fn encode_annex_q(&self, buffer: &mut [u8]) -> Result<usize, Q922EncodeError> {
        let length = u16::try_from(self.buffer.len()).map_err(|_| {
            Q922EncodeError::InformationFieldTooLarge {
                size: self.information_field_size(),
                max: Q922_MAX_INFORMATION_FIELD_SIZE,
            }
        })?;

        let required = self.annex_q_encoded_size();
        if buffer.len() < required {
            return Err(Q922EncodeError::BufferTooSmall {
                required,
                available: buffer.len(),
            });
        }

        buffer[..Q922_ANNEX_Q_LENGTH_FIELD_SIZE].copy_from_slice(&length.to_be_bytes());
        buffer[Q922_ANNEX_Q_LENGTH_FIELD_SIZE..required].copy_from_slice(&self.buffer);

        Ok(required)
    }

    /// Convenience wrapper around `encode_annex_q` returning an owned buffer.
    pub fn encode_annex_q_to_vec(&self) -> Result<Vec<u8>, Q922EncodeError> {
        let mut buf = vec![0; self.annex_q_encoded_size()];
        let size = self.encode_annex_q(&mut buf)?;
        buf.truncate(size);

        Ok(buf)
    }
}
