use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Q922EncodeError {
    /// The requested information field exceeds the frame's configured maximum.
    InformationFieldTooLarge { size: usize, max: usize },

    /// The output buffer cannot hold the encoded frame.
    BufferTooSmall { required: usize, available: usize },

    /// HDLC start bit positions are limited to 0-7.
    InvalidBitPosition(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Q922DecodeError {
    /// No opening flag sequence anywhere in the input.
    NoFlag,

    /// The input ended before a closing flag sequence.
    IncompleteFrame,

    /// The destuffed frame cannot hold a header (and FCS, for HDLC).
    FrameTooShort { size: usize },

    /// The destuffed bits between two flags are not a whole number of octets.
    MisalignedFrame { bits: usize },

    FcsMismatch { expected: u16, received: u16 },

    /// The Annex Q length prefix disagrees with the octets that follow it.
    LengthMismatch { declared: usize, available: usize },

    /// The input is too small to hold an Annex Q length prefix and header.
    Truncated { size: usize },

    InformationFieldTooLarge { size: usize, max: usize },
}

impl fmt::Display for Q922EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Q922EncodeError::InformationFieldTooLarge { size, max } => {
                write!(f, "information field of {size} octets exceeds maximum of {max}")
            }
            Q922EncodeError::BufferTooSmall {
                required,
                available,
            } => write!(
                f,
                "output buffer of {available} octets too small, {required} required"
            ),
            Q922EncodeError::InvalidBitPosition(position) => {
                write!(f, "bit position {position} out of range 0-7")
            }
        }
    }
}

impl fmt::Display for Q922DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Q922DecodeError::NoFlag => write!(f, "no flag sequence found"),
            Q922DecodeError::IncompleteFrame => write!(f, "input ended before closing flag"),
            Q922DecodeError::FrameTooShort { size } => {
                write!(f, "frame of {size} octets is shorter than the minimum")
            }
            Q922DecodeError::MisalignedFrame { bits } => {
                write!(f, "frame of {bits} bits is not octet aligned")
            }
            Q922DecodeError::FcsMismatch { expected, received } => write!(
                f,
                "FCS mismatch: expected {expected:#06x}, received {received:#06x}"
            ),
            Q922DecodeError::LengthMismatch {
                declared,
                available,
            } => write!(
                f,
                "declared length {declared} does not match {available} available octets"
            ),
            Q922DecodeError::Truncated { size } => {
                write!(f, "input of {size} octets is truncated")
            }
            Q922DecodeError::InformationFieldTooLarge { size, max } => {
                write!(f, "information field of {size} octets exceeds maximum of {max}")
            }
        }
    }
}

impl std::error::Error for Q922EncodeError {}

impl std::error::Error for Q922DecodeError {}
