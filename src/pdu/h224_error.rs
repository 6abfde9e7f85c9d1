use crate::q922::Q922DecodeError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum H224DecodeError {
    /// The underlying Q.922 frame could not be decoded.
    Q922(Q922DecodeError),

    /// The Q.922 address octets are not those of an H.224 frame.
    InvalidAddress { high: u8, low: u8 },

    /// The Q.922 control field is not UI mode.
    InvalidControl(u8),

    /// The information field cannot hold the header its client ID requires.
    HeaderTruncated { required: usize, available: usize },
}

impl From<Q922DecodeError> for H224DecodeError {
    fn from(err: Q922DecodeError) -> Self {
        H224DecodeError::Q922(err)
    }
}

impl fmt::Display for H224DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            H224DecodeError::Q922(err) => write!(f, "Q.922 decode failed: {err}"),
            H224DecodeError::InvalidAddress { high, low } => {
                write!(f, "invalid H.224 address octets {high:#04x} {low:#04x}")
            }
            H224DecodeError::InvalidControl(control) => {
                write!(f, "invalid H.224 control field {control:#04x}")
            }
            H224DecodeError::HeaderTruncated {
                required,
                available,
            } => write!(
                f,
                "H.224 header needs {required} octets, information field has {available}"
            ),
        }
    }
}

impl std::error::Error for H224DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            H224DecodeError::Q922(err) => Some(err),
            _ => None,
        }
    }
}
