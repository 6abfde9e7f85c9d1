use h224::{
    pdu::{H224ClientId, H224DecodeError},
    q922::Q922EncodeError,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum H224HandlerError {
    Decode(H224DecodeError),
    Encode(Q922EncodeError),

    /// The CME client ID cannot be registered by a client.
    ReservedClientId,

    /// A standard client ID in the range reserved for extended and
    /// non-standard clients.
    InvalidClientId(H224ClientId),

    ClientAlreadyRegistered(H224ClientId),
    ClientNotRegistered(H224ClientId),

    /// Transmission has not been started.
    TransmitDisabled,

    ClientDataTooLarge { size: usize, max: usize },
}

// Add this From impl to allow `?` to convert H224DecodeError
impl From<H224DecodeError> for H224HandlerError {
    fn from(err: H224DecodeError) -> Self {
        H224HandlerError::Decode(err)
    }
}

// Add this From impl to allow `?` to convert Q922EncodeError
impl From<Q922EncodeError> for H224HandlerError {
    fn from(err: Q922EncodeError) -> Self {
        H224HandlerError::Encode(err)
    }
}

impl fmt::Display for H224HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            H224HandlerError::Decode(err) => write!(f, "decoding of H.224 frame failed: {err}"),
            H224HandlerError::Encode(err) => write!(f, "encoding of H.224 frame failed: {err}"),
            H224HandlerError::ReservedClientId => {
                write!(f, "the CME client ID is reserved")
            }
            H224HandlerError::InvalidClientId(client_id) => {
                write!(f, "client {client_id:?} is not a valid client identification")
            }
            H224HandlerError::ClientAlreadyRegistered(client_id) => {
                write!(f, "client {client_id:?} is already registered")
            }
            H224HandlerError::ClientNotRegistered(client_id) => {
                write!(f, "client {client_id:?} is not registered")
            }
            H224HandlerError::TransmitDisabled => write!(f, "transmission is not started"),
            H224HandlerError::ClientDataTooLarge { size, max } => {
                write!(f, "client data of {size} octets exceeds maximum of {max}")
            }
        }
    }
}

impl std::error::Error for H224HandlerError {}
