mod h224_client_id;
mod h224_error;
mod h224_frame;

pub use h224_client_id::{
    H224ClientId, H224NonStandardClientId, client_id_extension_size, h224_header_size,
    segment_octet_offset,
};
pub use h224_error::H224DecodeError;
pub use h224_frame::H224Frame;
