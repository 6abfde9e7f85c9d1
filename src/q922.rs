mod q922_error;
mod q922_fcs;
mod q922_frame;
mod q922_hdlc_decoder;
mod q922_hdlc_encoder;
mod q922_stream_decoder;

pub use q922_error::{Q922DecodeError, Q922EncodeError};
pub use q922_fcs::calculate_fcs;
pub use q922_frame::Q922Frame;
pub use q922_hdlc_encoder::HdlcEncoded;
pub use q922_stream_decoder::{Q922DecoderIterator, Q922StreamDecoder};
