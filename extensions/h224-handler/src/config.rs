use h224::constants::H224_DEFAULT_CLIENT_DATA_SIZE;

/// How frames are put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum H224Framing {
    /// Flag delimited, bit-stuffed, FCS protected.
    #[default]
    Hdlc,

    /// H.323 Annex Q, for transports that delimit frames themselves.
    AnnexQ,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct H224HandlerConfig {
    pub framing: H224Framing,

    /// Largest client data area accepted for outgoing client frames and
    /// extra capabilities messages.
    pub max_client_data_size: usize,
}

impl Default for H224HandlerConfig {
    fn default() -> Self {
        Self {
            framing: H224Framing::default(),
            max_client_data_size: H224_DEFAULT_CLIENT_DATA_SIZE,
        }
    }
}
