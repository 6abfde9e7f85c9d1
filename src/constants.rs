// Q.922 frame related constants

/// Size of the Q.922 header: high order address, low order address, control.
pub const Q922_HEADER_SIZE: usize = 3;
pub const Q922_HIGH_ORDER_ADDRESS_OFFSET: usize = 0;
pub const Q922_LOW_ORDER_ADDRESS_OFFSET: usize = 1;
pub const Q922_CONTROL_FIELD_OFFSET: usize = 2;

/// HDLC flag sequence `01111110`.
pub const Q922_FLAG: u8 = 0x7E;

/// Size in bytes of the HDLC frame check sequence (CRC-16).
pub const Q922_FCS_SIZE: usize = 2;

/// Smallest destuffed HDLC frame: header plus FCS, empty information field.
pub const Q922_MIN_HDLC_FRAME_SIZE: usize = Q922_HEADER_SIZE + Q922_FCS_SIZE;

/// Size of the big-endian length prefix used by H.323 Annex Q framing.
pub const Q922_ANNEX_Q_LENGTH_FIELD_SIZE: usize = 2;

/// Information field size used by `Q922Frame::default()`.
pub const Q922_DEFAULT_INFORMATION_FIELD_SIZE: usize = 260;

/// Largest information field whose Annex Q length (header included) still
/// fits the 2-octet length prefix.
pub const Q922_MAX_INFORMATION_FIELD_SIZE: usize = u16::MAX as usize - Q922_HEADER_SIZE;

/// Bit position meaning "start on an octet boundary" for `encode_hdlc_at`.
pub const Q922_OCTET_ALIGNED_BIT_POSITION: u8 = 7;

// H.224 related constants

/// Terminal address that addresses every terminal.
pub const H224_BROADCAST: u16 = 0x0000;

pub const H224_EXTENDED_CLIENT_ID: u8 = 0x7E;
pub const H224_NON_STANDARD_CLIENT_ID: u8 = 0x7F;

/// Client ID reserved for the Client Management Entity.
pub const H224_CME_CLIENT_ID: u8 = 0x00;

/// Client ID of H.281 far end camera control.
pub const H281_CLIENT_ID: u8 = 0x01;

/// T.35 country code escape, used as the "no country" placeholder.
pub const H224_COUNTRY_CODE_ESCAPE: u8 = 0xFF;

/// Q.922 high order address octet carried by every H.224 frame.
pub const H224_HIGH_ORDER_ADDRESS: u8 = 0x00;

/// Q.922 low order address octet marking a high priority frame.
pub const H224_HIGH_PRIORITY_LOW_ORDER_ADDRESS: u8 = 0x71;

/// Q.922 low order address octet marking a normal priority frame.
pub const H224_LOW_PRIORITY_LOW_ORDER_ADDRESS: u8 = 0x61;

/// Q.922 control field for unnumbered information (UI mode).
pub const H224_UI_MODE_CONTROL_FIELD: u8 = 0x03;

/// Byte offset (within the information field) of the destination terminal address.
pub const H224_DESTINATION_ADDRESS_OFFSET: usize = 0;

/// Byte offset (within the information field) of the source terminal address.
pub const H224_SOURCE_ADDRESS_OFFSET: usize = 2;

/// Byte offset (within the information field) of the client ID octet.
pub const H224_CLIENT_ID_OFFSET: usize = 4;

/// Octets following the client ID for an extended client.
pub const H224_EXTENDED_CLIENT_ID_SIZE: usize = 1;

/// Octets following the client ID for a non-standard client: country code,
/// country code extension, manufacturer code (2), manufacturer client ID.
pub const H224_NON_STANDARD_CLIENT_ID_SIZE: usize = 5;

/// Header size for a standard client: addresses (4), client ID, segmentation octet.
pub const H224_STANDARD_HEADER_SIZE: usize = H224_CLIENT_ID_OFFSET + 2;

/// Header size for a non-standard client, the largest possible header.
pub const H224_MAX_HEADER_SIZE: usize = H224_STANDARD_HEADER_SIZE + H224_NON_STANDARD_CLIENT_ID_SIZE;

/// Client data size used by `H224Frame::default()`.
pub const H224_DEFAULT_CLIENT_DATA_SIZE: usize = 254;

/// Largest client data area a frame can carry.
pub const H224_MAX_CLIENT_DATA_SIZE: usize = Q922_MAX_INFORMATION_FIELD_SIZE - H224_MAX_HEADER_SIZE;

// Segmentation octet bit masks
pub const H224_BS_MASK: u8 = 0x80;
pub const H224_ES_MASK: u8 = 0x40;
pub const H224_C1_MASK: u8 = 0x20;
pub const H224_C0_MASK: u8 = 0x10;
pub const H224_SEGMENT_NUMBER_MASK: u8 = 0x0F;
