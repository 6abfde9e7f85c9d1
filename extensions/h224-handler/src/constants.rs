// Client Management Entity (CME) message codes

/// Client list message / command.
pub const CME_CLIENT_LIST_CODE: u8 = 0x01;

/// Extra capabilities message / command.
pub const CME_EXTRA_CAPABILITIES_CODE: u8 = 0x02;

/// Second octet of a CME PDU that carries information.
pub const CME_RESPONSE_MESSAGE: u8 = 0x00;

/// Second octet of a CME PDU that requests information.
pub const CME_RESPONSE_COMMAND: u8 = 0xFF;

/// Set in a client ID octet of a CME PDU when the client has extra capabilities.
pub const CME_EXTRA_CAPABILITIES_FLAG: u8 = 0x80;

/// Timestamp units per millisecond on outgoing packets (8 kHz clock).
pub const H224_TIMESTAMP_UNITS_PER_MILLISECOND: u64 = 8;
