use crate::constants::{
    H224_CLIENT_ID_OFFSET, H224_CME_CLIENT_ID, H224_EXTENDED_CLIENT_ID,
    H224_EXTENDED_CLIENT_ID_SIZE, H224_NON_STANDARD_CLIENT_ID, H224_NON_STANDARD_CLIENT_ID_SIZE,
};

/// T.35 identification of a manufacturer specific (non-standard) client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct H224NonStandardClientId {
    pub country_code: u8,
    pub country_code_extension: u8,
    pub manufacturer_code: u16,
    pub manufacturer_client_id: u8,
}

/// Full identification of an H.224 client.
///
/// Ordering follows the raw client ID first, then the extended client ID or
/// the non-standard fields in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum H224ClientId {
    /// A standard client, `0x00..=0x7D`. `0x00` is the CME.
    Standard(u8),

    /// Client ID `0x7E` followed by one extended client ID octet.
    Extended(u8),

    /// Client ID `0x7F` followed by the T.35 manufacturer identification.
    NonStandard(H224NonStandardClientId),
}

impl H224ClientId {
    /// The Client Management Entity.
    pub const CME: Self = Self::Standard(H224_CME_CLIENT_ID);

    /// Returns `None` for values reserved for extended or non-standard clients.
    pub fn standard(client_id: u8) -> Option<Self> {
        (client_id < H224_EXTENDED_CLIENT_ID).then_some(Self::Standard(client_id))
    }

    /// The 7-bit client ID octet as carried on the wire.
    pub fn raw_id(&self) -> u8 {
        match self {
            Self::Standard(id) => id & 0x7F,
            Self::Extended(_) => H224_EXTENDED_CLIENT_ID,
            Self::NonStandard(_) => H224_NON_STANDARD_CLIENT_ID,
        }
    }

    pub fn is_cme(&self) -> bool {
        *self == Self::CME
    }

    /// `false` for a `Standard` value outside `0x00..=0x7D`. Such a value
    /// collides with the extended or non-standard markers (or the high bit)
    /// and cannot be written to the wire and read back as itself.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Standard(id) if *id >= H224_EXTENDED_CLIENT_ID)
    }

    /// Number of octets this identification occupies, client ID octet included.
    pub fn encoded_size(&self) -> usize {
        1 + client_id_extension_size(self.raw_id())
    }

    /// Appends the identification to `buf`. `flags` is OR-ed into the client
    /// ID octet's high bit, as CME messages do for the extra capabilities flag.
    pub fn write_to(&self, buf: &mut Vec<u8>, flags: u8) {
        buf.push((flags & 0x80) | self.raw_id());

        match self {
            Self::Standard(_) => {}
            Self::Extended(extended_client_id) => buf.push(*extended_client_id),
            Self::NonStandard(non_standard) => {
                buf.push(non_standard.country_code);
                buf.push(non_standard.country_code_extension);
                buf.extend(&non_standard.manufacturer_code.to_be_bytes());
                buf.push(non_standard.manufacturer_client_id);
            }
        }
    }

    /// Parses an identification written by `write_to`.
    ///
    /// Returns the identification, the high bit of the client ID octet and
    /// the number of octets consumed, or `None` if `bytes` is too short.
    pub fn parse(bytes: &[u8]) -> Option<(Self, bool, usize)> {
        let (&first, rest) = bytes.split_first()?;
        let raw_id = first & 0x7F;
        let high_bit = first & 0x80 != 0;

        let client_id = match raw_id {
            H224_EXTENDED_CLIENT_ID => Self::Extended(*rest.first()?),
            H224_NON_STANDARD_CLIENT_ID => {
                let fields = rest.get(..H224_NON_STANDARD_CLIENT_ID_SIZE)?;
                Self::NonStandard(H224NonStandardClientId {
                    country_code: fields[0],
                    country_code_extension: fields[1],
                    manufacturer_code: u16::from_be_bytes([fields[2], fields[3]]),
                    manufacturer_client_id: fields[4],
                })
            }
            standard => Self::Standard(standard),
        };

        Some((client_id, high_bit, client_id.encoded_size()))
    }
}

/// Octets that follow the client ID octet for the given raw client ID.
pub fn client_id_extension_size(raw_client_id: u8) -> usize {
    match raw_client_id & 0x7F {
        H224_EXTENDED_CLIENT_ID => H224_EXTENDED_CLIENT_ID_SIZE,
        H224_NON_STANDARD_CLIENT_ID => H224_NON_STANDARD_CLIENT_ID_SIZE,
        _ => 0,
    }
}

/// Byte offset, within the information field, of the octet carrying
/// BS / ES / C1 / C0 and the segment number. It moves with the client ID.
pub fn segment_octet_offset(raw_client_id: u8) -> usize {
    H224_CLIENT_ID_OFFSET + 1 + client_id_extension_size(raw_client_id)
}

/// Size of the complete H.224 header (addresses, client identification,
/// segmentation octet) for the given raw client ID.
pub fn h224_header_size(raw_client_id: u8) -> usize {
    segment_octet_offset(raw_client_id) + 1
}
