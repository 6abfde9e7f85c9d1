use crate::{
    constants::{
        H224_BROADCAST, H224_BS_MASK, H224_C0_MASK, H224_C1_MASK, H224_CLIENT_ID_OFFSET,
        H224_CME_CLIENT_ID, H224_DEFAULT_CLIENT_DATA_SIZE, H224_DESTINATION_ADDRESS_OFFSET,
        H224_ES_MASK, H224_EXTENDED_CLIENT_ID, H224_HIGH_ORDER_ADDRESS,
        H224_HIGH_PRIORITY_LOW_ORDER_ADDRESS, H224_LOW_PRIORITY_LOW_ORDER_ADDRESS,
        H224_MAX_CLIENT_DATA_SIZE, H224_NON_STANDARD_CLIENT_ID, H224_SEGMENT_NUMBER_MASK,
        H224_SOURCE_ADDRESS_OFFSET, H224_STANDARD_HEADER_SIZE, H224_UI_MODE_CONTROL_FIELD,
    },
    pdu::{
        H224ClientId, H224DecodeError, H224NonStandardClientId, h224_header_size,
        segment_octet_offset,
    },
    q922::{Q922EncodeError, Q922Frame},
};

/// An H.224 PDU carried in a Q.922 frame.
///
/// `H224Frame` has no storage of its own: every field is read from and
/// written to the wrapped `Q922Frame`. The information field is laid out as
///
/// ```text
/// [destination address: u16 BE][source address: u16 BE][client ID]
/// [extended client ID | country code, extension, manufacturer code: u16 BE, manufacturer client ID]
/// [BS | ES | C1 | C0 | segment number: 4 bits]
/// [client data ...]
/// ```
///
/// The bracketed client identification octets only exist for extended
/// (`0x7E`) and non-standard (`0x7F`) client IDs, so the segmentation octet
/// and client data move with the client ID. Set the client ID before touching
/// segmentation fields or client data.
///
/// Accessors are bounds checked: reading a field the information field is too
/// short to hold yields zero, and writing it does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct H224Frame {
    frame: Q922Frame,
}

impl Default for H224Frame {
    fn default() -> Self {
        Self::new(H224_DEFAULT_CLIENT_DATA_SIZE)
    }
}

impl AsRef<Q922Frame> for H224Frame {
    fn as_ref(&self) -> &Q922Frame {
        &self.frame
    }
}

impl TryFrom<Q922Frame> for H224Frame {
    type Error = H224DecodeError;

    fn try_from(frame: Q922Frame) -> Result<Self, Self::Error> {
        validate(&frame)?;
        Ok(Self { frame })
    }
}

impl H224Frame {
    /// Creates a normal priority, broadcast CME frame with all segmentation
    /// bits cleared and `client_data_size` zeroed octets of client data.
    ///
    /// Sizes beyond `H224_MAX_CLIENT_DATA_SIZE` are clamped to it.
    pub fn new(client_data_size: usize) -> Self {
        let client_data_size = client_data_size.min(H224_MAX_CLIENT_DATA_SIZE);

        let mut frame = Self {
            frame: Q922Frame::new(H224_STANDARD_HEADER_SIZE + client_data_size),
        };

        frame.set_high_priority(false);
        frame.frame.set_control_field_octet(H224_UI_MODE_CONTROL_FIELD);
        frame.set_destination_terminal_address(H224_BROADCAST);
        frame.set_source_terminal_address(H224_BROADCAST);
        frame.set_client_id(H224_CME_CLIENT_ID);
        frame.set_bs(false);
        frame.set_es(false);
        frame.set_c1(false);
        frame.set_c0(false);
        frame.set_segment_number(0);

        frame
    }

    /// Creates a frame like `new` with its client identification set to `client`.
    pub fn for_client(client: &H224ClientId, client_data_size: usize) -> Self {
        let mut frame = Self::new(client_data_size);
        frame.set_client(client);

        frame
    }

    pub fn q922_frame(&self) -> &Q922Frame {
        &self.frame
    }

    pub fn into_q922_frame(self) -> Q922Frame {
        self.frame
    }

    pub fn is_high_priority(&self) -> bool {
        self.frame.low_order_address_octet() == H224_HIGH_PRIORITY_LOW_ORDER_ADDRESS
    }

    pub fn set_high_priority(&mut self, high_priority: bool) {
        self.frame.set_high_order_address_octet(H224_HIGH_ORDER_ADDRESS);

        if high_priority {
            self.frame
                .set_low_order_address_octet(H224_HIGH_PRIORITY_LOW_ORDER_ADDRESS);
        } else {
            self.frame
                .set_low_order_address_octet(H224_LOW_PRIORITY_LOW_ORDER_ADDRESS);
        }
    }

    pub fn destination_terminal_address(&self) -> u16 {
        self.read_u16(H224_DESTINATION_ADDRESS_OFFSET)
    }

    pub fn set_destination_terminal_address(&mut self, address: u16) {
        self.write_u16(H224_DESTINATION_ADDRESS_OFFSET, address);
    }

    pub fn source_terminal_address(&self) -> u16 {
        self.read_u16(H224_SOURCE_ADDRESS_OFFSET)
    }

    pub fn set_source_terminal_address(&mut self, address: u16) {
        self.write_u16(H224_SOURCE_ADDRESS_OFFSET, address);
    }

    pub fn client_id(&self) -> u8 {
        self.read_u8(H224_CLIENT_ID_OFFSET) & 0x7F
    }

    /// Sets the 7-bit client ID.
    ///
    /// The client data size is kept: the information field grows or shrinks
    /// with the client identification so the client data area keeps its
    /// length at its new offset.
    pub fn set_client_id(&mut self, client_id: u8) {
        let client_data_size = self.client_data_size();

        if self.frame.information_field_size() <= H224_CLIENT_ID_OFFSET {
            self.frame
                .resize_information_field_clamped(H224_STANDARD_HEADER_SIZE);
        }
        self.write_u8(H224_CLIENT_ID_OFFSET, client_id & 0x7F);

        self.frame
            .resize_information_field_clamped(h224_header_size(client_id) + client_data_size);
    }

    /// Returns 0 unless the client ID is `H224_EXTENDED_CLIENT_ID`.
    pub fn extended_client_id(&self) -> u8 {
        if self.client_id() != H224_EXTENDED_CLIENT_ID {
            return 0x00;
        }

        self.read_u8(H224_CLIENT_ID_OFFSET + 1)
    }

    /// Does nothing unless the client ID is `H224_EXTENDED_CLIENT_ID`.
    pub fn set_extended_client_id(&mut self, extended_client_id: u8) {
        if self.client_id() != H224_EXTENDED_CLIENT_ID {
            return;
        }

        self.write_u8(H224_CLIENT_ID_OFFSET + 1, extended_client_id);
    }

    /// Returns 0 unless the client ID is `H224_NON_STANDARD_CLIENT_ID`.
    pub fn country_code(&self) -> u8 {
        self.non_standard_u8(1)
    }

    /// Returns 0 unless the client ID is `H224_NON_STANDARD_CLIENT_ID`.
    pub fn country_code_extension(&self) -> u8 {
        self.non_standard_u8(2)
    }

    /// Returns 0 unless the client ID is `H224_NON_STANDARD_CLIENT_ID`.
    pub fn manufacturer_code(&self) -> u16 {
        if self.client_id() != H224_NON_STANDARD_CLIENT_ID {
            return 0x0000;
        }

        self.read_u16(H224_CLIENT_ID_OFFSET + 3)
    }

    /// Returns 0 unless the client ID is `H224_NON_STANDARD_CLIENT_ID`.
    pub fn manufacturer_client_id(&self) -> u8 {
        self.non_standard_u8(5)
    }

    /// Does nothing unless the client ID is `H224_NON_STANDARD_CLIENT_ID`.
    pub fn set_non_standard_client_information(
        &mut self,
        country_code: u8,
        country_code_extension: u8,
        manufacturer_code: u16,
        manufacturer_client_id: u8,
    ) {
        if self.client_id() != H224_NON_STANDARD_CLIENT_ID {
            return;
        }

        self.write_u8(H224_CLIENT_ID_OFFSET + 1, country_code);
        self.write_u8(H224_CLIENT_ID_OFFSET + 2, country_code_extension);
        self.write_u16(H224_CLIENT_ID_OFFSET + 3, manufacturer_code);
        self.write_u8(H224_CLIENT_ID_OFFSET + 5, manufacturer_client_id);
    }

    /// The complete client identification of this frame.
    pub fn client(&self) -> H224ClientId {
        match self.client_id() {
            H224_EXTENDED_CLIENT_ID => H224ClientId::Extended(self.extended_client_id()),
            H224_NON_STANDARD_CLIENT_ID => H224ClientId::NonStandard(H224NonStandardClientId {
                country_code: self.country_code(),
                country_code_extension: self.country_code_extension(),
                manufacturer_code: self.manufacturer_code(),
                manufacturer_client_id: self.manufacturer_client_id(),
            }),
            standard => H224ClientId::Standard(standard),
        }
    }

    /// Sets the client ID and, for extended and non-standard clients, the
    /// identification octets that follow it.
    pub fn set_client(&mut self, client: &H224ClientId) {
        self.set_client_id(client.raw_id());

        match client {
            H224ClientId::Standard(_) => {}
            H224ClientId::Extended(extended_client_id) => {
                self.set_extended_client_id(*extended_client_id)
            }
            H224ClientId::NonStandard(non_standard) => self.set_non_standard_client_information(
                non_standard.country_code,
                non_standard.country_code_extension,
                non_standard.manufacturer_code,
                non_standard.manufacturer_client_id,
            ),
        }
    }

    /// Begin segment.
    pub fn bs(&self) -> bool {
        self.segment_flag(H224_BS_MASK)
    }

    pub fn set_bs(&mut self, bs: bool) {
        self.set_segment_flag(H224_BS_MASK, bs);
    }

    /// End segment.
    pub fn es(&self) -> bool {
        self.segment_flag(H224_ES_MASK)
    }

    pub fn set_es(&mut self, es: bool) {
        self.set_segment_flag(H224_ES_MASK, es);
    }

    pub fn c1(&self) -> bool {
        self.segment_flag(H224_C1_MASK)
    }

    pub fn set_c1(&mut self, c1: bool) {
        self.set_segment_flag(H224_C1_MASK, c1);
    }

    pub fn c0(&self) -> bool {
        self.segment_flag(H224_C0_MASK)
    }

    pub fn set_c0(&mut self, c0: bool) {
        self.set_segment_flag(H224_C0_MASK, c0);
    }

    pub fn segment_number(&self) -> u8 {
        self.read_u8(self.segment_octet_offset()) & H224_SEGMENT_NUMBER_MASK
    }

    /// Only the low 4 bits of `segment_number` are stored.
    pub fn set_segment_number(&mut self, segment_number: u8) {
        let offset = self.segment_octet_offset();
        let octet = self.read_u8(offset) & !H224_SEGMENT_NUMBER_MASK;
        self.write_u8(offset, octet | (segment_number & H224_SEGMENT_NUMBER_MASK));
    }

    /// Size of the H.224 header for the current client ID.
    pub fn header_size(&self) -> usize {
        h224_header_size(self.client_id())
    }

    pub fn client_data(&self) -> &[u8] {
        self.frame
            .information_field()
            .get(self.header_size()..)
            .unwrap_or_default()
    }

    pub fn client_data_mut(&mut self) -> &mut [u8] {
        let header_size = self.header_size();
        self.frame
            .information_field_mut()
            .get_mut(header_size..)
            .unwrap_or_default()
    }

    pub fn client_data_size(&self) -> usize {
        self.frame
            .information_field_size()
            .saturating_sub(self.header_size())
    }

    pub fn set_client_data_size(&mut self, size: usize) -> Result<(), Q922EncodeError> {
        let information_field_size = self.header_size().checked_add(size).ok_or(
            Q922EncodeError::InformationFieldTooLarge {
                size,
                max: H224_MAX_CLIENT_DATA_SIZE,
            },
        )?;

        self.frame.set_information_field_size(information_field_size)
    }

    /// Resizes the client data area to `data.len()` and copies `data` into it.
    pub fn set_client_data(&mut self, data: &[u8]) -> Result<(), Q922EncodeError> {
        self.set_client_data_size(data.len())?;
        self.client_data_mut().copy_from_slice(data);

        Ok(())
    }

    /// Decodes an H.323 Annex Q encoded frame and checks it is a valid H.224 PDU.
    ///
    /// On error the frame contents are unspecified and must not be used.
    pub fn decode(&mut self, data: &[u8]) -> Result<(), H224DecodeError> {
        self.frame.decode_annex_q(data)?;
        validate(&self.frame)
    }

    /// Decodes the first HDLC frame in `data` and checks it is a valid H.224 PDU.
    ///
    /// On error the frame contents are unspecified and must not be used.
    pub fn decode_hdlc(&mut self, data: &[u8]) -> Result<(), H224DecodeError> {
        self.frame.decode_hdlc(data)?;
        validate(&self.frame)
    }

    fn segment_octet_offset(&self) -> usize {
        segment_octet_offset(self.client_id())
    }

    fn segment_flag(&self, mask: u8) -> bool {
        self.read_u8(self.segment_octet_offset()) & mask != 0
    }

    fn set_segment_flag(&mut self, mask: u8, value: bool) {
        let offset = self.segment_octet_offset();
        let octet = self.read_u8(offset);

        if value {
            self.write_u8(offset, octet | mask);
        } else {
            self.write_u8(offset, octet & !mask);
        }
    }

    fn non_standard_u8(&self, offset_from_client_id: usize) -> u8 {
        if self.client_id() != H224_NON_STANDARD_CLIENT_ID {
            return 0x00;
        }

        self.read_u8(H224_CLIENT_ID_OFFSET + offset_from_client_id)
    }

    fn read_u8(&self, offset: usize) -> u8 {
        self.frame
            .information_field()
            .get(offset)
            .copied()
            .unwrap_or(0)
    }

    fn write_u8(&mut self, offset: usize, value: u8) {
        if let Some(octet) = self.frame.information_field_mut().get_mut(offset) {
            *octet = value;
        }
    }

    fn read_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.read_u8(offset), self.read_u8(offset + 1)])
    }

    fn write_u16(&mut self, offset: usize, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.write_u8(offset, high);
        self.write_u8(offset + 1, low);
    }
}

/// Checks the Q.922 header carries H.224 values and the information field
/// holds the complete header its client ID requires.
fn validate(frame: &Q922Frame) -> Result<(), H224DecodeError> {
    let high = frame.high_order_address_octet();
    let low = frame.low_order_address_octet();

    if high != H224_HIGH_ORDER_ADDRESS
        || (low != H224_LOW_PRIORITY_LOW_ORDER_ADDRESS
            && low != H224_HIGH_PRIORITY_LOW_ORDER_ADDRESS)
    {
        return Err(H224DecodeError::InvalidAddress { high, low });
    }

    let control = frame.control_field_octet();
    if control != H224_UI_MODE_CONTROL_FIELD {
        return Err(H224DecodeError::InvalidControl(control));
    }

    let information_field = frame.information_field();
    let required = match information_field.get(H224_CLIENT_ID_OFFSET) {
        Some(&client_id) => h224_header_size(client_id),
        None => H224_STANDARD_HEADER_SIZE,
    };

    if information_field.len() < required {
        return Err(H224DecodeError::HeaderTruncated {
            required,
            available: information_field.len(),
        });
    }

    Ok(())
}
