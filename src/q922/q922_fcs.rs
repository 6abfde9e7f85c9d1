use once_cell::sync::Lazy;

/// Reflected form of the CCITT generator polynomial x^16 + x^12 + x^5 + 1.
const FCS_POLYNOMIAL: u16 = 0x8408;

const FCS_INITIAL: u16 = 0xFFFF;

/// Byte-at-a-time lookup table for the reflected CRC.
static FCS_TABLE: Lazy<[u16; 256]> = Lazy::new(|| {
    let mut table = [0u16; 256];

    for (index, entry) in table.iter_mut().enumerate() {
        let mut crc = index as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ FCS_POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
        *entry = crc;
    }

    table
});

/// Computes the 16-bit HDLC frame check sequence (CRC-16/X.25) over `data`.
///
/// The register starts at `0xFFFF` and the result is complemented, so the
/// returned value is ready to be transmitted low octet first.
#[inline]
pub fn calculate_fcs(data: &[u8]) -> u16 {
    let table = &*FCS_TABLE;

    let crc = data.iter().fold(FCS_INITIAL, |crc, &octet| {
        (crc >> 8) ^ table[((crc ^ octet as u16) & 0x00FF) as usize]
    });

    !crc
}
