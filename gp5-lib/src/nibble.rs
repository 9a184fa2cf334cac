use modular_bitfield::prelude::*;

/// One byte carried as two 7-bit-clean data bytes.
///
/// The low nibble of the first wire byte is the high nibble of the value, the
/// low nibble of the second wire byte is its low nibble. Upper nibbles of the
/// wire bytes are ignored when decoding and zero when encoding.
#[bitfield(bytes = 2)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NibblePair {
    pub high: B4,
    #[skip]
    unused_hi: B4,
    pub low: B4,
    #[skip]
    unused_lo: B4,
}

impl NibblePair {
    /// Split a byte into its wire representation
    pub fn from_byte(value: u8) -> Self {
        NibblePair::new().with_high(value >> 4).with_low(value & 0x0F)
    }

    /// Reassemble the byte carried by this pair
    pub fn value(&self) -> u8 {
        (self.high() << 4) | self.low()
    }
}

impl From<[u8; 2]> for NibblePair {
    fn from(bytes: [u8; 2]) -> Self {
        NibblePair::from_bytes(bytes)
    }
}

impl From<NibblePair> for [u8; 2] {
    fn from(pair: NibblePair) -> Self {
        pair.into_bytes()
    }
}

/// Nibble-split `value` into two wire bytes, high nibble first
pub fn split(value: u8) -> [u8; 2] {
    NibblePair::from_byte(value).into()
}

/// Combine the low nibbles of two wire bytes into one byte
pub fn join(first: u8, second: u8) -> u8 {
    NibblePair::from([first, second]).value()
}
