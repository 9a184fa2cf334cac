//! CRC-8 used by the GP5 to protect SysEx messages.
//!
//! The checksum is not computed over the wire bytes directly. The bytes after
//! the checksum field are read as nibble pairs, each pair is packed back into
//! one byte, and CRC-8 (polynomial 0x07, initial value 0x00, MSB first) runs
//! over the packed sequence.

use crate::constants::{CHECKSUM_MAX_BYTES, CRC8_POLY};
use crate::error::Gp5Error;
use crate::nibble;

/// Bytes before the checksummed region: `0xF0` and the two checksum nibbles
const SKIPPED_PREFIX: usize = 3;

/// Plain bit-wise CRC-8 over `data`
pub fn crc8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |crc, &byte| {
        (0..8).fold(crc ^ byte, |crc, _| {
            if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLY
            } else {
                crc << 1
            }
        })
    })
}

/// Checksum of a SysEx message.
///
/// `window` must start at the `0xF0` start byte and end with the `0xF7`
/// terminator. The checksum field itself is skipped, so its content does not
/// matter. A trailing unpaired byte before the terminator is ignored.
pub fn sysex_checksum(window: &[u8]) -> Result<u8, Gp5Error> {
    if window.len() < SKIPPED_PREFIX + 1 {
        return Err(Gp5Error::Truncated {
            expected: SKIPPED_PREFIX + 1,
            actual: window.len(),
        });
    }

    let covered = &window[SKIPPED_PREFIX..window.len() - 1];
    let packed_len = covered.len() / 2;
    if packed_len > CHECKSUM_MAX_BYTES {
        return Err(Gp5Error::ChecksumWindowExceeded {
            bytes: packed_len,
            max: CHECKSUM_MAX_BYTES,
        });
    }

    let mut packed = [0u8; CHECKSUM_MAX_BYTES];
    for (slot, pair) in packed.iter_mut().zip(covered.chunks_exact(2)) {
        *slot = nibble::join(pair[0], pair[1]);
    }

    Ok(crc8(&packed[..packed_len]))
}
