//! Outbound packet builder and inbound field decoder for the GP5 SysEx link.
//!
//! Outbound layout, framing included:
//!
//! ```text
//! [80][80][F0][CRC_hi][CRC_lo][00][01][00][00][LEN_hi][LEN_lo][01][TYPE][payload...][F7]
//! ```
//!
//! Inbound responses use a different layout; only the operation and preset
//! number nibble pairs are decoded from them, relative to the first `0xF0`.

use crate::checksum;
use crate::constants::{
    CHECKSUM_MAX_BYTES, CURRENT_PRESET_PAYLOAD, FRAMING, HEADER_SIZE, MAX_PAYLOAD_LEN, MESSAGE_CLASS,
    OP_CURRENT_PRESET, PACKET_OVERHEAD, RX_OP_OFFSET, RX_PRESET_OFFSET, SYSEX_END, SYSEX_START, TX_CAPACITY,
    VENDOR_ID,
};
use crate::error::Gp5Error;
use crate::nibble::{self, NibblePair};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Offset of the checksum pair inside a framed packet
const CHECKSUM_OFFSET: usize = FRAMING.len() + 1;

/// Fixed 11-byte header, from the SysEx start byte through the operation byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct SysexHeader {
    pub start: u8,
    /// Nibble-split checksum, zero until the packet is finalized
    pub checksum: [u8; 2],
    pub vendor: [u8; 4],
    /// Nibble-split payload length
    pub length: [u8; 2],
    pub class: u8,
    pub op: u8,
}

impl SysexHeader {
    pub fn new(payload_len: u8, op: u8) -> Self {
        Self {
            start: SYSEX_START,
            checksum: [0, 0],
            vendor: VENDOR_ID,
            length: nibble::split(payload_len),
            class: MESSAGE_CLASS,
            op,
        }
    }

    pub fn checksum(&self) -> u8 {
        NibblePair::from(self.checksum).value()
    }

    pub fn payload_len(&self) -> usize {
        NibblePair::from(self.length).value() as usize
    }
}

/// A verified outbound packet borrowed from its buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysexFrame<'a> {
    pub header: SysexHeader,
    pub payload: &'a [u8],
}

/// Check that a packet carrying `payload_len` bytes can be built into a buffer
/// of `capacity` bytes and returns its total size.
fn validate(payload_len: usize, capacity: usize) -> Result<usize, Gp5Error> {
    let required = PACKET_OVERHEAD + payload_len;
    if required > capacity {
        return Err(Gp5Error::CapacityExceeded { required, capacity });
    }
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(Gp5Error::PayloadTooLong(payload_len));
    }
    // everything after F0 and the checksum pair, terminator excluded
    let packed = (HEADER_SIZE - 3 + payload_len) / 2;
    if packed > CHECKSUM_MAX_BYTES {
        return Err(Gp5Error::ChecksumWindowExceeded {
            bytes: packed,
            max: CHECKSUM_MAX_BYTES,
        });
    }
    Ok(required)
}

/// Compute the checksum of a fully written framed packet and store it
fn seal(packet: &mut [u8]) -> Result<(), Gp5Error> {
    let crc = checksum::sysex_checksum(&packet[FRAMING.len()..])?;
    packet[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&nibble::split(crc));
    trace!(crc, packet = %hex::encode(&packet[..]), "Built SysEx packet");
    Ok(())
}

/// Build a framed outbound packet into a freshly allocated buffer
pub fn build_sysex(payload: &[u8], op: u8) -> Result<Bytes, Gp5Error> {
    let size = validate(payload.len(), TX_CAPACITY)?;

    let mut packet = BytesMut::with_capacity(size);
    packet.put_slice(&FRAMING);
    packet.put_slice(SysexHeader::new(payload.len() as u8, op).as_bytes());
    packet.put_slice(payload);
    packet.put_u8(SYSEX_END);
    seal(&mut packet)?;

    Ok(packet.freeze())
}

/// Build a framed outbound packet into caller storage and return its length.
///
/// Usable capacity is the smaller of `out.len()` and [`TX_CAPACITY`]. When the
/// packet does not fit, `out` is left untouched.
pub fn build_sysex_into(out: &mut [u8], payload: &[u8], op: u8) -> Result<usize, Gp5Error> {
    let capacity = out.len().min(TX_CAPACITY);
    let size = validate(payload.len(), capacity)?;

    let header = SysexHeader::new(payload.len() as u8, op);
    let packet = &mut out[..size];
    let (framing, rest) = packet.split_at_mut(FRAMING.len());
    framing.copy_from_slice(&FRAMING);
    let (head, body) = rest.split_at_mut(HEADER_SIZE);
    head.copy_from_slice(header.as_bytes());
    body[..payload.len()].copy_from_slice(payload);
    body[payload.len()] = SYSEX_END;
    seal(packet)?;

    Ok(size)
}

/// Request for the number of the preset currently active on the unit
pub fn current_preset_request() -> Result<Bytes, Gp5Error> {
    build_sysex(&CURRENT_PRESET_PAYLOAD, OP_CURRENT_PRESET)
}

/// Index of the first SysEx start byte in `buffer`
pub fn message_offset(buffer: &[u8]) -> Option<usize> {
    buffer.iter().position(|&b| b == SYSEX_START)
}

/// Decode the nibble pair `field` bytes after the start of the first message
fn decode_pair(buffer: &[u8], field: usize) -> Result<u8, Gp5Error> {
    let start = message_offset(buffer).ok_or(Gp5Error::MessageNotFound)?;
    let at = start + field;
    match buffer.get(at..at + 2) {
        Some(&[first, second]) => Ok(nibble::join(first, second)),
        _ => Err(Gp5Error::Truncated {
            expected: at + 2,
            actual: buffer.len(),
        }),
    }
}

/// Operation type of an inbound response
pub fn decode_op(buffer: &[u8]) -> Result<u8, Gp5Error> {
    decode_pair(buffer, RX_OP_OFFSET)
}

/// Preset number carried by an inbound response
pub fn decode_preset_no(buffer: &[u8]) -> Result<u8, Gp5Error> {
    decode_pair(buffer, RX_PRESET_OFFSET)
}

/// Parse a packet in the outbound layout and check its structure and checksum.
///
/// The leading transport framing is optional.
pub fn verify_sysex(packet: &[u8]) -> Result<SysexFrame<'_>, Gp5Error> {
    let bytes = packet.strip_prefix(&FRAMING[..]).unwrap_or(packet);

    let (header, rest) = SysexHeader::read_from_prefix(bytes).map_err(|_| Gp5Error::Truncated {
        expected: HEADER_SIZE,
        actual: bytes.len(),
    })?;

    if header.start != SYSEX_START {
        return Err(Gp5Error::InvalidPacket(format!(
            "Expected SysEx start byte, got {:#04x}",
            header.start
        )));
    }
    if header.vendor != VENDOR_ID || header.class != MESSAGE_CLASS {
        return Err(Gp5Error::InvalidPacket(format!(
            "Unexpected vendor id {:02x?} or message class {:#04x}",
            header.vendor, header.class
        )));
    }

    let payload_len = header.payload_len();
    if rest.len() < payload_len + 1 {
        return Err(Gp5Error::Truncated {
            expected: HEADER_SIZE + payload_len + 1,
            actual: bytes.len(),
        });
    }
    if rest[payload_len] != SYSEX_END {
        return Err(Gp5Error::InvalidPacket(format!(
            "Expected SysEx end byte after {} payload bytes, got {:#04x}",
            payload_len, rest[payload_len]
        )));
    }

    let computed = checksum::sysex_checksum(&bytes[..HEADER_SIZE + payload_len + 1])?;
    if computed != header.checksum() {
        return Err(Gp5Error::ChecksumMismatch {
            expected: computed,
            actual: header.checksum(),
        });
    }

    Ok(SysexFrame {
        header,
        payload: &rest[..payload_len],
    })
}
