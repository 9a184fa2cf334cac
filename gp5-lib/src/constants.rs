// Protocol constants for the Valeton GP5 SysEx link

/// Transport framing bytes written ahead of every outbound packet
pub const FRAMING: [u8; 2] = [0x80, 0x80];

/// SysEx start byte
pub const SYSEX_START: u8 = 0xF0;

/// SysEx end byte
pub const SYSEX_END: u8 = 0xF7;

/// Opaque vendor/device identifier that follows the checksum field
pub const VENDOR_ID: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// Message class byte used for every outbound request
pub const MESSAGE_CLASS: u8 = 0x01;

/// Size of the header from SysEx start through the operation byte (11 bytes)
pub const HEADER_SIZE: usize = 11;

/// Bytes a packet carries on top of its payload: framing, header and terminator
pub const PACKET_OVERHEAD: usize = FRAMING.len() + HEADER_SIZE + 1;

/// Transmit buffer capacity, framing included
pub const TX_CAPACITY: usize = 1024;

/// Largest payload the nibble-split length field can describe
pub const MAX_PAYLOAD_LEN: usize = 0xFF;

/// Maximum number of reconstructed bytes the checksum routine accepts
pub const CHECKSUM_MAX_BYTES: usize = 64;

/// CRC-8 generator polynomial
pub const CRC8_POLY: u8 = 0x07;

/// Operation byte of the "current preset" request
pub const OP_CURRENT_PRESET: u8 = 0x02;

/// Payload of the "current preset" request
pub const CURRENT_PRESET_PAYLOAD: [u8; 2] = [0x04, 0x03];

/// Offset of the operation nibble pair in an inbound message, relative to `0xF0`
pub const RX_OP_OFFSET: usize = 11;

/// Offset of the preset number nibble pair in an inbound message, relative to `0xF0`
pub const RX_PRESET_OFFSET: usize = 13;

/// Minimum time between two switch samples, in milliseconds
pub const POLL_INTERVAL_MS: u32 = 10;

/// Mask applied to a contact history before matching a transition pattern
pub const DEBOUNCE_MASK: u8 = 0b1100_0111;

/// Masked history that settles a contact as closed
pub const DEBOUNCE_CLOSED: u8 = 0b0000_0111;

/// Masked history that settles a contact as opened
pub const DEBOUNCE_OPENED: u8 = 0b1100_0000;
