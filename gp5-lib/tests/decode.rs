//! Tests for locating and decoding inbound responses

mod common;

use common::*;

#[test]
fn test_message_offset() {
    assert_eq!(message_offset(&[0xF0, 0x01]), Some(0));
    assert_eq!(message_offset(&[0x80, 0x80, 0xF0, 0xF0]), Some(2));
    assert_eq!(message_offset(PRESET_RESPONSE), Some(2));
    assert_eq!(message_offset(&[0x80, 0x80, 0x00, 0xF7]), None);
    assert_eq!(message_offset(&[]), None);
}

#[test]
fn test_decode_response_fields() {
    assert_eq!(decode_op(PRESET_RESPONSE), Ok(0x05));
    assert_eq!(decode_preset_no(PRESET_RESPONSE), Ok(0x23));
}

#[test]
fn test_decode_after_building_request() {
    // request goes out, synthetic answer comes back
    let request = current_preset_request().unwrap();
    assert_eq!(request, hex_to_bytes(PRESET_REQUEST_HEX));

    let response = PresetResponse::try_from(PRESET_RESPONSE).expect("Failed to decode response");
    assert_eq!(response, PresetResponse { op: 0x05, preset: 0x23 });
}

#[test]
fn test_decode_reads_low_nibbles_only() {
    let mut buffer = PRESET_RESPONSE.to_vec();
    buffer[13] |= 0x70;
    buffer[16] |= 0x40;
    assert_eq!(decode_op(&buffer), Ok(0x05));
    assert_eq!(decode_preset_no(&buffer), Ok(0x23));
}

#[test]
fn test_decode_high_values_are_not_errors() {
    // 0xFF is a legitimate preset number, not an error marker
    let mut buffer = PRESET_RESPONSE.to_vec();
    buffer[15] = 0x0F;
    buffer[16] = 0x0F;
    assert_eq!(decode_preset_no(&buffer), Ok(0xFF));
}

#[test]
fn test_decode_without_message() {
    let buffer = [0x80, 0x80, 0x00, 0x01, 0x02];
    assert_eq!(decode_op(&buffer), Err(Gp5Error::MessageNotFound));
    assert_eq!(decode_preset_no(&buffer), Err(Gp5Error::MessageNotFound));
    assert_eq!(decode_op(&[]), Err(Gp5Error::MessageNotFound));
    assert!(PresetResponse::try_from(&buffer[..]).is_err());
}

#[test]
fn test_decode_truncated_buffer() {
    // op pair present, preset pair cut off
    let buffer = &PRESET_RESPONSE[..15];
    assert_eq!(decode_op(buffer), Ok(0x05));
    assert_eq!(
        decode_preset_no(buffer),
        Err(Gp5Error::Truncated { expected: 17, actual: 15 })
    );

    // only half of the op pair
    let buffer = &PRESET_RESPONSE[..14];
    assert_eq!(
        decode_op(buffer),
        Err(Gp5Error::Truncated { expected: 15, actual: 14 })
    );
}

#[test]
fn test_decode_minimum_lengths() {
    // message start at index 0: op needs 13 bytes, preset 15
    let mut buffer = vec![0u8; 15];
    buffer[0] = SYSEX_START;
    buffer[11] = 0x01;
    buffer[12] = 0x02;
    buffer[13] = 0x03;
    buffer[14] = 0x04;
    assert_eq!(decode_op(&buffer[..13]), Ok(0x12));
    assert!(decode_op(&buffer[..12]).is_err());
    assert_eq!(decode_preset_no(&buffer), Ok(0x34));
    assert!(decode_preset_no(&buffer[..14]).is_err());
}

#[test]
fn test_decode_uses_first_start_byte() {
    let mut buffer = vec![0u8; 15];
    buffer[0] = SYSEX_START;
    buffer[11] = 0x0A;
    buffer[12] = 0x0B;
    buffer.extend_from_slice(PRESET_RESPONSE);

    assert_eq!(message_offset(&buffer), Some(0));
    assert_eq!(decode_op(&buffer), Ok(0xAB));
}
