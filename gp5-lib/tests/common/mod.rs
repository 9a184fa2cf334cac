//! Common test utilities and shared imports

// Shared across several test files, not every item is used by each of them
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use gp5_lib::checksum::{crc8, sysex_checksum};
#[allow(unused_imports)]
pub use gp5_lib::constants::*;
#[allow(unused_imports)]
pub use gp5_lib::error::Gp5Error;
#[allow(unused_imports)]
pub use gp5_lib::message::{PresetResponse, Request};
#[allow(unused_imports)]
pub use gp5_lib::switch::{ContactState, GuitarSwitch, SwitchContact, SwitchPosition};
#[allow(unused_imports)]
pub use gp5_lib::sysex::{
    SysexHeader, build_sysex, build_sysex_into, current_preset_request, decode_op, decode_preset_no, message_offset,
    verify_sysex,
};

use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin};
use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

/// Route library logs to the test output, honouring RUST_LOG
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

/// Current-preset request as sent on the wire
#[allow(dead_code)]
pub const PRESET_REQUEST_HEX: &str = "8080f0000700010000000201020403f7";

/// Synthetic response: op pair (0x0, 0x5) at +11, preset pair (0x2, 0x3) at +13,
/// preceded by two bytes of transport noise
#[allow(dead_code)]
pub const PRESET_RESPONSE: &[u8] = &[
    0x80, 0x80, 0xF0, 0x03, 0x0A, 0x00, 0x01, 0x00, 0x00, 0x00, 0x04, 0x01, 0x02, 0x00, 0x05, 0x02, 0x03, 0xF7,
];

/// Input pin whose level is driven by the test through a shared handle
#[derive(Clone, Default)]
pub struct TestPin {
    low: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl TestPin {
    pub fn new(pressed: bool) -> Self {
        let pin = Self::default();
        pin.set_pressed(pressed);
        pin
    }

    /// Pressed contacts pull the pin low
    pub fn set_pressed(&self, pressed: bool) {
        self.low.set(pressed);
    }
}

impl ErrorType for TestPin {
    type Error = Infallible;
}

impl InputPin for TestPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.low.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.low.get())
    }
}

/// Error returned by [`FaultyPin`]
#[allow(dead_code)]
#[derive(Debug)]
pub struct ReadFault;

impl Error for ReadFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Input pin that fails every read
#[allow(dead_code)]
pub struct FaultyPin;

impl ErrorType for FaultyPin {
    type Error = ReadFault;
}

impl InputPin for FaultyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(ReadFault)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(ReadFault)
    }
}
