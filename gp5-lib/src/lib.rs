pub mod checksum;
pub mod constants;
pub mod error;
pub mod message;
pub mod nibble;
pub mod switch;
pub mod sysex;


pub use error::Gp5Error;
pub use switch::{ContactState, GuitarSwitch, SwitchPosition};
pub use sysex::{build_sysex, current_preset_request, decode_op, decode_preset_no, message_offset};
