use crate::constants::{CURRENT_PRESET_PAYLOAD, OP_CURRENT_PRESET};
use crate::error::Gp5Error;
use crate::sysex::{self, SysexFrame};
use bytes::Bytes;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Requests the controller sends to the unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Ask which preset is currently active
    CurrentPreset,
    /// Any other operation, payload passed through untouched
    Raw { op: u8, payload: Bytes },
}

impl Request {
    pub fn op(&self) -> u8 {
        match self {
            Request::CurrentPreset => OP_CURRENT_PRESET,
            Request::Raw { op, .. } => *op,
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Request::CurrentPreset => &CURRENT_PRESET_PAYLOAD,
            Request::Raw { payload, .. } => payload.as_ref(),
        }
    }

    /// Encode as a framed packet ready for the transport
    pub fn to_bytes(&self) -> Result<Bytes, Gp5Error> {
        sysex::build_sysex(self.payload(), self.op())
    }
}

impl From<SysexFrame<'_>> for Request {
    fn from(frame: SysexFrame<'_>) -> Self {
        if frame.header.op == OP_CURRENT_PRESET && frame.payload == CURRENT_PRESET_PAYLOAD {
            Request::CurrentPreset
        } else {
            Request::Raw {
                op: frame.header.op,
                payload: Bytes::copy_from_slice(frame.payload),
            }
        }
    }
}

impl TryFrom<&[u8]> for Request {
    type Error = Gp5Error;

    fn try_from(packet: &[u8]) -> Result<Self, Self::Error> {
        sysex::verify_sysex(packet).map(Request::from)
    }
}

/// Fields decoded from a response sent by the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PresetResponse {
    pub op: u8,
    pub preset: u8,
}

impl TryFrom<&[u8]> for PresetResponse {
    type Error = Gp5Error;

    fn try_from(buffer: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self {
            op: sysex::decode_op(buffer)?,
            preset: sysex::decode_preset_no(buffer)?,
        })
    }
}

impl fmt::Display for PresetResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op {:#04x}, preset {}", self.op, self.preset)
    }
}
