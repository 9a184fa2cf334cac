//! Debounced reader for a 3-position guitar selector switch.
//!
//! The switch has two active-low contacts (pressed = pin LOW). Each contact
//! keeps an 8-bit history of its latest samples, newest in bit 0, and only
//! changes state when the masked history matches a settled pattern: the three
//! newest samples pressed while the two oldest tracked ones were released
//! closes the contact, the mirror image opens it. Anything else is bounce.

use crate::constants::{DEBOUNCE_CLOSED, DEBOUNCE_MASK, DEBOUNCE_OPENED, POLL_INTERVAL_MS};
use embedded_hal::digital::InputPin;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ContactState {
    #[strum(to_string = "opened")]
    Opened = 0,
    #[strum(to_string = "closed")]
    Closed = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum SwitchPosition {
    #[strum(to_string = "top")]
    Top = 0,
    #[strum(to_string = "middle")]
    Middle = 1,
    #[strum(to_string = "bottom")]
    Bottom = 2,
}

impl SwitchPosition {
    /// Combine the two contact states into a lever position.
    ///
    /// Both contacts closed cannot happen on a healthy switch and reads as
    /// `Middle`, same as both open.
    pub fn from_contacts(first: ContactState, second: ContactState) -> Self {
        match (first, second) {
            (ContactState::Closed, ContactState::Opened) => SwitchPosition::Top,
            (ContactState::Opened, ContactState::Closed) => SwitchPosition::Bottom,
            _ => SwitchPosition::Middle,
        }
    }
}

/// Debounce state of one switch contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchContact {
    id: u8,
    history: u8,
    state: ContactState,
}

impl SwitchContact {
    /// Seed a contact from a first raw reading
    pub fn new(id: u8, pressed: bool) -> Self {
        let (state, history) = if pressed {
            (ContactState::Closed, 0xFF)
        } else {
            (ContactState::Opened, 0x00)
        };
        Self { id, history, state }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn history(&self) -> u8 {
        self.history
    }

    pub fn state(&self) -> ContactState {
        self.state
    }

    /// Push one raw sample and return the new state if it changed
    pub fn sample(&mut self, pressed: bool) -> Option<ContactState> {
        self.history = (self.history << 1) | pressed as u8;

        let settled = match self.history & DEBOUNCE_MASK {
            DEBOUNCE_CLOSED => {
                self.history = 0xFF;
                ContactState::Closed
            }
            DEBOUNCE_OPENED => {
                self.history = 0x00;
                ContactState::Opened
            }
            _ => return None,
        };

        if settled == self.state {
            return None;
        }
        self.state = settled;
        debug!(contact = self.id, state = %settled, "Switch contact settled");
        Some(settled)
    }
}

/// Read an active-low pin; a failed read counts as released
fn read_pressed<P: InputPin>(pin: &mut P, id: u8) -> bool {
    match pin.is_low() {
        Ok(low) => low,
        Err(e) => {
            warn!(contact = id, error = ?e, "Pin read failed, treating contact as released");
            false
        }
    }
}

/// Two debounced contacts forming one 3-way selector.
///
/// Time is supplied by the caller as a wrapping millisecond counter.
pub struct GuitarSwitch<P1, P2> {
    pin1: P1,
    pin2: P2,
    contact1: SwitchContact,
    contact2: SwitchContact,
    last_poll_ms: u32,
    poll_interval_ms: u32,
}

impl<P1: InputPin, P2: InputPin> GuitarSwitch<P1, P2> {
    /// Take ownership of two pull-up input pins and seed both contacts
    pub fn begin(mut pin1: P1, mut pin2: P2, now_ms: u32) -> Self {
        let contact1 = SwitchContact::new(1, read_pressed(&mut pin1, 1));
        let contact2 = SwitchContact::new(2, read_pressed(&mut pin2, 2));
        debug!(
            contact1 = %contact1.state(),
            contact2 = %contact2.state(),
            "Guitar switch initialized"
        );

        Self {
            pin1,
            pin2,
            contact1,
            contact2,
            last_poll_ms: now_ms,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }

    pub fn with_poll_interval(mut self, interval_ms: u32) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Sample both contacts if the poll interval has elapsed.
    ///
    /// Returns the lever position when it differs from the one before this call.
    pub fn poll(&mut self, now_ms: u32) -> Option<SwitchPosition> {
        if now_ms.wrapping_sub(self.last_poll_ms) < self.poll_interval_ms {
            return None;
        }
        self.last_poll_ms = now_ms;

        let before = self.position();
        let pressed1 = read_pressed(&mut self.pin1, self.contact1.id());
        let pressed2 = read_pressed(&mut self.pin2, self.contact2.id());
        self.contact1.sample(pressed1);
        self.contact2.sample(pressed2);

        let after = self.position();
        (after != before).then_some(after)
    }

    pub fn position(&self) -> SwitchPosition {
        SwitchPosition::from_contacts(self.contact1.state(), self.contact2.state())
    }

    pub fn contacts(&self) -> (&SwitchContact, &SwitchContact) {
        (&self.contact1, &self.contact2)
    }

    /// Give the pins back
    pub fn release(self) -> (P1, P2) {
        (self.pin1, self.pin2)
    }
}
