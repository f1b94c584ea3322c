//! Keypad control surface.
//!
//! A 4×3 matrix is scanned for single key presses ([`matrix`]) and the
//! presses are interpreted as `#<digit>*` sequences ([`sequencer`]).
//!
//! | sequence | command |
//! |---|---|
//! | `#1*` | blink the indicator |
//! | `#2*` | take and store one sample |
//! | `#3*` | arm automatic sampling |
//! | `#4*` | disarm automatic sampling |

pub mod matrix;
pub mod sequencer;

pub use matrix::KeyMatrix;
pub use sequencer::{KeypadSequencer, Stage};

/// Source of raw key presses. Returns each press once.
pub trait Keypad {
    fn read_key(&mut self) -> Option<char>;
}

/// Commands a completed keypad sequence can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadCommand {
    /// `#1*`
    Blink,
    /// `#2*`
    Record,
    /// `#3*`
    AutoOn,
    /// `#4*`
    AutoOff,
}

impl KeypadCommand {
    pub fn from_digit(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::Blink),
            '2' => Some(Self::Record),
            '3' => Some(Self::AutoOn),
            '4' => Some(Self::AutoOff),
            _ => None,
        }
    }

    pub fn digit(&self) -> char {
        match self {
            Self::Blink => '1',
            Self::Record => '2',
            Self::AutoOn => '3',
            Self::AutoOff => '4',
        }
    }
}
