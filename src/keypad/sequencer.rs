//! `#<digit>*` keypad command state machine.
//!
//! ```text
//!            '#'              '1'..'4'             '*'
//!   Idle ──────────► SawHash ─────────► SawDigit(d) ─────► Idle  emit d
//!    ▲                  │                │  ▲
//!    └──────── '*' ─────┘                └──┘ '1'..'4' (overwrite d)
//!
//!   '#' from any stage → SawHash (digit discarded)
//!   any other key      → stage unchanged
//! ```

#[cfg(feature = "defmt")]
use defmt::debug;

use super::{Keypad, KeypadCommand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Idle,
    SawHash,
    SawDigit(KeypadCommand),
}

/// One step of the transition table: `(next stage, emitted command)`.
pub fn transition(stage: Stage, key: char) -> (Stage, Option<KeypadCommand>) {
    match (stage, key, KeypadCommand::from_digit(key)) {
        (_, '#', _) => (Stage::SawHash, None),
        (Stage::SawHash | Stage::SawDigit(_), _, Some(cmd)) => (Stage::SawDigit(cmd), None),
        (Stage::SawDigit(cmd), '*', _) => (Stage::Idle, Some(cmd)),
        (Stage::SawHash, '*', _) => (Stage::Idle, None),
        (stage, _, _) => (stage, None),
    }
}

pub struct KeypadSequencer {
    stage: Stage,
}

impl KeypadSequencer {
    pub const fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Advance by one key.
    pub fn feed(&mut self, key: char) -> Option<KeypadCommand> {
        let (next, emitted) = transition(self.stage, key);
        #[cfg(feature = "defmt")]
        if next != self.stage {
            debug!("Keypad: {} -> {}", self.stage, next);
        } else if emitted.is_none() {
            debug!("Keypad: ignored '{}' in {}", key, self.stage);
        }
        self.stage = next;
        emitted
    }

    /// Read at most one key from `keypad` and advance.
    pub fn poll<K: Keypad + ?Sized>(&mut self, keypad: &mut K) -> Option<KeypadCommand> {
        keypad.read_key().and_then(|key| self.feed(key))
    }
}

impl Default for KeypadSequencer {
    fn default() -> Self {
        Self::new()
    }
}
