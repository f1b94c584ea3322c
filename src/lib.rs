//! Host-testable core of the light-sensor datalogger.
//!
//! Everything here is `no_std` and hardware-agnostic: the line protocol,
//! the EEPROM sample stack, the keypad sequencer and the auto-sample
//! flags are written against `embedded-hal` traits and small local
//! traits, so they run unchanged under `cargo test` on the host.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary (`main.rs`, feature `embedded`) wires these
//! modules to the nRF52840 peripherals and owns the Embassy executors.

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod config;
pub mod error;
pub mod keypad;
pub mod protocol;
pub mod sampling;
pub mod serial;
pub mod storage;

#[cfg(test)]
mod testing;

pub use app::{Board, Datalogger, Indicator, Led, SerialPort, Shared};
pub use error::{Error, StorageError};
pub use keypad::{Keypad, KeypadCommand, KeypadSequencer};
pub use protocol::{Command, Response};
pub use sampling::{AutoSampleScheduler, LightSensor};
pub use serial::{LineBuffer, SerialInbox};
pub use storage::{ByteStore, Eeprom, NonVolatileLog};

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module Tests
// ═══════════════════════════════════════════════════════════════════════════
