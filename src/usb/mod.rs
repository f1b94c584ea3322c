//! USB device subsystem - presents a CDC-ACM virtual COM port to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. The serial command line runs over a single CDC-ACM
//! interface:
//!
//! - OUT endpoint: host → [`SerialInbox`](datalogger::SerialInbox), byte by byte
//! - IN endpoint:  [`SerialTxPipe`] → host, one packet at a time
//!
//! All USB tasks run on the interrupt-priority executor so reception keeps
//! going while the main loop is blocked on EEPROM settling or a blink.

pub mod cdc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;

use datalogger::config::SERIAL_TX_QUEUE_SIZE;

/// Byte queue from the main loop to the USB IN endpoint.
pub type SerialTxPipe = Pipe<CriticalSectionRawMutex, SERIAL_TX_QUEUE_SIZE>;
