//! Persistent sample log on a byte-addressable EEPROM.
//!
//! The log is a stack: address 0 holds the number of stored samples,
//! which is also the address of the newest one. Samples are appended
//! at `occupancy + 1` and never rewritten; a reset only zeroes the
//! counter, leaving old bytes unreachable rather than erased.
//!
//! Storage layout:
//! ```text
//! addr 0        occupancy (u8)
//! addr 1..=n    samples, oldest first
//! addr n+1..    stale or blank
//! ```
//!
//! An append is four bus transactions (read counter, write sample, write
//! counter, settle) and is not atomic with respect to power loss: a cut
//! between the sample write and the counter write loses that sample but
//! leaves the stack consistent.

pub mod eeprom;

#[cfg(feature = "defmt")]
use defmt::{debug, warn};

use crate::config::{LOG_CAPACITY, OCCUPANCY_ADDRESS};
use crate::error::StorageError;

pub use eeprom::Eeprom;

/// Byte-granular non-volatile memory.
///
/// Implementations perform their own bus settling inside each call.
pub trait ByteStore {
    type Error;

    fn read_byte(&mut self, address: u8) -> Result<u8, Self::Error>;

    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), Self::Error>;

    /// Extra settle at the end of a multi-write sequence.
    fn settle(&mut self) {}
}

/// Append-only sample stack over a [`ByteStore`].
pub struct NonVolatileLog<S> {
    store: S,
}

impl<S: ByteStore> NonVolatileLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Number of samples currently stored.
    pub fn occupancy(&mut self) -> Result<u8, StorageError> {
        self.store
            .read_byte(OCCUPANCY_ADDRESS)
            .map_err(|_| StorageError::Bus)
    }

    /// Append one sample. Returns the address it was written to.
    ///
    /// Fails with [`StorageError::Full`] once the counter reaches
    /// [`LOG_CAPACITY`]; the next increment would wrap onto the counter
    /// byte itself.
    pub fn append(&mut self, sample: u8) -> Result<u8, StorageError> {
        let count = self.occupancy()?;
        if count >= LOG_CAPACITY {
            #[cfg(feature = "defmt")]
            warn!("Log full ({} samples) - dropping {}", count, sample);
            return Err(StorageError::Full);
        }

        let address = count + 1;
        self.store
            .write_byte(address, sample)
            .map_err(|_| StorageError::Bus)?;
        self.store
            .write_byte(OCCUPANCY_ADDRESS, address)
            .map_err(|_| StorageError::Bus)?;
        self.store.settle();

        #[cfg(feature = "defmt")]
        debug!("Log: stored {} at {}", sample, address);
        Ok(address)
    }

    /// Raw byte at any address, counter included.
    pub fn read(&mut self, address: u8) -> Result<u8, StorageError> {
        self.store
            .read_byte(address)
            .map_err(|_| StorageError::Bus)
    }

    /// Truncate the log to zero samples. Sample bytes stay on the device.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.store
            .write_byte(OCCUPANCY_ADDRESS, 0)
            .map_err(|_| StorageError::Bus)
    }

    /// Give the underlying store back.
    pub fn release(self) -> S {
        self.store
    }
}
