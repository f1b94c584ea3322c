//! Unified error type for the datalogger.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The non-volatile log could not complete an operation.
    Storage(StorageError),

    /// A response did not fit in `RESPONSE_CAPACITY`.
    ResponseOverflow,
}

/// Failures of the EEPROM-backed sample log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// I²C transaction to the EEPROM failed.
    Bus,

    /// Occupancy counter already addresses the last byte of the device.
    Full,
}

impl StorageError {
    /// Short text used in serial `ERROR:` replies.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Bus => "storage bus",
            Self::Full => "storage full",
        }
    }
}

// Convenience conversions

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::Storage(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Storage(e) => f.write_str(e.reason()),
            Error::ResponseOverflow => f.write_str("response overflow"),
        }
    }
}
