//! Periodic auto-sampling flags.
//!
//! The tick runs at interrupt level and only mirrors `armed` into
//! `pending`. The main loop takes `pending`, does the slow work (ADC,
//! EEPROM, serial) and thereby clears it.

use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "defmt")]
use defmt::info;

pub struct AutoSampleScheduler {
    armed: AtomicBool,
    pending: AtomicBool,
}

impl AutoSampleScheduler {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
            pending: AtomicBool::new(false),
        }
    }

    pub fn arm(&self) {
        #[cfg(feature = "defmt")]
        info!("Auto-sampling armed");
        self.armed.store(true, Ordering::Release);
    }

    pub fn disarm(&self) {
        #[cfg(feature = "defmt")]
        info!("Auto-sampling disarmed");
        self.armed.store(false, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Timer callback. Flag-only.
    pub fn on_tick(&self) {
        let armed = self.armed.load(Ordering::Acquire);
        self.pending.store(armed, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Returns whether a sample is due and clears the request.
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

impl Default for AutoSampleScheduler {
    fn default() -> Self {
        Self::new()
    }
}
