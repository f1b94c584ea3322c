//! Main-loop driver.
//!
//! Interrupt-level producers (serial RX, periodic tick) only touch
//! [`Shared`]. Everything slow (ADC, EEPROM, serial TX, the blink delay)
//! happens here, in thread mode, one step per [`Datalogger::poll`].

use core::convert::Infallible;
use core::fmt::Write;

#[cfg(feature = "defmt")]
use defmt::{error, info, warn};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{BLINK_HALF_PERIOD_MS, RESPONSE_CAPACITY};
use crate::error::Error;
use crate::keypad::{Keypad, KeypadCommand, KeypadSequencer};
use crate::protocol::{self, Command};
use crate::sampling::{AutoSampleScheduler, LightSensor};
use crate::serial::SerialInbox;
use crate::storage::{ByteStore, NonVolatileLog};

/// State written from interrupt context and read by the main loop.
pub struct Shared<M: RawMutex> {
    pub inbox: SerialInbox<M>,
    pub scheduler: AutoSampleScheduler,
}

impl<M: RawMutex> Shared<M> {
    pub fn new() -> Self {
        Self {
            inbox: SerialInbox::new(),
            scheduler: AutoSampleScheduler::new(),
        }
    }
}

impl<M: RawMutex> Default for Shared<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outgoing serial byte sink. Never blocks; may drop when saturated.
pub trait SerialPort {
    fn write_bytes(&mut self, bytes: &[u8]);
}

/// Visual feedback for the `#1*` keypad command.
pub trait Indicator {
    fn blink(&mut self);
}

/// Every peripheral the main loop talks to besides storage.
pub trait Board: Keypad + LightSensor + SerialPort + Indicator {}

impl<T: Keypad + LightSensor + SerialPort + Indicator> Board for T {}

/// GPIO LED driven through one blocking on/off cycle. The pin must be
/// infallible; its results are discarded.
pub struct Led<P, D> {
    pin: P,
    delay: D,
    active_low: bool,
}

impl<P: OutputPin<Error = Infallible>, D: DelayNs> Led<P, D> {
    pub fn new(mut pin: P, delay: D, active_low: bool) -> Self {
        let _ = if active_low { pin.set_high() } else { pin.set_low() };
        Self {
            pin,
            delay,
            active_low,
        }
    }

    fn set(&mut self, on: bool) {
        let _ = if on != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: OutputPin<Error = Infallible>, D: DelayNs> Indicator for Led<P, D> {
    fn blink(&mut self) {
        self.set(true);
        self.delay.delay_ms(BLINK_HALF_PERIOD_MS);
        self.set(false);
        self.delay.delay_ms(BLINK_HALF_PERIOD_MS);
    }
}

pub struct Datalogger<'a, S, M: RawMutex> {
    log: NonVolatileLog<S>,
    sequencer: KeypadSequencer,
    shared: &'a Shared<M>,
}

impl<'a, S, M> Datalogger<'a, S, M>
where
    S: ByteStore,
    M: RawMutex,
{
    pub fn new(store: S, shared: &'a Shared<M>) -> Self {
        Self {
            log: NonVolatileLog::new(store),
            sequencer: KeypadSequencer::new(),
            shared,
        }
    }

    pub fn log(&mut self) -> &mut NonVolatileLog<S> {
        &mut self.log
    }

    /// One main-loop iteration: keypad, then auto-sample, then serial.
    pub fn poll<B: Board + ?Sized>(&mut self, board: &mut B) {
        if let Some(cmd) = self.sequencer.poll(board) {
            self.run_keypad_command(cmd, board);
        }

        if self.shared.scheduler.take_pending() {
            self.auto_sample(board);
        }

        if let Some(line) = self.shared.inbox.take_line() {
            self.handle_line(line.token(), board);
        }

        let dropped = self.shared.inbox.take_dropped();
        if dropped > 0 {
            #[cfg(feature = "defmt")]
            warn!("Serial: dropped {} RX bytes", dropped);
        }
    }

    fn run_keypad_command<B: Board + ?Sized>(&mut self, cmd: KeypadCommand, board: &mut B) {
        #[cfg(feature = "defmt")]
        info!("Keypad command #{}*: {}", cmd.digit(), cmd);

        match cmd {
            KeypadCommand::Blink => board.blink(),
            KeypadCommand::Record => {
                let value = board.read_light();
                if let Err(_e) = self.log.append(value) {
                    #[cfg(feature = "defmt")]
                    error!("Keypad record failed: {}", _e);
                }
            }
            KeypadCommand::AutoOn => self.shared.scheduler.arm(),
            KeypadCommand::AutoOff => self.shared.scheduler.disarm(),
        }
    }

    fn auto_sample<B: Board + ?Sized>(&mut self, board: &mut B) {
        let value = board.read_light();
        if let Err(_e) = self.log.append(value) {
            #[cfg(feature = "defmt")]
            error!("Auto-sample not stored: {}", _e);
            return;
        }

        let mut out: heapless::String<RESPONSE_CAPACITY> = heapless::String::new();
        if write!(out, "{}\r\n", value).is_ok() {
            board.write_bytes(out.as_bytes());
        }
    }

    fn handle_line<B: Board + ?Sized>(&mut self, token: &[u8], board: &mut B) {
        let Some(cmd) = Command::parse(token) else {
            #[cfg(feature = "defmt")]
            warn!("Serial: unknown command {=[u8]:a}", token);
            return;
        };

        match protocol::execute(cmd, board, &mut self.log) {
            Ok(Some(response)) => board.write_bytes(response.as_bytes()),
            Ok(None) => {}
            Err(e) => {
                #[cfg(feature = "defmt")]
                error!("Serial command {} failed: {}", cmd, e);
                reply_error(board, e);
            }
        }

        if cmd == Command::Reset {
            self.shared.inbox.reset();
        }
    }
}

fn reply_error<B: SerialPort + ?Sized>(board: &mut B, e: Error) {
    let mut out: heapless::String<RESPONSE_CAPACITY> = heapless::String::new();
    if write!(out, "ERROR: {}\n", e).is_ok() {
        board.write_bytes(out.as_bytes());
    }
}
