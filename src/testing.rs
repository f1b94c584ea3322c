//! Host-side test doubles for the hardware traits.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation};

use crate::app::{Indicator, SerialPort};
use crate::config::{EEPROM_I2C_ADDRESS, KEYPAD_COLS, KEYPAD_ROWS};
use crate::keypad::Keypad;
use crate::sampling::LightSensor;
use crate::storage::ByteStore;

// ── Storage ──────────────────────────────────────────────────────────────

/// 256 zeroed bytes with a write journal.
pub struct RamStore {
    pub bytes: [u8; 256],
    pub writes: Vec<(u8, u8)>,
    pub settles: usize,
    pub fail: bool,
}

impl RamStore {
    pub fn new() -> Self {
        Self {
            bytes: [0; 256],
            writes: Vec::new(),
            settles: 0,
            fail: false,
        }
    }
}

impl ByteStore for RamStore {
    type Error = ();

    fn read_byte(&mut self, address: u8) -> Result<u8, ()> {
        if self.fail {
            return Err(());
        }
        Ok(self.bytes[address as usize])
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.bytes[address as usize] = value;
        self.writes.push((address, value));
        Ok(())
    }

    fn settle(&mut self) {
        self.settles += 1;
    }
}

/// Delay that only adds up what was requested.
#[derive(Default)]
pub struct MockDelay {
    total_ns: u64,
}

impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// 24C02 model: blank cells read 0xFF, one word-address pointer that
/// advances on every data byte.
pub struct MockEepromBus {
    pub cells: [u8; 256],
    pub addresses_seen: Vec<u8>,
    pointer: u8,
}

impl MockEepromBus {
    pub fn new() -> Self {
        Self {
            cells: [0xFF; 256],
            addresses_seen: Vec::new(),
            pointer: 0,
        }
    }
}

impl i2c::ErrorType for MockEepromBus {
    type Error = ErrorKind;
}

impl i2c::I2c for MockEepromBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.addresses_seen.push(address);
        if address != EEPROM_I2C_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&word, data)) = bytes.split_first() {
                        self.pointer = word;
                        for &b in data {
                            self.cells[self.pointer as usize] = b;
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.cells[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

// ── Keypad ───────────────────────────────────────────────────────────────

/// Yields one scripted key per read, then nothing.
pub struct ScriptedKeypad {
    keys: VecDeque<char>,
}

impl ScriptedKeypad {
    pub fn new(script: &str) -> Self {
        Self {
            keys: script.chars().collect(),
        }
    }
}

impl Keypad for ScriptedKeypad {
    fn read_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }
}

#[derive(Default)]
struct PinLog {
    high: bool,
    history: Vec<bool>,
}

/// Output pin that records every level it is driven to.
#[derive(Clone, Default)]
pub struct MockRowPin {
    log: Rc<RefCell<PinLog>>,
}

impl MockRowPin {
    pub fn is_high(&self) -> bool {
        self.log.borrow().high
    }

    pub fn transitions(&self) -> Vec<bool> {
        self.log.borrow().history.clone()
    }

    fn drive(&mut self, high: bool) {
        let mut log = self.log.borrow_mut();
        log.high = high;
        log.history.push(high);
    }
}

impl digital::ErrorType for MockRowPin {
    type Error = Infallible;
}

impl OutputPin for MockRowPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.drive(true);
        Ok(())
    }
}

/// Column input wired to a [`MatrixBench`]. Reads low when the pressed
/// key sits on this column and its row is being driven low.
pub struct MockColPin {
    col: usize,
    rows: [MockRowPin; KEYPAD_ROWS],
    pressed: Rc<Cell<Option<(usize, usize)>>>,
}

impl digital::ErrorType for MockColPin {
    type Error = Infallible;
}

impl InputPin for MockColPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(match self.pressed.get() {
            Some((r, c)) => c == self.col && !self.rows[r].is_high(),
            None => false,
        })
    }
}

/// A simulated 4×3 keypad with at most one key held.
pub struct MatrixBench {
    rows: [MockRowPin; KEYPAD_ROWS],
    pressed: Rc<Cell<Option<(usize, usize)>>>,
}

impl MatrixBench {
    pub fn new() -> Self {
        Self {
            rows: core::array::from_fn(|_| MockRowPin::default()),
            pressed: Rc::new(Cell::new(None)),
        }
    }

    pub fn rows(&self) -> [MockRowPin; KEYPAD_ROWS] {
        self.rows.clone()
    }

    pub fn cols(&self) -> [MockColPin; KEYPAD_COLS] {
        core::array::from_fn(|col| MockColPin {
            col,
            rows: self.rows.clone(),
            pressed: self.pressed.clone(),
        })
    }

    pub fn press(&self, row: usize, col: usize) {
        self.pressed.set(Some((row, col)));
    }

    pub fn release(&self) {
        self.pressed.set(None);
    }

    /// Row currently driven low, if any.
    pub fn active_row(&self) -> Option<usize> {
        self.rows.iter().position(|r| !r.is_high())
    }
}

// ── Sampling / board ─────────────────────────────────────────────────────

/// Light sensor stuck at one value.
pub struct FixedLight {
    pub value: u8,
    pub reads: usize,
}

impl FixedLight {
    pub fn new(value: u8) -> Self {
        Self { value, reads: 0 }
    }
}

impl LightSensor for FixedLight {
    fn read_light(&mut self) -> u8 {
        self.reads += 1;
        self.value
    }
}

/// All main-loop peripherals in one.
pub struct MockBoard {
    pub keys: ScriptedKeypad,
    pub light: FixedLight,
    pub tx: Vec<u8>,
    pub blinks: usize,
}

impl MockBoard {
    pub fn new(keys: &str, light: u8) -> Self {
        Self {
            keys: ScriptedKeypad::new(keys),
            light: FixedLight::new(light),
            tx: Vec::new(),
            blinks: 0,
        }
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }
}

impl Keypad for MockBoard {
    fn read_key(&mut self) -> Option<char> {
        self.keys.read_key()
    }
}

impl LightSensor for MockBoard {
    fn read_light(&mut self) -> u8 {
        self.light.read_light()
    }
}

impl SerialPort for MockBoard {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.tx.extend_from_slice(bytes);
    }
}

impl Indicator for MockBoard {
    fn blink(&mut self) {
        self.blinks += 1;
    }
}
