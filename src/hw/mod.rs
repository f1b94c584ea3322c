//! nRF52840 board wiring for the main loop.
//!
//! Bundles the keypad matrix, the light sensor channel, the indicator LED
//! and the serial TX queue behind the [`Board`](datalogger::Board) traits.
//! Everything here is used from thread mode only.

use datalogger::config::{KEYPAD_COLS, KEYPAD_ROWS, LIGHT_ADC_BITS};
use datalogger::keypad::matrix::ClockedMatrix;
use datalogger::sampling::scale_to_byte;
use datalogger::{Indicator, Keypad, Led, LightSensor, SerialPort};
use defmt::warn;
use embassy_futures::block_on;
use embassy_nrf::gpio::{Input, Output};
use embassy_nrf::saadc::Saadc;
use embassy_time::{Delay, Instant};

use crate::usb::SerialTxPipe;

pub type MatrixKeypad =
    ClockedMatrix<Output<'static>, Input<'static>, fn() -> u64, KEYPAD_ROWS, KEYPAD_COLS>;

pub type StatusLed = Led<Output<'static>, Delay>;

/// Monotonic milliseconds for keypad debouncing.
pub fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}

pub struct NrfBoard {
    keypad: MatrixKeypad,
    adc: Saadc<'static, 1>,
    led: StatusLed,
    tx: &'static SerialTxPipe,
}

impl NrfBoard {
    pub fn new(
        keypad: MatrixKeypad,
        adc: Saadc<'static, 1>,
        led: StatusLed,
        tx: &'static SerialTxPipe,
    ) -> Self {
        Self {
            keypad,
            adc,
            led,
            tx,
        }
    }
}

impl Keypad for NrfBoard {
    fn read_key(&mut self) -> Option<char> {
        self.keypad.read_key()
    }
}

impl LightSensor for NrfBoard {
    fn read_light(&mut self) -> u8 {
        let mut buf = [0i16; 1];
        block_on(self.adc.sample(&mut buf));
        // Single-ended readings can dip slightly below zero.
        scale_to_byte(buf[0].max(0) as u16, LIGHT_ADC_BITS)
    }
}

impl SerialPort for NrfBoard {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while !rest.is_empty() {
            match self.tx.try_write(rest) {
                Ok(n) => rest = &rest[n..],
                Err(_) => {
                    warn!("Serial: TX queue full, dropped {} bytes", rest.len());
                    return;
                }
            }
        }
    }
}

impl Indicator for NrfBoard {
    fn blink(&mut self) {
        self.led.blink();
    }
}
