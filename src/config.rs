//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Serial line protocol

/// Capacity of the serial line buffer, terminator included.
pub const LINE_CAPACITY: usize = 30;

/// Largest response line the dispatcher will format.
pub const RESPONSE_CAPACITY: usize = 50;

/// Static identification string answered to `ID`.
pub const DEVICE_ID: &str = concat!("LIGHT DATALOGGER ", env!("CARGO_PKG_VERSION"));

// EEPROM (24C02-class, 256 bytes, one-byte word address)

/// 7-bit I²C address of the EEPROM.
pub const EEPROM_I2C_ADDRESS: u8 = 0x50;

/// Settling time after every bus transmission (ms).
/// Covers the device's internal write cycle (t_WR = 5 ms max).
pub const EEPROM_SETTLE_MS: u32 = 5;

/// Address of the occupancy counter.
pub const OCCUPANCY_ADDRESS: u8 = 0;

/// Highest sample count the one-byte counter can address.
pub const LOG_CAPACITY: u8 = u8::MAX;

// Sampling

/// Auto-sample tick period (ms).
pub const AUTO_SAMPLE_PERIOD_MS: u64 = 500;

/// SAADC resolution used for the light sensor.
pub const LIGHT_ADC_BITS: u8 = 12;

// Keypad + indicator

/// Half period of the keypad `#1*` blink (ms). LED is on for one
/// half and off for the other.
pub const BLINK_HALF_PERIOD_MS: u32 = 500;

/// Minimum time between two keypad matrix scans (ms).
pub const KEYPAD_DEBOUNCE_MS: u64 = 10;

pub const KEYPAD_ROWS: usize = 4;
pub const KEYPAD_COLS: usize = 3;

/// Character produced by each matrix position.
pub const KEYPAD_MAP: [[char; KEYPAD_COLS]; KEYPAD_ROWS] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

// USB (CDC-ACM virtual COM port)

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "datalogger";
pub const USB_PRODUCT: &str = "Light Datalogger";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// CDC-ACM bulk endpoint packet size.
pub const USB_PACKET_SIZE: u16 = 64;

/// Bytes queued from the main loop towards the USB TX task.
pub const SERIAL_TX_QUEUE_SIZE: usize = 256;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` are
// picked in `main.rs`.  Adjust for your custom PCB.
//
//   Keypad rows    → P1.01 P1.02 P1.03 P1.04
//   Keypad columns → P1.05 P1.06 P1.07
//   LDR (AIN0)     → P0.02
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
//   Indicator LED  → P0.13 (LED1, active-low)
