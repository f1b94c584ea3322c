//! Light sensor sampling.

pub mod scheduler;

pub use scheduler::AutoSampleScheduler;

/// Anything that yields one byte of light level.
pub trait LightSensor {
    fn read_light(&mut self) -> u8;
}

/// Reduce an unsigned ADC reading of `bits` resolution to one byte by
/// keeping its top eight bits. `bits` above 16 is treated as 16.
pub fn scale_to_byte(raw: u16, bits: u8) -> u8 {
    let bits = bits.min(16);
    if bits <= 8 {
        let max = (1u16 << bits) - 1;
        return raw.min(max) as u8;
    }
    let shift = bits - 8;
    let max = if bits == 16 { u16::MAX } else { (1u16 << bits) - 1 };
    (raw.min(max) >> shift) as u8
}
