//! 24C02-class I²C EEPROM driver.
//!
//! One-byte word address, single-byte reads and writes. Every bus
//! transmission is followed by a fixed settle of
//! [`EEPROM_SETTLE_MS`](crate::config::EEPROM_SETTLE_MS) so the device
//! has finished its internal write cycle before the next transaction.
//!
//! Random read:  `S [dev|W] addr P` settle `S [dev|R] data P` settle
//! Byte write:   `S [dev|W] addr data P` settle

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::ByteStore;
use crate::config::EEPROM_SETTLE_MS;

pub struct Eeprom<I, D> {
    i2c: I,
    delay: D,
    device_address: u8,
}

impl<I, D> Eeprom<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D, device_address: u8) -> Self {
        Self {
            i2c,
            delay,
            device_address,
        }
    }

    fn settle_after_transmission(&mut self) {
        self.delay.delay_ms(EEPROM_SETTLE_MS);
    }

    /// Hand back the bus and delay provider.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }
}

impl<I, D> ByteStore for Eeprom<I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = I::Error;

    fn read_byte(&mut self, address: u8) -> Result<u8, Self::Error> {
        self.i2c.write(self.device_address, &[address])?;
        self.settle_after_transmission();

        let mut data = [0u8; 1];
        self.i2c.read(self.device_address, &mut data)?;
        self.settle_after_transmission();
        Ok(data[0])
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.device_address, &[address, value])?;
        self.settle_after_transmission();
        Ok(())
    }

    fn settle(&mut self) {
        self.settle_after_transmission();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EEPROM_I2C_ADDRESS;
    use crate::testing::{MockDelay, MockEepromBus};
    use embedded_hal::i2c::ErrorKind;

    fn eeprom() -> Eeprom<MockEepromBus, MockDelay> {
        Eeprom::new(MockEepromBus::new(), MockDelay::default(), EEPROM_I2C_ADDRESS)
    }

    #[test]
    fn write_then_read_back() {
        let mut e = eeprom();
        e.write_byte(5, 0xAB).unwrap();
        assert_eq!(e.read_byte(5).unwrap(), 0xAB);
        assert_eq!(e.read_byte(6).unwrap(), 0xFF); // blank cell
    }

    #[test]
    fn every_transmission_is_followed_by_settle() {
        let mut e = eeprom();
        e.write_byte(1, 1).unwrap();
        e.read_byte(1).unwrap();
        let (_, delay) = e.release();
        // one write + (address write + data read)
        assert_eq!(delay.total_ms(), 3 * EEPROM_SETTLE_MS as u64);
    }

    #[test]
    fn transactions_target_device_address() {
        let mut e = eeprom();
        e.write_byte(9, 3).unwrap();
        let (bus, _) = e.release();
        assert!(bus.addresses_seen.iter().all(|&a| a == EEPROM_I2C_ADDRESS));
        assert_eq!(bus.addresses_seen.len(), 1);
    }

    #[test]
    fn wrong_device_address_nacks() {
        let mut e = Eeprom::new(MockEepromBus::new(), MockDelay::default(), 0x51);
        assert_eq!(
            e.read_byte(0),
            Err(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address
            ))
        );
    }

    #[test]
    fn blank_device_reads_as_full_log_until_reset() {
        let mut log = crate::storage::NonVolatileLog::new(eeprom());
        assert_eq!(log.occupancy(), Ok(0xFF));
        assert_eq!(log.append(1), Err(crate::error::StorageError::Full));

        log.reset().unwrap();
        assert_eq!(log.append(1), Ok(1));
    }

    #[test]
    fn log_over_eeprom_settles_after_append() {
        let mut log = crate::storage::NonVolatileLog::new(eeprom());
        log.reset().unwrap();
        log.append(77).unwrap();
        let (bus, delay) = log.release().release();
        assert_eq!(bus.cells[0], 1);
        assert_eq!(bus.cells[1], 77);
        // reset (1) + read counter (2) + write sample (1) + write counter (1) + final settle (1)
        assert_eq!(delay.total_ms(), 6 * EEPROM_SETTLE_MS as u64);
    }
}
