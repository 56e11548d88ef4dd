//! Internal EEPROM driver

use crate::platform::{
    error::{PlatformError, StorageError},
    traits::NonVolatileStorage,
    Result,
};

use super::{read, regs, write};

/// ATmega128 EEPROM size
pub const EEPROM_SIZE: usize = 4096;

// EECR
const EEMWE: u8 = 1 << 2;
const EEWE: u8 = 1 << 1;
const EERE: u8 = 1 << 0;

/// Internal 4 KB EEPROM.
///
/// Writes busy-wait for the previous cell (about 8.5 ms each) and are
/// verified by reading back.
pub struct Atmega128Eeprom {
    _private: (),
}

impl Atmega128Eeprom {
    pub(super) fn new() -> Self {
        Self { _private: () }
    }

    fn wait_ready() {
        while read(regs::EECR) & EEWE != 0 {}
    }

    fn set_address(address: u16) {
        write(regs::EEARH, (address >> 8) as u8);
        write(regs::EEARL, address as u8);
    }

    fn read_byte(address: u16) -> u8 {
        Self::wait_ready();
        Self::set_address(address);
        write(regs::EECR, EERE);
        read(regs::EEDR)
    }

    fn write_byte(address: u16, value: u8) {
        Self::wait_ready();
        Self::set_address(address);
        write(regs::EEDR, value);
        // EEWE must follow EEMWE within four cycles
        critical_section::with(|_| {
            write(regs::EECR, EEMWE);
            write(regs::EECR, EEMWE | EEWE);
        });
    }

    fn check_range(offset: u16, len: usize) -> Result<()> {
        if offset as usize + len > EEPROM_SIZE {
            return Err(PlatformError::Storage(StorageError::OutOfBounds));
        }
        Ok(())
    }
}

impl NonVolatileStorage for Atmega128Eeprom {
    fn capacity(&self) -> usize {
        EEPROM_SIZE
    }

    fn read(&mut self, offset: u16, buffer: &mut [u8]) -> Result<()> {
        Self::check_range(offset, buffer.len())?;
        for (address, byte) in (offset..).zip(buffer.iter_mut()) {
            *byte = Self::read_byte(address);
        }
        Ok(())
    }

    fn write(&mut self, offset: u16, data: &[u8]) -> Result<()> {
        Self::check_range(offset, data.len())?;
        for (address, &byte) in (offset..).zip(data.iter()) {
            if Self::read_byte(address) == byte {
                continue;
            }
            Self::write_byte(address, byte);
            if Self::read_byte(address) != byte {
                return Err(PlatformError::Storage(StorageError::WriteFailed));
            }
        }
        Ok(())
    }
}
