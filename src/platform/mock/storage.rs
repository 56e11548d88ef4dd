//! Mock non-volatile storage for testing
//!
//! Provides in-memory EEPROM simulation for unit tests.

use crate::platform::{
    error::{PlatformError, StorageError},
    traits::NonVolatileStorage,
    Result,
};
use std::vec;
use std::vec::Vec;

/// Default capacity (4 KB, same as the ATmega128 EEPROM)
pub const DEFAULT_CAPACITY: usize = 4096;

/// Mock EEPROM implementation
///
/// Simulates byte-addressable storage in memory. Supports:
/// - Read/write operations with bounds checking
/// - Write failure injection for testing error handling
/// - Write count tracking
///
/// # Example
///
/// ```ignore
/// use yunibeer::platform::mock::MockStorage;
/// use yunibeer::platform::traits::NonVolatileStorage;
///
/// let mut eeprom = MockStorage::new();
///
/// // Erased cells read as 0xFF
/// let mut buf = [0u8; 2];
/// eeprom.read(512, &mut buf).unwrap();
/// assert_eq!(buf, [0xFF, 0xFF]);
///
/// eeprom.write(512, &[0x11, 0x00]).unwrap();
/// eeprom.read(512, &mut buf).unwrap();
/// assert_eq!(buf, [0x11, 0x00]);
/// ```
#[derive(Debug)]
pub struct MockStorage {
    /// Storage contents (initialized to 0xFF - erased state)
    cells: Vec<u8>,
    writes: u32,
    fail_writes: bool,
}

impl MockStorage {
    /// Create an erased mock EEPROM of the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an erased mock EEPROM of `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![0xFF; capacity],
            writes: 0,
            fail_writes: false,
        }
    }

    /// Make every subsequent write fail (simulated worn-out cells)
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful write calls
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Get contents (for test verification)
    pub fn contents(&self, offset: u16, len: usize) -> Vec<u8> {
        self.cells[offset as usize..offset as usize + len].to_vec()
    }

    fn check_range(&self, offset: u16, len: usize) -> Result<core::ops::Range<usize>> {
        let start = offset as usize;
        let end = start + len;
        if end > self.cells.len() {
            return Err(PlatformError::Storage(StorageError::OutOfBounds));
        }
        Ok(start..end)
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl NonVolatileStorage for MockStorage {
    fn capacity(&self) -> usize {
        self.cells.len()
    }

    fn read(&mut self, offset: u16, buffer: &mut [u8]) -> Result<()> {
        let range = self.check_range(offset, buffer.len())?;
        buffer.copy_from_slice(&self.cells[range]);
        Ok(())
    }

    fn write(&mut self, offset: u16, data: &[u8]) -> Result<()> {
        let range = self.check_range(offset, data.len())?;
        if self.fail_writes {
            return Err(PlatformError::Storage(StorageError::WriteFailed));
        }
        self.cells[range].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_access() {
        let mut eeprom = MockStorage::with_capacity(16);
        let mut buf = [0u8; 4];
        assert_eq!(
            eeprom.read(14, &mut buf),
            Err(PlatformError::Storage(StorageError::OutOfBounds))
        );
        assert!(eeprom.write(12, &buf).is_ok());
    }

    #[test]
    fn test_write_failure_injection() {
        let mut eeprom = MockStorage::new();
        eeprom.set_fail_writes(true);
        assert_eq!(
            eeprom.write(0, &[1]),
            Err(PlatformError::Storage(StorageError::WriteFailed))
        );
        assert_eq!(eeprom.write_count(), 0);
        assert_eq!(eeprom.contents(0, 1), [0xFF]);
    }
}
