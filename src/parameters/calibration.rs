//! Calibration persistence
//!
//! The stick calibration lives in EEPROM at [`CALIBRATION_OFFSET`] in the
//! layout produced by [`Calibration::to_bytes`]. A board that was never
//! calibrated reads back erased cells, which `Calibration::from_bytes`
//! rejects; the firmware then runs on the factory values of the Jarek board.

use yunibeer_core::calibration::{AxisCalibration, Calibration, CALIBRATION_BYTES};

use crate::platform::traits::NonVolatileStorage;
use crate::platform::Result;

/// EEPROM offset of the calibration block
pub const CALIBRATION_OFFSET: u16 = 512;

/// Factory calibration of the Jarek board
pub const JAREK_CALIBRATION: Calibration = Calibration::new([
    AxisCalibration::new(17, 107, 96),
    AxisCalibration::new(-11, 93, 110),
    AxisCalibration::new(14, 122, 83),
    AxisCalibration::new(-6, 110, 101),
]);

/// Read the stored calibration
///
/// # Errors
///
/// Returns `PlatformError::Storage` if the block cannot be read and
/// `PlatformError::Calibration` if it holds no usable calibration.
pub fn load_calibration<S: NonVolatileStorage>(storage: &mut S) -> Result<Calibration> {
    let mut block = [0u8; CALIBRATION_BYTES];
    storage.read(CALIBRATION_OFFSET, &mut block)?;
    Ok(Calibration::from_bytes(&block)?)
}

/// Read the stored calibration, falling back to [`JAREK_CALIBRATION`]
pub fn load_or_default<S: NonVolatileStorage>(storage: &mut S) -> Calibration {
    match load_calibration(storage) {
        Ok(calibration) => {
            crate::log_info!("Calibration loaded");
            calibration
        }
        Err(e) => {
            crate::log_warn!("Using factory calibration: {}", e);
            JAREK_CALIBRATION
        }
    }
}

/// Persist `calibration`
///
/// # Errors
///
/// Returns `PlatformError::Storage` if the write fails.
pub fn store_calibration<S: NonVolatileStorage>(
    storage: &mut S,
    calibration: &Calibration,
) -> Result<()> {
    storage.write(CALIBRATION_OFFSET, &calibration.to_bytes())?;
    crate::log_info!("Calibration stored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::error::{PlatformError, StorageError};
    use crate::platform::mock::MockStorage;
    use yunibeer_core::calibration::CalibrationError;

    #[test]
    fn test_erased_eeprom_falls_back_to_factory_values() {
        let mut eeprom = MockStorage::new();
        assert_eq!(
            load_calibration(&mut eeprom),
            Err(PlatformError::Calibration(CalibrationError::InvalidGain { axis: 0 }))
        );
        assert_eq!(load_or_default(&mut eeprom), JAREK_CALIBRATION);
    }

    #[test]
    fn test_store_then_load() {
        let mut eeprom = MockStorage::new();
        let calibration = Calibration::new([
            AxisCalibration::new(3, 64, 70),
            AxisCalibration::new(-2, 80, 81),
            AxisCalibration::new(0, 1, 1),
            AxisCalibration::new(9, 100, 99),
        ]);

        store_calibration(&mut eeprom, &calibration).unwrap();
        assert_eq!(eeprom.write_count(), 1);
        // offset of axis 0, little endian, at the start of the block
        assert_eq!(eeprom.contents(CALIBRATION_OFFSET, 2), [3, 0]);
        assert_eq!(load_calibration(&mut eeprom), Ok(calibration));
    }

    #[test]
    fn test_storage_failures_propagate() {
        let mut eeprom = MockStorage::new();
        eeprom.set_fail_writes(true);
        assert_eq!(
            store_calibration(&mut eeprom, &JAREK_CALIBRATION),
            Err(PlatformError::Storage(StorageError::WriteFailed))
        );

        let mut tiny = MockStorage::with_capacity(256);
        assert_eq!(
            load_calibration(&mut tiny),
            Err(PlatformError::Storage(StorageError::OutOfBounds))
        );
        assert_eq!(load_or_default(&mut tiny), JAREK_CALIBRATION);
    }
}
