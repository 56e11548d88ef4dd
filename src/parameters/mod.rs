//! Transmitter configuration
//!
//! Construction-time settings and the calibration block kept in EEPROM.
//!
//! # EEPROM Layout
//!
//! ```text
//! [Address book]   0x000 - 0x1FF (owned by the pairing code)
//! [Calibration]    0x200 - 0x217  offsets[4] | gain_neg[4] | gain_pos[4] (i16 LE)
//! ```

pub mod calibration;
pub mod transmitter;

pub use calibration::{load_calibration, load_or_default, store_calibration, CALIBRATION_OFFSET};
pub use transmitter::{ticks_from_ms, TransmitterConfig, BUILD_INFO, TICK_HZ};
