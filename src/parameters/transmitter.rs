//! Transmitter settings
//!
//! Everything here is fixed when the transmitter context is built. Times
//! are soft-clock ticks (64 us each).

use yunibeer_core::traits::Ticks;

use crate::communication::serial::SerialConfig;
use crate::devices::adc_scanner::AdcChannelConfig;
use crate::devices::battery::{AlertPattern, DEFAULT_ALERT, DEFAULT_REALERT_TICKS};
use crate::devices::signaller::{DEFAULT_OFF_TICKS, DEFAULT_ON_TICKS};
use crate::platform::error::PlatformError;
use crate::platform::Result;

/// Soft-clock rate: 16 MHz / 1024
pub const TICK_HZ: u32 = 15_625;

/// Version string baked in by the build script
pub const BUILD_INFO: &str = env!("YUNIBEER_BUILD_INFO");

/// Convert milliseconds to ticks, rounding down
pub const fn ticks_from_ms(ms: u32) -> Ticks {
    ((ms as u64 * TICK_HZ as u64) / 1000) as Ticks
}

/// Scan table of the Jarek board: four sticks, then the battery divider
pub const DEFAULT_CHANNELS: [AdcChannelConfig; 5] = [
    AdcChannelConfig::new(1, true),
    AdcChannelConfig::new(2, true),
    AdcChannelConfig::new(0, true),
    AdcChannelConfig::new(3, false),
    AdcChannelConfig::new(6, false),
];

/// Scan slot of the battery divider in [`DEFAULT_CHANNELS`]
pub const DEFAULT_BATTERY_SLOT: usize = 4;

/// Centered battery reading under which the pack counts as low
pub const DEFAULT_LOW_BATTERY_THRESHOLD: i16 = 160;

/// Extended-command payload deadline
pub const DEFAULT_PAYLOAD_TIMEOUT: Ticks = 2000;

/// Telemetry frame period, 256 ticks (16.384 ms)
pub const DEFAULT_TELEMETRY_PERIOD: Ticks = 256;

/// Transmitter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitterConfig {
    /// Host/radio serial link
    pub serial: SerialConfig,
    /// Ticks allowed between an extended-command marker and its payload
    pub payload_timeout: Ticks,
    /// Default feedback on-time
    pub blink_on: Ticks,
    /// Default feedback off-time
    pub blink_off: Ticks,
    /// ADC scan order
    pub channels: &'static [AdcChannelConfig],
    /// Scan slot holding the battery reading
    pub battery_slot: usize,
    pub low_battery_threshold: i16,
    pub low_battery_period: Ticks,
    pub low_battery_alert: AlertPattern,
    /// Ticks between telemetry frames
    pub telemetry_period: Ticks,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            payload_timeout: DEFAULT_PAYLOAD_TIMEOUT,
            blink_on: DEFAULT_ON_TICKS,
            blink_off: DEFAULT_OFF_TICKS,
            channels: &DEFAULT_CHANNELS,
            battery_slot: DEFAULT_BATTERY_SLOT,
            low_battery_threshold: DEFAULT_LOW_BATTERY_THRESHOLD,
            low_battery_period: DEFAULT_REALERT_TICKS,
            low_battery_alert: DEFAULT_ALERT,
            telemetry_period: DEFAULT_TELEMETRY_PERIOD,
        }
    }
}

impl TransmitterConfig {
    /// Check the settings for values the firmware cannot run with
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` for a zero baud rate, a zero
    /// period or timeout, an empty channel table, or a battery slot outside
    /// the table.
    pub fn validate(&self) -> Result<()> {
        if self.serial.uart.baud_rate == 0 {
            return Err(PlatformError::InvalidConfig);
        }
        if self.payload_timeout == 0
            || self.blink_on == 0
            || self.blink_off == 0
            || self.low_battery_period == 0
            || self.telemetry_period == 0
        {
            return Err(PlatformError::InvalidConfig);
        }
        if self.channels.is_empty() || self.battery_slot >= self.channels.len() {
            return Err(PlatformError::InvalidConfig);
        }
        Ok(())
    }
}
