//! Round-robin ADC scanner
//!
//! The transmitter has one converter and several analog inputs (four stick
//! axes and the battery divider). `RoundRobinAdc` keeps exactly one
//! conversion in flight and walks a fixed channel list in order:
//!
//! ```text
//! start(ch[0]) → ready → store ch[0], start(ch[1]) → ready → ... → start(ch[0])
//! ```
//!
//! `process()` never waits for the converter, so it can be called from the
//! pump as often as convenient.
//!
//! # Value model
//!
//! Conversions are 10-bit. The stored value is centered to a signed number,
//! `raw - 512`, and negated for channels flagged as inverted (axes whose
//! potentiometer is mounted the other way round).

use heapless::Vec;

use crate::platform::error::{AdcError, PlatformError};
use crate::platform::traits::{AdcInterface, ADC_INPUTS};
use crate::platform::Result;

/// Maximum number of scanned channels
pub const MAX_ADC_CHANNELS: usize = ADC_INPUTS as usize;

/// Raw reading that maps to a centered value of zero
pub const ADC_CENTER: i16 = 512;

/// One entry of the scan list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcChannelConfig {
    /// Multiplexer input
    pub channel: u8,
    /// Negate the centered value
    pub inverted: bool,
}

impl AdcChannelConfig {
    /// Scan slot for multiplexer input `channel`, negated if `inverted`
    pub const fn new(channel: u8, inverted: bool) -> Self {
        Self { channel, inverted }
    }
}

/// Per-channel scan state
#[derive(Debug, Clone, Copy)]
pub struct AdcChannelSlot {
    config: AdcChannelConfig,
    /// Last completed conversion, if any
    raw: Option<u16>,
    in_progress: bool,
}

impl AdcChannelSlot {
    fn new(config: AdcChannelConfig) -> Self {
        Self {
            config,
            raw: None,
            in_progress: false,
        }
    }

    /// Channel configuration
    pub fn config(&self) -> AdcChannelConfig {
        self.config
    }

    /// Last raw conversion
    pub fn raw(&self) -> Option<u16> {
        self.raw
    }

    /// Return true while this channel's conversion is running
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Centered (and possibly negated) value of the last conversion
    pub fn value(&self) -> Option<i16> {
        self.raw.map(|raw| {
            let v = raw as i16 - ADC_CENTER;
            if self.config.inverted {
                -v
            } else {
                v
            }
        })
    }
}

/// Non-blocking scanner over a fixed channel list
///
/// # Example
///
/// ```ignore
/// use yunibeer::devices::adc_scanner::{AdcChannelConfig, RoundRobinAdc};
/// use yunibeer::platform::mock::MockAdc;
///
/// let mut adc = MockAdc::new();
/// adc.set_reading(1, 612);
///
/// let channels = [AdcChannelConfig::new(1, false), AdcChannelConfig::new(2, true)];
/// let mut scanner = RoundRobinAdc::new(adc, &channels).unwrap();
///
/// assert_eq!(scanner.value(0), None);
/// while !scanner.process() {}
/// assert_eq!(scanner.value(0), Some(100));
/// ```
pub struct RoundRobinAdc<A> {
    adc: A,
    slots: Vec<AdcChannelSlot, MAX_ADC_CHANNELS>,
    current: usize,
    sweeps: u32,
}

impl<A: AdcInterface> RoundRobinAdc<A> {
    /// Create a scanner over `channels`, in scan order.
    ///
    /// Nothing is started until the first `process()`.
    ///
    /// # Errors
    ///
    /// - `PlatformError::InvalidConfig` for an empty list
    /// - `PlatformError::Adc(AdcError::TooManyChannels)` beyond [`MAX_ADC_CHANNELS`]
    /// - `PlatformError::Adc(AdcError::InvalidChannel)` for an input the
    ///   multiplexer does not have
    pub fn new(adc: A, channels: &[AdcChannelConfig]) -> Result<Self> {
        if channels.is_empty() {
            return Err(PlatformError::InvalidConfig);
        }

        let mut slots = Vec::new();
        for config in channels {
            if config.channel >= ADC_INPUTS {
                return Err(PlatformError::Adc(AdcError::InvalidChannel));
            }
            slots
                .push(AdcChannelSlot::new(*config))
                .map_err(|_| PlatformError::Adc(AdcError::TooManyChannels))?;
        }

        Ok(Self {
            adc,
            slots,
            current: 0,
            sweeps: 0,
        })
    }

    /// Advance the scan.
    ///
    /// Returns true exactly once per completed conversion. The next channel's
    /// conversion is started in the same call.
    pub fn process(&mut self) -> bool {
        if !self.slots[self.current].in_progress {
            self.start_current();
            return false;
        }

        if !self.adc.is_ready() {
            return false;
        }

        let raw = self.adc.value();
        let slot = &mut self.slots[self.current];
        slot.raw = Some(raw);
        slot.in_progress = false;

        self.current += 1;
        if self.current == self.slots.len() {
            self.current = 0;
            self.sweeps = self.sweeps.wrapping_add(1);
        }
        self.start_current();
        true
    }

    fn start_current(&mut self) {
        let slot = &mut self.slots[self.current];
        slot.in_progress = true;
        self.adc.start(slot.config.channel);
    }

    /// Centered value of scan slot `index`, `None` before its first conversion
    pub fn value(&self, index: usize) -> Option<i16> {
        self.slots.get(index).and_then(AdcChannelSlot::value)
    }

    /// Raw value of scan slot `index`
    pub fn raw(&self, index: usize) -> Option<u16> {
        self.slots.get(index).and_then(AdcChannelSlot::raw)
    }

    /// Scan slots
    pub fn slots(&self) -> &[AdcChannelSlot] {
        &self.slots
    }

    /// Number of scanned channels
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; a scanner has at least one channel
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the slot being converted (or about to be)
    pub fn current(&self) -> usize {
        self.current
    }

    /// Completed full sweeps
    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }

    /// Underlying converter
    pub fn adc(&self) -> &A {
        &self.adc
    }

    /// Underlying converter, mutably
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}
