//! Stick calibration
//!
//! Each analog axis is mapped from its centered ADC value to the full signed
//! 16-bit range using a zero offset and separate gains for the negative and
//! positive half of travel:
//!
//! ```text
//! v   = value - offset
//! out = clamp(v * (v < 0 ? gain_neg : gain_pos), -32767, 32767)
//! ```
//!
//! [`CalibrationSession`] derives those numbers from live sweeps: the first
//! [`CENTERING_SWEEPS`] sweeps establish the offsets while the sticks rest
//! centered, every following sweep widens the observed min/max deviation.
//!
//! The persisted form is 24 bytes, little endian:
//! `offset[0..4] | gain_neg[0..4] | gain_pos[0..4]`.

use core::fmt;

/// Number of calibrated axes
pub const AXES: usize = 4;

/// Size of the serialized calibration block
pub const CALIBRATION_BYTES: usize = AXES * 3 * 2;

/// Complete sweeps required before the offsets are taken
pub const CENTERING_SWEEPS: u8 = 2;

/// Output magnitude limit of a calibrated reading
pub const FULL_SCALE: i32 = 32767;

/// Calibration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// Calibration finished before the centering sweeps completed
    NotCentered,
    /// Stored block shorter than [`CALIBRATION_BYTES`]
    Truncated,
    /// Stored gain is zero or negative (erased or corrupt storage)
    InvalidGain { axis: u8 },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCentered => write!(f, "axes were not centered"),
            Self::Truncated => write!(f, "calibration block truncated"),
            Self::InvalidGain { axis } => write!(f, "invalid gain on axis {}", axis),
        }
    }
}

/// Offset and gains of a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisCalibration {
    pub offset: i16,
    pub gain_neg: i16,
    pub gain_pos: i16,
}

impl AxisCalibration {
    /// No offset, unit gain
    pub const IDENTITY: Self = Self {
        offset: 0,
        gain_neg: 1,
        gain_pos: 1,
    };

    /// Axis calibration from its center offset and per-side gains
    pub const fn new(offset: i16, gain_neg: i16, gain_pos: i16) -> Self {
        Self {
            offset,
            gain_neg,
            gain_pos,
        }
    }

    /// Map a centered ADC value to the calibrated range
    pub fn apply(&self, value: i16) -> i16 {
        let v = value as i32 - self.offset as i32;
        let gain = if v < 0 { self.gain_neg } else { self.gain_pos };
        (v * gain as i32).clamp(-FULL_SCALE, FULL_SCALE) as i16
    }
}

impl Default for AxisCalibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Calibration of all axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub axes: [AxisCalibration; AXES],
}

impl Calibration {
    /// Identity mapping on every axis
    pub const fn identity() -> Self {
        Self {
            axes: [AxisCalibration::IDENTITY; AXES],
        }
    }

    pub const fn new(axes: [AxisCalibration; AXES]) -> Self {
        Self { axes }
    }

    /// Calibrate `value` read from `axis`. Axes without calibration (the
    /// battery channel, for instance) pass through unchanged.
    pub fn apply(&self, axis: usize, value: i16) -> i16 {
        match self.axes.get(axis) {
            Some(cal) => cal.apply(value),
            None => value,
        }
    }

    /// Serialize into the persisted layout
    pub fn to_bytes(&self) -> [u8; CALIBRATION_BYTES] {
        let mut out = [0u8; CALIBRATION_BYTES];
        for (i, axis) in self.axes.iter().enumerate() {
            let fields = [axis.offset, axis.gain_neg, axis.gain_pos];
            for (block, value) in fields.iter().enumerate() {
                let at = block * AXES * 2 + i * 2;
                out[at..at + 2].copy_from_slice(&value.to_le_bytes());
            }
        }
        out
    }

    /// Parse the persisted layout, rejecting blocks with unusable gains
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CalibrationError> {
        if bytes.len() < CALIBRATION_BYTES {
            return Err(CalibrationError::Truncated);
        }

        let field = |block: usize, axis: usize| {
            let at = block * AXES * 2 + axis * 2;
            i16::from_le_bytes([bytes[at], bytes[at + 1]])
        };

        let mut axes = [AxisCalibration::IDENTITY; AXES];
        for (i, axis) in axes.iter_mut().enumerate() {
            *axis = AxisCalibration::new(field(0, i), field(1, i), field(2, i));
            if axis.gain_neg <= 0 || axis.gain_pos <= 0 {
                return Err(CalibrationError::InvalidGain { axis: i as u8 });
            }
        }
        Ok(Self { axes })
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::identity()
    }
}

/// Session progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    /// Sticks resting; counting sweeps before sampling the offsets
    Centering { sweeps: u8 },
    /// Offsets fixed; tracking the deviation range
    Ranging,
}

/// Interactive calibration driven by completed ADC sweeps.
///
/// # Example
///
/// ```
/// use yunibeer_core::calibration::CalibrationSession;
///
/// let mut session = CalibrationSession::new();
/// session.record_sweep(&[10, 0, 0, 0]);
/// session.record_sweep(&[10, 0, 0, 0]); // offsets taken here
/// session.record_sweep(&[-290, -300, -300, -300]);
/// session.record_sweep(&[310, 300, 300, 300]);
///
/// let calibration = session.finish().unwrap();
/// assert_eq!(calibration.apply(0, 310), 32700);
/// assert_eq!(calibration.apply(0, 10), 0);
/// ```
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    phase: CalibrationPhase,
    offsets: [i16; AXES],
    min: [i16; AXES],
    max: [i16; AXES],
}

impl CalibrationSession {
    pub const fn new() -> Self {
        Self {
            phase: CalibrationPhase::Centering { sweeps: 0 },
            offsets: [0; AXES],
            min: [i16::MAX; AXES],
            max: [i16::MIN; AXES],
        }
    }

    /// Current phase
    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    /// Return true once the offsets are fixed
    pub fn is_centered(&self) -> bool {
        self.phase == CalibrationPhase::Ranging
    }

    /// Feed the centered values of one complete sweep
    pub fn record_sweep(&mut self, values: &[i16; AXES]) {
        match self.phase {
            CalibrationPhase::Centering { sweeps } => {
                let sweeps = sweeps + 1;
                if sweeps >= CENTERING_SWEEPS {
                    self.offsets = *values;
                    self.min = [i16::MAX; AXES];
                    self.max = [i16::MIN; AXES];
                    self.phase = CalibrationPhase::Ranging;
                } else {
                    self.phase = CalibrationPhase::Centering { sweeps };
                }
            }
            CalibrationPhase::Ranging => {
                for axis in 0..AXES {
                    let v = self.deviation(axis, values[axis]);
                    self.min[axis] = self.min[axis].min(v);
                    self.max[axis] = self.max[axis].max(v);
                }
            }
        }
    }

    /// Deviation of `value` from the axis offset
    pub fn deviation(&self, axis: usize, value: i16) -> i16 {
        value.saturating_sub(self.offsets[axis])
    }

    /// Offsets captured at the end of centering
    pub fn offsets(&self) -> &[i16; AXES] {
        &self.offsets
    }

    /// Observed `(min, max)` deviation of an axis
    pub fn range(&self, axis: usize) -> (i16, i16) {
        (self.min[axis], self.max[axis])
    }

    /// Bitmask of axes that never moved to one side of center; these get
    /// unit gain on that side.
    pub fn degenerate_axes(&self) -> u8 {
        (0..AXES).fold(0, |mask, axis| {
            if self.min[axis] >= 0 || self.max[axis] <= 0 {
                mask | (1 << axis)
            } else {
                mask
            }
        })
    }

    /// Derive the calibration from the observed ranges
    pub fn finish(&self) -> Result<Calibration, CalibrationError> {
        if !self.is_centered() {
            return Err(CalibrationError::NotCentered);
        }

        let mut axes = [AxisCalibration::IDENTITY; AXES];
        for (i, axis) in axes.iter_mut().enumerate() {
            let gain_neg = if self.min[i] < 0 {
                (-FULL_SCALE / self.min[i] as i32) as i16
            } else {
                1
            };
            let gain_pos = if self.max[i] > 0 {
                (FULL_SCALE / self.max[i] as i32) as i16
            } else {
                1
            };
            *axis = AxisCalibration::new(self.offsets[i], gain_neg, gain_pos);
        }
        Ok(Calibration::new(axes))
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_uses_side_specific_gain_and_clamps() {
        let axis = AxisCalibration::new(17, 107, 96);
        assert_eq!(axis.apply(17), 0);
        assert_eq!(axis.apply(117), 9600);
        assert_eq!(axis.apply(-83), -10700);
        assert_eq!(axis.apply(511), 32767);
        assert_eq!(axis.apply(-512), -32767);
    }

    #[test]
    fn identity_passes_values_through() {
        let cal = Calibration::identity();
        for v in [-512i16, -1, 0, 1, 511] {
            assert_eq!(cal.apply(2, v), v);
        }
        // Channel without calibration
        assert_eq!(cal.apply(AXES, 123), 123);
    }

    #[test]
    fn bytes_layout_is_offsets_then_gains() {
        let cal = Calibration::new([
            AxisCalibration::new(17, 107, 96),
            AxisCalibration::new(-11, 93, 110),
            AxisCalibration::new(14, 122, 83),
            AxisCalibration::new(-6, 110, 101),
        ]);
        let bytes = cal.to_bytes();
        assert_eq!(&bytes[0..2], &17i16.to_le_bytes());
        assert_eq!(&bytes[2..4], &(-11i16).to_le_bytes());
        assert_eq!(&bytes[8..10], &107i16.to_le_bytes());
        assert_eq!(&bytes[16..18], &96i16.to_le_bytes());
        assert_eq!(&bytes[22..24], &101i16.to_le_bytes());

        assert_eq!(Calibration::from_bytes(&bytes), Ok(cal));
    }

    #[test]
    fn erased_storage_is_rejected() {
        let bytes = [0xFFu8; CALIBRATION_BYTES];
        assert_eq!(
            Calibration::from_bytes(&bytes),
            Err(CalibrationError::InvalidGain { axis: 0 })
        );
        assert_eq!(
            Calibration::from_bytes(&bytes[..10]),
            Err(CalibrationError::Truncated)
        );
    }

    #[test]
    fn session_takes_offsets_after_two_sweeps() {
        let mut session = CalibrationSession::new();
        session.record_sweep(&[100, 100, 100, 100]);
        assert_eq!(session.phase(), CalibrationPhase::Centering { sweeps: 1 });
        assert_eq!(session.finish(), Err(CalibrationError::NotCentered));

        session.record_sweep(&[17, -11, 14, -6]);
        assert!(session.is_centered());
        assert_eq!(session.offsets(), &[17, -11, 14, -6]);
    }

    #[test]
    fn session_tracks_extremes_and_derives_gains() {
        let mut session = CalibrationSession::new();
        session.record_sweep(&[0; AXES]);
        session.record_sweep(&[0; AXES]);

        session.record_sweep(&[-100, 0, 0, 0]);
        session.record_sweep(&[-300, 0, 0, 0]);
        session.record_sweep(&[200, 0, 0, 0]);
        session.record_sweep(&[50, 0, 0, 0]);
        assert_eq!(session.range(0), (-300, 200));

        let cal = session.finish().unwrap();
        assert_eq!(cal.axes[0].gain_neg, 109);
        assert_eq!(cal.axes[0].gain_pos, 163);
        assert_eq!(cal.apply(0, -300), -32700);
        assert_eq!(cal.apply(0, 200), 32600);
    }

    #[test]
    fn unmoved_axes_get_unit_gain() {
        let mut session = CalibrationSession::new();
        session.record_sweep(&[0; AXES]);
        session.record_sweep(&[0; AXES]);
        session.record_sweep(&[-50, 0, 10, 0]);
        session.record_sweep(&[50, 0, 20, 0]);

        assert_eq!(session.degenerate_axes(), 0b1110);
        let cal = session.finish().unwrap();
        assert_eq!(cal.axes[1], AxisCalibration::new(0, 1, 1));
        assert_eq!(cal.axes[2].gain_neg, 1);
        assert_eq!(cal.axes[2].gain_pos, 1638);
    }

    #[test]
    fn error_display() {
        extern crate std;
        use std::string::ToString;
        assert_eq!(
            CalibrationError::InvalidGain { axis: 2 }.to_string(),
            "invalid gain on axis 2"
        );
    }
}
