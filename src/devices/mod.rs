//! Device drivers
//!
//! Drivers built on the platform abstraction traits. None of them block;
//! each exposes a `process()`/`check()` step that the transmitter pump calls.
//!
//! ## Modules
//!
//! - `adc_scanner`: Round-robin scan of the stick and battery inputs
//! - `signaller`: Repeating blink/beep pulse generator
//! - `battery`: Low-battery alert on top of the signaller

pub mod adc_scanner;
pub mod battery;
pub mod signaller;

pub use adc_scanner::{AdcChannelConfig, RoundRobinAdc};
pub use battery::{AlertPattern, BatteryMonitor};
pub use signaller::BlinkSignaller;
