//! Signal output trait
//!
//! The feedback signaller drives a single on/off output. On the transmitter
//! that is the piezo buzzer (a timer toggling a pin while "set"), on other
//! hardware it may be a plain LED pin.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

/// On/off feedback output
pub trait SignalOutput {
    /// Turn the output on
    fn set(&mut self);

    /// Turn the output off
    fn clear(&mut self);
}

/// [`SignalOutput`] over any infallible `embedded-hal` output pin.
///
/// # Example
///
/// ```ignore
/// let led = PinOutput::new(pins.pa3.into_output());
/// let signaller = BlinkSignaller::new(&CLOCK, led);
/// ```
#[derive(Debug)]
pub struct PinOutput<P> {
    pin: P,
}

impl<P: OutputPin<Error = Infallible>> PinOutput<P> {
    /// Wrap `pin`
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin<Error = Infallible>> SignalOutput for PinOutput<P> {
    fn set(&mut self) {
        if let Err(e) = self.pin.set_high() {
            match e {}
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.pin.set_low() {
            match e {}
        }
    }
}
