//! Command framing
//!
//! Turns the raw inbound byte stream into discrete command events. Any
//! ordinary byte is a zero-latency single-byte command (`'1'` selects text
//! telemetry, `'?'` prints help, ...). The reserved [`EXTENDED_MARKER`]
//! introduces a two-byte command whose payload byte must arrive within a
//! deadline; the host uses it to drive the indicator LEDs.
//!
//! ```text
//!            byte != marker            ┌───────────────┐
//!   ┌──────► Command(byte) ◄───────────┤     Idle      │◄──────────────┐
//!   │                                  └──────┬────────┘               │
//!   │                                  marker │ -> Pending              │
//!   │                                         ▼                        │
//!   │                                  ┌───────────────┐  in time      │
//!   │                                  │AwaitingPayload├──► Extended ──┤
//!   │                                  └──────┬────────┘               │
//!   │                                  late   └──────► Timeout ────────┘
//! ```

use core::ops::Index;

use heapless::Vec;

use crate::timeout::Deadline;
use crate::traits::{Ticks, TimeSource};

/// Byte that opens a marker + payload command
pub const EXTENDED_MARKER: u8 = 0x80;

/// Payload bytes carried by an extended command
pub const MAX_PAYLOAD: usize = 1;

/// Result of feeding one byte to the framer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEvent {
    /// Marker seen, waiting for the payload byte
    Pending,
    /// Ordinary single-byte command
    Command(u8),
    /// Marker + payload received in time
    Extended(u8),
    /// Payload arrived after the deadline and was discarded
    Timeout,
}

/// Framer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerState {
    /// Waiting for a command byte
    Idle,
    /// Marker received, payload byte outstanding
    AwaitingPayload,
}

/// Byte-stream command framer with a bounded inter-byte deadline.
///
/// # Example
///
/// ```
/// use yunibeer_core::command::{CommandEvent, CommandFramer, EXTENDED_MARKER};
/// use yunibeer_core::traits::MockTime;
///
/// let time = MockTime::new();
/// let mut framer = CommandFramer::new(&time, 2000);
///
/// assert_eq!(framer.push_data(b'1'), CommandEvent::Command(b'1'));
/// assert_eq!(framer.push_data(EXTENDED_MARKER), CommandEvent::Pending);
/// assert_eq!(framer.push_data(0x0A), CommandEvent::Extended(0x0A));
/// assert_eq!(framer[0], 0x0A);
/// ```
pub struct CommandFramer<'a, T: ?Sized> {
    state: FramerState,
    payload: Vec<u8, MAX_PAYLOAD>,
    deadline: Deadline<'a, T>,
}

impl<'a, T: TimeSource + ?Sized> CommandFramer<'a, T> {
    /// Create an idle framer whose payload must follow the marker within
    /// `payload_timeout` ticks
    pub fn new(clock: &'a T, payload_timeout: Ticks) -> Self {
        Self {
            state: FramerState::Idle,
            payload: Vec::new(),
            deadline: Deadline::cancelled(clock, payload_timeout),
        }
    }

    /// Feed one received byte
    pub fn push_data(&mut self, byte: u8) -> CommandEvent {
        match self.state {
            FramerState::Idle => {
                if byte == EXTENDED_MARKER {
                    self.payload.clear();
                    self.deadline.restart();
                    self.state = FramerState::AwaitingPayload;
                    CommandEvent::Pending
                } else {
                    CommandEvent::Command(byte)
                }
            }
            FramerState::AwaitingPayload => {
                self.state = FramerState::Idle;
                let late = self.deadline.elapsed();
                self.deadline.cancel();
                if late {
                    CommandEvent::Timeout
                } else {
                    // Capacity is MAX_PAYLOAD and the payload was cleared
                    // when the marker arrived, so this push cannot fail.
                    let _ = self.payload.push(byte);
                    CommandEvent::Extended(byte)
                }
            }
        }
    }

    /// Expire a pending extended command without waiting for another byte.
    ///
    /// Returns `Some(CommandEvent::Timeout)` if the payload deadline passed
    /// while the framer was waiting; the framer is back in `Idle` afterwards.
    pub fn poll_timeout(&mut self) -> Option<CommandEvent> {
        if self.state == FramerState::AwaitingPayload && self.deadline.elapsed() {
            self.state = FramerState::Idle;
            self.deadline.cancel();
            Some(CommandEvent::Timeout)
        } else {
            None
        }
    }

    /// Current state
    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Number of payload bytes of the last extended command
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// Payload of the last extended command
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Drop back to `Idle`, forgetting any pending marker
    pub fn reset(&mut self) {
        self.state = FramerState::Idle;
        self.payload.clear();
        self.deadline.cancel();
    }
}

impl<T: TimeSource + ?Sized> Index<usize> for CommandFramer<'_, T> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.payload[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockTime;

    const TIMEOUT: Ticks = 2_000;

    #[test]
    fn printable_byte_is_immediate_command() {
        let time = MockTime::new();
        let mut framer = CommandFramer::new(&time, TIMEOUT);
        assert_eq!(framer.push_data(b'1'), CommandEvent::Command(b'1'));
        assert_eq!(framer.state(), FramerState::Idle);
    }

    #[test]
    fn marker_then_payload_in_time_is_extended() {
        let time = MockTime::new();
        let mut framer = CommandFramer::new(&time, TIMEOUT);

        assert_eq!(framer.push_data(EXTENDED_MARKER), CommandEvent::Pending);
        assert_eq!(framer.state(), FramerState::AwaitingPayload);

        time.advance(TIMEOUT);
        assert_eq!(
            framer.push_data(0b0000_1010),
            CommandEvent::Extended(0b0000_1010)
        );
        assert_eq!(framer.size(), 1);
        assert_eq!(framer[0], 0b0000_1010);
        assert_eq!(framer.state(), FramerState::Idle);
    }

    #[test]
    fn late_payload_is_discarded_as_timeout() {
        let time = MockTime::new();
        let mut framer = CommandFramer::new(&time, TIMEOUT);

        assert_eq!(framer.push_data(EXTENDED_MARKER), CommandEvent::Pending);
        time.advance(TIMEOUT + 1);
        assert_eq!(framer.push_data(0b0000_1010), CommandEvent::Timeout);
        assert_eq!(framer.size(), 0);
        assert_eq!(framer.state(), FramerState::Idle);

        // Back in Idle: ordinary commands work again
        assert_eq!(framer.push_data(b'1'), CommandEvent::Command(b'1'));
    }

    #[test]
    fn marker_byte_as_payload() {
        let time = MockTime::new();
        let mut framer = CommandFramer::new(&time, TIMEOUT);
        framer.push_data(EXTENDED_MARKER);
        assert_eq!(
            framer.push_data(EXTENDED_MARKER),
            CommandEvent::Extended(EXTENDED_MARKER)
        );
    }

    #[test]
    fn poll_timeout_expires_pending_marker() {
        let time = MockTime::new();
        let mut framer = CommandFramer::new(&time, TIMEOUT);

        assert_eq!(framer.poll_timeout(), None);
        framer.push_data(EXTENDED_MARKER);
        time.advance(TIMEOUT);
        assert_eq!(framer.poll_timeout(), None);
        time.advance(1);
        assert_eq!(framer.poll_timeout(), Some(CommandEvent::Timeout));
        assert_eq!(framer.state(), FramerState::Idle);
        assert_eq!(framer.push_data(b'1'), CommandEvent::Command(b'1'));
    }

    #[test]
    fn long_idle_gap_does_not_affect_next_marker() {
        let time = MockTime::new();
        let mut framer = CommandFramer::new(&time, TIMEOUT);
        time.advance(TIMEOUT * 50);
        framer.push_data(EXTENDED_MARKER);
        assert_eq!(framer.push_data(0x03), CommandEvent::Extended(0x03));
    }

    #[test]
    fn reset_forgets_pending_marker() {
        let time = MockTime::new();
        let mut framer = CommandFramer::new(&time, TIMEOUT);
        framer.push_data(EXTENDED_MARKER);
        framer.reset();
        assert_eq!(framer.push_data(b'?'), CommandEvent::Command(b'?'));
    }
}
