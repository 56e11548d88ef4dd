//! Communication
//!
//! The transmitter talks to the host (through the paired Bluetooth module)
//! over one serial link.
//!
//! # Layers
//!
//! - [`serial`]: buffered UART transport, polled or interrupt driven
//! - Command framing lives in `yunibeer_core::command` and is driven by the
//!   transmitter context
//!
//! # Link settings
//!
//! - UART1, 115200 baud, 8N1
//! - No hardware flow control; loss is counted, not prevented

pub mod serial;
