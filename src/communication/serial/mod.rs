//! Buffered serial transport
//!
//! - [`port`]: `AsyncSerialPort`, ring-buffered UART with loss accounting
//! - [`shared`]: `SharedSerial`, the port installed for interrupt-driven operation
//! - [`link`]: `SerialLink`, non-blocking steps used by the pumped context

pub mod link;
pub mod port;
pub mod shared;

pub use link::SerialLink;
pub use port::{AsyncSerialPort, SerialConfig};
pub use shared::SharedSerial;
