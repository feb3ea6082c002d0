//! Hardware layer for the ESP32-S3 target.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Protocol logic stays in the core modules, HAL is just I/O.

pub mod jtag;
pub mod serial;
pub mod spi;
pub mod uart_log;

pub use jtag::UsbJtagPins;
pub use serial::ConsoleUart;
pub use spi::HwSpi;
pub use uart_log::UartLogDrain;
