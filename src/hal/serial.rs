//! Console transport over a UART driver.

use core::fmt;

use esp_idf_svc::hal::delay::NON_BLOCK;
use esp_idf_svc::hal::uart::UartDriver;

use crate::bridge::SerialIo;

/// Bridge console on a UART (115200 8N1 by convention).
pub struct ConsoleUart<'d> {
    uart: UartDriver<'d>,
}

impl<'d> ConsoleUart<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl fmt::Write for ConsoleUart<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.uart.write(s.as_bytes()).map(|_| ()).map_err(|_| fmt::Error)
    }
}

impl SerialIo for ConsoleUart<'_> {
    fn poll_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.uart.read(&mut buf, NON_BLOCK) {
            Ok(n) if n > 0 => Some(buf[0]),
            _ => None,
        }
    }
}
