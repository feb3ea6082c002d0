//! Hardware SPI backend for the bus bridge.
//!
//! Chip select is driven manually rather than by the SPI peripheral: the
//! read framing needs the settle delay while select stays asserted.

use embedded_hal::delay::DelayNs;
use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_svc::hal::spi::{SpiDeviceDriver, SpiDriver};

use crate::bus::{SpiTransfer, READ_SETTLE_US};

pub struct HwSpi<'d> {
    dev: SpiDeviceDriver<'d, SpiDriver<'d>>,
    cs: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> HwSpi<'d> {
    /// Takes a device driver configured for mode 0 and a dedicated CS pin.
    pub fn new(dev: SpiDeviceDriver<'d, SpiDriver<'d>>, mut cs: PinDriver<'d, AnyOutputPin, Output>) -> Self {
        let _ = cs.set_high();
        Self { dev, cs }
    }
}

impl SpiTransfer for HwSpi<'_> {
    fn select(&mut self) {
        let _ = self.cs.set_low();
    }

    fn deselect(&mut self) {
        let _ = self.cs.set_high();
    }

    fn transfer(&mut self, byte: u8) -> u8 {
        let mut rx = [0u8; 1];
        // Transfer failures are unobservable by design on this link.
        let _ = self.dev.transfer(&mut rx, &[byte]);
        rx[0]
    }

    fn settle(&mut self) {
        Ets.delay_us(READ_SETTLE_US);
    }
}
