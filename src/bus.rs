//! Register bus bridge to the FPGA.
//!
//! Reads and writes are framed into a fixed 4-byte, chip-select-gated
//! serial transaction: opcode, address high, address low, then the data
//! byte (write) or a dummy byte whose reply carries the data (read). A
//! short settle delay sits between the address and data phases of a read
//! so the FPGA's response becomes valid on the return line.
//!
//! There is no acknowledgement or error signalling on this link. With no
//! FPGA attached a read returns the idle-line value and a write is lost;
//! callers that need reliability must verify with a read-back.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Transaction opcodes.
pub const OP_READ: u8 = 0x00;
pub const OP_WRITE: u8 = 0x01;

/// Settle time between the address and data phases of a read.
pub const READ_SETTLE_US: u32 = 2;

/// Well-known FPGA registers inspected by the dump command.
pub mod regs {
    /// RGB LED control block, one register per channel plus intensity.
    pub const RGB_LED_BASE: u16 = 0x8100;
    pub const RGB_LED_LEN: u16 = 4;

    /// Mode register; only the low three bits are meaningful.
    pub const MODE: u16 = 0x8010;
    pub const MODE_MASK: u8 = 0x07;
}

/// Byte-level serial link under the framing layer.
///
/// `select`/`deselect` bracket one whole transaction; `settle` is invoked
/// between the address and data phases of a read, with select still
/// asserted.
pub trait SpiTransfer {
    fn select(&mut self);
    fn deselect(&mut self);
    /// Shift one byte out while shifting one byte in.
    fn transfer(&mut self, byte: u8) -> u8;
    fn settle(&mut self);
}

/// Register access contract used by the console and the application.
pub trait WishboneBus {
    fn write(&mut self, addr: u16, data: u8);
    fn read(&mut self, addr: u16) -> u8;
}

/// Framing layer: turns register accesses into bus transactions.
pub struct SpiWishbone<T: SpiTransfer> {
    link: T,
}

impl<T: SpiTransfer> SpiWishbone<T> {
    pub fn new(link: T) -> Self {
        Self { link }
    }

    /// Access the underlying link (useful against the simulated peer).
    pub fn link_mut(&mut self) -> &mut T {
        &mut self.link
    }
}

impl<T: SpiTransfer> WishboneBus for SpiWishbone<T> {
    fn write(&mut self, addr: u16, data: u8) {
        self.link.select();
        self.link.transfer(OP_WRITE);
        self.link.transfer((addr >> 8) as u8);
        self.link.transfer(addr as u8);
        self.link.transfer(data);
        self.link.deselect();
    }

    fn read(&mut self, addr: u16) -> u8 {
        self.link.select();
        self.link.transfer(OP_READ);
        self.link.transfer((addr >> 8) as u8);
        self.link.transfer(addr as u8);
        self.link.settle();
        let data = self.link.transfer(0x00);
        self.link.deselect();
        data
    }
}

/// Bit-banged mode-0, MSB-first backend over plain GPIO.
///
/// Pin operations are infallible on the targets this runs on, hence the
/// unwraps.
pub struct BitBangSpi<Clk, Mosi, Miso, Cs, D>
where
    Clk: OutputPin,
    Mosi: OutputPin,
    Miso: InputPin,
    Cs: OutputPin,
    D: DelayNs,
{
    half_period_ns: u32,
    clk: Clk,
    mosi: Mosi,
    miso: Miso,
    cs: Cs,
    delay: D,
}

impl<Clk, Mosi, Miso, Cs, D> BitBangSpi<Clk, Mosi, Miso, Cs, D>
where
    Clk: OutputPin,
    Mosi: OutputPin,
    Miso: InputPin,
    Cs: OutputPin,
    D: DelayNs,
{
    /// Clock idles low, select idles high.
    pub fn new(freq_hz: u32, mut clk: Clk, mosi: Mosi, miso: Miso, mut cs: Cs, delay: D) -> Self {
        let period_ns = 1_000_000_000 / freq_hz;
        cs.set_high().unwrap();
        clk.set_low().unwrap();
        Self {
            half_period_ns: period_ns / 2,
            clk,
            mosi,
            miso,
            cs,
            delay,
        }
    }
}

impl<Clk, Mosi, Miso, Cs, D> SpiTransfer for BitBangSpi<Clk, Mosi, Miso, Cs, D>
where
    Clk: OutputPin,
    Mosi: OutputPin,
    Miso: InputPin,
    Cs: OutputPin,
    D: DelayNs,
{
    fn select(&mut self) {
        self.cs.set_low().unwrap();
    }

    fn deselect(&mut self) {
        self.cs.set_high().unwrap();
    }

    fn transfer(&mut self, byte: u8) -> u8 {
        let mut read = 0u8;
        for bit in (0..8).rev() {
            // Set up the out bit, then sample the in bit on the rising edge.
            self.mosi
                .set_state(PinState::from(byte & (1 << bit) != 0))
                .unwrap();
            self.delay.delay_ns(self.half_period_ns);
            self.clk.set_high().unwrap();
            if self.miso.is_high().unwrap() {
                read |= 1 << bit;
            }
            self.delay.delay_ns(self.half_period_ns);
            self.clk.set_low().unwrap();
        }
        read
    }

    fn settle(&mut self) {
        self.delay.delay_us(READ_SETTLE_US);
    }
}
