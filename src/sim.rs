//! Simulated FPGA peer.
//!
//! Decodes the bus framing against an in-memory register file so the whole
//! bridge can run on the host: unit and integration tests drive it, and the
//! non-MCU build of the binary wires it behind a stdin/stdout console.

use crate::bus::{SpiTransfer, OP_WRITE};
use crate::router::JtagPins;

/// Value returned for transfer phases that carry no data, and for clocking
/// past the end of a frame (an undriven return line reads high).
pub const IDLE_BYTE: u8 = 0xFF;

#[derive(Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Op,
    AddrHi,
    AddrLo,
    Data,
}

/// Register-file peer decoding one 4-byte transaction per select window.
pub struct SimFpga {
    regs: [u8; 0x1_0000],
    phase: Phase,
    op: u8,
    addr: u16,
}

impl SimFpga {
    pub fn new() -> Self {
        Self {
            regs: [0; 0x1_0000],
            phase: Phase::Idle,
            op: 0,
            addr: 0,
        }
    }

    /// Inspect a register directly (test seam).
    pub fn peek(&self, addr: u16) -> u8 {
        self.regs[addr as usize]
    }

    /// Set a register directly (test seam).
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.regs[addr as usize] = value;
    }
}

impl Default for SimFpga {
    fn default() -> Self {
        Self::new()
    }
}

impl SpiTransfer for SimFpga {
    fn select(&mut self) {
        self.phase = Phase::Op;
    }

    fn deselect(&mut self) {
        self.phase = Phase::Idle;
    }

    fn transfer(&mut self, byte: u8) -> u8 {
        match self.phase {
            Phase::Op => {
                self.op = byte;
                self.phase = Phase::AddrHi;
                IDLE_BYTE
            }
            Phase::AddrHi => {
                self.addr = (byte as u16) << 8;
                self.phase = Phase::AddrLo;
                IDLE_BYTE
            }
            Phase::AddrLo => {
                self.addr |= byte as u16;
                self.phase = Phase::Data;
                IDLE_BYTE
            }
            Phase::Data => {
                self.phase = Phase::Idle;
                if self.op == OP_WRITE {
                    self.regs[self.addr as usize] = byte;
                    IDLE_BYTE
                } else {
                    self.regs[self.addr as usize]
                }
            }
            Phase::Idle => IDLE_BYTE,
        }
    }

    fn settle(&mut self) {}
}

/// JTAG pin recorder for off-target routing tests and the host demo.
#[derive(Default)]
pub struct SimJtagPins {
    pub claims: u32,
    pub releases: u32,
}

impl SimJtagPins {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JtagPins for SimJtagPins {
    fn claim(&mut self) {
        self.claims += 1;
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}
