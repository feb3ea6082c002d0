//! # FpgaDebugBridge
//!
//! In-firmware debug bridge for an MCU-attached FPGA: a line-oriented
//! serial command console drives register bus access, JTAG signal routing
//! and execution control (pause/resume/breakpoints) over one link.
//!
//! ## Architecture
//!
//! The console dispatches typed commands against a [`CommandContext`]
//! holding the bus, the router and the execution state; [`DebugBridge`]
//! integrates the pieces and hosts the blocking breakpoint loop, which
//! keeps polling the console so a halted target stays responsive. Hardware
//! sits behind small traits (`SpiTransfer`, `JtagPins`, `SerialIo`), so
//! the whole protocol runs on the host against the simulated FPGA in
//! [`sim`].
//!
//! [`CommandContext`]: console::CommandContext

#![cfg_attr(not(test), no_std)]

pub mod bridge;
pub mod bus;
pub mod config;
pub mod console;
pub mod exec;
pub mod logging;
pub mod router;
pub mod sim;

#[cfg(target_arch = "xtensa")]
pub mod hal;

pub use bridge::{DebugBridge, SerialIo};
pub use bus::{BitBangSpi, SpiWishbone, WishboneBus};
pub use config::BridgeConfig;
pub use exec::{ExecPhase, ExecState};
pub use logging::LogRing;
pub use router::{JtagPins, JtagRouter, SignalRouter};
