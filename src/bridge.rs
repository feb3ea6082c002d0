//! Debug bridge integrator.
//!
//! Owns the console, the register bus, the JTAG router and the execution
//! state, and pumps serial bytes through the dispatcher. The application
//! embeds it with three calls: `begin()` once after the serial link is up,
//! `service()` every loop cycle, and `breakpoint()` wherever it wants a
//! host-controlled halt point. `is_paused()` gates the app's own per-cycle
//! work.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::bridge_info;
use crate::bus::WishboneBus;
use crate::console::{CommandContext, Console, VERSION};
use crate::exec::ExecState;
use crate::logging::LogRing;
use crate::router::JtagRouter;

/// Serial link: console output sink plus non-blocking byte input.
pub trait SerialIo: Write {
    /// Fetch the next received byte, or None when the line is idle.
    fn poll_byte(&mut self) -> Option<u8>;
}

/// Serial poll interval while blocked at a breakpoint.
pub const DEFAULT_POLL_MS: u32 = 10;

pub struct DebugBridge<B, J, S, D>
where
    B: WishboneBus,
    J: JtagRouter,
    S: SerialIo,
    D: DelayNs,
{
    bus: B,
    jtag: J,
    serial: S,
    delay: D,
    console: Console,
    exec: ExecState,
    poll_ms: u32,
    log: Option<&'static LogRing>,
}

impl<B, J, S, D> DebugBridge<B, J, S, D>
where
    B: WishboneBus,
    J: JtagRouter,
    S: SerialIo,
    D: DelayNs,
{
    pub fn new(bus: B, jtag: J, serial: S, delay: D) -> Self {
        Self {
            bus,
            jtag,
            serial,
            delay,
            console: Console::new(),
            exec: ExecState::new(),
            poll_ms: DEFAULT_POLL_MS,
            log: None,
        }
    }

    /// Override the breakpoint poll interval.
    pub fn poll_interval(mut self, ms: u32) -> Self {
        self.poll_ms = ms;
        self
    }

    /// Attach a diagnostic log ring.
    pub fn with_log(mut self, ring: &'static LogRing) -> Self {
        self.log = Some(ring);
        self
    }

    /// Announce readiness. Call once after the serial link is up.
    pub fn begin(&mut self) {
        let _ = writeln!(
            self.serial,
            "[DBG] FPGA debug bridge ready ({}). Type H for help.",
            VERSION
        );
        bridge_info!(self.log, "debug bridge up");
    }

    /// Pump all pending serial bytes through the dispatcher.
    ///
    /// Every completed command executes synchronously here, including its
    /// bus transfers and routing or execution-state changes. Parse errors
    /// render as a single `ERR:` line and the loop keeps going.
    pub fn service(&mut self) {
        while let Some(byte) = self.serial.poll_byte() {
            let Self {
                bus,
                jtag,
                serial,
                console,
                exec,
                log,
                ..
            } = self;
            let mut ctx = CommandContext {
                bus,
                jtag,
                exec,
                log: *log,
            };
            if let Some(Err(err)) = console.process_byte(byte, &mut ctx, &mut *serial) {
                let _ = writeln!(serial, "ERR: {}", err);
            }
        }
    }

    /// Host-controlled halt point for application code.
    ///
    /// With breakpoints gated off this returns immediately and records
    /// nothing. Otherwise it blocks the caller, polling the serial link on
    /// a fixed interval so the console stays live, until released by `C`,
    /// `B 0` or a resume. No timeout: the halt holds until the host acts.
    pub fn breakpoint(&mut self, label: Option<&str>) {
        if !self.exec.breakpoints_enabled() {
            return;
        }

        let hit = self.exec.enter_breakpoint();
        match label {
            Some(name) => {
                let _ = writeln!(
                    self.serial,
                    "[DBG] BREAKPOINT #{} '{}' - Type C to continue",
                    hit, name
                );
            }
            None => {
                let _ = writeln!(self.serial, "[DBG] BREAKPOINT #{} - Type C to continue", hit);
            }
        }
        bridge_info!(self.log, "breakpoint #{} ({})", hit, label.unwrap_or("unnamed"));

        while self.exec.at_breakpoint() && self.exec.breakpoints_enabled() {
            self.service();
            self.delay.delay_ms(self.poll_ms);
        }

        self.exec.leave_breakpoint();
        match label {
            Some(name) => {
                let _ = writeln!(self.serial, "[DBG] Continuing from breakpoint '{}'", name);
            }
            None => {
                let _ = writeln!(self.serial, "[DBG] Continuing from breakpoint");
            }
        }
        bridge_info!(self.log, "breakpoint #{} released", hit);
    }

    /// True while the app should skip its per-cycle work.
    pub fn is_paused(&self) -> bool {
        self.exec.is_paused()
    }

    /// Execution state, for app-side queries.
    pub fn exec(&self) -> &ExecState {
        &self.exec
    }

    /// Direct register access for application code.
    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }
}
