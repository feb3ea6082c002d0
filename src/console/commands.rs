//! Command handlers
//!
//! Each handler performs its side effect synchronously and writes the
//! response line(s) before returning; there is no queuing. Response
//! formats are the wire protocol and must stay stable.

use core::fmt::Write;

use super::error::ConsoleError;
use super::parser::{Command, PauseOp, Switch};
use crate::bus::{regs, WishboneBus};
use crate::exec::ExecState;
use crate::logging::LogRing;
use crate::router::JtagRouter;
use crate::{bridge_debug, bridge_info};

/// Multi-read counts are clamped to this, not rejected.
pub const MULTI_READ_MAX: u8 = 64;

/// Everything a command may touch, passed by reference per dispatch.
pub struct CommandContext<'a> {
    pub bus: &'a mut dyn WishboneBus,
    pub jtag: &'a mut dyn JtagRouter,
    pub exec: &'a ExecState,
    pub log: Option<&'a LogRing>,
}

/// Execute a parsed command
pub fn execute(
    cmd: &Command,
    ctx: &mut CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    match *cmd {
        Command::Write { addr, data } => cmd_write(addr, data, ctx, out),
        Command::Read { addr } => cmd_read(addr, ctx, out),
        Command::MultiRead { addr, count } => cmd_multi_read(addr, count, ctx, out),
        Command::Dump => cmd_dump(ctx, out),
        Command::Jtag(arg) => cmd_jtag(arg, ctx, out),
        Command::Pause(op) => cmd_pause(op, ctx, out),
        Command::Continue => cmd_continue(ctx, out),
        Command::Breakpoints(arg) => cmd_breakpoints(arg, ctx, out),
        Command::Help => cmd_help(ctx, out),
    }
}

fn enabled_str(enabled: bool) -> &'static str {
    if enabled {
        "ENABLED"
    } else {
        "disabled"
    }
}

fn app_str(paused: bool) -> &'static str {
    if paused {
        "PAUSED"
    } else {
        "running"
    }
}

// --- Command Implementations ---

fn cmd_write(
    addr: u16,
    data: u8,
    ctx: &mut CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    ctx.bus.write(addr, data);
    bridge_debug!(ctx.log, "bus write {:04X}={:02X}", addr, data);
    let _ = writeln!(out, "OK W {:04X}={:02X}", addr, data);
    Ok(())
}

fn cmd_read(
    addr: u16,
    ctx: &mut CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let data = ctx.bus.read(addr);
    let _ = writeln!(out, "OK R {:04X}={:02X}", addr, data);
    Ok(())
}

fn cmd_multi_read(
    addr: u16,
    count: u8,
    ctx: &mut CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let count = count.min(MULTI_READ_MAX);
    let _ = write!(out, "OK M {:04X}:", addr);
    for i in 0..count {
        let data = ctx.bus.read(addr.wrapping_add(i as u16));
        let _ = write!(out, " {:02X}", data);
    }
    let _ = writeln!(out);
    Ok(())
}

fn cmd_dump(ctx: &mut CommandContext<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = writeln!(out, "=== DEBUG DUMP ===");
    let _ = writeln!(out, "JTAG Bridge: {}", enabled_str(ctx.jtag.is_enabled()));
    let _ = writeln!(out, "App: {}", app_str(ctx.exec.is_paused()));
    let _ = writeln!(
        out,
        "Breakpoints: {} (hit {} times)",
        enabled_str(ctx.exec.breakpoints_enabled()),
        ctx.exec.hit_count()
    );
    let _ = writeln!(
        out,
        "--- RGB LED (0x{:04X}-0x{:04X}) ---",
        regs::RGB_LED_BASE,
        regs::RGB_LED_BASE + regs::RGB_LED_LEN - 1
    );
    for addr in regs::RGB_LED_BASE..regs::RGB_LED_BASE + regs::RGB_LED_LEN {
        let _ = writeln!(out, "  [{:04X}] = {:02X}", addr, ctx.bus.read(addr));
    }
    let _ = writeln!(out, "--- Mode ---");
    let _ = writeln!(out, "  Mode: {}", ctx.bus.read(regs::MODE) & regs::MODE_MASK);
    let _ = writeln!(out, "=== END DUMP ===");
    Ok(())
}

fn cmd_jtag(
    arg: Switch,
    ctx: &mut CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    match arg {
        Switch::On => {
            ctx.jtag.enable();
            bridge_info!(ctx.log, "JTAG routing enabled");
        }
        Switch::Off => {
            ctx.jtag.disable();
            bridge_info!(ctx.log, "JTAG routing disabled");
        }
        Switch::Show => {}
    }
    let _ = writeln!(out, "JTAG: {}", enabled_str(ctx.jtag.is_enabled()));
    Ok(())
}

fn pause_app(ctx: &mut CommandContext<'_>, out: &mut dyn Write) {
    ctx.exec.pause();
    bridge_info!(ctx.log, "app paused by host");
    let _ = writeln!(out, "[DBG] App PAUSED - debug console has control");
}

fn resume_app(ctx: &mut CommandContext<'_>, out: &mut dyn Write) {
    ctx.exec.resume();
    bridge_info!(ctx.log, "app resumed by host");
    let _ = writeln!(out, "[DBG] App RESUMED");
}

fn cmd_pause(
    op: PauseOp,
    ctx: &mut CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    match op {
        PauseOp::Pause => pause_app(ctx, out),
        PauseOp::Resume => resume_app(ctx, out),
        // Bare `P` toggles.
        PauseOp::Toggle => {
            if ctx.exec.is_paused() {
                resume_app(ctx, out)
            } else {
                pause_app(ctx, out)
            }
        }
        PauseOp::Show => {
            let _ = writeln!(out, "App: {}", app_str(ctx.exec.is_paused()));
        }
    }
    Ok(())
}

fn cmd_continue(ctx: &mut CommandContext<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if ctx.exec.clear_breakpoint() {
        // The blocked breakpoint call notices the cleared flag and
        // announces the continuation itself.
    } else if ctx.exec.is_paused() {
        resume_app(ctx, out);
    } else {
        let _ = writeln!(out, "OK: Not at breakpoint");
    }
    Ok(())
}

fn cmd_breakpoints(
    arg: Switch,
    ctx: &mut CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    match arg {
        Switch::On => {
            ctx.exec.set_breakpoints_enabled(true);
            bridge_info!(ctx.log, "breakpoints enabled");
            let _ = writeln!(out, "[DBG] Breakpoints ENABLED");
        }
        Switch::Off => {
            // Force-releases an active breakpoint halt as well.
            ctx.exec.set_breakpoints_enabled(false);
            bridge_info!(ctx.log, "breakpoints disabled");
            let _ = writeln!(out, "[DBG] Breakpoints DISABLED - all breakpoints will be skipped");
        }
        Switch::Show => {
            let _ = writeln!(
                out,
                "Breakpoints: {} (hit {} times)",
                enabled_str(ctx.exec.breakpoints_enabled()),
                ctx.exec.hit_count()
            );
        }
    }
    Ok(())
}

fn cmd_help(ctx: &mut CommandContext<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = writeln!(out, "=== FPGA DEBUG BRIDGE ===");
    let _ = writeln!(out, "W AAAA DD  - Write DD to addr AAAA");
    let _ = writeln!(out, "R AAAA     - Read from addr AAAA");
    let _ = writeln!(out, "M AAAA NN  - Read NN bytes from AAAA");
    let _ = writeln!(out, "D          - Dump debug registers");
    let _ = writeln!(out, "J [1|0]    - Enable/disable JTAG routing");
    let _ = writeln!(out, "P [1|0]    - Pause/resume app");
    let _ = writeln!(out, "C          - Continue from breakpoint");
    let _ = writeln!(out, "B [1|0]    - Enable/disable breakpoints");
    let _ = writeln!(out, "H          - This help");
    let _ = writeln!(
        out,
        "Status: App {}, JTAG {}, Breakpoints {}",
        app_str(ctx.exec.is_paused()),
        enabled_str(ctx.jtag.is_enabled()),
        enabled_str(ctx.exec.breakpoints_enabled())
    );
    Ok(())
}
