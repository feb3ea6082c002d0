//! Command handler tests against the simulated FPGA

use fpga_debug_bridge::bus::{SpiWishbone, WishboneBus};
use fpga_debug_bridge::console::{execute, parse_line, CommandContext};
use fpga_debug_bridge::exec::{ExecPhase, ExecState};
use fpga_debug_bridge::router::{JtagRouter, SignalRouter};
use fpga_debug_bridge::sim::{SimFpga, SimJtagPins};

/// One dispatcher worth of state, context built per command.
struct Fixture {
    bus: SpiWishbone<SimFpga>,
    router: SignalRouter<SimJtagPins>,
    exec: ExecState,
}

impl Fixture {
    fn new() -> Self {
        Self {
            bus: SpiWishbone::new(SimFpga::new()),
            router: SignalRouter::new(SimJtagPins::new()),
            exec: ExecState::new(),
        }
    }

    fn run(&mut self, line: &str) -> (Result<(), fpga_debug_bridge::console::ConsoleError>, TestOutput) {
        let mut out = TestOutput::new();
        let cmd = parse_line(line).expect("test lines must parse");
        let mut ctx = CommandContext {
            bus: &mut self.bus,
            jtag: &mut self.router,
            exec: &self.exec,
            log: None,
        };
        let result = execute(&cmd, &mut ctx, &mut out);
        (result, out)
    }
}

#[test]
fn test_write_then_read_roundtrip() {
    let mut fx = Fixture::new();

    let (result, out) = fx.run("W 8100 FF");
    assert!(result.is_ok());
    assert!(out.contains("OK W 8100=FF"));

    let (result, out) = fx.run("R 8100");
    assert!(result.is_ok());
    assert!(out.contains("OK R 8100=FF"));
}

#[test]
fn test_write_reaches_the_peer() {
    let mut fx = Fixture::new();
    fx.run("W 0042 A5");
    assert_eq!(fx.bus.link_mut().peek(0x0042), 0xA5);
}

#[test]
fn test_multi_read_renders_one_line() {
    let mut fx = Fixture::new();
    for (i, v) in [0xDE, 0xAD, 0xBE, 0xEF].iter().enumerate() {
        fx.bus.link_mut().poke(0x8100 + i as u16, *v);
    }

    let (result, out) = fx.run("M 8100 04");
    assert!(result.is_ok());
    assert!(out.contains("OK M 8100: DE AD BE EF"));
}

#[test]
fn test_multi_read_clamps_to_64() {
    let mut fx = Fixture::new();

    // FF requested, 64 performed: identical to asking for exactly 64.
    let (_, big) = fx.run("M 0000 FF");
    let (_, exact) = fx.run("M 0000 40");
    assert_eq!(big.as_str(), exact.as_str());

    let data = big.as_str().split_once(':').unwrap().1;
    assert_eq!(data.split_whitespace().count(), 64);
}

#[test]
fn test_jtag_toggle_and_query() {
    let mut fx = Fixture::new();

    let (_, out) = fx.run("J 1");
    assert!(out.contains("JTAG: ENABLED"));
    assert!(fx.router.is_enabled());

    let (_, out) = fx.run("J");
    assert!(out.contains("JTAG: ENABLED"));

    let (_, out) = fx.run("J 0");
    assert!(out.contains("JTAG: disabled"));
    assert!(!fx.router.is_enabled());
}

#[test]
fn test_pause_set_clear_and_toggle() {
    let mut fx = Fixture::new();

    fx.run("P 1");
    assert_eq!(fx.exec.phase(), ExecPhase::HaltedByHost);
    // P 1 again is idempotent.
    fx.run("P 1");
    assert_eq!(fx.exec.phase(), ExecPhase::HaltedByHost);

    fx.run("P 0");
    assert_eq!(fx.exec.phase(), ExecPhase::Running);

    // Bare P toggles twice back to the original state.
    fx.run("P");
    assert_eq!(fx.exec.phase(), ExecPhase::HaltedByHost);
    fx.run("P");
    assert_eq!(fx.exec.phase(), ExecPhase::Running);

    let (_, out) = fx.run("P x");
    assert!(out.contains("App: running"));
}

#[test]
fn test_continue_without_halt_reports() {
    let mut fx = Fixture::new();
    let (result, out) = fx.run("C");
    assert!(result.is_ok());
    assert!(out.contains("OK: Not at breakpoint"));
}

#[test]
fn test_continue_clears_host_pause() {
    let mut fx = Fixture::new();
    fx.run("P 1");
    let (_, out) = fx.run("C");
    assert!(out.contains("App RESUMED"));
    assert_eq!(fx.exec.phase(), ExecPhase::Running);
}

#[test]
fn test_breakpoint_gate_and_status() {
    let mut fx = Fixture::new();

    let (_, out) = fx.run("B");
    assert!(out.contains("Breakpoints: ENABLED (hit 0 times)"));

    fx.run("B 0");
    assert!(!fx.exec.breakpoints_enabled());

    fx.run("B 1");
    assert!(fx.exec.breakpoints_enabled());
}

#[test]
fn test_breakpoint_disable_force_releases() {
    let mut fx = Fixture::new();
    fx.exec.enter_breakpoint();

    fx.run("B 0");
    assert!(!fx.exec.at_breakpoint());
}

#[test]
fn test_dump_reports_flags_and_registers() {
    let mut fx = Fixture::new();
    fx.bus.link_mut().poke(0x8010, 0xFD); // mode bits masked to 5
    fx.bus.link_mut().poke(0x8101, 0x7F);

    let (result, out) = fx.run("D");
    assert!(result.is_ok());
    assert!(out.contains("=== DEBUG DUMP ==="));
    assert!(out.contains("JTAG Bridge: disabled"));
    assert!(out.contains("App: running"));
    assert!(out.contains("[8101] = 7F"));
    assert!(out.contains("Mode: 5"));
    assert!(out.contains("=== END DUMP ==="));
}

#[test]
fn test_help_lists_commands_and_status() {
    let mut fx = Fixture::new();
    let (result, out) = fx.run("H");
    assert!(result.is_ok());
    for needle in ["W AAAA DD", "R AAAA", "M AAAA NN", "J [1|0]", "B [1|0]"] {
        assert!(out.contains(needle), "help should list '{}'", needle);
    }
    assert!(out.contains("Status: App running, JTAG disabled, Breakpoints ENABLED"));
}

// Test output buffer
struct TestOutput {
    buf: [u8; 2048],
    len: usize,
}

impl TestOutput {
    fn new() -> Self {
        Self {
            buf: [0u8; 2048],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    fn contains(&self, s: &str) -> bool {
        self.as_str().contains(s)
    }
}

impl core::fmt::Write for TestOutput {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let available = self.buf.len() - self.len;
        let to_copy = bytes.len().min(available);
        self.buf[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}
