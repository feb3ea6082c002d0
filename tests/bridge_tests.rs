//! End-to-end bridge tests: scripted serial input, simulated FPGA peer.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use fpga_debug_bridge::bus::SpiWishbone;
use fpga_debug_bridge::exec::ExecPhase;
use fpga_debug_bridge::router::SignalRouter;
use fpga_debug_bridge::sim::{SimFpga, SimJtagPins};
use fpga_debug_bridge::{DebugBridge, SerialIo};

type Input = Rc<RefCell<VecDeque<Option<u8>>>>;
type Output = Rc<RefCell<String>>;

/// Serial link driven from a script: `Some(byte)` is a received byte,
/// `None` is one poll's worth of idle line.
struct ScriptSerial {
    input: Input,
    output: Output,
}

impl core::fmt::Write for ScriptSerial {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.output.borrow_mut().push_str(s);
        Ok(())
    }
}

impl SerialIo for ScriptSerial {
    fn poll_byte(&mut self) -> Option<u8> {
        self.input.borrow_mut().pop_front().flatten()
    }
}

/// Counts polls spent blocked at a breakpoint.
struct CountingDelay(Rc<Cell<u32>>);

impl embedded_hal::delay::DelayNs for CountingDelay {
    fn delay_ns(&mut self, _ns: u32) {
        self.0.set(self.0.get() + 1);
    }
}

struct Rig {
    bridge: DebugBridge<SpiWishbone<SimFpga>, SignalRouter<SimJtagPins>, ScriptSerial, CountingDelay>,
    input: Input,
    output: Output,
    delays: Rc<Cell<u32>>,
}

impl Rig {
    fn new() -> Self {
        let input: Input = Rc::new(RefCell::new(VecDeque::new()));
        let output: Output = Rc::new(RefCell::new(String::new()));
        let delays = Rc::new(Cell::new(0));

        let serial = ScriptSerial {
            input: Rc::clone(&input),
            output: Rc::clone(&output),
        };
        let bridge = DebugBridge::new(
            SpiWishbone::new(SimFpga::new()),
            SignalRouter::new(SimJtagPins::new()),
            serial,
            CountingDelay(Rc::clone(&delays)),
        );

        Self {
            bridge,
            input,
            output,
            delays,
        }
    }

    fn push_line(&self, line: &str) {
        let mut q = self.input.borrow_mut();
        for b in line.bytes() {
            q.push_back(Some(b));
        }
        q.push_back(Some(b'\n'));
    }

    fn push_idle(&self, polls: usize) {
        let mut q = self.input.borrow_mut();
        for _ in 0..polls {
            q.push_back(None);
        }
    }

    fn output(&self) -> String {
        self.output.borrow().clone()
    }
}

#[test]
fn test_begin_announces_readiness() {
    let mut rig = Rig::new();
    rig.bridge.begin();
    assert!(rig.output().contains("FPGA debug bridge ready"));
}

#[test]
fn test_write_then_read_scenario() {
    let mut rig = Rig::new();
    rig.push_line("W 8100 FF");
    rig.push_line("R 8100");
    rig.bridge.service();

    let out = rig.output();
    assert!(out.contains("[DBG] W 8100 FF"), "command is echoed");
    assert!(out.contains("OK W 8100=FF"));
    assert!(out.contains("OK R 8100=FF"), "loopback read sees the write");
}

#[test]
fn test_cr_terminator_and_blank_lines() {
    let mut rig = Rig::new();
    // CR works as a terminator; the LF of a CRLF pair and blank lines are
    // dropped silently.
    for b in "R 0010\r\n\n   \n".bytes() {
        rig.input.borrow_mut().push_back(Some(b));
    }
    rig.bridge.service();

    let out = rig.output();
    assert!(out.contains("OK R 0010=00"));
    assert!(!out.contains("ERR"));
}

#[test]
fn test_malformed_line_recovers() {
    let mut rig = Rig::new();
    rig.push_line("W 8100");
    rig.push_line("W zz 00");
    rig.push_line("X");
    rig.push_line("R 8100");
    rig.bridge.service();

    let out = rig.output();
    assert!(out.contains("ERR: W AAAA DD"));
    assert!(out.contains("ERR: bad hex field"));
    assert!(out.contains("ERR: Unknown command (H for help)"));
    // The dispatcher is still alive afterwards.
    assert!(out.contains("OK R 8100=00"));
}

#[test]
fn test_jtag_route_toggle_scenario() {
    let mut rig = Rig::new();
    rig.push_line("J 1");
    rig.bridge.service();
    assert!(rig.output().contains("JTAG: ENABLED"));

    rig.push_line("J 0");
    rig.bridge.service();
    assert!(rig.output().contains("JTAG: disabled"));
}

#[test]
fn test_multi_read_scenario() {
    let mut rig = Rig::new();
    for (i, v) in [0x11u8, 0x22, 0x33, 0x44].iter().enumerate() {
        rig.bridge.bus().link_mut().poke(0x8100 + i as u16, *v);
    }
    rig.push_line("M 8100 04");
    rig.bridge.service();
    assert!(rig.output().contains("OK M 8100: 11 22 33 44"));
}

#[test]
fn test_breakpoint_blocks_until_continue() {
    let mut rig = Rig::new();
    // Two idle polls before the host sends C: the bridge must keep
    // polling (and delaying) while blocked.
    rig.push_idle(2);
    rig.push_line("C");

    rig.bridge.breakpoint(Some("checkpoint"));

    let out = rig.output();
    assert!(out.contains("BREAKPOINT #1 'checkpoint'"));
    assert!(out.contains("Continuing from breakpoint 'checkpoint'"));
    assert!(rig.delays.get() >= 2, "blocked loop must poll with delays");
    assert_eq!(rig.bridge.exec().phase(), ExecPhase::Running);
    assert_eq!(rig.bridge.exec().hit_count(), 1);

    // A later breakpoint increments the hit counter.
    rig.push_line("C");
    rig.bridge.breakpoint(Some("checkpoint"));
    assert_eq!(rig.bridge.exec().hit_count(), 2);
    assert!(rig.output().contains("BREAKPOINT #2"));
}

#[test]
fn test_breakpoint_disabled_is_complete_noop() {
    let mut rig = Rig::new();
    rig.push_line("B 0");
    rig.bridge.service();

    // Returns immediately: no halt, no hit, no announcement.
    rig.bridge.breakpoint(Some("skipped"));

    assert_eq!(rig.bridge.exec().hit_count(), 0);
    assert!(!rig.bridge.is_paused());
    assert!(!rig.output().contains("BREAKPOINT"));
}

#[test]
fn test_b0_force_releases_active_breakpoint() {
    let mut rig = Rig::new();
    rig.push_idle(1);
    rig.push_line("B 0");

    rig.bridge.breakpoint(None);

    let out = rig.output();
    assert!(out.contains("BREAKPOINT #1"));
    assert!(out.contains("Breakpoints DISABLED"));
    assert!(out.contains("Continuing from breakpoint"));
    assert!(!rig.bridge.is_paused());
    assert_eq!(rig.bridge.exec().hit_count(), 1);
}

#[test]
fn test_pause_while_at_breakpoint_releases_cleanly() {
    let mut rig = Rig::new();
    // Host pauses during the halt, then continues; the app must end up
    // running once the breakpoint call returns.
    rig.push_line("P 1");
    rig.push_idle(1);
    rig.push_line("C");

    rig.bridge.breakpoint(None);

    assert_eq!(rig.bridge.exec().phase(), ExecPhase::Running);
}

#[test]
fn test_commands_work_while_halted() {
    let mut rig = Rig::new();
    rig.bridge.bus().link_mut().poke(0x8010, 0x03);
    // The console stays live at a breakpoint: a read runs mid-halt.
    rig.push_line("R 8010");
    rig.push_idle(1);
    rig.push_line("C");

    rig.bridge.breakpoint(Some("probe"));

    assert!(rig.output().contains("OK R 8010=03"));
}
