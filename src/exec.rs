//! Execution control state for the debug bridge.
//!
//! Tracks whether the application is running, halted by the host (`P 1`),
//! or halted at a breakpoint embedded in the application code. State is a
//! set of lock-free atomics so the app loop can query it from anywhere
//! without taking a reference into the bridge.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Observable execution phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecPhase {
    /// Application loop is making forward progress.
    Running,
    /// Halted by an explicit host pause command.
    HaltedByHost,
    /// Blocked inside a breakpoint call.
    HaltedAtBreakpoint,
}

/// Execution control flags.
///
/// `paused` is the union view: it is set both by a host pause and for the
/// duration of a breakpoint halt, so `is_paused()` is the one check the
/// app loop needs at the top of its cycle.
pub struct ExecState {
    /// App-visible halt flag (host pause or breakpoint).
    paused: AtomicBool,

    /// True while a breakpoint call is blocked waiting for release.
    at_breakpoint: AtomicBool,

    /// Global breakpoint gate. When false, breakpoint calls are no-ops.
    breakpoints_enabled: AtomicBool,

    /// Total breakpoint hits since boot (never reset, diagnostics only).
    hits: AtomicU32,
}

impl ExecState {
    /// Create the boot state: running, breakpoints armed.
    pub const fn new() -> Self {
        Self {
            paused: AtomicBool::new(false),
            at_breakpoint: AtomicBool::new(false),
            breakpoints_enabled: AtomicBool::new(true),
            hits: AtomicU32::new(0),
        }
    }

    /// Host-initiated pause. Idempotent.
    #[inline]
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume from either halted state. Idempotent.
    #[inline]
    pub fn resume(&self) {
        self.at_breakpoint.store(false, Ordering::Release);
        self.paused.store(false, Ordering::Release);
    }

    /// True while halted for any reason.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// True while a breakpoint call is blocked.
    #[inline]
    pub fn at_breakpoint(&self) -> bool {
        self.at_breakpoint.load(Ordering::Acquire)
    }

    #[inline]
    pub fn breakpoints_enabled(&self) -> bool {
        self.breakpoints_enabled.load(Ordering::Acquire)
    }

    /// Gate breakpoints globally. Disabling also releases an active
    /// breakpoint halt (forced release, distinct from continue).
    pub fn set_breakpoints_enabled(&self, enabled: bool) {
        self.breakpoints_enabled.store(enabled, Ordering::Release);
        if !enabled {
            self.at_breakpoint.store(false, Ordering::Release);
        }
    }

    /// Enter a breakpoint halt. Returns the hit number for this stop.
    ///
    /// Callers must check `breakpoints_enabled()` first; this only records
    /// the halt.
    pub fn enter_breakpoint(&self) -> u32 {
        let hit = self.hits.fetch_add(1, Ordering::Relaxed) + 1;
        self.at_breakpoint.store(true, Ordering::Release);
        self.paused.store(true, Ordering::Release);
        hit
    }

    /// Continue command path: clear the breakpoint flag if one is active.
    ///
    /// Returns true if a breakpoint halt was actually released. The blocked
    /// breakpoint call notices the cleared flag and finishes the halt.
    pub fn clear_breakpoint(&self) -> bool {
        self.at_breakpoint.swap(false, Ordering::AcqRel)
    }

    /// Finish a breakpoint halt (called by the blocked breakpoint call on
    /// its way out).
    pub fn leave_breakpoint(&self) {
        self.at_breakpoint.store(false, Ordering::Release);
        self.paused.store(false, Ordering::Release);
    }

    /// Total breakpoint hits since boot.
    #[inline]
    pub fn hit_count(&self) -> u32 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Current observable phase.
    pub fn phase(&self) -> ExecPhase {
        if self.at_breakpoint() {
            ExecPhase::HaltedAtBreakpoint
        } else if self.is_paused() {
            ExecPhase::HaltedByHost
        } else {
            ExecPhase::Running
        }
    }
}

impl Default for ExecState {
    fn default() -> Self {
        Self::new()
    }
}
