//! JTAG signal routing.
//!
//! A hardware bridge inside the MCU can place the USB debug peripheral's
//! JTAG signals onto five fixed pins wired to the FPGA's programming
//! header. This module owns the routed/released state; the actual pin and
//! multiplex-register work sits behind [`JtagPins`] so the state machine
//! is testable off-target.

/// Hardware seam: pin directions plus the peripheral multiplex bit.
pub trait JtagPins {
    /// Drive TCK/TMS/TDI/SRST, make TDO an input, release SRST to its
    /// inactive level, and set the multiplex bit routing the USB debug
    /// peripheral onto the pins.
    fn claim(&mut self);

    /// Clear the multiplex bit and revert all five pins to inputs.
    fn release(&mut self);
}

/// Routing control contract used by the console.
pub trait JtagRouter {
    fn enable(&mut self);
    fn disable(&mut self);
    fn is_enabled(&self) -> bool;
}

/// Routing state machine. Starts released; toggled only by command.
pub struct SignalRouter<P: JtagPins> {
    pins: P,
    enabled: bool,
}

impl<P: JtagPins> SignalRouter<P> {
    pub fn new(pins: P) -> Self {
        Self {
            pins,
            enabled: false,
        }
    }

    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }
}

impl<P: JtagPins> JtagRouter for SignalRouter<P> {
    /// Idempotent: re-enabling while routed does not touch the hardware.
    fn enable(&mut self) {
        if !self.enabled {
            self.pins.claim();
            self.enabled = true;
        }
    }

    /// Idempotent: disabling while released does not touch the hardware.
    fn disable(&mut self) {
        if self.enabled {
            self.pins.release();
            self.enabled = false;
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
