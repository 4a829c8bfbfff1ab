//! Simulated capture peripheral for host tests
//!
//! Time only moves when a test calls [`SimulatedCapture::advance`], and an
//! edge only latches when it matches the programmed polarity, like the real
//! edge detector.

use super::{CaptureHardware, ClockDivisor, EdgePolarity, Ticks};

#[derive(Debug, Clone)]
pub struct SimulatedCapture {
    counter: Ticks,
    capture: Ticks,
    divisor: ClockDivisor,
    polarity: EdgePolarity,
    interrupt_enabled: bool,
}

impl SimulatedCapture {
    /// Power-on state
    pub const fn new() -> Self {
        Self {
            counter: 0,
            capture: 0,
            divisor: ClockDivisor::None,
            polarity: EdgePolarity::Falling,
            interrupt_enabled: false,
        }
    }

    /// Lets `ticks` counter periods elapse, wrapping like a 16-bit counter
    pub fn advance(&mut self, ticks: Ticks) {
        self.counter = self.counter.wrapping_add(ticks);
    }

    pub fn set_counter(&mut self, ticks: Ticks) {
        self.counter = ticks;
    }

    pub fn counter(&self) -> Ticks {
        self.counter
    }

    pub fn divisor(&self) -> ClockDivisor {
        self.divisor
    }

    pub fn polarity(&self) -> EdgePolarity {
        self.polarity
    }

    /// Presents a transition on the echo line
    ///
    /// Returns true when the edge qualified, i.e. the counter was latched and the
    /// caller should run the interrupt handler.
    pub fn edge(&mut self, transition: EdgePolarity) -> bool {
        if transition != self.polarity {
            return false;
        }
        self.capture = self.counter;
        true
    }
}

impl CaptureHardware for SimulatedCapture {
    fn set_clock(&mut self, divisor: ClockDivisor) {
        self.divisor = divisor;
    }

    fn set_edge(&mut self, polarity: EdgePolarity) {
        self.polarity = polarity;
    }

    fn write_counter(&mut self, ticks: Ticks) {
        self.counter = ticks;
    }

    fn write_capture(&mut self, ticks: Ticks) {
        self.capture = ticks;
    }

    fn capture(&self) -> Ticks {
        self.capture
    }

    fn set_interrupt_enabled(&mut self, enabled: bool) {
        self.interrupt_enabled = enabled;
    }

    fn interrupt_enabled(&self) -> bool {
        self.interrupt_enabled
    }

    fn reset_to_defaults(&mut self) {
        *self = Self::new();
    }
}
