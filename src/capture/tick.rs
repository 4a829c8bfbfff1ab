//! Capture emulated on a free-running tick counter
//!
//! For targets whose timers have no input-capture register. The counter is the
//! prescaled distance from the last counter write to the current tick of a
//! monotonic [`TickSource`], truncated to 16 bits like the timer it stands in
//! for. The capture register is latched by [`TickCapture::latch`] with the tick
//! at which the edge was observed.

use super::{CaptureHardware, ClockDivisor, EdgePolarity, Ticks};

/// Monotonic 64-bit tick counter running at the source clock
pub trait TickSource {
    fn now(&self) -> u64;
}

/// Counter value `now` ticks after `origin`, prescaled by `divisor`
///
/// A stopped clock reads zero.
pub const fn counter_at(origin: u64, now: u64, divisor: ClockDivisor) -> Ticks {
    match divisor.factor() {
        Some(factor) => (now.wrapping_sub(origin) / factor as u64) as Ticks,
        None => 0,
    }
}

/// Origin that makes the counter read `ticks` at `now`
pub const fn origin_for(ticks: Ticks, now: u64, divisor: ClockDivisor) -> u64 {
    let factor = match divisor.factor() {
        Some(factor) => factor as u64,
        None => 1,
    };
    now.wrapping_sub(ticks as u64 * factor)
}

/// Emulated input-capture unit over a tick source
pub struct TickCapture<C> {
    clock: C,
    /// Source tick at which the counter read zero
    origin: u64,
    capture: Ticks,
    divisor: ClockDivisor,
    edge: EdgePolarity,
    interrupt_enabled: bool,
}

impl<C: TickSource> TickCapture<C> {
    /// Power-on state: counter stopped, interrupt disabled
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            origin: 0,
            capture: 0,
            divisor: ClockDivisor::None,
            edge: EdgePolarity::Falling,
            interrupt_enabled: false,
        }
    }

    /// Current counter value
    pub fn counter(&self) -> Ticks {
        counter_at(self.origin, self.clock.now(), self.divisor)
    }

    /// Edge the capture has to be latched on
    pub fn edge(&self) -> EdgePolarity {
        self.edge
    }

    /// Latches the counter as of source tick `at`
    ///
    /// Returns whether the capture interrupt is enabled, i.e. whether the caller
    /// has to dispatch the event. Nothing is latched otherwise.
    pub fn latch(&mut self, at: u64) -> bool {
        if !self.interrupt_enabled {
            return false;
        }
        self.capture = counter_at(self.origin, at, self.divisor);
        true
    }
}

impl<C: TickSource> CaptureHardware for TickCapture<C> {
    fn set_clock(&mut self, divisor: ClockDivisor) {
        // keep the counter value across a prescaler change
        let now = self.clock.now();
        let ticks = counter_at(self.origin, now, self.divisor);
        self.divisor = divisor;
        self.origin = origin_for(ticks, now, divisor);
    }

    fn set_edge(&mut self, polarity: EdgePolarity) {
        self.edge = polarity;
    }

    fn write_counter(&mut self, ticks: Ticks) {
        self.origin = origin_for(ticks, self.clock.now(), self.divisor);
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
        self.origin = 0;
        self.capture = 0;
        self.divisor = ClockDivisor::None;
        self.edge = EdgePolarity::Falling;
        self.interrupt_enabled = false;
    }
}
