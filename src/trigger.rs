//! Trigger pulse generation
//!
//! The sensor starts a ranging cycle on a high pulse of at least 10µs on its
//! trigger input. The pulse is timed with a blocking delay: it is short,
//! bounded, and happens before any capture activity of the cycle.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Minimum trigger pulse width from the HC-SR04 datasheet
pub const TRIGGER_PULSE_US: u32 = 10;

/// Drives the sensor's trigger line
pub struct TriggerSequencer<P, D> {
    pin: P,
    delay: D,
    pulse_us: u32,
}

impl<P: OutputPin, D: DelayNs> TriggerSequencer<P, D> {
    /// Sequencer emitting the datasheet minimum pulse
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            pulse_us: TRIGGER_PULSE_US,
        }
    }

    /// Uses a longer pulse; widths below the datasheet minimum are raised to it
    pub fn with_pulse_width(mut self, pulse_us: u32) -> Self {
        self.pulse_us = pulse_us.max(TRIGGER_PULSE_US);
        self
    }

    pub fn pulse_width_us(&self) -> u32 {
        self.pulse_us
    }

    /// Emits one trigger pulse, blocking for its duration
    ///
    /// Returns as soon as the line is low again; the echo arrives later through
    /// the capture interrupt.
    pub fn trigger(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.delay.delay_us(self.pulse_us);
        self.pin.set_low()
    }

    /// Gives the pin and delay back
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}
