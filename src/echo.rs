//! Echo pulse state machine
//!
//! Times the echo pulse with one capture channel by flipping the qualifying
//! edge at runtime: two interrupts per cycle, one per edge.
//!
//! # Transitions
//! - Idle, leading edge: reset the counter, wait for the trailing edge (Armed)
//! - Armed, trailing edge: latch the width, wait for the leading edge again (Complete)
//! - Complete: edges are dropped and counted as overruns until the mainline consumes
//!
//! The machine never returns to Idle by itself. A lost trailing edge leaves it
//! Armed until something else intervenes; there is no timeout.

use crate::capture::{CaptureChannel, EdgeListener, EdgePolarity};
use crate::measurement::{EchoPhase, SharedMeasurement};

/// Capture listener turning two edges into one [`crate::PulseMeasurement`]
pub struct EchoCapture<'a> {
    measurement: &'a SharedMeasurement,
    leading: EdgePolarity,
}

impl<'a> EchoCapture<'a> {
    /// `leading` must match the polarity the capture timer was configured with
    pub const fn new(measurement: &'a SharedMeasurement, leading: EdgePolarity) -> Self {
        Self {
            measurement,
            leading,
        }
    }

    pub fn leading_edge(&self) -> EdgePolarity {
        self.leading
    }

    pub fn trailing_edge(&self) -> EdgePolarity {
        self.leading.opposite()
    }
}

impl EdgeListener for EchoCapture<'_> {
    fn on_edge(&self, channel: &mut dyn CaptureChannel) {
        self.measurement.update(|state| match state.phase() {
            EchoPhase::Idle => {
                state.edges = 1;
                channel.reset_counter();
                channel.set_edge_polarity(self.trailing_edge());
            }
            EchoPhase::Armed => {
                state.edges = 2;
                state.width_ticks = channel.read_captured_value();
                channel.set_edge_polarity(self.leading);
            }
            EchoPhase::Complete => {
                state.overruns = state.overruns.saturating_add(1);
                warn!("capture overrun, measurement not consumed yet");
            }
        });
    }
}
