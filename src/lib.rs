//! Parking sensor core
//!
//! Ultrasonic time-of-flight ranging built around a single input-capture channel.
//!
//! # Measurement Cycle
//! - The trigger line is pulsed high for at least 10µs
//! - The sensor answers with an echo pulse whose width is the round-trip time
//! - The capture timer raises one interrupt per qualifying edge of that pulse
//! - The echo listener arms on the leading edge and latches the width on the trailing edge
//! - The mainline polls the shared measurement, converts ticks to centimeters and re-triggers
//!
//! # Hardware Independence
//! Register access goes through [`capture::CaptureHardware`], so the whole
//! cycle runs against the RP2350 backend in firmware and against a simulated
//! peripheral in the host tests.

#![cfg_attr(not(test), no_std)]

// Must stay first so the logging macros are visible in every module below.
mod fmt;

pub mod capture;
pub mod config;
pub mod distance;
pub mod echo;
pub mod measurement;
pub mod ranger;
pub mod trigger;
pub mod zone;

pub use capture::{
    CaptureChannel, CaptureConfiguration, CaptureHardware, CaptureTimer, ClockDivisor,
    EdgeListener, EdgePolarity, Ticks,
};
pub use distance::DistanceEstimator;
pub use echo::EchoCapture;
pub use measurement::{EchoPhase, PulseMeasurement, SharedMeasurement};
pub use ranger::{Ranger, RangerError, Reading};
pub use trigger::TriggerSequencer;
pub use zone::{Indication, ProximityIndicator, ProximityZone};

#[cfg(test)]
mod tests {
    //! Full measurement cycles through every layer, driven by the simulated capture unit.

    use super::*;
    use crate::capture::sim::SimulatedCapture;
    use crate::trigger::tests::{Level, MockDelay, MockPin};
    use std::cell::RefCell;

    #[test]
    fn test_trigger_to_distance_end_to_end() {
        let measurement = SharedMeasurement::new();
        let echo = EchoCapture::new(&measurement, EdgePolarity::Rising);
        let mut timer = CaptureTimer::new(SimulatedCapture::new());
        timer.configure(CaptureConfiguration::new(EdgePolarity::Rising, ClockDivisor::Div8));
        timer.register_callback(Some(&echo));

        let log = RefCell::new(Vec::new());
        let trigger = TriggerSequencer::new(MockPin::new(&log), MockDelay::new(&log));
        let mut ranger = Ranger::new(trigger, &measurement, DistanceEstimator::REFERENCE);

        ranger.start().unwrap();
        assert_eq!(
            *log.borrow(),
            vec![Level::High, Level::Wait(10), Level::Low],
            "first cycle is started by one trigger pulse"
        );

        // leading edge at t=0, trailing edge 1120 ticks later
        timer.hardware_mut().set_counter(0);
        timer.hardware_mut().edge(EdgePolarity::Rising);
        timer.on_capture_interrupt();
        timer.hardware_mut().advance(1120);
        timer.hardware_mut().edge(EdgePolarity::Falling);
        timer.on_capture_interrupt();

        assert_eq!(
            measurement.try_read(),
            PulseMeasurement {
                width_ticks: 1120,
                ready: true
            }
        );

        let reading = ranger.poll().unwrap().expect("measurement should be complete");
        assert_eq!(reading.width_ticks, 1120);
        assert_eq!(reading.distance_cm, 10);
        assert_eq!(ranger.last_distance(), Some(10));
        assert_eq!(measurement.phase(), EchoPhase::Idle);
        assert_eq!(timer.edge_polarity(), EdgePolarity::Rising);

        // consumption re-arms the next cycle
        assert_eq!(log.borrow().len(), 6);
    }

    #[test]
    fn test_missing_echo_keeps_previous_distance() {
        let measurement = SharedMeasurement::new();
        let echo = EchoCapture::new(&measurement, EdgePolarity::Rising);
        let mut timer = CaptureTimer::new(SimulatedCapture::new());
        timer.configure(CaptureConfiguration::new(EdgePolarity::Rising, ClockDivisor::Div8));
        timer.register_callback(Some(&echo));

        let log = RefCell::new(Vec::new());
        let trigger = TriggerSequencer::new(MockPin::new(&log), MockDelay::new(&log));
        let mut ranger = Ranger::new(trigger, &measurement, DistanceEstimator::REFERENCE);
        ranger.start().unwrap();

        // one good cycle
        timer.hardware_mut().edge(EdgePolarity::Rising);
        timer.on_capture_interrupt();
        timer.hardware_mut().advance(2240);
        timer.hardware_mut().edge(EdgePolarity::Falling);
        timer.on_capture_interrupt();
        assert_eq!(ranger.poll().unwrap().map(|r| r.distance_cm), Some(20));

        // next echo starts but never ends
        timer.hardware_mut().edge(EdgePolarity::Rising);
        timer.on_capture_interrupt();
        for _ in 0..100 {
            timer.hardware_mut().advance(500);
            assert_eq!(ranger.poll().unwrap(), None);
        }

        assert_eq!(measurement.phase(), EchoPhase::Armed);
        assert_eq!(ranger.last_distance(), Some(20));
        assert!(matches!(ranger.start(), Err(RangerError::Busy)));
    }
}
