//! Mainline side of the measurement cycle
//!
//! Owns the trigger line and consumes what the echo listener produces.
//!
//! # Cycle
//! 1. [`Ranger::start`] sends the first trigger pulse
//! 2. [`Ranger::poll`] is called from the main loop; once the shared measurement
//!    is complete it is consumed, converted, and the next trigger pulse is sent
//!
//! # Missing Echo
//! Without a trailing edge the measurement stays Armed and `poll` keeps
//! returning `None`. The last distance is kept as-is with no staleness marker,
//! and no new trigger is sent, since re-triggering mid-cycle would mix edges of
//! two echoes.

use core::fmt;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::capture::Ticks;
use crate::distance::DistanceEstimator;
use crate::measurement::{EchoPhase, SharedMeasurement};
use crate::trigger::TriggerSequencer;

/// Errors of the mainline cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangerError<E> {
    /// A cycle is still running or its result was not consumed
    Busy,
    /// The trigger pin failed
    Trigger(E),
}

impl<E: fmt::Debug> fmt::Display for RangerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangerError::Busy => write!(f, "measurement in progress"),
            RangerError::Trigger(e) => write!(f, "trigger pin error: {:?}", e),
        }
    }
}

/// One completed measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub width_ticks: Ticks,
    pub distance_cm: u16,
}

/// Trigger, poll, convert, re-trigger
pub struct Ranger<'a, P, D> {
    trigger: TriggerSequencer<P, D>,
    measurement: &'a SharedMeasurement,
    estimator: DistanceEstimator,
    last: Option<Reading>,
}

impl<'a, P: OutputPin, D: DelayNs> Ranger<'a, P, D> {
    /// `estimator` must be derived from the capture timer's divisor
    pub fn new(
        trigger: TriggerSequencer<P, D>,
        measurement: &'a SharedMeasurement,
        estimator: DistanceEstimator,
    ) -> Self {
        Self {
            trigger,
            measurement,
            estimator,
            last: None,
        }
    }

    /// Sends the first trigger pulse
    ///
    /// Refuses with [`RangerError::Busy`] unless the measurement is Idle, so an
    /// unconsumed or half-captured echo is never overlapped by a new one.
    pub fn start(&mut self) -> Result<(), RangerError<P::Error>> {
        if self.measurement.phase() != EchoPhase::Idle {
            return Err(RangerError::Busy);
        }
        self.trigger.trigger().map_err(RangerError::Trigger)
    }

    /// Consumes a completed measurement, if any, and triggers the next cycle
    ///
    /// The reading is kept as the last distance even when the re-trigger fails.
    /// The measurement is Idle again at that point, so after an `Err` the caller
    /// restarts the cycle with [`start`](Self::start).
    pub fn poll(&mut self) -> Result<Option<Reading>, RangerError<P::Error>> {
        let Some(width_ticks) = self.measurement.consume() else {
            return Ok(None);
        };

        let reading = Reading {
            width_ticks,
            distance_cm: self.estimator.estimate(width_ticks),
        };
        trace!("echo {} ticks, {} cm", reading.width_ticks, reading.distance_cm);
        self.last = Some(reading);

        self.trigger.trigger().map_err(RangerError::Trigger)?;
        Ok(Some(reading))
    }

    /// Distance of the last completed measurement, however old
    pub fn last_distance(&self) -> Option<u16> {
        self.last.map(|reading| reading.distance_cm)
    }

    /// Last completed reading including its raw echo width
    pub fn last_reading(&self) -> Option<Reading> {
        self.last
    }

    /// Conversion in use, fixed at construction
    pub fn estimator(&self) -> DistanceEstimator {
        self.estimator
    }
}
