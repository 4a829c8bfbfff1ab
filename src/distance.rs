//! Echo width to distance conversion
//!
//! # Calculation
//! ```text
//! distance_cm = width_ticks / K
//! K           = tick_hz * ECHO_MICROS_PER_CM / 1_000_000
//! tick_hz     = source_hz / divisor
//! ```
//!
//! `K` folds the timer's tick period together with the round-trip time of
//! sound per centimeter. It is only valid for the divisor it was derived from:
//! reprogramming the capture timer without recomputing `K` silently scales every
//! reading. Derive it with [`ticks_per_cm`] from the same
//! [`ClockDivisor`] the timer is configured with.

use core::num::NonZeroU32;

use crate::capture::{ClockDivisor, Ticks};

/// Round-trip echo time per centimeter of target distance, calibrated on the reference sensor
///
/// The textbook value at 20°C is ~58µs; the reference HC-SR04 reads closest with 56.
pub const ECHO_MICROS_PER_CM: u32 = 56;

/// Source clock of the reference design
pub const REFERENCE_CLOCK_HZ: u32 = 16_000_000;

/// Prescaler of the reference design
pub const REFERENCE_DIVISOR: ClockDivisor = ClockDivisor::Div8;

/// Ticks per centimeter for a source clock and divisor
///
/// `None` when the counter is stopped or ticks so slowly that one centimeter
/// is less than one tick.
pub const fn ticks_per_cm(source_hz: u32, divisor: ClockDivisor) -> Option<u32> {
    let tick_hz = match divisor.tick_hz(source_hz) {
        Some(hz) => hz as u64,
        None => return None,
    };
    let k = tick_hz * ECHO_MICROS_PER_CM as u64 / 1_000_000;
    if k == 0 || k > u32::MAX as u64 {
        None
    } else {
        Some(k as u32)
    }
}

/// `K` of the reference design (16 MHz / 8)
pub const REFERENCE_TICKS_PER_CM: u32 = match ticks_per_cm(REFERENCE_CLOCK_HZ, REFERENCE_DIVISOR) {
    Some(k) => k,
    None => panic!("reference clock yields no ticks per cm"),
};

/// Pure ticks to centimeters conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceEstimator {
    ticks_per_cm: NonZeroU32,
}

impl DistanceEstimator {
    /// Estimator for the reference design, `K = 112`
    pub const REFERENCE: Self = match Self::new(REFERENCE_TICKS_PER_CM) {
        Some(estimator) => estimator,
        None => panic!("reference ticks per cm must be non-zero"),
    };

    /// Estimator with an explicit `K`, `None` for zero
    pub const fn new(ticks_per_cm: u32) -> Option<Self> {
        match NonZeroU32::new(ticks_per_cm) {
            Some(ticks_per_cm) => Some(Self { ticks_per_cm }),
            None => None,
        }
    }

    /// Estimator with `K` derived from the capture timer's clock setup
    pub const fn for_clock(source_hz: u32, divisor: ClockDivisor) -> Option<Self> {
        match ticks_per_cm(source_hz, divisor) {
            Some(k) => Self::new(k),
            None => None,
        }
    }

    /// The `K` this estimator divides by
    pub const fn ticks_per_cm(&self) -> u32 {
        self.ticks_per_cm.get()
    }

    /// Distance in whole centimeters, rounded down
    pub const fn estimate(&self, width_ticks: Ticks) -> u16 {
        // K >= 1, so the quotient always fits the tick type
        (width_ticks as u32 / self.ticks_per_cm.get()) as u16
    }
}
