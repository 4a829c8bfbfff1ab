//! Compile-time configuration
//!
//! Everything the parking sensor can be tuned with. There is no runtime
//! configuration surface.
//!
//! # Clock Coupling
//! [`TICKS_PER_CM`] is derived from [`SOURCE_CLOCK_HZ`] and the divisor in
//! [`CAPTURE_CONFIG`]. Change either and `K` follows; a divisor too coarse for
//! centimeter resolution fails the build.

use crate::capture::{CaptureConfiguration, ClockDivisor, EdgePolarity};
use crate::distance::{ticks_per_cm, DistanceEstimator};

/// Capture timer setup: measure the high pulse, count at the full source clock
pub const CAPTURE_CONFIG: CaptureConfiguration =
    CaptureConfiguration::new(EdgePolarity::Rising, ClockDivisor::Div1);

/// Counter source clock, the 1 MHz embassy-time tick on the RP2350
pub const SOURCE_CLOCK_HZ: u32 = 1_000_000;

/// `K` for [`CAPTURE_CONFIG`]
pub const TICKS_PER_CM: u32 = match ticks_per_cm(SOURCE_CLOCK_HZ, CAPTURE_CONFIG.clock_divisor) {
    Some(k) => k,
    None => panic!("capture divisor too coarse for centimeter resolution"),
};

/// Estimator matching [`CAPTURE_CONFIG`]
pub const ESTIMATOR: DistanceEstimator = match DistanceEstimator::new(TICKS_PER_CM) {
    Some(estimator) => estimator,
    None => panic!("ticks per cm must be non-zero"),
};

/// Readings smoothed before they reach the zone table
pub const MEDIAN_WINDOW_SIZE: usize = 5;
