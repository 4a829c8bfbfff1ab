//! RP2350 capture backend
//!
//! The RP2350 timers have no input-capture register, so the capture is
//! emulated with [`TickCapture`] on the 1 MHz system timer that also drives
//! embassy-time. The "interrupt" is the capture task woken by the echo GPIO
//! edge, which latches the edge's [`Instant`] through [`TickCapture::latch`].
//!
//! [`Instant`]: embassy_time::Instant

use embassy_time::Instant;

use super::tick::{TickCapture, TickSource};
use crate::config::SOURCE_CLOCK_HZ;

// The counter is scaled from embassy-time ticks, which must run at the configured source clock
const _: () = assert!(embassy_time::TICK_HZ == SOURCE_CLOCK_HZ as u64);

/// embassy-time tick counter
pub struct EmbassyClock;

impl TickSource for EmbassyClock {
    fn now(&self) -> u64 {
        Instant::now().as_ticks()
    }
}

/// Emulated input-capture unit of the firmware
pub type RpCapture = TickCapture<EmbassyClock>;
