//! Echo edge capture
//!
//! Stands in for the capture interrupt: waits for the edge the capture timer is
//! armed for, timestamps it and hands it to the timer.
//!
//! # Priority
//! Runs on the interrupt executor so edge timestamps are not delayed by the
//! thread-mode tasks. Its only work per edge is one short critical section.
//!
//! # Latency
//! The polarity is re-read after every edge. An echo shorter than the time
//! between waking and re-arming would be missed; the shortest HC-SR04 echo is
//! about 150µs, well above that.

use crate::system::capture;
use crate::system::resources::EchoResources;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::Instant;
use parking_sensor::EdgePolarity;

/// Timestamps every armed echo edge and dispatches it to the capture timer
#[embassy_executor::task]
pub async fn echo_capture(r: EchoResources) {
    let mut echo = Input::new(r.echo_pin, Pull::Down);

    loop {
        match capture::armed_edge() {
            EdgePolarity::Rising => echo.wait_for_rising_edge().await,
            EdgePolarity::Falling => echo.wait_for_falling_edge().await,
        }
        capture::on_edge(Instant::now());
    }
}
