//! Ranging main loop
//!
//! Owns the trigger line, turns completed echoes into distances and publishes
//! the filtered distance to the indicator.
//!
//! # Cycle
//! - One trigger pulse at start-up
//! - Every pass polls the shared measurement; a completed echo is converted and
//!   the next pulse is sent right away
//! - Passes yield to the executor in between, so the loop never blocks the
//!   indicator
//!
//! # Signal Processing
//! Distances go through a moving median before the zone lookup, which hides
//! single stray echoes from the LEDs.
//!
//! # Missing Echo
//! A lost trailing edge stalls the cycle with the last distance kept on the
//! indicator. No timeout re-arms the sensor.

use crate::system::resources::TriggerResources;
use crate::system::{capture, indicator};
use defmt::{info, warn};
use embassy_futures::yield_now;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Delay;
use moving_median::MovingMedian;
use parking_sensor::config::{ESTIMATOR, MEDIAN_WINDOW_SIZE};
use parking_sensor::{Ranger, RangerError, TriggerSequencer};

/// Triggers the sensor, converts completed echoes and publishes the filtered distance
#[embassy_executor::task]
pub async fn proximity_monitor(r: TriggerResources) {
    let trigger = TriggerSequencer::new(Output::new(r.trigger_pin, Level::Low), Delay);
    let mut ranger = Ranger::new(trigger, &capture::MEASUREMENT, ESTIMATOR);

    let mut median_filter = MovingMedian::<f64, MEDIAN_WINDOW_SIZE>::new();

    if let Err(RangerError::Busy) = ranger.start() {
        warn!("echo capture already running at start-up");
    }

    loop {
        match ranger.poll() {
            Ok(Some(reading)) => {
                median_filter.add_value(reading.distance_cm as f64);
                let distance_cm = median_filter.median() as u16;
                info!(
                    "Distance = {} cm (echo {} ticks, {} overruns)",
                    distance_cm,
                    reading.width_ticks,
                    capture::MEASUREMENT.overruns()
                );
                indicator::send(distance_cm);
            }
            Ok(None) => {}
            Err(_) => {
                warn!("trigger failed, restarting the cycle");
                let _ = ranger.start();
            }
        }
        yield_now().await;
    }
}
