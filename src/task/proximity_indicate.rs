//! Zone indicator
//!
//! Shows the proximity zone of the latest distance on three LEDs and a buzzer.
//!
//! # Stop Zone
//! The LEDs blink with [`STOP_BLINK_MS`] phases while the buzzer stays on. A
//! new distance interrupts the current phase immediately.
//!
//! Nothing is shown until the first distance arrives.

use crate::system::indicator;
use crate::system::resources::IndicatorResources;
use core::convert::Infallible;
use defmt::info;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Level, Output};
use embassy_time::{Duration, Timer};
use parking_sensor::zone::STOP_BLINK_MS;
use parking_sensor::{Indication, ProximityIndicator, ProximityZone};

const BLINK_INTERVAL: Duration = Duration::from_millis(STOP_BLINK_MS);

/// Zone LEDs and buzzer on plain GPIO outputs
struct ZoneOutputs<'d> {
    red: Output<'d>,
    green: Output<'d>,
    blue: Output<'d>,
    buzzer: Output<'d>,
}

impl ProximityIndicator for ZoneOutputs<'_> {
    type Error = Infallible;

    fn show(&mut self, indication: Indication) -> Result<(), Self::Error> {
        self.red.set_level(indication.red.into());
        self.green.set_level(indication.green.into());
        self.blue.set_level(indication.blue.into());
        self.buzzer.set_level(indication.buzzer.into());
        Ok(())
    }
}

/// Shows the zone of each new distance on the LEDs and buzzer
#[embassy_executor::task]
pub async fn proximity_indicate(r: IndicatorResources) {
    let mut outputs = ZoneOutputs {
        red: Output::new(r.red_pin, Level::Low),
        green: Output::new(r.green_pin, Level::Low),
        blue: Output::new(r.blue_pin, Level::Low),
        buzzer: Output::new(r.buzzer_pin, Level::Low),
    };

    let mut distance_cm = indicator::wait().await;
    let mut zone = None;

    loop {
        let current = ProximityZone::from_distance(distance_cm);
        if zone != Some(current) {
            info!("zone {} {}", current, current.banner());
            zone = Some(current);
        }

        let indication = current.indication();
        let Ok(()) = outputs.show(indication);

        if !indication.blink {
            distance_cm = indicator::wait().await;
            continue;
        }

        // Stop zone: LEDs on, then off, buzzer held throughout
        if let Either::First(next) = select(indicator::wait(), Timer::after(BLINK_INTERVAL)).await {
            distance_cm = next;
            continue;
        }
        let Ok(()) = outputs.show(Indication {
            red: false,
            green: false,
            blue: false,
            ..indication
        });
        if let Either::First(next) = select(indicator::wait(), Timer::after(BLINK_INTERVAL)).await {
            distance_cm = next;
        }
    }
}
