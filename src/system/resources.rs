//! Hardware Resource Management
//!
//! Assigns the pins of the parking sensor to the task that owns them.
//!
//! # Resource Groups
//! - Echo: HC-SR04 echo line, owned by the capture task
//! - Trigger: HC-SR04 trigger line, owned by the monitor task
//! - Indicator: zone LEDs and buzzer

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
    /// HC-SR04 echo output, read by the capture task
    echo: EchoResources {
        echo_pin: PIN_14,
    },
    /// HC-SR04 trigger input
    trigger: TriggerResources {
        trigger_pin: PIN_15,
    },
    /// Zone LEDs and buzzer
    indicator: IndicatorResources {
        red_pin: PIN_2,
        green_pin: PIN_3,
        blue_pin: PIN_4,
        buzzer_pin: PIN_5,
    },
}
