//! Parking sensor firmware entry point
//!
//! Initializes the capture timer, starts the high-priority capture executor and
//! spawns the ranging and indicator tasks.

#![no_std]
#![no_main]

use crate::task::{
    echo_capture::echo_capture, proximity_indicate::proximity_indicate,
    proximity_monitor::proximity_monitor,
};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use system::resources::{AssignedResources, EchoResources, IndicatorResources, TriggerResources};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Shared state and resources
mod system;
/// Task implementations
mod task;

/// Runs the capture task above everything in thread mode
static CAPTURE_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    CAPTURE_EXECUTOR.on_interrupt()
}

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    let r = split_resources!(p);

    // The listener has to be registered before the first edge can arrive
    system::capture::init();

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let capture_spawner = CAPTURE_EXECUTOR.start(interrupt::SWI_IRQ_1);
    capture_spawner.spawn(echo_capture(r.echo)).unwrap();

    spawner.spawn(proximity_indicate(r.indicator)).unwrap();
    // Triggers the first measurement, so it goes last
    spawner.spawn(proximity_monitor(r.trigger)).unwrap();
}
