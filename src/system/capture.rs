//! Capture timer and measurement shared between tasks
//!
//! The capture timer lives in a blocking mutex so the capture task can dispatch
//! edges from the interrupt executor while thread-mode code only ever touches
//! the measurement cell.

use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;
use parking_sensor::capture::rp::{EmbassyClock, RpCapture};
use parking_sensor::config::CAPTURE_CONFIG;
use parking_sensor::{CaptureTimer, EchoCapture, EdgePolarity, SharedMeasurement};

/// Echo width written by the listener, consumed by the monitor task
pub static MEASUREMENT: SharedMeasurement = SharedMeasurement::new();

/// Edge listener registered with the capture timer
static ECHO: EchoCapture<'static> = EchoCapture::new(&MEASUREMENT, CAPTURE_CONFIG.edge_polarity);

static CAPTURE_TIMER: Mutex<CriticalSectionRawMutex, RefCell<CaptureTimer<'static, RpCapture>>> =
    Mutex::new(RefCell::new(CaptureTimer::new(RpCapture::new(EmbassyClock))));

/// Configures the capture timer and registers the echo listener.
///
/// Must run before the capture task is spawned.
pub fn init() {
    CAPTURE_TIMER.lock(|timer| {
        let mut timer = timer.borrow_mut();
        timer.configure(CAPTURE_CONFIG);
        timer.register_callback(Some(&ECHO));
    });
}

/// Edge the capture timer is currently armed for
pub fn armed_edge() -> EdgePolarity {
    CAPTURE_TIMER.lock(|timer| timer.borrow().hardware().edge())
}

/// Latches the counter for an edge observed at `at` and dispatches it to the listener
pub fn on_edge(at: Instant) {
    CAPTURE_TIMER.lock(|timer| {
        let mut timer = timer.borrow_mut();
        if timer.hardware_mut().latch(at.as_ticks()) {
            timer.on_capture_interrupt();
        }
    });
}
