//! Distance hand-off to the indicator
//!
//! Only the latest filtered distance matters, so a Signal is enough: a new value
//! overwrites one the indicator has not picked up yet.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Latest filtered distance in centimeters
pub static DISTANCE_CHANGED: Signal<CriticalSectionRawMutex, u16> = Signal::new();

/// Publishes a new distance, replacing one not yet picked up
///
/// Synchronous, callable from any task.
pub fn send(distance_cm: u16) {
    DISTANCE_CHANGED.signal(distance_cm);
}

/// Waits for the next distance
pub async fn wait() -> u16 {
    DISTANCE_CHANGED.wait().await
}
