pub mod echo_capture;
pub mod proximity_indicate;
pub mod proximity_monitor;
