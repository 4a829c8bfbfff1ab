//! Input capture timer
//!
//! Driver for a free-running 16-bit counter with a capture register that is
//! latched by hardware on a qualifying edge of the echo line.
//!
//! # Hardware Contract
//! - On a qualifying edge the counter value is copied into the capture register
//!   before the interrupt is signaled, so a listener always reads the value of
//!   that specific edge
//! - The counter only returns to zero when software asks for it
//! - A missing edge produces no event and no timeout
//!
//! # Listener Slot
//! Exactly one [`EdgeListener`] can be registered. It is invoked from interrupt
//! context with a [`CaptureChannel`] handle, which is how it flips polarity,
//! resets the counter and reads the capture register from inside the callback.
//! Clearing the slot silences dispatch but leaves the interrupt enabled.

#[cfg(feature = "rp235x")]
pub mod rp;
#[cfg(test)]
pub(crate) mod sim;
pub mod tick;

/// Timer counts, one tick per prescaled clock period
pub type Ticks = u16;

/// Transition of the echo line that qualifies as a capture event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgePolarity {
    /// Low to high
    Rising,
    /// High to low
    Falling,
}

impl EdgePolarity {
    /// The other transition, used as the trailing edge of a pulse that starts with `self`
    pub const fn opposite(self) -> Self {
        match self {
            EdgePolarity::Rising => EdgePolarity::Falling,
            EdgePolarity::Falling => EdgePolarity::Rising,
        }
    }
}

/// Prescaler between the source clock and the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivisor {
    /// Counter stopped
    None,
    /// Source clock
    Div1,
    /// Source clock / 8
    Div8,
    /// Source clock / 64
    Div64,
    /// Source clock / 256
    Div256,
    /// Source clock / 1024
    Div1024,
}

impl ClockDivisor {
    /// Division factor, `None` when the counter is stopped
    pub const fn factor(self) -> Option<u32> {
        match self {
            ClockDivisor::None => None,
            ClockDivisor::Div1 => Some(1),
            ClockDivisor::Div8 => Some(8),
            ClockDivisor::Div64 => Some(64),
            ClockDivisor::Div256 => Some(256),
            ClockDivisor::Div1024 => Some(1024),
        }
    }

    /// Counter frequency for a given source clock, `None` when stopped
    pub const fn tick_hz(self, source_hz: u32) -> Option<u32> {
        match self.factor() {
            Some(factor) => Some(source_hz / factor),
            None => None,
        }
    }
}

/// Capture setup applied by [`CaptureTimer::configure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureConfiguration {
    /// Edge that qualifies for the first capture after configuration
    pub edge_polarity: EdgePolarity,
    /// Counter prescaler
    pub clock_divisor: ClockDivisor,
}

impl CaptureConfiguration {
    /// Leading edge of the pulse to measure and the counter prescaler
    pub const fn new(edge_polarity: EdgePolarity, clock_divisor: ClockDivisor) -> Self {
        Self {
            edge_polarity,
            clock_divisor,
        }
    }
}

/// Register level access to a capture peripheral
///
/// Implementations only touch registers; sequencing lives in [`CaptureTimer`].
pub trait CaptureHardware {
    /// Programs the counter prescaler
    fn set_clock(&mut self, divisor: ClockDivisor);

    /// Selects the edge that latches the capture register
    fn set_edge(&mut self, polarity: EdgePolarity);

    /// Overwrites the running counter
    fn write_counter(&mut self, ticks: Ticks);

    /// Overwrites the capture register
    fn write_capture(&mut self, ticks: Ticks);

    /// Value latched on the last qualifying edge
    fn capture(&self) -> Ticks;

    /// Enables or disables the capture interrupt line
    fn set_interrupt_enabled(&mut self, enabled: bool);

    /// Whether the capture interrupt line is enabled
    fn interrupt_enabled(&self) -> bool;

    /// Restores every register to its power-on value
    fn reset_to_defaults(&mut self);
}

/// Timer operations available to a listener while it is being dispatched
pub trait CaptureChannel {
    /// Changes the qualifying edge for the next capture, counter untouched
    fn set_edge_polarity(&mut self, edge: EdgePolarity);

    /// Zeroes the running counter, capture register untouched
    fn reset_counter(&mut self);

    /// Value latched on the edge being dispatched
    fn read_captured_value(&self) -> Ticks;
}

/// Receiver of capture events
///
/// Runs in interrupt context, once per qualifying edge. Listeners keep their
/// state behind interior mutability, hence `&self` and the `Sync` bound.
pub trait EdgeListener: Sync {
    /// Handles one qualifying edge; `channel` is the timer that latched it
    fn on_edge(&self, channel: &mut dyn CaptureChannel);
}

/// Input capture timer with a single listener slot
pub struct CaptureTimer<'a, H> {
    hardware: H,
    configuration: CaptureConfiguration,
    listener: Option<&'a dyn EdgeListener>,
}

impl<'a, H: CaptureHardware> CaptureTimer<'a, H> {
    /// Wraps an unconfigured peripheral
    ///
    /// The timer is inert until [`configure`](Self::configure) is called.
    pub const fn new(hardware: H) -> Self {
        Self {
            hardware,
            configuration: CaptureConfiguration::new(EdgePolarity::Falling, ClockDivisor::None),
            listener: None,
        }
    }

    /// Clears counter and capture register, programs divisor and edge, enables the interrupt
    ///
    /// Must be called once before the first measurement. Calling it again while a
    /// measurement is in flight leaves the measurement in an undefined phase.
    pub fn configure(&mut self, configuration: CaptureConfiguration) {
        self.hardware.write_counter(0);
        self.hardware.write_capture(0);
        self.hardware.set_clock(configuration.clock_divisor);
        self.hardware.set_edge(configuration.edge_polarity);
        self.hardware.set_interrupt_enabled(true);
        self.configuration = configuration;
        debug!(
            "capture configured: edge {:?}, divisor {:?}",
            configuration.edge_polarity, configuration.clock_divisor
        );
    }

    /// Selects the edge for the next capture without touching the counter
    pub fn set_edge_polarity(&mut self, edge: EdgePolarity) {
        self.hardware.set_edge(edge);
        self.configuration.edge_polarity = edge;
    }

    /// Edge currently qualifying for a capture
    pub fn edge_polarity(&self) -> EdgePolarity {
        self.configuration.edge_polarity
    }

    /// Current configuration including the last polarity change
    pub fn configuration(&self) -> CaptureConfiguration {
        self.configuration
    }

    /// Zeroes the running counter; an already latched capture is kept
    pub fn reset_counter(&mut self) {
        self.hardware.write_counter(0);
    }

    /// Last hardware-latched value
    ///
    /// Only meaningful once a capture event fired since the last counter reset.
    pub fn read_captured_value(&self) -> Ticks {
        self.hardware.capture()
    }

    /// Installs `listener` in the slot and returns the one it replaced
    ///
    /// `None` empties the slot; capture interrupts keep firing but do nothing.
    pub fn register_callback(
        &mut self,
        listener: Option<&'a dyn EdgeListener>,
    ) -> Option<&'a dyn EdgeListener> {
        core::mem::replace(&mut self.listener, listener)
    }

    /// Whether a listener is currently installed
    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Disables the interrupt, restores power-on register values and drops the listener
    pub fn teardown(&mut self) {
        self.hardware.set_interrupt_enabled(false);
        self.hardware.reset_to_defaults();
        self.configuration = CaptureConfiguration::new(EdgePolarity::Falling, ClockDivisor::None);
        self.listener = None;
        debug!("capture torn down");
    }

    /// Interrupt entry point, call once per capture event
    pub fn on_capture_interrupt(&mut self) {
        if !self.hardware.interrupt_enabled() {
            return;
        }
        if let Some(listener) = self.listener {
            listener.on_edge(self);
        }
    }

    /// Backend registers, for inspection
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Backend registers, for backends that latch the capture outside the timer
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }
}

impl<H: CaptureHardware> CaptureChannel for CaptureTimer<'_, H> {
    fn set_edge_polarity(&mut self, edge: EdgePolarity) {
        CaptureTimer::set_edge_polarity(self, edge);
    }

    fn reset_counter(&mut self) {
        CaptureTimer::reset_counter(self);
    }

    fn read_captured_value(&self) -> Ticks {
        CaptureTimer::read_captured_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::sim::SimulatedCapture;
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    /// Counts its invocations
    struct Counter(AtomicU32);

    impl Counter {
        fn new() -> Self {
            Self(AtomicU32::new(0))
        }

        fn count(&self) -> u32 {
            self.0.load(Ordering::Relaxed)
        }
    }

    impl EdgeListener for Counter {
        fn on_edge(&self, _channel: &mut dyn CaptureChannel) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Flips polarity from inside the callback
    struct Flipper;

    impl EdgeListener for Flipper {
        fn on_edge(&self, channel: &mut dyn CaptureChannel) {
            channel.reset_counter();
            channel.set_edge_polarity(EdgePolarity::Falling);
        }
    }

    fn configured<'a>() -> CaptureTimer<'a, SimulatedCapture> {
        let mut timer = CaptureTimer::new(SimulatedCapture::new());
        timer.configure(CaptureConfiguration::new(EdgePolarity::Rising, ClockDivisor::Div8));
        timer
    }

    #[test]
    fn test_configure_programs_hardware() {
        let mut hw = SimulatedCapture::new();
        hw.set_counter(1234);
        hw.write_capture(99);
        let mut timer = CaptureTimer::new(hw);
        assert!(!timer.hardware().interrupt_enabled());

        timer.configure(CaptureConfiguration::new(EdgePolarity::Rising, ClockDivisor::Div64));

        assert_eq!(timer.hardware().counter(), 0);
        assert_eq!(timer.read_captured_value(), 0);
        assert_eq!(timer.hardware().divisor(), ClockDivisor::Div64);
        assert_eq!(timer.hardware().polarity(), EdgePolarity::Rising);
        assert!(timer.hardware().interrupt_enabled());
        assert_eq!(timer.edge_polarity(), EdgePolarity::Rising);
    }

    #[test]
    fn test_polarity_change_keeps_counter() {
        let mut timer = configured();
        timer.hardware_mut().advance(500);
        timer.set_edge_polarity(EdgePolarity::Falling);
        assert_eq!(timer.hardware().counter(), 500);
        assert_eq!(timer.hardware().polarity(), EdgePolarity::Falling);
        assert_eq!(timer.configuration().clock_divisor, ClockDivisor::Div8);
    }

    #[test]
    fn test_reset_counter_keeps_capture() {
        let mut timer = configured();
        timer.hardware_mut().advance(700);
        assert!(timer.hardware_mut().edge(EdgePolarity::Rising));
        timer.hardware_mut().advance(100);
        timer.reset_counter();
        assert_eq!(timer.hardware().counter(), 0);
        assert_eq!(timer.read_captured_value(), 700);
    }

    #[test]
    fn test_dispatch_reaches_listener() {
        let counter = Counter::new();
        let mut timer = configured();
        timer.register_callback(Some(&counter));
        timer.on_capture_interrupt();
        timer.on_capture_interrupt();
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_register_replaces_previous_listener() {
        let first = Counter::new();
        let second = Counter::new();
        let mut timer = configured();

        assert!(timer.register_callback(Some(&first)).is_none());
        timer.on_capture_interrupt();

        let previous = timer.register_callback(Some(&second));
        assert!(previous.is_some());
        timer.on_capture_interrupt();
        timer.on_capture_interrupt();

        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 2);
    }

    #[test]
    fn test_empty_slot_silences_dispatch_only() {
        let counter = Counter::new();
        let mut timer = configured();
        timer.register_callback(Some(&counter));
        timer.register_callback(None);
        assert!(!timer.has_listener());

        timer.on_capture_interrupt();
        assert_eq!(counter.count(), 0);
        assert!(timer.hardware().interrupt_enabled());
    }

    #[test]
    fn test_listener_drives_timer_from_callback() {
        let mut timer = configured();
        timer.register_callback(Some(&Flipper));
        timer.hardware_mut().advance(42);
        timer.on_capture_interrupt();
        assert_eq!(timer.hardware().counter(), 0);
        assert_eq!(timer.edge_polarity(), EdgePolarity::Falling);
        assert_eq!(timer.hardware().polarity(), EdgePolarity::Falling);
    }

    #[test]
    fn test_teardown_restores_defaults() {
        let counter = Counter::new();
        let mut timer = configured();
        timer.register_callback(Some(&counter));
        timer.hardware_mut().advance(300);
        timer.hardware_mut().edge(EdgePolarity::Rising);

        timer.teardown();

        assert!(!timer.hardware().interrupt_enabled());
        assert_eq!(timer.hardware().counter(), 0);
        assert_eq!(timer.read_captured_value(), 0);
        assert_eq!(timer.hardware().divisor(), ClockDivisor::None);
        assert!(!timer.has_listener());

        timer.on_capture_interrupt();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_disabled_interrupt_never_dispatches() {
        let counter = Counter::new();
        let mut timer = CaptureTimer::new(SimulatedCapture::new());
        timer.register_callback(Some(&counter));
        timer.on_capture_interrupt();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_divisor_factors() {
        assert_eq!(ClockDivisor::None.factor(), None);
        assert_eq!(ClockDivisor::Div1024.factor(), Some(1024));
        assert_eq!(ClockDivisor::Div8.tick_hz(16_000_000), Some(2_000_000));
        assert_eq!(ClockDivisor::None.tick_hz(16_000_000), None);
        assert_eq!(EdgePolarity::Rising.opposite(), EdgePolarity::Falling);
    }
}
