//! Shared pulse measurement
//!
//! The single piece of state shared between the capture interrupt and the
//! mainline consumer.
//!
//! # Access Rules
//! - The echo listener advances the edge count and writes the width, in interrupt context
//! - The mainline reads with [`SharedMeasurement::try_read`] and takes the result with
//!   [`SharedMeasurement::consume`], which is the only way back to [`EchoPhase::Idle`]
//! - Every access is one critical section, so a reader never sees the edge count of
//!   one cycle combined with the width of another
//!
//! ```rust,ignore
//! if let Some(width) = MEASUREMENT.consume() {
//!     // convert, then trigger the next cycle
//! }
//! ```

use core::cell::Cell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::capture::Ticks;

/// Progress of one echo measurement, derived from the edge count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoPhase {
    /// No edge seen since the last consumption
    Idle,
    /// Leading edge seen, waiting for the trailing edge
    Armed,
    /// Both edges seen, width ready for the mainline
    Complete,
}

/// Result visible to the mainline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseMeasurement {
    /// Echo width latched on the trailing edge
    pub width_ticks: Ticks,
    /// Set once the trailing edge was captured and not yet consumed
    pub ready: bool,
}

/// Raw state behind the critical section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EchoState {
    /// Always 0, 1 or 2
    pub edges: u8,
    pub width_ticks: Ticks,
    /// Capture events delivered while a completed measurement was still unconsumed
    pub overruns: u16,
}

impl EchoState {
    const INITIAL: Self = Self {
        edges: 0,
        width_ticks: 0,
        overruns: 0,
    };

    pub fn phase(&self) -> EchoPhase {
        match self.edges {
            0 => EchoPhase::Idle,
            1 => EchoPhase::Armed,
            _ => EchoPhase::Complete,
        }
    }
}

/// Edge count and pulse width shared between the capture interrupt and the mainline
pub struct SharedMeasurement {
    state: Mutex<CriticalSectionRawMutex, Cell<EchoState>>,
}

impl SharedMeasurement {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(EchoState::INITIAL)),
        }
    }

    /// Snapshot of the measurement without consuming it
    ///
    /// `width_ticks` holds the last completed width even when `ready` is false.
    pub fn try_read(&self) -> PulseMeasurement {
        let state = self.state.lock(Cell::get);
        PulseMeasurement {
            width_ticks: state.width_ticks,
            ready: state.phase() == EchoPhase::Complete,
        }
    }

    /// Takes a completed width and returns to [`EchoPhase::Idle`]
    ///
    /// Returns `None` and changes nothing while the cycle is still running.
    pub fn consume(&self) -> Option<Ticks> {
        self.state.lock(|cell| {
            let mut state = cell.get();
            if state.phase() != EchoPhase::Complete {
                return None;
            }
            state.edges = 0;
            cell.set(state);
            Some(state.width_ticks)
        })
    }

    pub fn phase(&self) -> EchoPhase {
        self.state.lock(|cell| cell.get().phase())
    }

    /// Number of capture events dropped because a measurement was still unconsumed
    pub fn overruns(&self) -> u16 {
        self.state.lock(|cell| cell.get().overruns)
    }

    /// Read-modify-write of the raw state inside one critical section
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut EchoState) -> R) -> R {
        self.state.lock(|cell| {
            let mut state = cell.get();
            let result = f(&mut state);
            cell.set(state);
            result
        })
    }
}

impl Default for SharedMeasurement {
    fn default() -> Self {
        Self::new()
    }
}
