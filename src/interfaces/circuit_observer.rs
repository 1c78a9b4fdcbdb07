// ============================================================================
// Circuit Observer Interface
// Defines the contract for watching the stages of a multiplication
// ============================================================================

use crate::numeric::{ChannelSet, RawChannelSet, Wraparound};
use parking_lot::Mutex;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the multiplier, in stage order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CircuitEvent {
    /// Biased exponents summed and carry-resolved
    ExponentsAdded {
        exponent: ChannelSet,
        /// Whether the sum wrapped past the top or below the bias
        wraparound: Wraparound,
    },

    /// Shifted copies of the multiplicand summed, before carry resolution
    PartialProductsAccumulated { raw: RawChannelSet },

    /// Mantissa accumulator carry-resolved
    MantissaResolved {
        mantissa: ChannelSet,
        /// Units carried past the leading mantissa channel
        discarded: u32,
    },

    /// Mantissa shifted until its leading channel was set
    Normalized {
        shifts: u32,
        /// Whether lowering the exponent wrapped it
        wraparound: Wraparound,
    },

    /// Mantissa was clear; normalization stopped and produced zero
    ZeroMantissa,
}

/// Events of one multiplication, delivered together
pub type EventBatch = SmallVec<[CircuitEvent; 4]>;

/// Observer trait for circuit events
/// Implementations can handle logging, tracing of carry overflow, test capture, etc.
pub trait CircuitObserver: Send + Sync {
    /// Handle a circuit event
    fn on_event(&self, event: CircuitEvent);

    /// Batch handler, called once per multiplication
    fn on_events(&self, events: EventBatch) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op observer
pub struct NoOpObserver;

impl CircuitObserver for NoOpObserver {
    fn on_event(&self, _event: CircuitEvent) {}

    fn on_events(&self, _events: EventBatch) {}
}

/// Logging observer
pub struct LoggingObserver;

impl CircuitObserver for LoggingObserver {
    fn on_event(&self, event: CircuitEvent) {
        tracing::debug!("Circuit event: {:?}", event);
    }
}

/// Keeps every event it receives, for inspecting intermediate circuit state.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<CircuitEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<CircuitEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<CircuitEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl CircuitObserver for RecordingObserver {
    fn on_event(&self, event: CircuitEvent) {
        self.events.lock().push(event);
    }
}
