// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod circuit_observer;

pub use circuit_observer::{
    CircuitEvent, CircuitObserver, EventBatch, LoggingObserver, NoOpObserver, RecordingObserver,
};
