// ============================================================================
// Domain Models Module
// Numeral profiles: channel layout, weights and bias
// ============================================================================

pub mod profile;

pub use profile::{ExponentOrder, ExponentSense, Profile, ProfileBuilder};
