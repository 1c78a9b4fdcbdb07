// ============================================================================
// Channel Float Library
// Fixed-width binary floating point built from named digit channels
// ============================================================================

//! # Channel Float
//!
//! A fixed-width floating-point numeral system whose digits live in named,
//! positionally weighted channels, with arithmetic expressed as explicit
//! shift and carry passes over those channels.
//!
//! ## Features
//!
//! - **Profiles** describing channel counts, weights and exponent bias
//!   (16-bit mantissa / 8-bit biased exponent preset, plus an extended preset)
//! - **Codec** between channel numbers, `f64` and a canonical text form
//! - **Multiplier circuit**: exponent adder, shift-and-accumulate mantissa
//!   multiplier and normalizer, each with ordered carry resolution
//! - **Observer hooks** for watching intermediate circuit state
//!
//! ## Example
//!
//! ```rust
//! use channel_float::prelude::*;
//!
//! let p = Profile::basic();
//! let a = Number::parse(".11011e-111(+2)", p).unwrap();
//! let b = Number::from_f64(-0.1875, p).unwrap();
//!
//! let product = a.multiply(&b, true).unwrap();
//! println!("{} = {}", product, product.to_f64());
//! println!("{}", product.channel_dump());
//! ```

pub mod codec;
pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::codec::{decode, encode, encode_to_text, format, parse};
    pub use crate::domain::{ExponentOrder, ExponentSense, Profile, ProfileBuilder};
    pub use crate::engine::{multiply, Multiplier};
    pub use crate::interfaces::{
        CircuitEvent, CircuitObserver, LoggingObserver, NoOpObserver, RecordingObserver,
    };
    pub use crate::numeric::{ChannelSet, Number, NumeralError, NumeralResult, ParseFailure};
}
