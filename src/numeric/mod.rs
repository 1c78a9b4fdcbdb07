// ============================================================================
// Numeric Module
// Channel representation of the numeral system
// ============================================================================
//
// This module provides:
// - ChannelSet / RawChannelSet: resolved and unresolved digit slots
// - CarryPath: the ordered walk a carry-resolution pass follows
// - Number: sign + mantissa + exponent bound to a Profile
// - NumeralError: error types for encoding, parsing and arithmetic
//
// Design principles:
// - Dense, fixed-capacity channel arrays (no sparse maps)
// - Resolution is an explicit pass; raw counts never leak into a Number
// - All fallible operations return Result (no panics)

mod channel;
mod errors;
mod number;

pub use channel::{
    CarryPath, ChannelName, ChannelSet, RawChannelSet, Resolution, Wraparound, MAX_CHANNELS,
    RADIX,
};
pub use errors::{NumeralError, NumeralResult, ParseFailure};
pub use number::{ChannelDump, Number};
