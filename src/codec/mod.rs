// ============================================================================
// Codec Module
// Conversions between channel numbers, native floats and text
// ============================================================================

mod float;
mod text;

pub use float::{decode, encode};
pub use text::{encode_to_text, format, parse};
