// ============================================================================
// Engine Module
// Channel-level arithmetic circuits
// ============================================================================

mod exponent_adder;
mod mantissa_multiplier;
mod multiplier;
mod normalizer;

pub use exponent_adder::{add_exponents, add_exponents_with_overflow, ExponentSum};
pub use mantissa_multiplier::{
    accumulate_partial_products, multiply_mantissas, resolve_partial_products,
};
pub use multiplier::{multiply, Multiplier};
pub use normalizer::{normalize, normalize_with_steps, Normalization};
