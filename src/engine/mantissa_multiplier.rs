// ============================================================================
// Mantissa Multiplier
// Ordered shift-and-accumulate with a deferred carry-resolution pass
// ============================================================================

use crate::numeric::{CarryPath, ChannelSet, RawChannelSet, Resolution};

/// Sum the shifted copies of `b` selected by the set channels of `a`.
///
/// For every set channel `i` of `a` (leading channel first), a fresh copy of
/// `b` is shifted toward the end `i + 1` times, one slot per step, dropping
/// whatever moves past the last slot. The shifted counts are added into the
/// accumulator, which is returned unresolved. Clear channels of `a` add
/// nothing.
///
/// The accumulator is as wide as `a`.
pub fn accumulate_partial_products(a: &ChannelSet, b: &ChannelSet) -> RawChannelSet {
    let width = a.len();
    let mut accumulator = RawChannelSet::zeroed(width);

    for index in a.set_indices() {
        let mut shifter = b.to_raw_with_len(width);
        for _ in 0..=index {
            shifter.shift_toward_end();
        }
        accumulator.accumulate(&shifter);
    }

    accumulator
}

/// Carry-resolve a partial-product accumulator from its last slot toward
/// slot 0. Units carried out of slot 0 are discarded.
pub fn resolve_partial_products(raw: RawChannelSet) -> Resolution {
    let path = CarryPath::toward_start(raw.len());
    let resolution = raw.resolve(&path);
    if resolution.discarded > 0 {
        tracing::trace!(
            discarded = resolution.discarded,
            "mantissa carry left the leading channel"
        );
    }
    resolution
}

/// Multiply two mantissas into a resolved, possibly unnormalized product.
///
/// # Example
/// ```
/// use channel_float::engine::multiply_mantissas;
/// use channel_float::numeric::ChannelSet;
///
/// let a = ChannelSet::with_set(16, &[0, 1, 3, 4]).unwrap(); // .11011
/// let b = ChannelSet::with_set(16, &[0, 1]).unwrap();       // .11
/// let product = multiply_mantissas(&a, &b);
/// // .1010001 = 0.84375 × 0.75
/// assert_eq!(product.set_indices().collect::<Vec<_>>(), vec![0, 2, 6]);
/// ```
pub fn multiply_mantissas(a: &ChannelSet, b: &ChannelSet) -> ChannelSet {
    resolve_partial_products(accumulate_partial_products(a, b)).channels
}
