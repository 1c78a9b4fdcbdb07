// ============================================================================
// Exponent Adder
// Sums two biased exponent channel sets with ordered carry propagation
// ============================================================================

use crate::domain::Profile;
use crate::numeric::{ChannelSet, Wraparound};

/// Add two stored exponents so the result carries the profile's bias once.
///
/// Both operands already include the bias, so the sum is pre-seeded with the
/// profile's correction pattern (`capacity − bias`, e.g. `11111110` for a +2
/// bias over eight channels). Carries are then resolved from the least to the
/// most significant channel; a carry out of the top channel is discarded, so
/// sums past the top or below the bias wrap modulo the channel capacity.
///
/// # Example
/// ```
/// use channel_float::domain::Profile;
/// use channel_float::engine::add_exponents;
/// use channel_float::numeric::ChannelSet;
///
/// let p = Profile::basic();
/// let a = ChannelSet::with_set(8, &[0, 1, 2]).unwrap(); // stored 7
/// let b = ChannelSet::with_set(8, &[2]).unwrap();       // stored 4
/// let sum = add_exponents(&a, &b, &p);
/// assert_eq!(p.exponent_units(&sum), 9);               // 7 + 4 − 2
/// ```
pub fn add_exponents(a: &ChannelSet, b: &ChannelSet, profile: &Profile) -> ChannelSet {
    add_exponents_with_overflow(a, b, profile).channels
}

/// Resolved exponent sum and how far it wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentSum {
    pub channels: ChannelSet,
    /// `overflow` when `a + b − bias` passed the top of the channels,
    /// `underflow` when it fell below zero
    pub wraparound: Wraparound,
}

/// Same as [`add_exponents`], also reporting whether the sum wrapped.
///
/// The correction pattern itself carries out of the top channel once for
/// every in-range sum of a biased profile; only carries beyond that, or a
/// missing one, count as wraparound.
pub fn add_exponents_with_overflow(
    a: &ChannelSet,
    b: &ChannelSet,
    profile: &Profile,
) -> ExponentSum {
    let mut sum = profile.bias_correction().to_raw();
    sum.accumulate_bits(a);
    sum.accumulate_bits(b);

    let resolution = sum.resolve(&profile.exponent_carry_path());
    let wraparound =
        Wraparound::from_carries(resolution.discarded, profile.bias_correction_carries());
    if !wraparound.is_clean() {
        tracing::trace!(
            overflow = wraparound.overflow,
            underflow = wraparound.underflow,
            "exponent sum wrapped"
        );
    }

    ExponentSum {
        channels: resolution.channels,
        wraparound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProfileBuilder;

    fn basic(indices: &[usize]) -> ChannelSet {
        ChannelSet::with_set(8, indices).unwrap()
    }

    #[test]
    fn test_bias_counted_once() {
        // orange (2) + white|orange (3) − 2 = white|orange (3)
        let sum = add_exponents(&basic(&[1]), &basic(&[0, 1]), &Profile::basic());
        assert_eq!(sum, basic(&[0, 1]));
    }

    #[test]
    fn test_scenario_exponents() {
        // stored 7 and 4 → 9
        let p = Profile::basic();
        let sum = add_exponents_with_overflow(&basic(&[0, 1, 2]), &basic(&[2]), &p);
        assert_eq!(sum.channels, basic(&[0, 3]));
        // the correction pattern's own carry is not a wrap
        assert!(sum.wraparound.is_clean());
    }

    #[test]
    fn test_sum_at_bias_is_clean() {
        // 1 + 1 − 2 = 0 exactly
        let sum = add_exponents_with_overflow(&basic(&[0]), &basic(&[0]), &Profile::basic());
        assert!(sum.channels.is_zero());
        assert!(sum.wraparound.is_clean());
    }

    #[test]
    fn test_sum_below_bias_wraps() {
        // 0 + 1 − 2 has no representation; the circuit wraps to 255
        let sum = add_exponents_with_overflow(&basic(&[]), &basic(&[0]), &Profile::basic());
        assert_eq!(sum.channels.count_set(), 8);
        assert_eq!(sum.wraparound, Wraparound { overflow: 0, underflow: 1 });
    }

    #[test]
    fn test_top_channel_saturates() {
        // 255 + 255 − 2 = 508: wraps once past 255, 252 remains
        let p = Profile::basic();
        let all = basic(&[0, 1, 2, 3, 4, 5, 6, 7]);
        let sum = add_exponents_with_overflow(&all, &all, &p);
        assert_eq!(p.exponent_units(&sum.channels), 252);
        assert_eq!(sum.wraparound, Wraparound { overflow: 1, underflow: 0 });
        assert_eq!(sum.channels.len(), 8);

        // 255 + 3 − 2 = 256 is the first value past the top
        let sum = add_exponents_with_overflow(&all, &basic(&[0, 1]), &p);
        assert!(sum.channels.is_zero());
        assert_eq!(sum.wraparound.overflow, 1);

        // 255 + 2 − 2 = 255 still fits
        let sum = add_exponents_with_overflow(&all, &basic(&[1]), &p);
        assert!(sum.wraparound.is_clean());
    }

    #[test]
    fn test_plus_one_bias() {
        let p = ProfileBuilder::new(16, 8).with_bias(1).build().unwrap();
        let sum = add_exponents(&basic(&[2]), &basic(&[1]), &p);
        // 4 + 2 − 1
        assert_eq!(p.exponent_units(&sum), 5);
    }

    #[test]
    fn test_extended_unbiased() {
        let p = Profile::extended();
        let two = p.exponent_pattern(2 * p.units_per_step());
        let one = p.exponent_pattern(p.units_per_step());
        let sum = add_exponents(&two, &one, &p);
        assert_eq!(p.real_exponent(p.exponent_units(&sum)), 3.0);

        // fractional channels carry into whole ones: 0.5 + 0.5 = 1
        let half = p.exponent_pattern(p.units_per_step() / 2);
        let sum = add_exponents(&half, &half, &p);
        assert_eq!(sum, one);

        // unbiased: no correction carry, a top carry is a real overflow
        let three = p.exponent_pattern(3 * p.units_per_step());
        let ordinary = add_exponents_with_overflow(&two, &one, &p);
        assert!(ordinary.wraparound.is_clean());
        let past_top = add_exponents_with_overflow(&three, &three, &p);
        assert_eq!(past_top.wraparound.overflow, 1);
    }
}
