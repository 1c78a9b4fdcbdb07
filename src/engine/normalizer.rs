// ============================================================================
// Normalizer
// Left-shifts a mantissa until its leading channel is set
// ============================================================================

use crate::domain::Profile;
use crate::numeric::{CarryPath, ChannelSet, Wraparound};

/// Result of a normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalization {
    pub mantissa: ChannelSet,
    pub exponent: ChannelSet,
    /// Single-slot shifts applied to the mantissa
    pub shifts: u32,
    /// Exponent wraps over all steps: `overflow` when the stored exponent
    /// passed the top of the channels, `underflow` when it fell below zero
    pub wraparound: Wraparound,
}

/// Normalize a mantissa/exponent pair.
///
/// See [`normalize_with_steps`].
pub fn normalize(
    mantissa: &ChannelSet,
    exponent: &ChannelSet,
    profile: &Profile,
) -> (ChannelSet, ChannelSet) {
    let normalization = normalize_with_steps(mantissa, exponent, profile);
    (normalization.mantissa, normalization.exponent)
}

/// Normalize a mantissa/exponent pair, reporting the steps taken.
///
/// While the leading mantissa channel is clear, every mantissa channel moves
/// one slot toward the leading end and the exponent is lowered by one binade:
/// the profile's step pattern is added and the exponent is carry-resolved
/// before the next shift. A clear mantissa never gains a leading channel, so
/// it stops at once and both channel sets come back clear.
pub fn normalize_with_steps(
    mantissa: &ChannelSet,
    exponent: &ChannelSet,
    profile: &Profile,
) -> Normalization {
    if mantissa.is_zero() {
        return Normalization {
            mantissa: ChannelSet::zeroed(mantissa.len()),
            exponent: ChannelSet::zeroed(profile.exponent_channels()),
            shifts: 0,
            wraparound: Wraparound::default(),
        };
    }

    let step = profile.binade_down_step();
    let step_carries = profile.binade_down_carries();
    let exponent_path = profile.exponent_carry_path();

    let mut register = mantissa.to_raw();
    let mut exponent = exponent.clone();
    let mut shifts = 0;
    let mut wraparound = Wraparound::default();

    while register.count(0) == 0 {
        register.shift_toward_start();

        let mut sum = exponent.to_raw_with_len(profile.exponent_channels());
        sum.accumulate_bits(&step);
        let resolution = sum.resolve(&exponent_path);
        exponent = resolution.channels;
        wraparound.merge(Wraparound::from_carries(resolution.discarded, step_carries));
        shifts += 1;
    }

    tracing::trace!(
        shifts,
        overflow = wraparound.overflow,
        underflow = wraparound.underflow,
        "mantissa normalized"
    );

    // the register only ever held 0/1 counts; this just narrows the type
    let mantissa = register
        .resolve(&CarryPath::toward_start(mantissa.len()))
        .channels;

    Normalization {
        mantissa,
        exponent,
        shifts,
        wraparound,
    }
}
