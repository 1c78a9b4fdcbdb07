// ============================================================================
// Float Codec
// Conversion between f64 and channel numbers
// ============================================================================

use crate::domain::Profile;
use crate::numeric::{ChannelSet, Number, NumeralError, NumeralResult};

/// Largest power-of-two step applied in a single multiplication by `ldexp`.
/// 2^1000 and 2^-1000 are both normal f64 values.
const LDEXP_STEP: i64 = 1000;

/// Encode a native value into channels.
///
/// The magnitude is split into a fraction in [0.5, 1) and an integral
/// exponent. The fraction is truncated into the mantissa channels greedily
/// from the leading channel down; the exponent is biased by the profile and
/// laid into the exponent channels the same way.
///
/// # Errors
/// - `Domain` if `value` is NaN or infinite
/// - `Range` if the exponent does not fit the profile
///
/// # Example
/// ```
/// use channel_float::codec::{decode, encode};
/// use channel_float::domain::Profile;
///
/// let n = encode(0.75, Profile::basic()).unwrap();
/// assert_eq!(n.mantissa().set_indices().collect::<Vec<_>>(), vec![0, 1]);
/// assert_eq!(decode(&n), 0.75);
/// ```
pub fn encode(value: f64, profile: Profile) -> NumeralResult<Number> {
    if !value.is_finite() {
        return Err(NumeralError::Domain);
    }
    if value == 0.0 {
        return Ok(Number::zero(profile));
    }

    let negative = value < 0.0;
    let magnitude = value.abs();

    let mut exponent = magnitude.log2().floor() as i64;
    let mut fraction = ldexp(magnitude, -exponent);
    if fraction >= 1.0 {
        fraction /= 2.0;
        exponent += 1;
    }

    let units = profile.stored_units_for(exponent)?;
    let exponent_channels = profile.exponent_pattern(units);
    let mantissa_channels = quantize_mantissa(fraction, &profile);

    tracing::trace!(value, exponent, units, "encoded value into channels");

    Ok(Number::from_parts(
        negative,
        mantissa_channels,
        exponent_channels,
        profile,
    ))
}

/// Decode channels back into a native value.
///
/// Total for every well-formed number. A clear mantissa decodes to a zero
/// carrying the number's sign.
pub fn decode(n: &Number) -> f64 {
    let mantissa = n.mantissa_value();
    let magnitude = if mantissa == 0.0 {
        0.0
    } else {
        let exponent = n.real_exponent();
        let whole = exponent.floor();
        ldexp(mantissa * (exponent - whole).exp2(), whole as i64)
    };

    if n.is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Greedy truncation of a fraction in [0, 1) into mantissa channels.
fn quantize_mantissa(fraction: f64, profile: &Profile) -> ChannelSet {
    let mut remaining = fraction;
    let mut channels = ChannelSet::zeroed(profile.mantissa_channels());
    for index in 0..profile.mantissa_channels() {
        let weight = 2f64.powi(profile.mantissa_weight_log2(index));
        if remaining >= weight {
            channels.set(index);
            remaining -= weight;
        }
    }
    channels
}

/// `x × 2^exp` without overflowing or flushing the scale factor itself.
fn ldexp(mut x: f64, mut exp: i64) -> f64 {
    while exp > LDEXP_STEP {
        x *= 2f64.powi(LDEXP_STEP as i32);
        exp -= LDEXP_STEP;
    }
    while exp < -LDEXP_STEP {
        x *= 2f64.powi(-LDEXP_STEP as i32);
        exp += LDEXP_STEP;
    }
    x * 2f64.powi(exp as i32)
}

// ============================================================================
// Number Conversions
// ============================================================================

impl Number {
    /// See [`encode`].
    #[inline]
    pub fn from_f64(value: f64, profile: Profile) -> NumeralResult<Self> {
        encode(value, profile)
    }

    /// See [`decode`].
    #[inline]
    pub fn to_f64(&self) -> f64 {
        decode(self)
    }
}
