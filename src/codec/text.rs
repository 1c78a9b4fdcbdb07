// ============================================================================
// Text Codec
// Canonical string form of channel numbers
// ============================================================================
//
// Grammar (basic profile):
//
//     (-)?\.([01]{1,16})e-([01]{1,8})\(\+2\)
//
// Widths follow the profile's channel counts, the marker after `e` follows the
// exponent sense and the bias literal must equal the profile's bias.
// Mantissa digits are listed from channel 0 with trailing zeros stripped;
// exponent digits are listed most significant first with leading zeros
// stripped. At least one digit is always kept.

use crate::domain::Profile;
use crate::numeric::{ChannelSet, Number, NumeralResult, ParseFailure};
use std::fmt;

/// Serialize a number to its canonical text form.
///
/// Positive zero formats as the reserved literal `.0e-0(+<bias>)`.
pub fn format(n: &Number) -> String {
    n.to_string()
}

/// Encode a native value straight to text.
///
/// # Errors
/// Same as [`encode`](super::encode).
pub fn encode_to_text(value: f64, profile: Profile) -> NumeralResult<String> {
    super::encode(value, profile).map(|n| n.to_string())
}

/// Parse the canonical text form under `profile`.
///
/// # Errors
/// `Parse` with the point where the text stopped matching.
///
/// # Example
/// ```
/// use channel_float::codec::{decode, parse};
/// use channel_float::domain::Profile;
///
/// let n = parse(".11011e-111(+2)", Profile::basic()).unwrap();
/// assert_eq!(decode(&n), 0.0263671875);
/// ```
pub fn parse(text: &str, profile: Profile) -> NumeralResult<Number> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let rest = rest.strip_prefix('.').ok_or(ParseFailure::MissingPoint)?;

    let (mantissa_digits, rest) = split_digits(rest);
    if !is_binary(mantissa_digits, profile.mantissa_channels()) {
        return Err(ParseFailure::MantissaDigits.into());
    }

    let rest = rest
        .strip_prefix('e')
        .and_then(|rest| rest.strip_prefix(profile.exponent_marker()))
        .ok_or(ParseFailure::ExponentMarker)?;

    let (exponent_digits, rest) = split_digits(rest);
    if !is_binary(exponent_digits, profile.exponent_channels()) {
        return Err(ParseFailure::ExponentDigits.into());
    }

    let rest = rest.strip_prefix("(+").ok_or(ParseFailure::BiasLiteral)?;
    let (bias_digits, rest) = split_digits(rest);
    if bias_digits.is_empty() {
        return Err(ParseFailure::BiasLiteral.into());
    }
    let rest = rest.strip_prefix(')').ok_or(ParseFailure::BiasLiteral)?;
    if !rest.is_empty() {
        return Err(ParseFailure::TrailingInput.into());
    }
    if bias_digits != profile.exponent_bias().to_string() {
        return Err(ParseFailure::BiasMismatch.into());
    }

    // Mantissa digits are right-padded: digit i lands on channel i.
    let mut mantissa = ChannelSet::zeroed(profile.mantissa_channels());
    for (index, digit) in mantissa_digits.bytes().enumerate() {
        if digit == b'1' {
            mantissa.set(index);
        }
    }

    // Exponent digits are left-padded: the last digit is rank 0.
    let mut exponent = ChannelSet::zeroed(profile.exponent_channels());
    for (rank, digit) in exponent_digits.bytes().rev().enumerate() {
        if digit == b'1' {
            exponent.set(profile.exponent_index_of_rank(rank));
        }
    }

    Ok(Number::from_parts(negative, mantissa, exponent, profile))
}

/// Split off the leading run of ASCII digits.
fn split_digits(text: &str) -> (&str, &str) {
    let end = text
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(text.len());
    text.split_at(end)
}

fn is_binary(digits: &str, max_len: usize) -> bool {
    !digits.is_empty() && digits.len() <= max_len && digits.bytes().all(|b| b == b'0' || b == b'1')
}

// ============================================================================
// Display and Parsing on Number
// ============================================================================

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.profile();

        if self.is_negative() {
            f.write_str("-")?;
        }

        f.write_str(".")?;
        let kept = self.mantissa().set_indices().last().map_or(1, |index| index + 1);
        for index in 0..kept {
            f.write_str(if self.mantissa().is_set(index) { "1" } else { "0" })?;
        }

        write!(f, "e{}", profile.exponent_marker())?;
        let is_set = |rank: usize| self.exponent().is_set(profile.exponent_index_of_rank(rank));
        let top = (0..profile.exponent_channels()).rev().find(|rank| is_set(*rank));
        match top {
            Some(top) => {
                for rank in (0..=top).rev() {
                    f.write_str(if is_set(rank) { "1" } else { "0" })?;
                }
            }
            None => f.write_str("0")?,
        }

        write!(f, "(+{})", profile.exponent_bias())
    }
}

impl Number {
    /// See [`parse`].
    #[inline]
    pub fn parse(text: &str, profile: Profile) -> NumeralResult<Self> {
        parse(text, profile)
    }
}
