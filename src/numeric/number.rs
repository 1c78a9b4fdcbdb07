// ============================================================================
// Channel Number
// Immutable sign / mantissa / exponent value bound to a profile
// ============================================================================

use super::channel::{ChannelName, ChannelSet};
use super::errors::{NumeralError, NumeralResult};
use crate::domain::Profile;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A channel floating-point number.
///
/// Holds a sign flag, a resolved mantissa channel set and a resolved exponent
/// channel set, sized by its [`Profile`]. Numbers are never mutated; every
/// operation returns a new one.
///
/// # Value
/// `(-1)^sign × Σ 2^-(i+1) over set mantissa channels × 2^real_exponent`,
/// where the real exponent is derived from the stored exponent by the profile.
///
/// # Example
/// ```
/// use channel_float::numeric::{ChannelSet, Number};
/// use channel_float::domain::Profile;
///
/// let p = Profile::basic();
/// let mantissa = ChannelSet::with_set(16, &[0, 1]).unwrap(); // 0.75
/// let exponent = ChannelSet::with_set(8, &[1]).unwrap();     // stored 2, real 0
/// let n = Number::new(false, mantissa, exponent, p).unwrap();
/// assert_eq!(n.mantissa_value(), 0.75);
/// assert_eq!(n.real_exponent(), 0.0);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "NumberFields")
)]
pub struct Number {
    negative: bool,
    mantissa: ChannelSet,
    exponent: ChannelSet,
    profile: Profile,
}

impl Number {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Assemble a number from resolved channel sets.
    ///
    /// # Errors
    /// `MalformedChannels` if a channel set length differs from the profile.
    pub fn new(
        negative: bool,
        mantissa: ChannelSet,
        exponent: ChannelSet,
        profile: Profile,
    ) -> NumeralResult<Self> {
        if mantissa.len() != profile.mantissa_channels()
            || exponent.len() != profile.exponent_channels()
        {
            return Err(NumeralError::MalformedChannels);
        }
        Ok(Self::from_parts(negative, mantissa, exponent, profile))
    }

    /// Assemble without checking lengths. Callers inside the crate size the
    /// channel sets from the profile.
    #[inline]
    pub(crate) fn from_parts(
        negative: bool,
        mantissa: ChannelSet,
        exponent: ChannelSet,
        profile: Profile,
    ) -> Self {
        Self {
            negative,
            mantissa,
            exponent,
            profile,
        }
    }

    /// Positive zero: every channel clear.
    pub fn zero(profile: Profile) -> Self {
        Self::signed_zero(false, profile)
    }

    pub(crate) fn signed_zero(negative: bool, profile: Profile) -> Self {
        Self::from_parts(
            negative,
            ChannelSet::zeroed(profile.mantissa_channels()),
            ChannelSet::zeroed(profile.exponent_channels()),
            profile,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub fn mantissa(&self) -> &ChannelSet {
        &self.mantissa
    }

    #[inline]
    pub fn exponent(&self) -> &ChannelSet {
        &self.exponent
    }

    #[inline]
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// True when the mantissa is all clear, whatever the exponent holds.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// True when the leading mantissa channel is set.
    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.mantissa.is_set(0)
    }

    /// Sum of the weights of the set mantissa channels, in [0, 1).
    pub fn mantissa_value(&self) -> f64 {
        self.mantissa
            .set_indices()
            .map(|index| 2f64.powi(self.profile.mantissa_weight_log2(index)))
            .sum()
    }

    /// Stored exponent in units of the least significant exponent channel.
    #[inline]
    pub fn stored_exponent_units(&self) -> u64 {
        self.profile.exponent_units(&self.exponent)
    }

    /// Power of two applied to the mantissa.
    pub fn real_exponent(&self) -> f64 {
        self.profile.real_exponent(self.stored_exponent_units())
    }

    /// Same channels, opposite sign.
    pub fn negated(&self) -> Self {
        Self {
            negative: !self.negative,
            ..self.clone()
        }
    }

    /// Multi-line listing of every channel, for inspecting circuit state.
    pub fn channel_dump(&self) -> ChannelDump<'_> {
        ChannelDump(self)
    }
}

/// Wire shape of a number. Deserialized numbers go through [`Number::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct NumberFields {
    negative: bool,
    mantissa: ChannelSet,
    exponent: ChannelSet,
    profile: Profile,
}

#[cfg(feature = "serde")]
impl TryFrom<NumberFields> for Number {
    type Error = NumeralError;

    fn try_from(fields: NumberFields) -> NumeralResult<Self> {
        Number::new(fields.negative, fields.mantissa, fields.exponent, fields.profile)
    }
}

// ============================================================================
// Channel Dump
// ============================================================================

/// Display adapter produced by [`Number::channel_dump`].
///
/// Mantissa channels are listed from the leading channel down, exponent
/// channels from the most significant down, four per row, each as
/// `name(log2 weight): bit`.
pub struct ChannelDump<'a>(&'a Number);

const DUMP_COLUMNS: usize = 4;

impl fmt::Display for ChannelDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        let profile = n.profile;

        writeln!(
            f,
            "Number[{}]: sign={}",
            profile,
            if n.negative { "-" } else { "+" }
        )?;

        f.write_str("M=")?;
        for index in 0..profile.mantissa_channels() {
            if index % DUMP_COLUMNS == 0 {
                f.write_str("\n\t")?;
            }
            write!(
                f,
                "{}({}): {}   ",
                ChannelName(index),
                profile.mantissa_weight_log2(index),
                u8::from(n.mantissa.is_set(index))
            )?;
        }

        f.write_str("\nE=")?;
        for (column, rank) in (0..profile.exponent_channels()).rev().enumerate() {
            if column % DUMP_COLUMNS == 0 {
                f.write_str("\n\t")?;
            }
            let index = profile.exponent_index_of_rank(rank);
            write!(
                f,
                "{}({}): {}   ",
                ChannelName(index),
                profile.exponent_weight_log2(index),
                u8::from(n.exponent.is_set(index))
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number<{}>({})", self.profile, self)
    }
}
