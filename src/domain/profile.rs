// ============================================================================
// Numeral Profiles
// Static descriptions of channel layouts, weights and exponent bias
// ============================================================================

use crate::numeric::{CarryPath, ChannelSet, NumeralError, NumeralResult, MAX_CHANNELS};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Exponent Semantics
// ============================================================================

/// How the stored exponent value maps to the power of two applied to the
/// mantissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExponentSense {
    /// Real exponent = bias − stored. Small magnitudes get large stored values.
    /// Text marker: `e-`
    Negated,

    /// Real exponent = stored − bias.
    /// Text marker: `e+`
    Direct,
}

/// Which end of the exponent channel array is most significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExponentOrder {
    /// Channel 0 is least significant; carries move to higher indices
    LeastFirst,

    /// Channel 0 is most significant; carries move to lower indices
    MostFirst,
}

// ============================================================================
// Profile
// ============================================================================

/// A numeral-system variant.
///
/// The mantissa layout is fixed: channel `i` weighs 2^-(i+1). The exponent
/// layout is described by the channel count, the order, and the log2 weight of
/// the most significant channel. All weights are consecutive powers of two.
///
/// Stored exponents are handled internally in integer *units* of the least
/// significant exponent channel, so fractional exponent weights stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "ProfileFields")
)]
pub struct Profile {
    mantissa_channels: u8,
    exponent_channels: u8,
    exponent_bias: u32,
    exponent_order: ExponentOrder,
    exponent_top_log2: i8,
    exponent_sense: ExponentSense,
}

impl Profile {
    /// 16 mantissa channels, 8 exponent channels weighted 2^0..2^7 (channel 0
    /// least significant), real exponent = 2 − stored.
    pub const BASIC: Profile = Profile {
        mantissa_channels: 16,
        exponent_channels: 8,
        exponent_bias: 2,
        exponent_order: ExponentOrder::LeastFirst,
        exponent_top_log2: 7,
        exponent_sense: ExponentSense::Negated,
    };

    /// 16 mantissa channels, 20 exponent channels weighted 2^(1-i) (channel 0
    /// most significant), unbiased, real exponent = stored.
    pub const EXTENDED: Profile = Profile {
        mantissa_channels: 16,
        exponent_channels: 20,
        exponent_bias: 0,
        exponent_order: ExponentOrder::MostFirst,
        exponent_top_log2: 1,
        exponent_sense: ExponentSense::Direct,
    };

    #[inline]
    pub const fn basic() -> Self {
        Self::BASIC
    }

    #[inline]
    pub const fn extended() -> Self {
        Self::EXTENDED
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub const fn mantissa_channels(&self) -> usize {
        self.mantissa_channels as usize
    }

    #[inline]
    pub const fn exponent_channels(&self) -> usize {
        self.exponent_channels as usize
    }

    #[inline]
    pub const fn exponent_bias(&self) -> u32 {
        self.exponent_bias
    }

    #[inline]
    pub const fn exponent_order(&self) -> ExponentOrder {
        self.exponent_order
    }

    #[inline]
    pub const fn exponent_sense(&self) -> ExponentSense {
        self.exponent_sense
    }

    /// Marker character following `e` in the text form.
    #[inline]
    pub const fn exponent_marker(&self) -> char {
        match self.exponent_sense {
            ExponentSense::Negated => '-',
            ExponentSense::Direct => '+',
        }
    }

    // ========================================================================
    // Channel Weights
    // ========================================================================

    /// log2 of the weight of mantissa channel `index`.
    #[inline]
    pub const fn mantissa_weight_log2(&self, index: usize) -> i32 {
        -(index as i32) - 1
    }

    /// log2 of the weight of the least significant exponent channel.
    #[inline]
    pub const fn exponent_lsb_log2(&self) -> i32 {
        self.exponent_top_log2 as i32 - (self.exponent_channels as i32 - 1)
    }

    /// Significance rank of exponent channel `index` (0 = least significant).
    #[inline]
    pub const fn exponent_rank(&self, index: usize) -> usize {
        match self.exponent_order {
            ExponentOrder::LeastFirst => index,
            ExponentOrder::MostFirst => self.exponent_channels as usize - 1 - index,
        }
    }

    /// Exponent channel index holding significance rank `rank`.
    #[inline]
    pub const fn exponent_index_of_rank(&self, rank: usize) -> usize {
        // the mapping is its own inverse
        self.exponent_rank(rank)
    }

    /// log2 of the weight of exponent channel `index`.
    #[inline]
    pub const fn exponent_weight_log2(&self, index: usize) -> i32 {
        self.exponent_lsb_log2() + self.exponent_rank(index) as i32
    }

    /// Stored units making up one whole exponent step (2^0).
    #[inline]
    pub const fn units_per_step(&self) -> u64 {
        1u64 << (-self.exponent_lsb_log2()) as u32
    }

    /// One past the largest stored exponent, in units.
    #[inline]
    pub const fn exponent_capacity_units(&self) -> u64 {
        1u64 << self.exponent_channels as u32
    }

    #[inline]
    pub const fn bias_units(&self) -> u64 {
        self.exponent_bias as u64 * self.units_per_step()
    }

    // ========================================================================
    // Carry Paths
    // ========================================================================

    /// Mantissa carries run from the last channel toward channel 0.
    pub fn mantissa_carry_path(&self) -> CarryPath {
        CarryPath::toward_start(self.mantissa_channels())
    }

    /// Exponent carries run from the least to the most significant channel.
    pub fn exponent_carry_path(&self) -> CarryPath {
        match self.exponent_order {
            ExponentOrder::LeastFirst => CarryPath::toward_end(self.exponent_channels()),
            ExponentOrder::MostFirst => CarryPath::toward_start(self.exponent_channels()),
        }
    }

    // ========================================================================
    // Exponent Patterns
    // ========================================================================

    /// Channel pattern for a stored exponent of `units`, taken modulo the
    /// exponent capacity. Channels are set greedily from the most significant
    /// weight down.
    pub fn exponent_pattern(&self, units: u64) -> ChannelSet {
        let mut remaining = units & (self.exponent_capacity_units() - 1);
        let mut set = ChannelSet::zeroed(self.exponent_channels());
        for rank in (0..self.exponent_channels()).rev() {
            let weight = 1u64 << rank;
            if remaining >= weight {
                set.set(self.exponent_index_of_rank(rank));
                remaining -= weight;
            }
        }
        set
    }

    /// Stored exponent of a resolved exponent set, in units.
    pub fn exponent_units(&self, exponent: &ChannelSet) -> u64 {
        exponent
            .set_indices()
            .filter(|index| *index < self.exponent_channels())
            .map(|index| 1u64 << self.exponent_rank(index))
            .sum()
    }

    /// Pattern pre-seeded into the exponent adder so the sum of two biased
    /// exponents carries the bias once: `(capacity − bias) mod capacity`.
    pub fn bias_correction(&self) -> ChannelSet {
        let capacity = self.exponent_capacity_units();
        self.exponent_pattern((capacity - self.bias_units()) % capacity)
    }

    /// Carries out of the top channel that adding [`bias_correction`]
    /// produces when the biased sum is in range.
    ///
    /// [`bias_correction`]: Self::bias_correction
    pub fn bias_correction_carries(&self) -> u32 {
        u32::from(self.bias_units() % self.exponent_capacity_units() != 0)
    }

    /// Pattern that, added and resolved, lowers the real exponent by one.
    pub fn binade_down_step(&self) -> ChannelSet {
        match self.exponent_sense {
            ExponentSense::Negated => self.exponent_pattern(self.units_per_step()),
            ExponentSense::Direct => {
                self.exponent_pattern(self.exponent_capacity_units() - self.units_per_step())
            }
        }
    }

    /// Carries out of the top channel that one [`binade_down_step`] produces
    /// when the stored exponent stays in range. A direct-sense step is a
    /// two's-complement decrement and always carries once.
    ///
    /// [`binade_down_step`]: Self::binade_down_step
    pub fn binade_down_carries(&self) -> u32 {
        match self.exponent_sense {
            ExponentSense::Negated => 0,
            ExponentSense::Direct => 1,
        }
    }

    /// Stored units for an integral real exponent.
    ///
    /// # Errors
    /// `Range` if the stored value would be negative or exceed the channels.
    pub fn stored_units_for(&self, real_exponent: i64) -> NumeralResult<u64> {
        let bias = self.exponent_bias as i64;
        let stored = match self.exponent_sense {
            ExponentSense::Negated => bias - real_exponent,
            ExponentSense::Direct => real_exponent - bias,
        };
        if stored < 0 {
            return Err(NumeralError::Range);
        }
        let units = (stored as u64)
            .checked_mul(self.units_per_step())
            .ok_or(NumeralError::Range)?;
        if units >= self.exponent_capacity_units() {
            return Err(NumeralError::Range);
        }
        Ok(units)
    }

    /// Real exponent encoded by `units` stored units.
    pub fn real_exponent(&self, units: u64) -> f64 {
        let stored = units as f64 * 2f64.powi(self.exponent_lsb_log2());
        let bias = self.exponent_bias as f64;
        match self.exponent_sense {
            ExponentSense::Negated => bias - stored,
            ExponentSense::Direct => stored - bias,
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate the profile
    pub fn validate(&self) -> Result<(), String> {
        if self.mantissa_channels == 0 || self.mantissa_channels() > MAX_CHANNELS {
            return Err(format!(
                "Mantissa channel count must be between 1 and {}",
                MAX_CHANNELS
            ));
        }

        if self.exponent_channels == 0 || self.exponent_channels() > MAX_CHANNELS {
            return Err(format!(
                "Exponent channel count must be between 1 and {}",
                MAX_CHANNELS
            ));
        }

        if self.exponent_top_log2 < 0 || self.exponent_lsb_log2() > 0 {
            return Err("Exponent layout must contain the 2^0 channel".to_string());
        }

        if self.bias_units() >= self.exponent_capacity_units() {
            return Err("Bias does not fit in the exponent channels".to_string());
        }

        Ok(())
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::BASIC
    }
}

/// Wire shape of a profile. Deserialized profiles go through
/// [`Profile::validate`] before they can be used.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct ProfileFields {
    mantissa_channels: u8,
    exponent_channels: u8,
    exponent_bias: u32,
    exponent_order: ExponentOrder,
    exponent_top_log2: i8,
    exponent_sense: ExponentSense,
}

#[cfg(feature = "serde")]
impl TryFrom<ProfileFields> for Profile {
    type Error = String;

    fn try_from(fields: ProfileFields) -> Result<Self, Self::Error> {
        let profile = Profile {
            mantissa_channels: fields.mantissa_channels,
            exponent_channels: fields.exponent_channels,
            exponent_bias: fields.exponent_bias,
            exponent_order: fields.exponent_order,
            exponent_top_log2: fields.exponent_top_log2,
            exponent_sense: fields.exponent_sense,
        };
        profile.validate()?;
        Ok(profile)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m{}/e{}(+{}, e{})",
            self.mantissa_channels,
            self.exponent_channels,
            self.exponent_bias,
            self.exponent_marker()
        )
    }
}

// ============================================================================
// Builder for Custom Profiles
// ============================================================================

/// Builder for custom profiles with a fluent API
///
/// # Example
/// ```
/// use channel_float::domain::{ExponentOrder, ExponentSense, ProfileBuilder};
///
/// let profile = ProfileBuilder::new(12, 6)
///     .with_bias(1)
///     .with_sense(ExponentSense::Negated)
///     .with_layout(ExponentOrder::LeastFirst, 5)
///     .build()
///     .unwrap();
///
/// assert_eq!(profile.exponent_bias(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProfileBuilder {
    profile: Profile,
}

impl ProfileBuilder {
    /// Start from an unbiased, negated-sense profile whose exponent channels
    /// are integer weights 2^0.. with channel 0 least significant.
    pub fn new(mantissa_channels: u8, exponent_channels: u8) -> Self {
        Self {
            profile: Profile {
                mantissa_channels,
                exponent_channels,
                exponent_bias: 0,
                exponent_order: ExponentOrder::LeastFirst,
                exponent_top_log2: exponent_channels.saturating_sub(1) as i8,
                exponent_sense: ExponentSense::Negated,
            },
        }
    }

    /// Builder method: Set the exponent bias
    pub fn with_bias(mut self, bias: u32) -> Self {
        self.profile.exponent_bias = bias;
        self
    }

    /// Builder method: Set the exponent sense
    pub fn with_sense(mut self, sense: ExponentSense) -> Self {
        self.profile.exponent_sense = sense;
        self
    }

    /// Builder method: Set the channel order and the log2 weight of the most
    /// significant exponent channel
    pub fn with_layout(mut self, order: ExponentOrder, top_log2: i8) -> Self {
        self.profile.exponent_order = order;
        self.profile.exponent_top_log2 = top_log2;
        self
    }

    /// Validate and return the profile
    pub fn build(self) -> Result<Profile, String> {
        self.profile.validate()?;
        Ok(self.profile)
    }
}
