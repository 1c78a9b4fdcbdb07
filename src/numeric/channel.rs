// ============================================================================
// Channel Sets
// Dense, positionally weighted digit slots and their carry-resolution pass
// ============================================================================
//
// Two representations are kept apart on purpose:
// - ChannelSet: resolved, every slot is 0 or 1. This is what a Number holds.
// - RawChannelSet: unresolved counts, any slot may hold a pending overflow.
//
// The only way from raw to resolved is `RawChannelSet::resolve`, which walks a
// CarryPath in order. Each slot is fully drained before the next slot on the
// path is examined.

use super::errors::{NumeralError, NumeralResult};
use arrayvec::ArrayVec;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on the number of channels in a single set.
pub const MAX_CHANNELS: usize = 32;

/// Every channel is binary once resolved.
pub const RADIX: u32 = 2;

const CHANNEL_NAMES: [&str; 16] = [
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "light_gray",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
];

/// Display name of the channel at a given position.
///
/// The first sixteen positions carry the dye colour names used by the signal
/// layout; later positions fall back to `channel_<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelName(pub usize);

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match CHANNEL_NAMES.get(self.0) {
            Some(name) => f.write_str(name),
            None => write!(f, "channel_{}", self.0),
        }
    }
}

// ============================================================================
// Resolved Channel Set
// ============================================================================

/// A carry-resolved channel set. Every slot holds 0 or 1.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelSet {
    bits: ArrayVec<bool, MAX_CHANNELS>,
}

impl ChannelSet {
    /// All-clear set with `len` channels (capped at [`MAX_CHANNELS`]).
    pub fn zeroed(len: usize) -> Self {
        let mut bits = ArrayVec::new();
        for _ in 0..len.min(MAX_CHANNELS) {
            bits.push(false);
        }
        Self { bits }
    }

    /// Build from bits in channel-index order.
    ///
    /// # Errors
    /// `MalformedChannels` if more than [`MAX_CHANNELS`] bits are supplied.
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> NumeralResult<Self> {
        let mut set = ArrayVec::new();
        for bit in bits {
            set.try_push(bit)
                .map_err(|_| NumeralError::MalformedChannels)?;
        }
        Ok(Self { bits: set })
    }

    /// Build a `len`-channel set with exactly the listed channels set.
    ///
    /// Lets sparse channel listings be turned into the dense form.
    ///
    /// # Errors
    /// `MalformedChannels` if an index is out of range.
    pub fn with_set(len: usize, indices: &[usize]) -> NumeralResult<Self> {
        if len > MAX_CHANNELS {
            return Err(NumeralError::MalformedChannels);
        }
        let mut set = Self::zeroed(len);
        for &index in indices {
            if index >= len {
                return Err(NumeralError::MalformedChannels);
            }
            set.bits[index] = true;
        }
        Ok(set)
    }

    /// Set channel `index`. Out-of-range indices are ignored.
    #[inline]
    pub(crate) fn set(&mut self, index: usize) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = true;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether channel `index` is set. Out-of-range channels read as clear.
    #[inline]
    pub fn is_set(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Bits in channel-index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Indices of the set channels, ascending.
    pub fn set_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit)
            .map(|(index, _)| index)
    }

    /// True when no channel is set.
    #[inline]
    pub fn is_zero(&self) -> bool {
        !self.bits.iter().any(|bit| *bit)
    }

    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// Lift into the raw representation so counts can accumulate.
    pub fn to_raw(&self) -> RawChannelSet {
        RawChannelSet {
            counts: self.bits.iter().map(|bit| u32::from(*bit)).collect(),
        }
    }

    /// Same as [`to_raw`](Self::to_raw) but resized to `len` channels,
    /// dropping or zero-filling slots past the original length.
    pub fn to_raw_with_len(&self, len: usize) -> RawChannelSet {
        let mut raw = RawChannelSet::zeroed(len);
        for (slot, bit) in raw.counts.iter_mut().zip(self.bits.iter()) {
            *slot = u32::from(*bit);
        }
        raw
    }
}

impl fmt::Debug for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChannelSet(")?;
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        f.write_str(")")
    }
}

// ============================================================================
// Raw Channel Set
// ============================================================================

/// An unresolved channel set. Slots may hold any count while partial results
/// are being accumulated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawChannelSet {
    counts: ArrayVec<u32, MAX_CHANNELS>,
}

impl RawChannelSet {
    /// All-zero accumulator with `len` slots (capped at [`MAX_CHANNELS`]).
    pub fn zeroed(len: usize) -> Self {
        let mut counts = ArrayVec::new();
        for _ in 0..len.min(MAX_CHANNELS) {
            counts.push(0);
        }
        Self { counts }
    }

    /// Build from explicit per-slot counts.
    ///
    /// # Errors
    /// `MalformedChannels` if more than [`MAX_CHANNELS`] counts are supplied.
    pub fn from_counts(counts: &[u32]) -> NumeralResult<Self> {
        ArrayVec::try_from(counts)
            .map(|counts| Self { counts })
            .map_err(|_| NumeralError::MalformedChannels)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count held by slot `index`; out-of-range slots read as 0.
    #[inline]
    pub fn count(&self, index: usize) -> u32 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Whether any slot holds a pending overflow.
    pub fn has_pending_overflow(&self) -> bool {
        self.counts.iter().any(|count| *count >= RADIX)
    }

    /// Add `amount` to slot `index`. Out-of-range slots are ignored.
    #[inline]
    pub fn add(&mut self, index: usize, amount: u32) {
        if let Some(slot) = self.counts.get_mut(index) {
            *slot += amount;
        }
    }

    /// Element-wise add another set into this one, over the shared slots.
    pub fn accumulate(&mut self, other: &RawChannelSet) {
        for (slot, count) in self.counts.iter_mut().zip(other.counts.iter()) {
            *slot += *count;
        }
    }

    /// Element-wise add a resolved set into this one.
    pub fn accumulate_bits(&mut self, other: &ChannelSet) {
        for (slot, bit) in self.counts.iter_mut().zip(other.iter()) {
            *slot += u32::from(bit);
        }
    }

    /// One shift step toward the end: every count moves to the next index.
    /// Returns the count pushed past the last slot, which is discarded.
    pub fn shift_toward_end(&mut self) -> u32 {
        let Some(&dropped) = self.counts.last() else {
            return 0;
        };
        self.counts.rotate_right(1);
        self.counts[0] = 0;
        dropped
    }

    /// One shift step toward the start: every count moves to the previous
    /// index and the last slot is cleared. Returns the count pushed out of
    /// slot 0.
    pub fn shift_toward_start(&mut self) -> u32 {
        let Some(&dropped) = self.counts.first() else {
            return 0;
        };
        self.counts.rotate_left(1);
        let last = self.counts.len() - 1;
        self.counts[last] = 0;
        dropped
    }

    /// Carry-resolve along `path`.
    ///
    /// Slots are visited in path order. While a slot holds `RADIX` or more,
    /// `RADIX` is removed and one unit is added to the next slot on the path.
    /// Units carried past the end of the path are discarded and counted in
    /// [`Resolution::discarded`].
    ///
    /// # Errors
    /// `MalformedChannels` if the path does not cover exactly this set's slots.
    pub fn try_resolve(self, path: &CarryPath) -> NumeralResult<Resolution> {
        if path.len() != self.counts.len() || path.iter().any(|index| index >= self.counts.len())
        {
            return Err(NumeralError::MalformedChannels);
        }
        Ok(self.resolve(path))
    }

    /// [`try_resolve`](Self::try_resolve) for paths built from this set's
    /// own length.
    pub(crate) fn resolve(mut self, path: &CarryPath) -> Resolution {
        debug_assert_eq!(path.len(), self.counts.len());

        let mut discarded = 0;
        let mut steps = path.iter().peekable();
        while let Some(channel) = steps.next() {
            let successor = steps.peek().copied();
            while self.counts[channel] >= RADIX {
                self.counts[channel] -= RADIX;
                match successor {
                    Some(next) => self.counts[next] += 1,
                    None => discarded += 1,
                }
            }
        }

        debug_assert!(!self.has_pending_overflow());
        Resolution {
            channels: ChannelSet {
                bits: self.counts.iter().map(|count| *count == 1).collect(),
            },
            discarded,
        }
    }
}

/// Output of a carry-resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved channels
    pub channels: ChannelSet,
    /// Units carried past the most significant slot
    pub discarded: u32,
}

// ============================================================================
// Wraparound
// ============================================================================

/// Net wrap of a modular register, once the carries a seeded pattern always
/// produces are taken out of the raw discard count.
///
/// Adding a two's-complement pattern carries out of the top slot exactly once
/// per addition when the true result is in range. More carries than that means
/// the result went past the top (`overflow`); fewer means it went below zero
/// (`underflow`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wraparound {
    /// Times the register wrapped past its top
    pub overflow: u32,
    /// Times the register wrapped below zero
    pub underflow: u32,
}

impl Wraparound {
    /// Compare the carries actually discarded with the carries the seeded
    /// pattern accounts for.
    pub fn from_carries(discarded: u32, expected: u32) -> Self {
        Self {
            overflow: discarded.saturating_sub(expected),
            underflow: expected.saturating_sub(discarded),
        }
    }

    /// True when the register stayed in range.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.overflow == 0 && self.underflow == 0
    }

    /// Fold another pass into this one.
    pub fn merge(&mut self, other: Wraparound) {
        self.overflow += other.overflow;
        self.underflow += other.underflow;
    }
}

// ============================================================================
// Carry Path
// ============================================================================

/// The order a carry pass visits slots in, least significant first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarryPath {
    order: ArrayVec<u8, MAX_CHANNELS>,
}

impl CarryPath {
    /// `0, 1, …, len-1`: slot 0 is least significant, carries move to
    /// higher indices.
    pub fn toward_end(len: usize) -> Self {
        Self {
            order: (0..len.min(MAX_CHANNELS)).map(|i| i as u8).collect(),
        }
    }

    /// `len-1, …, 1, 0`: the last slot is least significant, carries move to
    /// lower indices.
    pub fn toward_start(len: usize) -> Self {
        Self {
            order: (0..len.min(MAX_CHANNELS)).rev().map(|i| i as u8).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().map(|index| *index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(ChannelName(0).to_string(), "white");
        assert_eq!(ChannelName(15).to_string(), "black");
        assert_eq!(ChannelName(19).to_string(), "channel_19");
    }

    #[test]
    fn test_with_set_is_dense() {
        let set = ChannelSet::with_set(8, &[1, 3]).unwrap();
        assert_eq!(set.len(), 8);
        assert!(set.is_set(1));
        assert!(set.is_set(3));
        assert!(!set.is_set(0));
        assert!(!set.is_set(42));
        assert_eq!(set.set_indices().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(format!("{:?}", set), "ChannelSet(01010000)");

        assert_eq!(
            ChannelSet::with_set(8, &[8]),
            Err(NumeralError::MalformedChannels)
        );
    }

    #[test]
    fn test_from_bits_capacity() {
        assert!(ChannelSet::from_bits(vec![true; MAX_CHANNELS]).is_ok());
        assert_eq!(
            ChannelSet::from_bits(vec![false; MAX_CHANNELS + 1]),
            Err(NumeralError::MalformedChannels)
        );
    }

    #[test]
    fn test_shift_toward_end_discards_tail() {
        let mut raw = RawChannelSet::from_counts(&[1, 2, 0, 3]).unwrap();
        assert_eq!(raw.shift_toward_end(), 3);
        assert_eq!(raw.counts(), &[0, 1, 2, 0]);
        assert_eq!(raw.shift_toward_end(), 0);
        assert_eq!(raw.counts(), &[0, 0, 1, 2]);
    }

    #[test]
    fn test_shift_toward_start_clears_tail() {
        let mut raw = RawChannelSet::from_counts(&[0, 1, 0, 1]).unwrap();
        assert_eq!(raw.shift_toward_start(), 0);
        assert_eq!(raw.counts(), &[1, 0, 1, 0]);
    }

    #[test]
    fn test_resolve_toward_end() {
        // 3 + 2*2 = 7 in little-endian slots
        let raw = RawChannelSet::from_counts(&[3, 2, 0, 0]).unwrap();
        let resolution = raw.resolve(&CarryPath::toward_end(4));
        assert_eq!(resolution.channels, ChannelSet::with_set(4, &[0, 1, 2]).unwrap());
        assert_eq!(resolution.discarded, 0);
    }

    #[test]
    fn test_resolve_toward_start_discards_overflow() {
        // slot 0 is most significant: 2 at slot 0 has nowhere to go
        let raw = RawChannelSet::from_counts(&[2, 0, 2]).unwrap();
        let resolution = raw.resolve(&CarryPath::toward_start(3));
        assert_eq!(resolution.channels, ChannelSet::with_set(3, &[1]).unwrap());
        assert_eq!(resolution.discarded, 1);
    }

    #[test]
    fn test_resolve_drains_each_slot_before_moving_on() {
        // 5 at the bottom pushes 2 into slot 1, which then holds 3
        let raw = RawChannelSet::from_counts(&[5, 1, 0]).unwrap();
        let resolution = raw.resolve(&CarryPath::toward_end(3));
        // 5 + 2 = 7 = 0b111
        assert_eq!(resolution.channels, ChannelSet::with_set(3, &[0, 1, 2]).unwrap());
        assert_eq!(resolution.discarded, 0);
    }

    #[test]
    fn test_accumulate_and_to_raw() {
        let a = ChannelSet::with_set(4, &[0, 2]).unwrap();
        let b = ChannelSet::with_set(4, &[2, 3]).unwrap();
        let mut raw = a.to_raw();
        raw.accumulate_bits(&b);
        assert_eq!(raw.counts(), &[1, 0, 2, 1]);
        assert!(raw.has_pending_overflow());

        let mut other = RawChannelSet::zeroed(4);
        other.add(1, 4);
        other.add(9, 4);
        raw.accumulate(&other);
        assert_eq!(raw.counts(), &[1, 4, 2, 1]);
    }

    #[test]
    fn test_try_resolve_rejects_foreign_paths() {
        let raw = RawChannelSet::from_counts(&[1, 2, 0]).unwrap();
        assert_eq!(
            raw.clone().try_resolve(&CarryPath::toward_end(5)),
            Err(NumeralError::MalformedChannels)
        );
        assert_eq!(
            raw.clone().try_resolve(&CarryPath::toward_start(2)),
            Err(NumeralError::MalformedChannels)
        );
        let resolution = raw.try_resolve(&CarryPath::toward_end(3)).unwrap();
        assert_eq!(resolution.channels, ChannelSet::with_set(3, &[0, 2]).unwrap());
    }

    #[test]
    fn test_wraparound_from_carries() {
        assert!(Wraparound::from_carries(1, 1).is_clean());
        assert!(Wraparound::from_carries(0, 0).is_clean());
        assert_eq!(
            Wraparound::from_carries(2, 1),
            Wraparound { overflow: 1, underflow: 0 }
        );
        assert_eq!(
            Wraparound::from_carries(0, 1),
            Wraparound { overflow: 0, underflow: 1 }
        );

        let mut total = Wraparound::default();
        total.merge(Wraparound::from_carries(0, 1));
        total.merge(Wraparound::from_carries(1, 0));
        assert_eq!(total, Wraparound { overflow: 1, underflow: 1 });
    }

    #[test]
    fn test_to_raw_with_len() {
        let set = ChannelSet::with_set(3, &[0, 2]).unwrap();
        assert_eq!(set.to_raw_with_len(5).counts(), &[1, 0, 1, 0, 0]);
        assert_eq!(set.to_raw_with_len(2).counts(), &[1, 0]);
    }

    #[test]
    fn test_carry_paths() {
        assert_eq!(CarryPath::toward_end(3).iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(CarryPath::toward_start(3).iter().collect::<Vec<_>>(), vec![2, 1, 0]);
    }
}
