//! Packed state keys.
//!
//! A key packs every robot position into consecutive `bits`-wide fields,
//! least significant field first:
//! - fields `0..robots-1`: the interchangeable robots, sorted strictly ascending
//! - field `robots-1`: the goal robot
//!
//! Sorting the interchangeable robots makes permutations of the same placement
//! share one key. Canonicalizing is the encoder's job; the store trusts it.

/// Integer types usable as packed keys.
///
/// Provides the handful of bit operations the trie walk needs, so one generic
/// walk serves both narrow and wide keys.
pub trait TrieKey: Copy + Eq + std::fmt::Debug + 'static {
    /// Width of the key type in bits.
    const BITS: u32;

    /// The lowest `bits` bits as a `u32` (`bits <= 32`).
    fn low_bits(self, bits: u32) -> u32;

    /// Logical right shift.
    fn shr(self, bits: u32) -> Self;

    /// Truncates a packed `u64` to this key type.
    fn from_u64(raw: u64) -> Self;

    fn to_u64(self) -> u64;
}

impl TrieKey for u32 {
    const BITS: u32 = 32;

    #[inline(always)]
    fn low_bits(self, bits: u32) -> u32 {
        if bits >= 32 {
            self
        } else {
            self & ((1 << bits) - 1)
        }
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> Self {
        self.checked_shr(bits).unwrap_or(0)
    }

    #[inline(always)]
    fn from_u64(raw: u64) -> Self {
        raw as u32
    }

    #[inline(always)]
    fn to_u64(self) -> u64 {
        self as u64
    }
}

impl TrieKey for u64 {
    const BITS: u32 = 64;

    #[inline(always)]
    fn low_bits(self, bits: u32) -> u32 {
        if bits >= 32 {
            self as u32
        } else {
            (self as u32) & ((1 << bits) - 1)
        }
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> Self {
        self.checked_shr(bits).unwrap_or(0)
    }

    #[inline(always)]
    fn from_u64(raw: u64) -> Self {
        raw
    }

    #[inline(always)]
    fn to_u64(self) -> u64 {
        self
    }
}

/// Which key type a board needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyWidth {
    /// Fits in a `u32`.
    Narrow,
    /// Needs a `u64`.
    Wide,
}

/// Field layout of packed keys for one board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyLayout {
    pub bits: u32,
    pub robot_count: u32,
}

impl KeyLayout {
    /// Total number of key bits.
    pub fn key_bits(&self) -> u32 {
        self.bits * self.robot_count
    }

    pub fn width(&self) -> KeyWidth {
        if self.key_bits() <= u32::BITS {
            KeyWidth::Narrow
        } else {
            KeyWidth::Wide
        }
    }

    /// Packs a placement into its canonical key.
    ///
    /// `others` are the interchangeable robots in any order; they are sorted
    /// into the low fields, the goal robot goes into the top field.
    pub fn encode(&self, goal: u32, others: &[u32]) -> u64 {
        debug_assert_eq!(others.len() + 1, self.robot_count as usize);
        let mut sorted = [0u32; 64];
        let sorted = &mut sorted[..others.len()];
        sorted.copy_from_slice(others);
        sorted.sort_unstable();

        let mut key = 0u64;
        for (field, &cell) in sorted.iter().enumerate() {
            key |= (cell as u64) << (field as u32 * self.bits);
        }
        key | (goal as u64) << (others.len() as u32 * self.bits)
    }

    /// Splits a key back into its fields, least significant first.
    pub fn decode(&self, key: u64) -> Vec<u32> {
        let mask = (1u64 << self.bits) - 1;
        (0..self.robot_count)
            .map(|field| ((key >> (field * self.bits)) & mask) as u32)
            .collect()
    }
}
