//! Interned string handles.

use std::fmt;

/// Handle to an interned string.
///
/// Layout: 32-bit index split into shard (4 bits) + local index (28 bits).
/// Equality is an integer compare; the text lives in the
/// [`StringInterner`](crate::StringInterner).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Maximum local index per shard.
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Number of interner shards.
    pub const NUM_SHARDS: usize = 16;

    /// Create from shard and local index.
    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << 28) | local)
    }

    /// Extract the shard index.
    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    /// Extract the local index within the shard.
    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    /// Check whether this is the empty string handle.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}/{})", self.shard(), self.local())
    }
}

impl Default for Name {
    fn default() -> Self {
        Name::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_and_local_round_trip() {
        let name = Name::new(7, 41_213);
        assert_eq!(name.shard(), 7);
        assert_eq!(name.local(), 41_213);
    }

    #[test]
    fn empty_is_shard_zero() {
        assert_eq!(Name::EMPTY.shard(), 0);
        assert_eq!(Name::EMPTY.local(), 0);
        assert!(Name::EMPTY.is_empty());
    }
}
