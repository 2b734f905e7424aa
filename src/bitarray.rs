//! Bit array backends.
use fixedbitset::FixedBitSet;

/// Fixed-size, pre-allocated vector of bits used as storage by all filters.
///
/// Every bit starts unset and the length never changes after construction. Filters only pass
/// positions `< bit_len()`, so implementations may panic on out-of-range access.
pub trait BitArray {
    /// Largest length this backend can be created with.
    const MAX_LEN: u64;

    /// Create a new array of `len` unset bits.
    fn with_len(len: usize) -> Self;

    /// Number of bits.
    fn bit_len(&self) -> usize;

    /// Set bit `i`.
    fn set_bit(&mut self, i: usize);

    /// Check whether bit `i` is set.
    fn test_bit(&self, i: usize) -> bool;

    /// Unset bit `i`.
    fn clear_bit(&mut self, i: usize);

    /// Unset all bits.
    fn clear_all(&mut self);

    /// Number of set bits.
    fn count_set_bits(&self) -> usize;
}

impl BitArray for FixedBitSet {
    const MAX_LEN: u64 = usize::MAX as u64;

    fn with_len(len: usize) -> Self {
        Self::with_capacity(len)
    }

    fn bit_len(&self) -> usize {
        self.len()
    }

    fn set_bit(&mut self, i: usize) {
        self.insert(i);
    }

    fn test_bit(&self, i: usize) -> bool {
        self.contains(i)
    }

    fn clear_bit(&mut self, i: usize) {
        self.set(i, false);
    }

    fn clear_all(&mut self) {
        self.clear();
    }

    fn count_set_bits(&self) -> usize {
        self.count_ones(..)
    }
}
