//! CountingBloomFilter implementation.
use std::fmt;

use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

use crate::bitarray::BitArray;
use crate::error::FilterError;
use crate::filters::Filter;
use crate::params::FilterParameters;

/// A CountingBloomFilter is a BloomFilter that also supports removal of elements.
///
/// # Examples
/// ```
/// use layerbloom::filters::countingbloomfilter::CountingBloomFilter;
///
/// let mut filter = CountingBloomFilter::with_properties(3000, 0.01).unwrap();
///
/// filter.add(b"foo");
/// filter.add(b"foo");
/// filter.remove(b"foo");
/// assert!(filter.query(b"foo"));
///
/// filter.remove(b"foo");
/// assert!(!filter.query(b"foo"));
/// ```
///
/// # How It Works
/// Instead of one counter per position, the filter keeps a stack of equally sized bit arrays
/// ("layers"). The number of layers that have a position set is the count of that position.
///
/// On insertion, for each of the `k` positions, the bit is set in the lowest layer that does not
/// have it yet. If all layers have it, a new layer is stacked on top.
///
/// ```text
/// positions of x: 1, 4
///
///            add(x)              add(x)
/// layer 0: 0000000  ==>  0100100  ==>  0100100
/// layer 1:                             0100100
/// ```
///
/// On removal, for each position, the bit is unset in the highest layer that has it.
///
/// Lookup only checks the lowest layer: an element that is present set all of its bits there at
/// least once, and the bit only vanishes from the lowest layer once every element sharing it was
/// removed.
///
/// Positions shared by distinct elements are counted exactly as often as they were hit, so the
/// counts are a lower bound on per-element occurrences, not exact.
///
/// # Caller Obligations
/// Only remove elements that were added before, and not more often than they were added. The
/// filter cannot detect violations; they corrupt the counts of every element sharing one of the
/// affected positions and may cause false negatives.
///
/// Layers are never dropped (except by [`clear`](Self::clear)) and there is no upper bound on
/// their number. Hot positions may grow the stack arbitrarily.
#[derive(Clone)]
pub struct CountingBloomFilter<A = FixedBitSet>
where
    A: BitArray,
{
    params: FilterParameters,
    layers: Vec<A>,
}

impl CountingBloomFilter {
    /// Create new, empty CountingBloomFilter with internal parameters.
    ///
    /// - `n` is the number of bits per layer
    /// - `k` is the number of probes per element
    pub fn with_params(n: usize, k: usize) -> Result<Self, FilterError> {
        Self::from_parameters(FilterParameters::new(n, k)?)
    }

    /// Create new, empty CountingBloomFilter with given properties.
    ///
    /// - `expected_items` number of unique elements the filter is expected to hold, must be `> 0`
    /// - `false_positive_rate` false positive rate when querying the filter after adding
    ///   `expected_items` unique elements, must be `> 0` and `< 1`
    pub fn with_properties(
        expected_items: usize,
        false_positive_rate: f64,
    ) -> Result<Self, FilterError> {
        Self::from_parameters(FilterParameters::estimate(
            expected_items,
            false_positive_rate,
        )?)
    }
}

impl<A> CountingBloomFilter<A>
where
    A: BitArray,
{
    /// Create new, empty CountingBloomFilter on top of backend `A`.
    pub fn from_parameters(params: FilterParameters) -> Result<Self, FilterError> {
        let params = params.fit_into(A::MAX_LEN)?;
        debug!(n = params.n(), k = params.k(), "new counting bloom filter");

        Ok(Self {
            params,
            layers: vec![A::with_len(params.n())],
        })
    }

    /// Get `k` (number of probes per element).
    pub fn k(&self) -> usize {
        self.params.k()
    }

    /// Get `n` (number of bits per layer).
    pub fn n(&self) -> usize {
        self.params.n()
    }

    /// Get number of layers, always `>= 1`.
    pub fn layers(&self) -> usize {
        self.layers.len()
    }

    /// Add element, incrementing the count of each of its positions by one.
    pub fn add(&mut self, data: &[u8]) {
        for pos in self.params.iter_for(data) {
            if let Some(layer) = self.layers.iter_mut().find(|layer| !layer.test_bit(pos)) {
                layer.set_bit(pos);
                continue;
            }
            self.push_layer().set_bit(pos);
        }
    }

    /// Remove element, decrementing the count of each of its positions by one.
    ///
    /// The element must have been added before, see the type-level docs.
    pub fn remove(&mut self, data: &[u8]) {
        for pos in self.params.iter_for(data) {
            if let Some(layer) = self.layers.iter_mut().rev().find(|layer| layer.test_bit(pos)) {
                layer.clear_bit(pos);
            }
        }
    }

    /// Guess if the given element is part of the filter.
    pub fn query(&self, data: &[u8]) -> bool {
        let base = &self.layers[0];
        self.params.iter_for(data).all(|pos| base.test_bit(pos))
    }

    /// Clear state, so that the filter behaves like a fresh one with a single layer.
    pub fn clear(&mut self) {
        self.layers.truncate(1);
        self.layers[0].clear_all();
    }

    /// Check whether the filter is empty.
    pub fn is_empty(&self) -> bool {
        // upper layers only hold positions that are also set below
        self.layers[0].count_set_bits() == 0
    }

    fn push_layer(&mut self) -> &mut A {
        let idx = self.layers.len();
        trace!(layers = idx + 1, "counting bloom filter grows");
        self.layers.push(A::with_len(self.params.n()));
        &mut self.layers[idx]
    }
}

impl<A> Filter for CountingBloomFilter<A>
where
    A: BitArray,
{
    fn clear(&mut self) {
        Self::clear(self);
    }

    fn insert(&mut self, data: &[u8]) {
        self.add(data);
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn query(&self, data: &[u8]) -> bool {
        Self::query(self, data)
    }
}

impl<A> fmt::Debug for CountingBloomFilter<A>
where
    A: BitArray,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CountingBloomFilter {{ n: {}, k: {}, layers: {} }}",
            self.n(),
            self.k(),
            self.layers()
        )
    }
}

impl<A, T> Extend<T> for CountingBloomFilter<A>
where
    A: BitArray,
    T: AsRef<[u8]>,
{
    fn extend<S: IntoIterator<Item = T>>(&mut self, iter: S) {
        for elem in iter {
            self.add(elem.as_ref());
        }
    }
}
