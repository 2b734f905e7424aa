//! BloomFilter implementation.
use std::fmt;

use fixedbitset::FixedBitSet;
use tracing::debug;

use crate::bitarray::BitArray;
use crate::error::FilterError;
use crate::filters::Filter;
use crate::params::FilterParameters;

/// A BloomFilter is a set-like data structure, that keeps track of elements it has seen without
/// the need to store them. Looking up values has a certain false positive rate, but a false
/// negative rate of 0%.
///
/// # Examples
/// ```
/// use layerbloom::filters::bloomfilter::BloomFilter;
///
/// // set up filter
/// let false_positive_rate = 0.02;  // = 2%
/// let expected_elements = 1000;
/// let mut filter = BloomFilter::with_properties(expected_elements, false_positive_rate).unwrap();
///
/// // add some data
/// filter.add(b"my super long string");
///
/// // later
/// assert!(filter.query(b"my super long string"));
/// assert!(!filter.query(b"another super long string"));
/// ```
///
/// # Applications
/// - when a lot of data should be added to the set and a moderate false positive rate is
///   acceptable, was used for spell checking
/// - as a pre-filter for more expensive lookups, e.g. in combination with a real set, map or
///   database, so the final false positive rate is 0%
///
/// # How It Works
/// The filter is represented by a bit vector of size `n`. Every element is mapped to `k`
/// positions `h_i(x), for i in 0..k` (see [`crate::hash_utils::IndexIter`]). Initially, all bits
/// are set to `False`.
///
/// During insertion of value `x`, the `k` bits addressed by `h_i(x)` are set to `True`.
///
/// During lookup, it is checked if all these bits are set. If so, the value might be in the
/// filter. If only a single bit is not set, it is clear that the value was never added to the
/// filter.
///
/// Elements cannot be removed, since a set bit may be shared by several elements. Use
/// [`crate::filters::countingbloomfilter::CountingBloomFilter`] for that. Adding far more
/// elements than the filter was sized for pushes the false positive rate towards 100%.
///
/// # References
/// - ["Space/Time Trade-offs in Hash Coding with Allowable Errors", Burton H. Bloom, 1970](http://dmod.eu/deca/ft_gateway.cfm.pdf)
/// - [Wikipedia: Bloom filter](https://en.wikipedia.org/wiki/Bloom_filter)
#[derive(Clone)]
pub struct BloomFilter<A = FixedBitSet>
where
    A: BitArray,
{
    params: FilterParameters,
    bits: A,
}

impl BloomFilter {
    /// Create new, empty BloomFilter with internal parameters.
    ///
    /// - `n` is the number of bits used to store state
    /// - `k` is the number of probes per element
    pub fn with_params(n: usize, k: usize) -> Result<Self, FilterError> {
        Self::from_parameters(FilterParameters::new(n, k)?)
    }

    /// Create new, empty BloomFilter with given properties.
    ///
    /// - `expected_items` number of unique elements the BloomFilter is expected to hold, must be
    ///   `> 0`
    /// - `false_positive_rate` false positive rate when querying the BloomFilter after adding
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

impl<A> BloomFilter<A>
where
    A: BitArray,
{
    /// Create new, empty BloomFilter on top of backend `A`.
    ///
    /// Fails if `A` cannot hold `params.n()` bits.
    pub fn from_parameters(params: FilterParameters) -> Result<Self, FilterError> {
        let params = params.fit_into(A::MAX_LEN)?;
        debug!(n = params.n(), k = params.k(), "new bloom filter");

        Ok(Self {
            params,
            bits: A::with_len(params.n()),
        })
    }

    /// Get `k` (number of probes per element).
    pub fn k(&self) -> usize {
        self.params.k()
    }

    /// Get `n` (number of stored bits).
    pub fn n(&self) -> usize {
        self.bits.bit_len()
    }

    /// Get parameters.
    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    /// Add new element to the BloomFilter.
    ///
    /// If the same element is added multiple times or if an element results in the same hash
    /// signature, this method does not have any effect.
    pub fn add(&mut self, data: &[u8]) {
        for pos in self.params.iter_for(data) {
            self.bits.set_bit(pos);
        }
    }

    /// Guess if the given element was added to the BloomFilter.
    pub fn query(&self, data: &[u8]) -> bool {
        self.params
            .iter_for(data)
            .all(|pos| self.bits.test_bit(pos))
    }

    /// Clear state of the BloomFilter, so that it behaves like a fresh one.
    pub fn clear(&mut self) {
        self.bits.clear_all();
    }

    /// Check whether the BloomFilter is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.count_set_bits() == 0
    }

    /// Guess the number of unique elements added to the BloomFilter.
    pub fn guess_n(&self) -> usize {
        let n = self.bits.bit_len() as f64;
        let k = self.params.k() as f64;
        let x = self.bits.count_set_bits() as f64;

        (-n / k * (1. - x / n).ln()) as usize
    }
}

impl<A> Filter for BloomFilter<A>
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

impl<A> fmt::Debug for BloomFilter<A>
where
    A: BitArray,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BloomFilter {{ n: {}, k: {} }}", self.n(), self.k())
    }
}

impl<A, T> Extend<T> for BloomFilter<A>
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
