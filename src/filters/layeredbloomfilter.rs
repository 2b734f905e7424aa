//! LayeredBloomFilter implementation.
use std::fmt;

use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

use crate::bitarray::BitArray;
use crate::error::FilterError;
use crate::filters::Filter;
use crate::params::FilterParameters;

/// A LayeredBloomFilter keeps track of how often each element was added, without storing
/// per-element counters.
///
/// This can be used to check if some data was seen a certain number of times, e.g. to only act
/// on requests that were repeated at least 3 times.
///
/// # Examples
/// ```
/// use layerbloom::filters::layeredbloomfilter::LayeredBloomFilter;
///
/// let mut filter = LayeredBloomFilter::with_properties(3000, 0.01).unwrap();
///
/// assert_eq!(filter.add(b"foo"), 1);
/// assert_eq!(filter.add(b"foo"), 2);
/// assert_eq!(filter.add(b"bar"), 1);
///
/// assert_eq!(filter.query(b"foo"), (2, true));
/// assert_eq!(filter.query(b"bar"), (1, true));
/// assert_eq!(filter.query(b"baz"), (0, false));
/// ```
///
/// # How It Works
/// The filter is a stack of equally sized bit arrays ("layers"), each one used like a plain
/// BloomFilter. Depths are 1-based, layer `i` holds elements seen at least `i` times.
///
/// On insertion, the layers are walked bottom up. The first layer that lacks at least one of the
/// element's `k` bits takes the element: from the first missing bit onwards, all bits are set
/// there and the layer's depth is returned. If all layers already contain the element, a new
/// layer is stacked on top and receives all bits.
///
/// On lookup, the layers are walked top down and the depth of the first one containing all `k`
/// bits is reported.
///
/// Every layer has the false positive rate of a BloomFilter, so depths can be overestimated when
/// the positions of an element are already covered by other elements. They are never
/// underestimated.
///
/// Layers are never dropped (except by [`clear`](Self::clear)) and there is no upper bound on
/// their number; an element added `d` times needs `d` layers.
#[derive(Clone)]
pub struct LayeredBloomFilter<A = FixedBitSet>
where
    A: BitArray,
{
    params: FilterParameters,
    layers: Vec<A>,
}

impl LayeredBloomFilter {
    /// Create new, empty LayeredBloomFilter with internal parameters.
    ///
    /// - `n` is the number of bits per layer
    /// - `k` is the number of probes per element
    pub fn with_params(n: usize, k: usize) -> Result<Self, FilterError> {
        Self::from_parameters(FilterParameters::new(n, k)?)
    }

    /// Create new, empty LayeredBloomFilter with given properties.
    ///
    /// - `expected_items` number of unique elements per layer, must be `> 0`
    /// - `false_positive_rate` false positive rate of a layer holding `expected_items` unique
    ///   elements, must be `> 0` and `< 1`
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

impl<A> LayeredBloomFilter<A>
where
    A: BitArray,
{
    /// Create new, empty LayeredBloomFilter on top of backend `A`.
    pub fn from_parameters(params: FilterParameters) -> Result<Self, FilterError> {
        let params = params.fit_into(A::MAX_LEN)?;
        debug!(n = params.n(), k = params.k(), "new layered bloom filter");

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

    /// Add element and return the depth it reached, starting at 1.
    pub fn add(&mut self, data: &[u8]) -> usize {
        let positions = self.params.iter_for(data);

        for (idx, layer) in self.layers.iter_mut().enumerate() {
            let mut advancing = false;
            for pos in positions.clone() {
                if advancing {
                    layer.set_bit(pos);
                } else if !layer.test_bit(pos) {
                    layer.set_bit(pos);
                    advancing = true;
                }
            }
            if advancing {
                return idx + 1;
            }
        }

        let depth = self.layers.len() + 1;
        trace!(layers = depth, "layered bloom filter grows");
        let mut layer = A::with_len(self.params.n());
        for pos in positions {
            layer.set_bit(pos);
        }
        self.layers.push(layer);
        depth
    }

    /// Guess how often the given element was added.
    ///
    /// Returns the depth of the deepest layer containing the element and whether it was found at
    /// all. Elements never added yield `(0, false)`.
    pub fn query(&self, data: &[u8]) -> (usize, bool) {
        let positions = self.params.iter_for(data);

        self.layers
            .iter()
            .enumerate()
            .rev()
            .find(|(_idx, layer)| positions.clone().all(|pos| layer.test_bit(pos)))
            .map_or((0, false), |(idx, _layer)| (idx + 1, true))
    }

    /// Clear state, so that the filter behaves like a fresh one with a single layer.
    pub fn clear(&mut self) {
        self.layers.truncate(1);
        self.layers[0].clear_all();
    }

    /// Check whether the filter is empty.
    pub fn is_empty(&self) -> bool {
        // an element only reaches a layer once it is complete in all layers below
        self.layers[0].count_set_bits() == 0
    }
}

impl<A> Filter for LayeredBloomFilter<A>
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
        Self::query(self, data).1
    }
}

impl<A> fmt::Debug for LayeredBloomFilter<A>
where
    A: BitArray,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LayeredBloomFilter {{ n: {}, k: {}, layers: {} }}",
            self.n(),
            self.k(),
            self.layers()
        )
    }
}
