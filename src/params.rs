//! Filter sizing.
use std::f64::consts::LN_2;

use tracing::debug;

use crate::error::FilterError;
use crate::hash_utils::IndexIter;

/// Largest supported bit array size. Positions are 32-bit, so larger arrays could not be addressed.
pub const MAX_BITS: u64 = u32::MAX as u64;

/// Sizing of a filter: `n` bits probed at `k` positions per element.
///
/// Shared by all filter kinds. The hash is fixed to 64-bit FNV-1a, so two filters with equal
/// parameters map the same data to the same positions.
///
/// # Examples
/// ```
/// use layerbloom::FilterParameters;
///
/// let params = FilterParameters::estimate(1000, 0.1).unwrap();
/// assert_eq!(params.n(), 4793);
/// assert_eq!(params.k(), 4);
///
/// let positions = params.indices(b"foo");
/// assert_eq!(positions.len(), 4);
/// assert!(positions.iter().all(|&pos| pos < 4793));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterParameters {
    n: u32,
    k: u32,
}

impl FilterParameters {
    /// Create parameters directly.
    ///
    /// - `n` is the number of bits, must be `> 0` and `<= MAX_BITS`
    /// - `k` is the number of probes per element, must be `> 0`
    pub fn new(n: usize, k: usize) -> Result<Self, FilterError> {
        if n == 0 {
            return Err(FilterError::InvalidParameter {
                name: "n",
                reason: "must be greater than 0",
            });
        }
        if k == 0 {
            return Err(FilterError::InvalidParameter {
                name: "k",
                reason: "must be greater than 0",
            });
        }
        let n = u32::try_from(n).map_err(|_| FilterError::CapacityOverflow {
            required: n as u64,
            max: MAX_BITS,
        })?;
        let k = u32::try_from(k).map_err(|_| FilterError::InvalidParameter {
            name: "k",
            reason: "must fit into 32 bits",
        })?;

        Ok(Self { n, k })
    }

    /// Derive optimal parameters for the given properties.
    ///
    /// - `expected_items` number of unique elements the filter is expected to hold, must be `> 0`
    /// - `false_positive_rate` false positive rate after adding `expected_items` unique
    ///   elements, must be `> 0` and `< 1`
    ///
    /// Uses `n = ceil(-items * ln(p) / ln(2)^2)` and `k = ceil(ln(2) * n / items)`. Fails with
    /// [`FilterError::CapacityOverflow`] if `n` exceeds [`MAX_BITS`].
    pub fn estimate(expected_items: usize, false_positive_rate: f64) -> Result<Self, FilterError> {
        if expected_items == 0 {
            return Err(FilterError::InvalidParameter {
                name: "expected_items",
                reason: "must be greater than 0",
            });
        }
        // also rejects NaN
        if !((false_positive_rate > 0.) && (false_positive_rate < 1.)) {
            return Err(FilterError::InvalidParameter {
                name: "false_positive_rate",
                reason: "must be greater than 0 and smaller than 1",
            });
        }

        let items = expected_items as f64;
        let n = (-items * false_positive_rate.ln() / (LN_2 * LN_2)).ceil();
        if n > MAX_BITS as f64 {
            debug!(
                expected_items,
                false_positive_rate,
                required = n,
                "filter exceeds addressable size"
            );
            return Err(FilterError::CapacityOverflow {
                required: n as u64,
                max: MAX_BITS,
            });
        }
        let k = (LN_2 * n / items).ceil();

        Ok(Self {
            n: n as u32,
            k: (k as u32).max(1),
        })
    }

    /// Check that a backend supporting at most `max_len` bits can hold these parameters.
    pub fn fit_into(self, max_len: u64) -> Result<Self, FilterError> {
        if u64::from(self.n) > max_len {
            return Err(FilterError::CapacityOverflow {
                required: u64::from(self.n),
                max: max_len,
            });
        }
        Ok(self)
    }

    /// Get `n` (number of bits).
    pub fn n(&self) -> usize {
        self.n as usize
    }

    /// Get `k` (number of probes per element).
    pub fn k(&self) -> usize {
        self.k as usize
    }

    /// Theoretical false positive rate after adding `items` unique elements.
    pub fn false_positive_rate(&self, items: usize) -> f64 {
        let k = f64::from(self.k);
        let exponent = -k * (items as f64) / f64::from(self.n);
        (1. - exponent.exp()).powf(k)
    }

    /// Iterate over the `k` positions of `data`.
    pub fn iter_for(&self, data: &[u8]) -> IndexIter {
        IndexIter::new(self.n, self.k, data)
    }

    /// Positions of `data`, in probe order.
    pub fn indices(&self, data: &[u8]) -> Vec<usize> {
        self.iter_for(data).collect()
    }
}

/// User-facing sizing configuration.
///
/// ```
/// use layerbloom::FilterConfig;
///
/// let config = FilterConfig {
///     expected_items: 3000,
///     false_positive_rate: 0.01,
/// };
/// let params = config.parameters().unwrap();
/// assert_eq!(params.k(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterConfig {
    /// Number of unique elements the filter is expected to hold.
    pub expected_items: usize,

    /// Acceptable false positive rate once `expected_items` elements were added.
    pub false_positive_rate: f64,
}

impl FilterConfig {
    /// Derive filter parameters, see [`FilterParameters::estimate`].
    pub fn parameters(&self) -> Result<FilterParameters, FilterError> {
        FilterParameters::estimate(self.expected_items, self.false_positive_rate)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            expected_items: 1000,
            false_positive_rate: 0.01,
        }
    }
}
