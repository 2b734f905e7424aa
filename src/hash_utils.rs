//! Hash-related utils.
use std::hash::Hasher;
use std::iter::FusedIterator;
use std::ops::Range;

use fnv::FnvHasher;

/// 64-bit FNV-1a digest of `data`.
///
/// Only the raw bytes are fed to the hasher (no length prefix), so the result matches any other
/// FNV-1a 64 implementation.
pub fn digest(data: &[u8]) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(data);
    hasher.finish()
}

/// `Iterator` that creates the `k` positions `h_i(x), for i in 0..k` for a given value.
///
/// Only a single hash is computed. Its big-endian upper half `a` and lower half `b` are combined
/// as `h_i(x) = (a + b * i) mod n`, with `a + b * i` wrapping at 32 bits (Kirsch-Mitzenmacher
/// double hashing).
///
/// ```
/// use layerbloom::hash_utils::IndexIter;
///
/// let positions: Vec<usize> = IndexIter::new(100, 4, b"foo").collect();
/// assert_eq!(positions, vec![4, 31, 58, 85]);
/// ```
#[derive(Clone, Debug)]
pub struct IndexIter {
    a: u32,
    b: u32,
    n: u32,
    i: Range<u32>,
}

impl IndexIter {
    /// Create new `IndexIter`.
    ///
    /// - `n`: number of bits, all results are `< n`, must be `> 0`
    /// - `k`: number of positions to generate
    /// - `data`: the value to hash, i.e. `x` in `h_i(x)`
    pub fn new(n: u32, k: u32, data: &[u8]) -> Self {
        let h = digest(data);
        Self {
            a: (h >> 32) as u32,
            b: h as u32,
            n,
            i: 0..k,
        }
    }
}

impl Iterator for IndexIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.i
            .next()
            .map(|i| (self.a.wrapping_add(self.b.wrapping_mul(i)) % self.n) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.i.size_hint()
    }
}

impl ExactSizeIterator for IndexIter {}

impl FusedIterator for IndexIter {}

#[cfg(test)]
mod tests {
    use super::{IndexIter, digest};
    use crate::params::FilterParameters;

    #[test]
    fn digest_fnv1a() {
        assert_eq!(digest(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(digest(b"foo"), 0xdcb2_7518_fed9_d577);
    }

    #[test]
    fn index_iter() {
        let iter1 = IndexIter::new(42, 2, b"foo");
        assert_eq!(iter1.len(), 2);
        let v1: Vec<usize> = iter1.collect();
        assert_eq!(v1.len(), 2);
        assert!(v1[0] < 42);
        assert!(v1[1] < 42);

        let v2: Vec<usize> = IndexIter::new(42, 2, b"foo").collect();
        assert_eq!(v1, v2);
    }

    #[test]
    fn index_iter_empty() {
        let mut iter = IndexIter::new(42, 0, b"foo");
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn known_positions() {
        let params = FilterParameters::estimate(3000, 0.01).unwrap();
        assert_eq!(
            params.indices(b"foo"),
            vec![2832, 19635, 7682, 24485, 12532, 579, 17382]
        );

        let params = FilterParameters::new(100, 2).unwrap();
        assert_eq!(params.indices(b"bar"), vec![89, 91]);
        assert_eq!(params.indices(b"baz"), vec![41, 63]);
    }

    #[test]
    fn deterministic() {
        let params = FilterParameters::estimate(10_000, 0.0001).unwrap();
        for i in 0..100 {
            let data = i.to_string();
            assert_eq!(params.indices(data.as_bytes()), params.indices(data.as_bytes()));
        }

        // state does not leak between calls
        let before = params.indices(b"foo");
        params.indices(b"bar");
        assert_eq!(params.indices(b"foo"), before);
    }

    #[test]
    fn clone_keeps_position() {
        let params = FilterParameters::new(100, 4).unwrap();
        let mut iter = params.iter_for(b"foo");
        iter.next();
        let rest: Vec<usize> = iter.clone().collect();
        assert_eq!(rest, vec![31, 58, 85]);
        assert_eq!(iter.len(), 3);
    }
}
