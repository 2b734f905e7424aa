//! Implementation of `Filter` for certain non-probabilistic data structures. This can be helpful
//! for debugging and performance comparisons.
use std::collections::HashSet;
use std::hash::BuildHasher;

use crate::filters::Filter;

impl<S> Filter for HashSet<Vec<u8>, S>
where
    S: BuildHasher,
{
    fn clear(&mut self) {
        self.clear();
    }

    fn insert(&mut self, data: &[u8]) {
        self.insert(data.to_vec());
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn query(&self, data: &[u8]) -> bool {
        self.contains(data)
    }
}
