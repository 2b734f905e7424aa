//! Filters, Approximate Membership Queries (AMQs).
//!
//! All filters map byte strings to positions in one or more bit arrays of the same size. They
//! differ in what they do with those positions:
//!
//! - [`bloomfilter::BloomFilter`]: plain set membership
//! - [`countingbloomfilter::CountingBloomFilter`]: set membership with removal
//! - [`layeredbloomfilter::LayeredBloomFilter`]: how often an element was added
//!
//! # Concurrency
//! Filters contain no locks. Operations that mutate take `&mut self` and queries take `&self`,
//! so a filter shared between threads has to be wrapped by the caller, usually in a
//! [`std::sync::RwLock`]: readers hold the read guard while querying, the single writer holds
//! the write guard while adding or removing.

pub mod bloomfilter;

pub mod compat;

pub mod countingbloomfilter;

pub mod layeredbloomfilter;

/// A filter is a set-like data structure, that keeps track of elements it has seen without
/// the need to store them. Looking up values has a certain false positive rate, but a false
/// negative rate of 0%.
///
/// This kind of lookup is also referred to as Approximate Membership Queries (AMQs).
pub trait Filter {
    /// Clear state of the filter, so that it behaves like a fresh one.
    fn clear(&mut self);

    /// Insert new element into the filter.
    fn insert(&mut self, data: &[u8]);

    /// Check if filters is empty, i.e. contains no elements.
    fn is_empty(&self) -> bool;

    /// Guess if the given element was added to the filter.
    fn query(&self, data: &[u8]) -> bool;
}
