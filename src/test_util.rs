use crate::bitarray::BitArray;
use crate::filters::Filter;

/// Fraction of `probes` never-inserted keys reported as present after inserting `n` keys.
///
/// Keys are decimal strings; inserted keys are `0..n`, probes start at `n + 1`.
pub(crate) fn false_positive_rate<F>(filter: &mut F, n: usize, probes: usize) -> f64
where
    F: Filter,
{
    for i in 0..n {
        filter.insert(i.to_string().as_bytes());
    }
    let hits = (0..probes)
        .filter(|i| filter.query((i + n + 1).to_string().as_bytes()))
        .count();
    hits as f64 / probes as f64
}

pub(crate) fn assert_send<T>(_: &T)
where
    T: Send,
{
}

pub(crate) fn assert_sync<T>(_: &T)
where
    T: Sync,
{
}

/// Backend with a tiny addressable size, to exercise backend limits.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SmallBitArray {
    bits: Vec<bool>,
}

impl BitArray for SmallBitArray {
    const MAX_LEN: u64 = 1 << 10;

    fn with_len(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    fn bit_len(&self) -> usize {
        self.bits.len()
    }

    fn set_bit(&mut self, i: usize) {
        self.bits[i] = true;
    }

    fn test_bit(&self, i: usize) -> bool {
        self.bits[i]
    }

    fn clear_bit(&mut self, i: usize) {
        self.bits[i] = false;
    }

    fn clear_all(&mut self) {
        self.bits.iter_mut().for_each(|bit| *bit = false);
    }

    fn count_set_bits(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }
}
