//! Key ordering strategies
//!
//! A queue is configured with a [`Comparator`] at construction. The default is
//! [`NaturalOrder`], which defers to `Ord`; [`ReverseOrder`] flips any
//! comparator to get max-queue behavior, and plain closures work too:
//!
//! ```rust
//! use pairing_queue::PairingHeap;
//!
//! // Order strings by length only
//! let mut heap = PairingHeap::with_comparator(|a: &String, b: &String| a.len().cmp(&b.len()));
//! heap.add("three".to_string(), 3);
//! heap.add("one".to_string(), 1);
//! assert_eq!(*heap.get_min().unwrap().value(), 1);
//! ```

use std::cmp::Ordering;

/// A total order over keys
pub trait Comparator<K: ?Sized> {
    /// Compares two keys
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their `Ord` implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Reverses another comparator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseOrder<C = NaturalOrder>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
