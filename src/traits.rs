//! Common traits for handle-addressed priority queues
//!
//! This module provides the contract shared by every queue in the crate:
//!
//! - [`PriorityQueue`]: add / remove / update-key / get-min over stable handles
//! - [`QueueHandle`]: the read-only facet of an entry (key, value, activity)
//!
//! Both [`PairingHeap`](crate::pairing::PairingHeap) and the reference
//! [`NaiveQueue`](crate::naive::NaiveQueue) implement it, which is what lets
//! the differential tests drive them with the same operation sequence.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Result type alias for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;

/// Error type for queue operations
///
/// Every variant is detected before the queue is touched, so a failed call
/// never leaves partial state behind.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// A required argument was absent
    #[error("invalid argument: {0} must be provided")]
    InvalidArgument(&'static str),

    /// The queue holds no elements
    #[error("priority queue is empty")]
    EmptyState,

    /// The handle was created by a different queue instance
    #[error("handle belongs to a different priority queue than the one that created it")]
    WrongOwner,

    /// The handle has already been removed
    #[error("handle is no longer active")]
    Inactive,
}

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out a process-wide unique queue id
pub(crate) fn next_queue_id() -> u64 {
    NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A handle to an entry in a priority queue
///
/// Handles stay readable after removal; [`is_active`](QueueHandle::is_active)
/// tells whether the entry is still in the queue that created it.
/// Equality is identity: two handles are equal iff they refer to the same entry.
pub trait QueueHandle<K, V>: Clone + PartialEq + Eq {
    /// A copy of the entry's current key
    ///
    /// The key is cloned out rather than borrowed, so an expression like
    /// `queue.update_key(Some(&h), h.key() + 1)` is always sound.
    fn key(&self) -> K
    where
        K: Clone;

    /// The entry's value, fixed at insertion
    fn value(&self) -> &V;

    /// Whether the entry is still in its queue
    fn is_active(&self) -> bool;
}

/// Collection-style interface for mutable, handle-addressed priority queues
///
/// Handle arguments are optional here so callers holding a possibly-absent
/// handle get [`QueueError::InvalidArgument`] instead of a panic.
///
/// # Example
///
/// ```rust
/// use pairing_queue::{PairingHeap, PriorityQueue, QueueHandle};
///
/// fn drain<Q: PriorityQueue<i32, &'static str>>(q: &mut Q) -> Vec<i32> {
///     let mut out = Vec::new();
///     while let Ok(min) = q.get_min() {
///         out.push(min.key());
///         q.remove(Some(&min)).unwrap();
///     }
///     out
/// }
///
/// let mut heap = PairingHeap::new();
/// heap.add(2, "b");
/// heap.add(1, "a");
/// assert_eq!(drain(&mut heap), vec![1, 2]);
/// ```
pub trait PriorityQueue<K, V> {
    /// The handle type returned by [`add`](PriorityQueue::add)
    type Handle: QueueHandle<K, V>;

    /// Lazy iterator over the active handles
    type HandleIter<'a>: Iterator<Item = Self::Handle>
    where
        Self: 'a;

    /// Returns the number of active entries
    fn len(&self) -> usize;

    /// Returns true if the queue holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a handle with a minimal key
    ///
    /// # Errors
    /// [`QueueError::EmptyState`] if the queue is empty.
    fn get_min(&self) -> Result<Self::Handle>;

    /// Adds a key/value pair, returning its handle
    fn add(&mut self, key: K, value: V) -> Self::Handle;

    /// Removes the entry behind `handle`
    ///
    /// # Errors
    /// [`QueueError::InvalidArgument`] for `None`, [`QueueError::WrongOwner`]
    /// for a foreign handle, [`QueueError::Inactive`] for a removed one.
    fn remove(&mut self, handle: Option<&Self::Handle>) -> Result<()>;

    /// Replaces the key of the entry behind `handle`
    ///
    /// # Errors
    /// Same as [`remove`](PriorityQueue::remove).
    fn update_key(&mut self, handle: Option<&Self::Handle>, key: K) -> Result<()>;

    /// Iterates the active handles in an unspecified order
    fn handles(&self) -> Self::HandleIter<'_>;
}
