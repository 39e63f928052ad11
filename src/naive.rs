//! Naive reference priority queue
//!
//! A straightforward unsorted-list implementation of [`PriorityQueue`]:
//! every entry sits in a vector and the minimum is found by a linear scan.
//! Every operation except `add` is O(n), which makes it useless for real
//! workloads but trivially correct. The differential tests and benchmarks
//! run it side by side with [`PairingHeap`](crate::pairing::PairingHeap).
//!
//! # Time Complexity
//!
//! | Operation    | Complexity |
//! |--------------|------------|
//! | `add`        | O(1)       |
//! | `get_min`    | O(n)       |
//! | `remove`     | O(n)       |
//! | `update_key` | O(1)       |
//!
//! # Example
//!
//! ```rust
//! use pairing_queue::naive::NaiveQueue;
//! use pairing_queue::{PriorityQueue, QueueHandle};
//!
//! let mut queue = NaiveQueue::new();
//! let h = queue.add(3, "three");
//! queue.add(1, "one");
//! queue.update_key(Some(&h), 0).unwrap();
//! assert_eq!(*queue.get_min().unwrap().value(), "three");
//! ```

use crate::traits::{next_queue_id, PriorityQueue, QueueError, QueueHandle, Result};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::iter::Cloned;
use std::rc::Rc;
use std::slice;

struct Entry<K, V> {
    owner: u64,
    key: RefCell<K>,
    value: V,
    active: Cell<bool>,
}

/// Handle to an entry in a [`NaiveQueue`]
pub struct NaiveHandle<K, V> {
    entry: Rc<Entry<K, V>>,
}

impl<K, V> Clone for NaiveHandle<K, V> {
    fn clone(&self) -> Self {
        NaiveHandle {
            entry: Rc::clone(&self.entry),
        }
    }
}

impl<K, V> PartialEq for NaiveHandle<K, V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entry, &other.entry)
    }
}

impl<K, V> Eq for NaiveHandle<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NaiveHandle<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaiveHandle")
            .field("key", &*self.entry.key.borrow())
            .field("value", self.value())
            .field("active", &self.is_active())
            .finish()
    }
}

impl<K, V> QueueHandle<K, V> for NaiveHandle<K, V> {
    fn key(&self) -> K
    where
        K: Clone,
    {
        self.entry.key.borrow().clone()
    }

    fn value(&self) -> &V {
        &self.entry.value
    }

    fn is_active(&self) -> bool {
        self.entry.active.get()
    }
}

/// An unsorted-list priority queue ordered by `K: Ord`
///
/// Among equal keys, `get_min` reports the earliest added entry.
pub struct NaiveQueue<K: Ord, V> {
    id: u64,
    /// Active entries in insertion order
    handles: Vec<NaiveHandle<K, V>>,
}

impl<K: Ord, V> NaiveQueue<K, V> {
    /// Creates an empty queue
    pub fn new() -> Self {
        NaiveQueue {
            id: next_queue_id(),
            handles: Vec::new(),
        }
    }

    fn validate<'h>(
        &self,
        handle: Option<&'h NaiveHandle<K, V>>,
    ) -> Result<&'h NaiveHandle<K, V>> {
        let handle = handle.ok_or(QueueError::InvalidArgument("handle"))?;
        if handle.entry.owner != self.id {
            return Err(QueueError::WrongOwner);
        }
        if !handle.is_active() {
            return Err(QueueError::Inactive);
        }
        Ok(handle)
    }
}

impl<K: Ord, V> Default for NaiveQueue<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Drop for NaiveQueue<K, V> {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.entry.active.set(false);
        }
    }
}

impl<K: Ord, V> PriorityQueue<K, V> for NaiveQueue<K, V> {
    type Handle = NaiveHandle<K, V>;
    type HandleIter<'a> = Cloned<slice::Iter<'a, NaiveHandle<K, V>>> where Self: 'a;

    fn len(&self) -> usize {
        self.handles.len()
    }

    fn get_min(&self) -> Result<Self::Handle> {
        let mut handles = self.handles.iter();
        let mut min = handles.next().ok_or(QueueError::EmptyState)?;
        for handle in handles {
            if *handle.entry.key.borrow() < *min.entry.key.borrow() {
                min = handle;
            }
        }
        Ok(min.clone())
    }

    fn add(&mut self, key: K, value: V) -> Self::Handle {
        let handle = NaiveHandle {
            entry: Rc::new(Entry {
                owner: self.id,
                key: RefCell::new(key),
                value,
                active: Cell::new(true),
            }),
        };
        self.handles.push(handle.clone());
        handle
    }

    fn remove(&mut self, handle: Option<&Self::Handle>) -> Result<()> {
        let handle = self.validate(handle)?;
        let position = self
            .handles
            .iter()
            .position(|h| h == handle)
            .ok_or(QueueError::Inactive)?;
        let removed = self.handles.remove(position);
        removed.entry.active.set(false);
        Ok(())
    }

    fn update_key(&mut self, handle: Option<&Self::Handle>, key: K) -> Result<()> {
        let handle = self.validate(handle)?;
        handle.entry.key.replace(key);
        Ok(())
    }

    fn handles(&self) -> Self::HandleIter<'_> {
        self.handles.iter().cloned()
    }
}
