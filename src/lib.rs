//! Handle-addressed mutable priority queues for Rust
//!
//! This crate provides a pairing heap with stable handles: every entry added
//! to the queue gets a [`PairingHandle`] that can later be used to remove it
//! or change its key, in either direction, without searching.
//!
//! # Features
//!
//! - **Pairing Heap**: O(1) insert; O(log n) amortized remove of any handle;
//!   O(1) amortized decrease-key; increase-key by cut and re-meld
//! - **Ownership checks**: handles are tagged with the queue that created them,
//!   so a handle from another queue or an already-removed handle is rejected
//!   with a [`QueueError`] instead of corrupting the tree
//! - **Naive reference queue**: an O(n) unsorted-list implementation of the
//!   same [`PriorityQueue`] contract, for differential testing
//! - **`tracing` feature**: emits `tracing` events for queue mutations; its
//!   event test runs under `cargo test --features tracing`
//!
//! # Example
//!
//! ```rust
//! use pairing_queue::{PairingHeap, QueueError};
//!
//! let mut heap = PairingHeap::new();
//! let a = heap.add(5, "a");
//! let b = heap.add(3, "b");
//! let _c = heap.add(8, "c");
//! assert_eq!(*heap.get_min().unwrap().value(), "b");
//!
//! heap.update_key(&b, 9).unwrap();
//! assert_eq!(*heap.get_min().unwrap().value(), "a");
//!
//! heap.remove(&a).unwrap();
//! assert_eq!(heap.remove(&a), Err(QueueError::Inactive));
//! ```

pub mod naive;
pub mod order;
pub mod pairing;
pub mod traits;

// Re-export the main types for convenience
pub use order::{Comparator, NaturalOrder, ReverseOrder};
pub use pairing::{Handles, PairingHandle, PairingHeap};
pub use traits::{PriorityQueue, QueueError, QueueHandle, Result};
