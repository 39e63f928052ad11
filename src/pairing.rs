//! Pairing Heap implementation
//!
//! A pairing heap is a heap-ordered multiway tree with:
//! - O(1) insert and merge
//! - O(log n) amortized remove (of the minimum or of any handle)
//! - O(1) amortized decrease-key, O(log n) amortized increase-key
//!
//! Every entry is addressed through a [`PairingHandle`] returned by
//! [`PairingHeap::add`]. Handles stay valid until removed, and remain
//! readable (but inactive) afterwards.
//!
//! # Representation
//!
//! Nodes are reference counted. A parent owns its leftmost child, and each
//! child owns its right sibling. The `left` back-pointer is weak and does
//! double duty: for the leftmost child it points at the parent, otherwise at
//! the left sibling. It is empty only for the root (or a detached node).
//! This is what makes detaching an arbitrary node O(1).
//!
//! # Example
//!
//! ```rust
//! use pairing_queue::PairingHeap;
//!
//! let mut heap = PairingHeap::new();
//! let a = heap.add(5, "a");
//! let b = heap.add(3, "b");
//! heap.update_key(&a, 1).unwrap();
//! assert_eq!(heap.get_min().unwrap().key(), 1);
//!
//! heap.remove(&b).unwrap();
//! assert!(!b.is_active());
//! assert_eq!(heap.len(), 1);
//! ```

use crate::order::{Comparator, NaturalOrder};
use crate::traits::{next_queue_id, PriorityQueue, QueueError, QueueHandle, Result};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

/// Type alias for strong node reference
type NodeRef<K, V> = Rc<Node<K, V>>;
/// Type alias for weak node reference (used for the `left` back-pointer)
type WeakNodeRef<K, V> = Weak<Node<K, V>>;

struct Node<K, V> {
    owner: u64,
    value: V,
    active: Cell<bool>,
    key: RefCell<K>,
    links: RefCell<Links<K, V>>,
}

struct Links<K, V> {
    /// Parent if this is the leftmost child, otherwise the left sibling
    left: WeakNodeRef<K, V>,
    right: Option<NodeRef<K, V>>,
    first_child: Option<NodeRef<K, V>>,
}

impl<K, V> Default for Links<K, V> {
    fn default() -> Self {
        Links {
            left: Weak::new(),
            right: None,
            first_child: None,
        }
    }
}

impl<K, V> Node<K, V> {
    fn new(owner: u64, key: K, value: V) -> Self {
        Node {
            owner,
            value,
            active: Cell::new(true),
            key: RefCell::new(key),
            links: RefCell::new(Links::default()),
        }
    }

    /// Clears the `left` pointer and hands back the right sibling
    fn take_sibling(&self) -> Option<NodeRef<K, V>> {
        let mut links = self.links.borrow_mut();
        links.left = Weak::new();
        links.right.take()
    }
}

/// Handle to an entry in a [`PairingHeap`]
///
/// Cloning a handle is cheap and yields a handle to the same entry.
/// The handle can read the entry's key and value at any time; only the
/// owning heap can change it.
pub struct PairingHandle<K, V> {
    node: NodeRef<K, V>,
}

impl<K, V> PairingHandle<K, V> {
    /// A copy of the entry's current key
    pub fn key(&self) -> K
    where
        K: Clone,
    {
        self.node.key.borrow().clone()
    }

    /// The entry's value
    pub fn value(&self) -> &V {
        &self.node.value
    }

    /// Whether the entry is still in the heap that created it
    pub fn is_active(&self) -> bool {
        self.node.active.get()
    }
}

impl<K, V> Clone for PairingHandle<K, V> {
    fn clone(&self) -> Self {
        PairingHandle {
            node: Rc::clone(&self.node),
        }
    }
}

impl<K, V> PartialEq for PairingHandle<K, V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl<K, V> Eq for PairingHandle<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PairingHandle<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingHandle")
            .field("key", &*self.node.key.borrow())
            .field("value", self.value())
            .field("active", &self.is_active())
            .finish()
    }
}

impl<K, V> QueueHandle<K, V> for PairingHandle<K, V> {
    fn key(&self) -> K
    where
        K: Clone,
    {
        PairingHandle::key(self)
    }

    fn value(&self) -> &V {
        PairingHandle::value(self)
    }

    fn is_active(&self) -> bool {
        PairingHandle::is_active(self)
    }
}

/// Pairing Heap
///
/// A min-queue under the configured [`Comparator`]. Not thread-safe: handles
/// are reference counted and neither the heap nor its handles are `Send`.
///
/// # Example
///
/// ```rust
/// use pairing_queue::{NaturalOrder, PairingHeap, ReverseOrder};
///
/// let mut heap = PairingHeap::with_comparator(ReverseOrder(NaturalOrder));
/// heap.add(1, "low");
/// heap.add(9, "high");
/// assert_eq!(*heap.get_min().unwrap().value(), "high");
/// ```
pub struct PairingHeap<K, V, C = NaturalOrder> {
    id: u64,
    comparator: C,
    root: Option<NodeRef<K, V>>,
    len: usize,
}

impl<K: Ord, V> PairingHeap<K, V> {
    /// Creates an empty heap ordered by `K: Ord`
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V> Default for PairingHeap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Drop for PairingHeap<K, V, C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<K, V, C> fmt::Debug for PairingHeap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingHeap")
            .field("id", &self.id)
            .field("len", &self.len)
            .finish()
    }
}

impl<K, V, C> PairingHeap<K, V, C> {
    /// Returns the number of entries in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The ordering this heap was built with
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns a handle with a minimal key
    ///
    /// # Errors
    /// [`QueueError::EmptyState`] if the heap is empty.
    pub fn get_min(&self) -> Result<PairingHandle<K, V>> {
        self.root
            .as_ref()
            .map(|root| PairingHandle {
                node: Rc::clone(root),
            })
            .ok_or(QueueError::EmptyState)
    }

    /// Lazily walks every active handle, in pre-order of the current tree
    ///
    /// The order is unspecified and in particular not sorted. The iterator
    /// borrows the heap, so the heap cannot change underneath it.
    pub fn handles(&self) -> Handles<'_, K, V> {
        Handles {
            stack: self.root.iter().cloned().collect(),
            _heap: PhantomData,
        }
    }

    /// Removes every entry; all outstanding handles become inactive
    pub fn clear(&mut self) {
        self.teardown();
        self.len = 0;
    }

    /// Unlinks the whole tree without recursing along sibling chains
    fn teardown(&mut self) {
        let mut stack: Vec<NodeRef<K, V>> = self.root.take().into_iter().collect();
        while let Some(node) = stack.pop() {
            node.active.set(false);
            let links = node.links.take();
            stack.extend(links.first_child);
            stack.extend(links.right);
        }
    }

    fn is_root(&self, node: &NodeRef<K, V>) -> bool {
        self.root.as_ref().is_some_and(|root| Rc::ptr_eq(root, node))
    }

    /// Checks that `handle` belongs to this heap and is still in it
    fn validate(&self, handle: &PairingHandle<K, V>) -> Result<()> {
        if handle.node.owner != self.id {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                queue = self.id,
                owner = handle.node.owner,
                "rejected handle from another queue"
            );
            return Err(QueueError::WrongOwner);
        }
        if !handle.is_active() {
            #[cfg(feature = "tracing")]
            tracing::debug!(queue = self.id, "rejected inactive handle");
            return Err(QueueError::Inactive);
        }
        Ok(())
    }

    /// Detaches `node` from its sibling list without touching its children
    ///
    /// No-op for a node whose `left` is empty (a root).
    fn splice_out(node: &NodeRef<K, V>) {
        let (left, right) = {
            let mut links = node.links.borrow_mut();
            let Some(left) = links.left.upgrade() else {
                return;
            };
            links.left = Weak::new();
            (left, links.right.take())
        };

        if let Some(r) = &right {
            r.links.borrow_mut().left = Rc::downgrade(&left);
        }

        let mut left_links = left.links.borrow_mut();
        let is_first_child = left_links
            .first_child
            .as_ref()
            .is_some_and(|c| Rc::ptr_eq(c, node));
        if is_first_child {
            // `left` is the parent
            left_links.first_child = right;
        } else {
            left_links.right = right;
        }
    }
}

impl<K, V, C: Comparator<K>> PairingHeap<K, V, C> {
    /// Creates an empty heap ordered by `comparator`
    pub fn with_comparator(comparator: C) -> Self {
        let id = next_queue_id();
        #[cfg(feature = "tracing")]
        tracing::trace!(queue = id, "created pairing heap");
        PairingHeap {
            id,
            comparator,
            root: None,
            len: 0,
        }
    }

    /// Like [`with_comparator`](Self::with_comparator), for callers whose
    /// comparator may be absent
    ///
    /// # Errors
    /// [`QueueError::InvalidArgument`] if `comparator` is `None`.
    pub fn try_with_comparator(comparator: Option<C>) -> Result<Self> {
        comparator
            .map(Self::with_comparator)
            .ok_or(QueueError::InvalidArgument("comparator"))
    }

    /// Adds a key/value pair, returning its handle
    ///
    /// # Time Complexity
    /// O(1) worst case
    pub fn add(&mut self, key: K, value: V) -> PairingHandle<K, V> {
        let node = Rc::new(Node::new(self.id, key, value));
        self.meld(Rc::clone(&node));
        self.len += 1;
        #[cfg(feature = "tracing")]
        tracing::trace!(queue = self.id, len = self.len, "add");
        PairingHandle { node }
    }

    /// Removes the entry behind `handle`
    ///
    /// Afterwards the handle is inactive and the heap keeps no reference to it.
    ///
    /// # Errors
    /// [`QueueError::WrongOwner`] or [`QueueError::Inactive`]; the heap is
    /// unchanged on error.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn remove(&mut self, handle: &PairingHandle<K, V>) -> Result<()> {
        self.validate(handle)?;
        self.detach(&handle.node);
        self.len -= 1;
        handle.node.active.set(false);
        *handle.node.links.borrow_mut() = Links::default();
        #[cfg(feature = "tracing")]
        tracing::trace!(queue = self.id, len = self.len, "remove");
        Ok(())
    }

    /// Removes and returns a handle with a minimal key
    ///
    /// The returned handle is inactive but still exposes its key and value.
    pub fn pop_min(&mut self) -> Option<PairingHandle<K, V>> {
        let min = self.get_min().ok()?;
        self.remove(&min).ok()?;
        Some(min)
    }

    /// Replaces the key of the entry behind `handle`
    ///
    /// A smaller or equal key cuts the node out and melds it against the
    /// root, keeping its subtree. A larger key has no cheap sift-down here,
    /// so the node is taken out and melded back in with the new key.
    ///
    /// # Errors
    /// [`QueueError::WrongOwner`] or [`QueueError::Inactive`]; the heap is
    /// unchanged on error.
    ///
    /// # Time Complexity
    /// O(1) amortized for a decrease, O(log n) amortized for an increase
    pub fn update_key(&mut self, handle: &PairingHandle<K, V>, key: K) -> Result<()> {
        self.validate(handle)?;
        let node = &handle.node;

        // The key is swapped in before the tree is touched. Detaching only
        // compares the node's children, never the node itself.
        let old = node.key.replace(key);
        let increased = self.comparator.compare(&node.key.borrow(), &old) == Ordering::Greater;
        if !increased {
            if !self.is_root(node) {
                Self::splice_out(node);
                self.meld(Rc::clone(node));
            }
        } else {
            self.detach(node);
            self.meld(Rc::clone(node));
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(queue = self.id, increased, "update_key");
        Ok(())
    }

    /// Takes `node` out of the tree, re-linking its children into the heap
    ///
    /// Leaves `node` with no links; activity is the caller's business.
    fn detach(&mut self, node: &NodeRef<K, V>) {
        if self.is_root(node) {
            self.root = self.delete_root(node);
        } else {
            Self::splice_out(node);
            let orphans = self.delete_root(node);
            let root = self.root.take();
            self.root = self.pair(root, orphans);
        }
    }

    /// Melds a detached node into the main tree
    fn meld(&mut self, node: NodeRef<K, V>) {
        let root = self.root.take();
        self.root = self.pair(root, Some(node));
    }

    /// Merges two rootless trees, returning the new root
    fn pair(
        &self,
        n1: Option<NodeRef<K, V>>,
        n2: Option<NodeRef<K, V>>,
    ) -> Option<NodeRef<K, V>> {
        match (n1, n2) {
            (None, n) | (n, None) => n,
            (Some(a), Some(b)) => Some(self.link(a, b)),
        }
    }

    /// Makes the node with the larger key the leftmost child of the other
    ///
    /// On equal keys `b` becomes the parent.
    fn link(&self, a: NodeRef<K, V>, b: NodeRef<K, V>) -> NodeRef<K, V> {
        let a_wins = self.comparator.compare(&a.key.borrow(), &b.key.borrow()) == Ordering::Less;
        let (parent, child) = if a_wins { (a, b) } else { (b, a) };

        let mut parent_links = parent.links.borrow_mut();
        let old_first = parent_links.first_child.take();
        if let Some(c) = &old_first {
            c.links.borrow_mut().left = Rc::downgrade(&child);
        }
        {
            let mut child_links = child.links.borrow_mut();
            debug_assert!(child_links.left.upgrade().is_none());
            child_links.left = Rc::downgrade(&parent);
            child_links.right = old_first;
        }
        parent_links.first_child = Some(child);
        drop(parent_links);
        parent
    }

    /// Discards `node` (which must have no `left`) and re-links its children
    ///
    /// Children are paired left to right, then the pairs are combined right
    /// to left; the result is the new root, or `None` for a leaf.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    fn delete_root(&self, node: &NodeRef<K, V>) -> Option<NodeRef<K, V>> {
        let mut next = node.links.borrow_mut().first_child.take();
        let mut pairs: SmallVec<[NodeRef<K, V>; 16]> = SmallVec::new();

        while let Some(first) = next {
            match first.take_sibling() {
                Some(second) => {
                    next = second.take_sibling();
                    pairs.push(self.link(first, second));
                }
                None => {
                    next = None;
                    pairs.push(first);
                }
            }
        }

        let mut result = pairs.pop()?;
        while let Some(pair) = pairs.pop() {
            result = self.link(pair, result);
        }
        Some(result)
    }
}

impl<K, V, C: Comparator<K>> PriorityQueue<K, V> for PairingHeap<K, V, C> {
    type Handle = PairingHandle<K, V>;
    type HandleIter<'a> = Handles<'a, K, V> where Self: 'a;

    fn len(&self) -> usize {
        self.len
    }

    fn get_min(&self) -> Result<Self::Handle> {
        PairingHeap::get_min(self)
    }

    fn add(&mut self, key: K, value: V) -> Self::Handle {
        PairingHeap::add(self, key, value)
    }

    fn remove(&mut self, handle: Option<&Self::Handle>) -> Result<()> {
        let handle = handle.ok_or(QueueError::InvalidArgument("handle"))?;
        PairingHeap::remove(self, handle)
    }

    fn update_key(&mut self, handle: Option<&Self::Handle>, key: K) -> Result<()> {
        let handle = handle.ok_or(QueueError::InvalidArgument("handle"))?;
        PairingHeap::update_key(self, handle, key)
    }

    fn handles(&self) -> Self::HandleIter<'_> {
        PairingHeap::handles(self)
    }
}

/// Pre-order iterator over the handles of a [`PairingHeap`]
///
/// Created by [`PairingHeap::handles`].
pub struct Handles<'a, K, V> {
    stack: SmallVec<[NodeRef<K, V>; 16]>,
    _heap: PhantomData<&'a NodeRef<K, V>>,
}

impl<'a, K, V> Iterator for Handles<'a, K, V> {
    type Item = PairingHandle<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        {
            let links = node.links.borrow();
            // Siblings go below the first child so a subtree finishes first
            if let Some(right) = &links.right {
                self.stack.push(Rc::clone(right));
            }
            if let Some(child) = &links.first_child {
                self.stack.push(Rc::clone(child));
            }
        }
        Some(PairingHandle { node })
    }
}
