//! Differential tests against the naive reference queue
//!
//! Random operation sequences are applied to a PairingHeap and a NaiveQueue
//! in lockstep. After every operation both must agree on `len()` and on the
//! (key, value) pair of the minimum.

use pairing_queue::naive::{NaiveHandle, NaiveQueue};
use pairing_queue::{PairingHandle, PairingHeap, PriorityQueue, QueueError, QueueHandle};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Priority plus a sequence number, so no two entries ever tie
type Key = (i32, u64);

#[derive(Debug, Clone)]
enum Op {
    Add(i32),
    Remove(usize),
    UpdateKey(usize, i32),
    /// Reuse a removed handle; both queues must reject it
    TouchRemoved(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-1000i32..1000).prop_map(Op::Add),
        2 => any::<usize>().prop_map(Op::Remove),
        3 => (any::<usize>(), -1000i32..1000).prop_map(|(i, k)| Op::UpdateKey(i, k)),
        1 => any::<usize>().prop_map(Op::TouchRemoved),
    ]
}

struct Lockstep {
    heap: PairingHeap<Key, u64>,
    reference: NaiveQueue<Key, u64>,
    live: Vec<(PairingHandle<Key, u64>, NaiveHandle<Key, u64>)>,
    removed: Vec<(PairingHandle<Key, u64>, NaiveHandle<Key, u64>)>,
    seq: u64,
}

impl Lockstep {
    fn new() -> Self {
        Lockstep {
            heap: PairingHeap::new(),
            reference: NaiveQueue::new(),
            live: Vec::new(),
            removed: Vec::new(),
            seq: 0,
        }
    }

    fn next_key(&mut self, priority: i32) -> Key {
        self.seq += 1;
        (priority, self.seq)
    }

    fn apply(&mut self, op: &Op) -> Result<(), TestCaseError> {
        match *op {
            Op::Add(priority) => {
                let key = self.next_key(priority);
                let id = self.seq;
                let h = self.heap.add(key, id);
                let r = self.reference.add(key, id);
                self.live.push((h, r));
            }
            Op::Remove(i) => {
                if self.live.is_empty() {
                    return Ok(());
                }
                let (h, r) = self.live.swap_remove(i % self.live.len());
                prop_assert_eq!(self.heap.remove(&h), Ok(()));
                prop_assert_eq!(self.reference.remove(Some(&r)), Ok(()));
                prop_assert!(!h.is_active());
                prop_assert!(!r.is_active());
                self.removed.push((h, r));
            }
            Op::UpdateKey(i, priority) => {
                if self.live.is_empty() {
                    return Ok(());
                }
                let key = self.next_key(priority);
                let (h, r) = &self.live[i % self.live.len()];
                prop_assert_eq!(self.heap.update_key(h, key), Ok(()));
                prop_assert_eq!(self.reference.update_key(Some(r), key), Ok(()));
                prop_assert!(h.is_active());
            }
            Op::TouchRemoved(i) => {
                if self.removed.is_empty() {
                    return Ok(());
                }
                let (h, r) = &self.removed[i % self.removed.len()];
                prop_assert_eq!(self.heap.remove(h), Err(QueueError::Inactive));
                prop_assert_eq!(self.reference.remove(Some(r)), Err(QueueError::Inactive));
                prop_assert_eq!(self.heap.update_key(h, (0, 0)), Err(QueueError::Inactive));
                prop_assert_eq!(
                    self.reference.update_key(Some(r), (0, 0)),
                    Err(QueueError::Inactive)
                );
            }
        }
        Ok(())
    }

    fn check(&self) -> Result<(), TestCaseError> {
        prop_assert_eq!(self.heap.len(), self.reference.len());
        prop_assert_eq!(self.heap.len(), self.live.len());

        match (self.heap.get_min(), self.reference.get_min()) {
            (Ok(h), Ok(r)) => {
                let heap_min = (h.key(), *h.value());
                let reference_min = (r.key(), *r.value());
                prop_assert_eq!(heap_min, reference_min);
            }
            (Err(a), Err(b)) => {
                prop_assert_eq!(a, QueueError::EmptyState);
                prop_assert_eq!(b, QueueError::EmptyState);
            }
            (heap_min, reference_min) => {
                return Err(TestCaseError::fail(format!(
                    "heap min {:?} disagrees with reference min {:?}",
                    heap_min.map(|h| h.is_active()),
                    reference_min.map(|r| r.is_active()),
                )));
            }
        }
        Ok(())
    }

    /// Slower full check: every active handle is listed once and none beats the min
    fn check_handles(&self) -> Result<(), TestCaseError> {
        let listed: Vec<_> = self.heap.handles().collect();
        prop_assert_eq!(listed.len(), self.live.len());
        for (h, _) in &self.live {
            prop_assert!(listed.contains(h));
        }
        if let Ok(min) = self.heap.get_min() {
            for h in &listed {
                prop_assert!(min.key() <= h.key());
            }
        }
        Ok(())
    }
}

proptest! {
    #[test]
    fn test_matches_reference(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut lockstep = Lockstep::new();
        for op in &ops {
            lockstep.apply(op)?;
            lockstep.check()?;
        }
        lockstep.check_handles()?;
    }

    #[test]
    fn test_matches_reference_with_full_scan(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut lockstep = Lockstep::new();
        for op in &ops {
            lockstep.apply(op)?;
            lockstep.check()?;
            lockstep.check_handles()?;
        }
    }

    #[test]
    fn test_duplicate_keys_agree_on_min_key(
        ops in prop::collection::vec((prop::bool::weighted(0.3), 0i32..5), 0..150)
    ) {
        let mut heap = PairingHeap::new();
        let mut reference = NaiveQueue::new();
        let mut live: Vec<(PairingHandle<i32, ()>, NaiveHandle<i32, ()>)> = Vec::new();

        for (should_remove, key) in ops {
            if should_remove && !live.is_empty() {
                let (h, r) = live.remove(key as usize % live.len());
                heap.remove(&h).unwrap();
                reference.remove(Some(&r)).unwrap();
            } else {
                live.push((heap.add(key, ()), reference.add(key, ())));
            }

            let heap_min = heap.get_min().map(|h| h.key());
            let reference_min = reference.get_min().map(|r| r.key());
            prop_assert_eq!(heap_min, reference_min);
        }
    }
}

#[test]
fn test_long_seeded_run() {
    let mut rng = StdRng::seed_from_u64(0x5eed_cafe);
    let mut lockstep = Lockstep::new();

    for step in 0..20_000 {
        let op = match rng.gen_range(0..10) {
            0..=3 => Op::Add(rng.gen_range(-10_000..10_000)),
            4..=5 => Op::Remove(rng.gen()),
            6..=8 => Op::UpdateKey(rng.gen(), rng.gen_range(-10_000..10_000)),
            _ => Op::TouchRemoved(rng.gen()),
        };
        lockstep.apply(&op).unwrap();
        lockstep.check().unwrap();
        if step % 1000 == 0 {
            lockstep.check_handles().unwrap();
        }
    }

    // Drain through the minimum and compare the full order
    while let Ok(min) = lockstep.heap.get_min() {
        let position = lockstep
            .live
            .iter()
            .position(|(h, _)| *h == min)
            .expect("minimum is a live handle");
        lockstep.apply(&Op::Remove(position)).unwrap();
        lockstep.check().unwrap();
    }
    assert!(lockstep.reference.is_empty());
}
