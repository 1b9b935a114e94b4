//! Queue-selection policies for Greedy Hypergraph Growing: which of the
//! `k` per-block priority queues to pop from next.

use crate::hypergraph::P;
use crate::pq::KWayPriorityQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSelection {
    /// Cycles through enabled, non-empty blocks in order.
    RoundRobin,
    /// Always pops the globally largest key across every enabled,
    /// non-empty block.
    Global,
    /// Always prefers the lowest-numbered enabled, non-empty block.
    Sequential,
}

impl QueueSelection {
    /// Picks the next block to pop from among `enabled` blocks whose
    /// queue is non-empty. `cursor` is round-robin state the caller
    /// owns and threads back in; ignored by the other two policies.
    pub fn choose_queue(
        self,
        kpq: &KWayPriorityQueue,
        enabled: &[bool],
        cursor: &mut u32,
    ) -> Option<P> {
        match self {
            QueueSelection::RoundRobin => self.round_robin(kpq, enabled, cursor),
            QueueSelection::Global => self.global(kpq, enabled),
            QueueSelection::Sequential => self.sequential(kpq, enabled),
        }
    }

    fn round_robin(
        self,
        kpq: &KWayPriorityQueue,
        enabled: &[bool],
        cursor: &mut u32,
    ) -> Option<P> {
        let k = kpq.k();
        for step in 0..k {
            let block = (*cursor + step) % k;
            if enabled[block as usize] && !kpq.is_empty(block) {
                *cursor = (block + 1) % k;
                return Some(block);
            }
        }
        None
    }

    fn global(self, kpq: &KWayPriorityQueue, enabled: &[bool]) -> Option<P> {
        (0..kpq.k())
            .filter(|&p| enabled[p as usize] && !kpq.is_empty(p))
            .filter_map(|p| kpq.top(p).map(|(_, key)| (p, key)))
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(p, _)| p)
    }

    fn sequential(self, kpq: &KWayPriorityQueue, enabled: &[bool]) -> Option<P> {
        (0..kpq.k()).find(|&p| enabled[p as usize] && !kpq.is_empty(p))
    }
}
