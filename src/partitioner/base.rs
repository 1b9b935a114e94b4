//! Shared bookkeeping every partitioner family delegates to: resetting
//! the hypergraph, handing out unassigned vertices, the single
//! balance-checked choke point for moving a vertex, best-cut rollback,
//! and FM delegation.

use crate::config::Config;
use crate::fm_refiner::FmRefiner;
use crate::hypergraph::{Hypergraph, P, V};
use crate::metrics;

pub struct PartitionerBase {
    cursor: usize,
    best_cut: Option<u64>,
    best_assignment: Option<Vec<Option<P>>>,
}

impl PartitionerBase {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            best_cut: None,
            best_assignment: None,
        }
    }

    /// Resets the hypergraph and this base's own run-scoped scratch
    /// (cursor, recorded best cut). Called at the start of every
    /// `k_way_partition`/`bisect` call.
    pub fn reset_partitioning(&mut self, hg: &mut Hypergraph, unassigned_block: Option<P>) {
        hg.reset_partitioning(unassigned_block);
        self.cursor = 0;
        self.best_cut = None;
        self.best_assignment = None;
    }

    /// Returns an arbitrary vertex currently at `unassigned_block`,
    /// advancing a rolling cursor so repeated calls surface distinct
    /// vertices in amortized O(1). `None` once no such vertex remains.
    pub fn get_unassigned_node(
        &mut self,
        hg: &Hypergraph,
        unassigned_block: Option<P>,
    ) -> Option<V> {
        let n = hg.num_nodes();
        for step in 0..n {
            let v = ((self.cursor + step) % n) as V;
            if hg.block(v) == unassigned_block {
                self.cursor = (self.cursor + step + 1) % n;
                return Some(v);
            }
        }
        None
    }

    /// Attempts to place `v` into block `p`. Succeeds iff
    /// `partWeight(p) + weight(v) <= upper_allowed_weight[p]`; on
    /// success performs `set_block` or `change_block` as appropriate
    /// (depending on whether `v` is currently unassigned in the
    /// hypergraph's own sentinel sense, i.e. `block(v).is_none()`, or
    /// sitting in some other real block — including `unassigned_block`
    /// when that names a real block).
    pub fn assign_hypernode_to_partition(
        &mut self,
        hg: &mut Hypergraph,
        config: &Config,
        v: V,
        p: P,
    ) -> bool {
        let projected = hg.part_weight(p) as f64 + hg.weight(v) as f64;
        if projected > config.upper_allowed_weight[p as usize] {
            return false;
        }
        match hg.block(v) {
            None => hg.set_block(v, p),
            Some(from) if from == p => {}
            Some(from) => hg.change_block(v, from, p),
        }
        true
    }

    /// Places `v` into the block of minimum current weight, ties
    /// broken by lowest block id. Always succeeds; used to mop up
    /// leftover unassigned vertices even when upper bounds are tight.
    pub fn assign_hypernode_to_partition_with_minimum_partition_weight(
        &mut self,
        hg: &mut Hypergraph,
        v: V,
    ) -> P {
        let p = (0..hg.k())
            .min_by_key(|&p| hg.part_weight(p))
            .expect("k must be >= 2");
        match hg.block(v) {
            None => hg.set_block(v, p),
            Some(from) if from == p => {}
            Some(from) => hg.change_block(v, from, p),
        }
        p
    }

    /// Records the current assignment if it is the best (lowest-cut)
    /// one seen so far this run. Called once per complete candidate
    /// partition a partitioner produces — not after every individual
    /// move, since a partial BFS/Greedy growth state is not itself a
    /// meaningful candidate to roll back to.
    pub fn record_if_best_cut(&mut self, hg: &Hypergraph) {
        let cut = metrics::cut(hg);
        let is_better = match self.best_cut {
            Some(best) => cut < best,
            None => true,
        };
        if is_better {
            self.best_cut = Some(cut);
            self.best_assignment = Some(hg.assignment());
        }
    }

    /// Reverts to the best-cut assignment recorded this run via
    /// `record_if_best_cut`. A no-op if `config.rollback` is false or
    /// nothing has been recorded.
    pub fn rollback_to_best_cut(&mut self, hg: &mut Hypergraph, config: &Config) {
        if !config.rollback {
            return;
        }
        if let Some(best) = self.best_assignment.take() {
            hg.restore_assignment(&best);
        }
    }

    /// Delegates to the external FM refiner iff `config.refinement` is
    /// set; otherwise a no-op.
    pub fn perform_fm_refinement(
        &mut self,
        hg: &mut Hypergraph,
        config: &Config,
        refiner: &dyn FmRefiner,
    ) {
        if config.refinement {
            refiner.refine(hg, config);
        }
    }
}

impl Default for PartitionerBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::Hypergraph;

    fn fixture() -> Hypergraph {
        Hypergraph::from_pins(
            7,
            &[vec![0, 2], vec![0, 1, 3, 4], vec![3, 4, 6], vec![2, 5, 6]],
            None,
            None,
            2,
        )
    }

    #[test]
    fn get_unassigned_node_advances_and_wraps() {
        let hg = fixture();
        let mut base = PartitionerBase::new();
        let mut seen = Vec::new();
        for _ in 0..hg.num_nodes() {
            seen.push(base.get_unassigned_node(&hg, None).unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn assign_rejects_moves_that_would_exceed_upper_bound() {
        let mut hg = fixture();
        let config = Config::new(&hg, 2, 0.0, 1);
        let mut base = PartitionerBase::new();
        for v in 0..4 {
            assert!(base.assign_hypernode_to_partition(&mut hg, &config, v, 0));
        }
        assert!(!base.assign_hypernode_to_partition(&mut hg, &config, 4, 0));
        assert_eq!(hg.block(4), None);
    }

    #[test]
    fn minimum_weight_assignment_prefers_lowest_id_on_ties() {
        let mut hg = fixture();
        let mut base = PartitionerBase::new();
        let p = base.assign_hypernode_to_partition_with_minimum_partition_weight(&mut hg, 0);
        assert_eq!(p, 0);
        assert_eq!(hg.block(0), Some(0));
    }

    #[test]
    fn rollback_restores_the_recorded_assignment() {
        let mut hg = fixture();
        let config = Config::new(&hg, 2, 1.0, 1);
        let mut base = PartitionerBase::new();
        for v in 0..3 {
            base.assign_hypernode_to_partition(&mut hg, &config, v, 0);
        }
        base.record_if_best_cut(&hg);
        let snapshot = hg.assignment();
        for v in 3..7 {
            base.assign_hypernode_to_partition(&mut hg, &config, v, 1);
        }
        assert_ne!(hg.assignment(), snapshot);
        base.rollback_to_best_cut(&mut hg, &config);
        assert_eq!(hg.assignment(), snapshot);
    }

    #[test]
    fn rollback_is_a_no_op_when_disabled() {
        let mut hg = fixture();
        let config = {
            let mut c = Config::new(&hg, 2, 1.0, 1);
            c.rollback = false;
            c
        };
        let mut base = PartitionerBase::new();
        base.assign_hypernode_to_partition(&mut hg, &config, 0, 0);
        base.record_if_best_cut(&hg);
        base.assign_hypernode_to_partition(&mut hg, &config, 1, 1);
        let before = hg.assignment();
        base.rollback_to_best_cut(&mut hg, &config);
        assert_eq!(hg.assignment(), before);
    }
}
