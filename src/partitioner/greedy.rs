//! Greedy Hypergraph Growing partitioner: `k` gain-ordered priority
//! queues, one per block; repeatedly pops the best move from the queue
//! the queue-selection policy chooses and delta-updates neighbor gains.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::bitset::FastResetBitSet;
use crate::config::Config;
use crate::fm_refiner::{FmRefiner, NullRefiner};
use crate::hypergraph::{Hypergraph, P, V};
use crate::metrics;
use crate::partitioner::base::PartitionerBase;
use crate::partitioner::InitialPartitioner;
use crate::policies::{GainPolicy, QueueSelection, StartNodeSelection};
use crate::pq::KWayPriorityQueue;

pub struct GreedyHypergraphGrowingPartitioner {
    base: PartitionerBase,
    start_nodes: StartNodeSelection,
    gain_policy: GainPolicy,
    queue_selection: QueueSelection,
    refiner: Box<dyn FmRefiner>,
    visited: FastResetBitSet,
}

impl GreedyHypergraphGrowingPartitioner {
    pub fn new(
        start_nodes: StartNodeSelection,
        gain_policy: GainPolicy,
        queue_selection: QueueSelection,
    ) -> Self {
        Self {
            base: PartitionerBase::new(),
            start_nodes,
            gain_policy,
            queue_selection,
            refiner: Box::new(NullRefiner),
            visited: FastResetBitSet::new(0),
        }
    }

    pub fn with_refiner(
        start_nodes: StartNodeSelection,
        gain_policy: GainPolicy,
        queue_selection: QueueSelection,
        refiner: Box<dyn FmRefiner>,
    ) -> Self {
        Self {
            refiner,
            ..Self::new(start_nodes, gain_policy, queue_selection)
        }
    }

    /// Inserts every pin of every incident edge of `v` that is not yet
    /// present in any queue, with its gain toward each block it is
    /// still eligible to move into.
    fn insert_neighbors(
        &mut self,
        hg: &Hypergraph,
        config: &Config,
        kpq: &mut KWayPriorityQueue,
        v: V,
        in_any_queue: &mut [bool],
    ) {
        for &e in hg.incident_edges(v) {
            for &w in hg.pins(e) {
                if hg.block(w).is_some() || in_any_queue[w as usize] {
                    continue;
                }
                in_any_queue[w as usize] = true;
                for p in 0..hg.k() {
                    let projected = hg.part_weight(p) as f64 + hg.weight(w) as f64;
                    if projected > config.upper_allowed_weight[p as usize] {
                        continue;
                    }
                    let gain = self.gain_policy.calculate_gain(hg, w, p);
                    kpq.insert(p, w, gain);
                }
            }
        }
    }

    fn run_once(&mut self, hg: &mut Hypergraph, config: &Config, k: u32, rng: &mut ChaCha8Rng) {
        self.base.reset_partitioning(hg, config.unassigned_block);
        let n = hg.num_nodes();
        if self.visited.len() != n {
            self.visited = FastResetBitSet::new(n);
        }

        let seeds = self.start_nodes.calculate_start_nodes(hg, k, rng);
        let mut kpq = KWayPriorityQueue::new(k, n);
        let mut in_any_queue = vec![false; n];
        let mut enabled = vec![true; k as usize];

        for (p, &seed) in seeds.iter().enumerate() {
            if hg.block(seed).is_none() {
                in_any_queue[seed as usize] = true;
                kpq.insert(p as P, seed, self.gain_policy.calculate_gain(hg, seed, p as P));
            }
        }
        if let Some(ub) = config.unassigned_block {
            enabled[ub as usize] = false;
        }

        let mut cursor = 0u32;
        loop {
            let candidate_blocks: Vec<u32> = (0..k).filter(|&p| enabled[p as usize]).collect();
            if candidate_blocks.is_empty() {
                break;
            }
            let all_empty = candidate_blocks.iter().all(|&p| kpq.is_empty(p));
            if all_empty {
                break;
            }

            let Some(q) = self
                .queue_selection
                .choose_queue(&kpq, &enabled, &mut cursor)
            else {
                break;
            };

            let Some((v, _gain)) = kpq.pop(q) else {
                continue;
            };
            in_any_queue[v as usize] = false;
            let prev_block = hg.block(v);

            if self.base.assign_hypernode_to_partition(hg, config, v, q) {
                self.visited.reset();
                self.gain_policy.delta_gain_update(
                    hg,
                    &mut kpq,
                    v,
                    prev_block.unwrap_or(q),
                    q,
                    &mut self.visited,
                );
                self.insert_neighbors(hg, config, &mut kpq, v, &mut in_any_queue);
            } else {
                // Balance violated: the block is full, disable it.
                enabled[q as usize] = false;
            }
        }

        // Remaining unassigned vertices (balance saturated every block
        // before the queues drained) are placed by min-weight assignment.
        while let Some(v) = self.base.get_unassigned_node(hg, config.unassigned_block) {
            self.base
                .assign_hypernode_to_partition_with_minimum_partition_weight(hg, v);
        }

        self.base.perform_fm_refinement(hg, config, self.refiner.as_ref());
    }
}

impl InitialPartitioner for GreedyHypergraphGrowingPartitioner {
    fn k_way_partition(
        &mut self,
        hg: &mut Hypergraph,
        config: &Config,
        k: u32,
        rng: &mut ChaCha8Rng,
    ) {
        assert_eq!(k, config.k, "k_way_partition: k must match config.k");

        if config.nruns <= 1 {
            self.run_once(hg, config, k, rng);
            return;
        }

        let mut best_cut = None;
        let mut best_assignment = None;
        for run in 0..config.nruns {
            let mut run_rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(run as u64));
            self.run_once(hg, config, k, &mut run_rng);
            let cut = metrics::cut(hg);
            let feasible = (0..k).all(|p| {
                hg.part_weight(p) as f64 <= config.upper_allowed_weight[p as usize]
            });
            if feasible && best_cut.map_or(true, |b| cut < b) {
                best_cut = Some(cut);
                best_assignment = Some(hg.assignment());
            }
        }
        if let Some(assignment) = best_assignment {
            hg.restore_assignment(&assignment);
        }
    }

    fn bisect(&mut self, hg: &mut Hypergraph, config: &Config, rng: &mut ChaCha8Rng) {
        assert_eq!(config.k, 2, "bisect requires a 2-way config");
        self.k_way_partition(hg, config, 2, rng);
    }
}
