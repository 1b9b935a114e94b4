//! Label Propagation partitioner: seeds `k` blocks with small BFS-grown
//! patches, then repeatedly relabels every vertex to the block giving
//! it maximum gain, subject to balance.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::bitset::FastResetBitSet;
use crate::config::Config;
use crate::fm_refiner::{FmRefiner, NullRefiner};
use crate::hypergraph::{Hypergraph, P, V};
use crate::partitioner::base::PartitionerBase;
use crate::partitioner::InitialPartitioner;
use crate::policies::gain::Gain;
use crate::policies::StartNodeSelection;

/// Vertices seeded per block before the relabeling passes begin.
const CONNECTED_NODES: usize = 5;
const MAX_ITERATIONS: usize = 100;
/// Unassigned vertices promoted by min-weight assignment once a pass
/// converges with some still left over.
const MOP_UP_BATCH: usize = 5;

pub struct LabelPropagationPartitioner {
    base: PartitionerBase,
    start_nodes: StartNodeSelection,
    refiner: Box<dyn FmRefiner>,

    tmp_scores: Vec<Gain>,
    valid_parts: FastResetBitSet,
    touched: Vec<P>,
    order: Vec<V>,
    growth_queue: VecDeque<V>,
}

impl LabelPropagationPartitioner {
    pub fn new(start_nodes: StartNodeSelection) -> Self {
        Self {
            base: PartitionerBase::new(),
            start_nodes,
            refiner: Box::new(NullRefiner),
            tmp_scores: Vec::new(),
            valid_parts: FastResetBitSet::new(0),
            touched: Vec::new(),
            order: Vec::new(),
            growth_queue: VecDeque::new(),
        }
    }

    pub fn with_refiner(start_nodes: StartNodeSelection, refiner: Box<dyn FmRefiner>) -> Self {
        Self {
            refiner,
            ..Self::new(start_nodes)
        }
    }

    fn ensure_capacity(&mut self, k: u32, n: usize) {
        if self.tmp_scores.len() != k as usize {
            self.tmp_scores = vec![0; k as usize];
            self.valid_parts = FastResetBitSet::new(k as usize);
        }
        if self.order.len() != n {
            self.order = (0..n as V).collect();
        }
    }

    /// Grows block `block` from `seed` by BFS, assigning up to
    /// `CONNECTED_NODES` still-unassigned vertices. Falls back to the
    /// base's rolling unassigned-node cursor whenever the local queue
    /// runs dry before the target count is reached.
    fn grow_seed_block(&mut self, hg: &mut Hypergraph, block: P, seed: V) {
        self.growth_queue.clear();
        self.growth_queue.push_back(seed);
        let mut assigned = 0usize;
        while assigned < CONNECTED_NODES {
            let v = match self.growth_queue.pop_front() {
                Some(v) => v,
                None => match self.base.get_unassigned_node(hg, None) {
                    Some(v) => v,
                    None => break,
                },
            };
            if hg.block(v).is_some() {
                continue;
            }
            hg.set_block(v, block);
            assigned += 1;
            for &e in hg.incident_edges(v) {
                for &w in hg.pins(e) {
                    if hg.block(w).is_none() {
                        self.growth_queue.push_back(w);
                    }
                }
            }
        }
    }

    /// The gain array `tmp_scores` and bit-set `valid_parts` are
    /// caller-owned scratch, cleared on entry and restored to all-zero
    /// on exit so the next call starts clean without a full O(k) wipe.
    fn compute_max_gain_move(
        &mut self,
        hg: &Hypergraph,
        config: &Config,
        v: V,
    ) -> Option<(P, Gain)> {
        self.valid_parts.reset();
        self.touched.clear();
        let s = hg.block(v);
        let mut internal_weight: i64 = 0;

        let mut mark_touched = |p: P, valid_parts: &mut FastResetBitSet, touched: &mut Vec<P>| {
            if !valid_parts.is_set(p as usize) {
                valid_parts.set(p as usize);
                touched.push(p);
            }
        };

        for &e in hg.incident_edges(v) {
            let conn = hg.connectivity(e);
            let pins_in_source: i64 = match s {
                Some(sb) => hg.pin_count_in_block(e, sb) as i64,
                None => 2,
            };
            let w = hg.edge_weight(e) as i64;

            if conn == 1 && pins_in_source > 1 {
                let only_block = hg
                    .connectivity_set(e)
                    .next()
                    .expect("connectivity == 1 implies exactly one touched block");
                mark_touched(only_block, &mut self.valid_parts, &mut self.touched);
                internal_weight += w;
                self.tmp_scores[only_block as usize] += w;
            } else {
                for t in hg.connectivity_set(e) {
                    mark_touched(t, &mut self.valid_parts, &mut self.touched);
                    if conn == 2 {
                        if let Some(sb) = s {
                            if t != sb && pins_in_source == 1 {
                                self.tmp_scores[t as usize] += w;
                            }
                        }
                    }
                }
            }
        }

        for &p in &self.touched {
            self.tmp_scores[p as usize] -= internal_weight;
        }

        let sentinel = if s.is_some() { 0i64 } else { i64::MIN };
        let mut best_score = sentinel;
        let mut best_block: Option<P> = None;
        for &p in &self.touched {
            let projected = hg.part_weight(p) as f64 + hg.weight(v) as f64;
            if projected > config.upper_allowed_weight[p as usize] {
                continue;
            }
            let score = self.tmp_scores[p as usize];
            let wins = match best_block {
                None => score > best_score,
                Some(bp) => score > best_score || (score == best_score && p < bp),
            };
            if wins {
                best_score = score;
                best_block = Some(p);
            }
        }

        for &p in &self.touched {
            self.tmp_scores[p as usize] = 0;
        }

        best_block.map(|p| (p, best_score))
    }
}

impl InitialPartitioner for LabelPropagationPartitioner {
    fn k_way_partition(
        &mut self,
        hg: &mut Hypergraph,
        config: &Config,
        k: u32,
        rng: &mut ChaCha8Rng,
    ) {
        assert_eq!(k, config.k, "k_way_partition: k must match config.k");
        let n = hg.num_nodes();
        self.ensure_capacity(k, n);

        // Label Propagation always starts every vertex unassigned,
        // regardless of what unassigned_block the caller configured.
        self.base.reset_partitioning(hg, None);

        let seeds = self.start_nodes.calculate_start_nodes(hg, k, rng);
        for (block, &seed) in seeds.iter().enumerate() {
            self.grow_seed_block(hg, block as P, seed);
        }

        for _ in 0..MAX_ITERATIONS {
            let mut converged = true;
            self.order.shuffle(rng);
            for i in 0..self.order.len() {
                let v = self.order[i];
                if let Some((best_block, _best_gain)) = self.compute_max_gain_move(hg, config, v) {
                    if hg.block(v) != Some(best_block)
                        && self.base.assign_hypernode_to_partition(hg, config, v, best_block)
                    {
                        converged = false;
                    }
                }
            }

            if converged {
                let any_unassigned = hg.nodes().any(|v| hg.block(v).is_none());
                if !any_unassigned {
                    break;
                }
                for _ in 0..MOP_UP_BATCH {
                    match self.base.get_unassigned_node(hg, None) {
                        Some(v) => {
                            self.base
                                .assign_hypernode_to_partition_with_minimum_partition_weight(hg, v);
                        }
                        None => break,
                    }
                }
            }
        }

        // Safety net if MAX_ITERATIONS elapsed without every vertex
        // converging to an assignment.
        while let Some(v) = self.base.get_unassigned_node(hg, None) {
            self.base
                .assign_hypernode_to_partition_with_minimum_partition_weight(hg, v);
        }

        self.base.record_if_best_cut(hg);
        self.base.rollback_to_best_cut(hg, config);
        self.base
            .perform_fm_refinement(hg, config, self.refiner.as_ref());
    }

    fn bisect(&mut self, hg: &mut Hypergraph, config: &Config, rng: &mut ChaCha8Rng) {
        assert_eq!(config.k, 2, "bisect requires a 2-way config");
        self.k_way_partition(hg, config, 2, rng);
    }
}
