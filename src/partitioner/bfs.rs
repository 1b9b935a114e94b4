//! BFS seed-growing partitioner: grows `k` blocks concurrently from `k`
//! seed vertices using `k` FIFO queues, one step (one vertex) per
//! enabled block per round.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::fm_refiner::{FmRefiner, NullRefiner};
use crate::hypergraph::{Hypergraph, P, V};
use crate::partitioner::base::PartitionerBase;
use crate::partitioner::InitialPartitioner;
use crate::policies::StartNodeSelection;

pub struct BfsPartitioner {
    base: PartitionerBase,
    start_nodes: StartNodeSelection,
    refiner: Box<dyn FmRefiner>,
}

impl BfsPartitioner {
    pub fn new(start_nodes: StartNodeSelection) -> Self {
        Self {
            base: PartitionerBase::new(),
            start_nodes,
            refiner: Box::new(NullRefiner),
        }
    }

    pub fn with_refiner(start_nodes: StartNodeSelection, refiner: Box<dyn FmRefiner>) -> Self {
        Self {
            base: PartitionerBase::new(),
            start_nodes,
            refiner,
        }
    }

    /// Appends, in the hypergraph's own pin-iteration order, every pin
    /// of every incident edge of `v` that is still at
    /// `unassigned_block` and not yet queued for block `p`.
    fn push_incident_hyperedges_into_queue(
        hg: &Hypergraph,
        v: V,
        queue: &mut VecDeque<V>,
        in_queue: &mut [bool],
        unassigned_block: Option<P>,
    ) {
        for &e in hg.incident_edges(v) {
            for &w in hg.pins(e) {
                if hg.block(w) == unassigned_block && !in_queue[w as usize] {
                    in_queue[w as usize] = true;
                    queue.push_back(w);
                }
            }
        }
    }
}

impl InitialPartitioner for BfsPartitioner {
    fn k_way_partition(
        &mut self,
        hg: &mut Hypergraph,
        config: &Config,
        k: u32,
        rng: &mut ChaCha8Rng,
    ) {
        assert_eq!(k, config.k, "k_way_partition: k must match config.k");
        self.base.reset_partitioning(hg, config.unassigned_block);

        let seeds = self.start_nodes.calculate_start_nodes(hg, k, rng);
        let n = hg.num_nodes();
        let mut queues: Vec<VecDeque<V>> = (0..k).map(|_| VecDeque::new()).collect();
        let mut in_queue: Vec<Vec<bool>> = (0..k).map(|_| vec![false; n]).collect();
        let mut enabled = vec![true; k as usize];

        for (p, &seed) in seeds.iter().enumerate() {
            queues[p].push_back(seed);
            in_queue[p][seed as usize] = true;
        }
        if let Some(ub) = config.unassigned_block {
            enabled[ub as usize] = false;
        }

        let mut assigned_weight = 0u64;
        let total_weight = hg.total_weight();

        while enabled.iter().any(|&e| e) && assigned_weight < total_weight {
            for p in 0..k as usize {
                if !enabled[p] {
                    continue;
                }

                let mut chosen = None;
                while let Some(v) = queues[p].pop_front() {
                    if hg.block(v) == config.unassigned_block {
                        chosen = Some(v);
                        break;
                    }
                }
                let v = match chosen {
                    Some(v) => v,
                    None => match self.base.get_unassigned_node(hg, config.unassigned_block) {
                        Some(v) => {
                            in_queue[p][v as usize] = true;
                            v
                        }
                        None => {
                            enabled[p] = false;
                            continue;
                        }
                    },
                };

                Self::push_incident_hyperedges_into_queue(
                    hg,
                    v,
                    &mut queues[p],
                    &mut in_queue[p],
                    config.unassigned_block,
                );

                if self.base.assign_hypernode_to_partition(hg, config, v, p as P) {
                    assigned_weight += hg.weight(v);
                } else if queues[p].is_empty() {
                    enabled[p] = false;
                }
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fixture() -> Hypergraph {
        Hypergraph::from_pins(
            7,
            &[vec![0, 2], vec![0, 1, 3, 4], vec![3, 4, 6], vec![2, 5, 6]],
            None,
            None,
            2,
        )
    }

    /// S1: BFS bisection on the 7-vertex fixture, k=2, unassigned=1,
    /// epsilon=0.05, seeds = identity (seed i = vertex i).
    #[test]
    fn scenario_s1_bfs_bisection_matches_expected_partition() {
        let hg_for_config = fixture();
        let mut config = Config::new(&hg_for_config, 2, 0.05, 1);
        config.unassigned_block = Some(1);

        let mut hg = fixture();
        let mut partitioner = BfsPartitioner::new(StartNodeSelection::Identity);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        partitioner.k_way_partition(&mut hg, &config, 2, &mut rng);

        assert_eq!(hg.block(0), Some(0));
        assert_eq!(hg.block(1), Some(0));
        assert_eq!(hg.block(2), Some(0));
        assert_eq!(hg.block(3), Some(0));
        assert_eq!(hg.block(4), Some(1));
        assert_eq!(hg.block(5), Some(1));
        assert_eq!(hg.block(6), Some(1));
        for v in hg.nodes() {
            assert!(hg.block(v).is_some());
        }
    }

    /// S2: pushIncidentHyperedgesIntoQueue starting from v=0 with
    /// inQueue={0: true}, U=unassigned (None) on the S1 fixture.
    #[test]
    fn scenario_s2_push_incident_hyperedges_into_queue() {
        let hg = fixture();
        let mut queue = VecDeque::new();
        queue.push_back(0u32);
        let mut in_queue = vec![false; 7];
        in_queue[0] = true;

        BfsPartitioner::push_incident_hyperedges_into_queue(&hg, 0, &mut queue, &mut in_queue, None);

        assert_eq!(queue.into_iter().collect::<Vec<_>>(), vec![0, 2, 1, 3, 4]);
        for h in 0..5 {
            assert!(in_queue[h]);
        }
        for h in 5..7 {
            assert!(!in_queue[h]);
        }
    }

    #[test]
    fn bisect_leaves_every_vertex_assigned() {
        let mut hg = fixture();
        let config = Config::new(&hg, 2, 0.1, 7);
        let mut partitioner = BfsPartitioner::new(StartNodeSelection::BfsFarthest);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        partitioner.bisect(&mut hg, &config, &mut rng);
        for v in hg.nodes() {
            assert!(hg.block(v).is_some());
        }
    }
}
