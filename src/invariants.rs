//! Property-based invariant tests, run over randomly generated small
//! hypergraphs: every vertex ends up assigned to a block, and the
//! resulting imbalance stays within a loose multiple of `epsilon` (the
//! minimum-weight mop-up in [`partitioner::base::PartitionerBase`] can
//! legitimately push a run past the strict bound when the instance is
//! too tight to respect it exactly). Exercises all three partitioner
//! families plus [`recursive_bisection`] at several `k`.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::hypergraph::{Hypergraph, V};
use crate::metrics;
use crate::partitioner::bfs::BfsPartitioner;
use crate::partitioner::greedy::GreedyHypergraphGrowingPartitioner;
use crate::partitioner::label_propagation::LabelPropagationPartitioner;
use crate::partitioner::InitialPartitioner;
use crate::policies::{GainPolicy, QueueSelection, StartNodeSelection};
use crate::recursive_bisection::recursive_bisection;

/// Builds a hypergraph from pin lists already cleaned by
/// [`hypergraph_strategy`] (deduped, each with at least 2 pins, and at
/// least one edge present).
fn build_hypergraph(num_nodes: usize, edges: Vec<Vec<V>>, k: u32) -> Hypergraph {
    Hypergraph::from_pins(num_nodes, &edges, None, None, k)
}

/// Random small hypergraphs: raw pin lists are deduped and filtered
/// down to edges with at least 2 distinct pins, and the whole instance
/// is rejected by `prop_filter` unless at least one edge survives, so
/// the test bodies never have to handle a degenerate empty hypergraph.
fn hypergraph_strategy() -> impl Strategy<Value = (usize, Vec<Vec<V>>)> {
    (6usize..24)
        .prop_flat_map(|n| {
            let pin = prop::collection::vec(0..n as V, 2..=4);
            (Just(n), prop::collection::vec(pin, 3..16))
        })
        .prop_map(|(n, raw_edges)| {
            let edges: Vec<Vec<V>> = raw_edges
                .into_iter()
                .map(|mut pins| {
                    pins.sort_unstable();
                    pins.dedup();
                    pins
                })
                .filter(|pins| pins.len() >= 2)
                .collect();
            (n, edges)
        })
        .prop_filter("at least one usable edge", |(_, edges)| !edges.is_empty())
}

fn assert_every_vertex_assigned_and_loosely_balanced(hg: &Hypergraph, epsilon: f64) {
    for v in hg.nodes() {
        assert!(hg.block(v).is_some(), "vertex {v} left unassigned");
    }
    let imbalance = metrics::imbalance(hg);
    assert!(imbalance.is_finite() && imbalance >= 0.0);
    // The minimum-weight mop-up can legitimately push a tight instance
    // past the strict bound; a gross multiple of it would mean the
    // balance machinery isn't doing anything at all.
    assert!(
        imbalance <= epsilon.max(0.05) * 8.0 + 1.0,
        "imbalance {imbalance} wildly exceeds epsilon {epsilon}"
    );
    let _ = metrics::cut(hg);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn bfs_assigns_every_vertex_within_loose_balance((n, raw_edges) in hypergraph_strategy(), seed in any::<u64>()) {
        let mut hg = build_hypergraph(n, raw_edges, 2);
        let epsilon = 0.1;
        let config = Config::new(&hg, 2, epsilon, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut partitioner = BfsPartitioner::new(StartNodeSelection::BfsFarthest);
        partitioner.k_way_partition(&mut hg, &config, 2, &mut rng);
        assert_every_vertex_assigned_and_loosely_balanced(&hg, epsilon);
    }

    #[test]
    fn label_propagation_assigns_every_vertex_within_loose_balance((n, raw_edges) in hypergraph_strategy(), seed in any::<u64>()) {
        let mut hg = build_hypergraph(n, raw_edges, 2);
        let epsilon = 0.1;
        let config = Config::new(&hg, 2, epsilon, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut partitioner = LabelPropagationPartitioner::new(StartNodeSelection::Random);
        partitioner.k_way_partition(&mut hg, &config, 2, &mut rng);
        assert_every_vertex_assigned_and_loosely_balanced(&hg, epsilon);
    }

    #[test]
    fn greedy_assigns_every_vertex_within_loose_balance((n, raw_edges) in hypergraph_strategy(), seed in any::<u64>()) {
        let mut hg = build_hypergraph(n, raw_edges, 2);
        let epsilon = 0.1;
        let config = Config::new(&hg, 2, epsilon, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut partitioner = GreedyHypergraphGrowingPartitioner::new(
            StartNodeSelection::Random,
            GainPolicy::Fm,
            QueueSelection::Global,
        );
        partitioner.k_way_partition(&mut hg, &config, 2, &mut rng);
        assert_every_vertex_assigned_and_loosely_balanced(&hg, epsilon);
    }

    #[test]
    fn recursive_bisection_assigns_every_vertex_at_several_k(
        (n, raw_edges) in hypergraph_strategy(),
        k in 2u32..6,
        seed in any::<u64>(),
    ) {
        prop_assume!(n as u32 >= k);
        let mut hg = build_hypergraph(n, raw_edges, k);
        let epsilon = 0.15;
        let config = Config::new(&hg, k, epsilon, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut partitioner = BfsPartitioner::new(StartNodeSelection::BfsFarthest);
        recursive_bisection(&mut hg, &config, &mut partitioner, &mut rng);
        assert_every_vertex_assigned_and_loosely_balanced(&hg, epsilon);
        for v in hg.nodes() {
            assert!(hg.block(v).unwrap() < k);
        }
    }
}
