//! Turns any bisection-capable [`InitialPartitioner`] into a `k`-way
//! partitioner by recursively splitting a balanced binary tree of block
//! ranges. Each internal node covering the half-open block range
//! `[lo, hi)` bisects the sub-hypergraph induced by its vertices into a
//! left half `[lo, m)` and a right half `[m, hi)`, then recurses into
//! whichever child still spans more than one block.

use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::hypergraph::{Hypergraph, P, V, W};
use crate::partitioner::InitialPartitioner;

/// Drives `partitioner`'s bisection entry point to build a `config.k`-way
/// partition of `hg`. `hg` is reset to fully unassigned before the split
/// tree is built. The imbalance of the final result respects `config`'s
/// `epsilon` because every leaf's weight budget is carved, by halving,
/// out of the root budget that `epsilon` already determined.
pub fn recursive_bisection(
    hg: &mut Hypergraph,
    config: &Config,
    partitioner: &mut dyn InitialPartitioner,
    rng: &mut ChaCha8Rng,
) {
    assert!(config.k >= 2, "recursive bisection needs k >= 2");
    assert_eq!(
        config.upper_allowed_weight.len(),
        config.k as usize,
        "upper_allowed_weight must have one entry per block"
    );
    hg.reset_partitioning(None);

    let vertices: Vec<V> = hg.nodes().collect();
    split(
        hg,
        config,
        partitioner,
        rng,
        &vertices,
        0,
        config.k,
    );
}

/// `vertices` are original-hypergraph ids currently mapped to the block
/// range `[lo, hi)`. Assigns every one of them a concrete block in that
/// range, recursing through sub-hypergraphs until `hi - lo == 1`.
fn split(
    hg: &mut Hypergraph,
    config: &Config,
    partitioner: &mut dyn InitialPartitioner,
    rng: &mut ChaCha8Rng,
    vertices: &[V],
    lo: P,
    hi: P,
) {
    if hi - lo == 1 {
        for &v in vertices {
            match hg.block(v) {
                None => hg.set_block(v, lo),
                Some(b) if b != lo => hg.change_block(v, b, lo),
                Some(_) => {}
            }
        }
        return;
    }

    let mid = lo + (hi - lo) / 2;
    let half_upper = range_upper_bound(config, lo, hi) / 2.0;
    let sub_config = Config::with_k_and_bounds(
        2,
        config.epsilon,
        config.seed,
        vec![half_upper.floor() as W; 2],
        vec![half_upper; 2],
    );

    let (mut sub_hg, mapping) = hg.sub_hypergraph(vertices, 2);
    partitioner.bisect(&mut sub_hg, &sub_config, rng);

    let mut left = Vec::new();
    let mut right = Vec::new();
    for (sub_id, &orig) in mapping.iter().enumerate() {
        match sub_hg.block(sub_id as V) {
            Some(0) => left.push(orig),
            Some(1) => right.push(orig),
            other => unreachable!(
                "bisect must leave every vertex in block 0 or 1, got {other:?}"
            ),
        }
    }

    split(hg, config, partitioner, rng, &left, lo, mid);
    split(hg, config, partitioner, rng, &right, mid, hi);
}

/// Sum of the root config's `upper_allowed_weight` over the block range
/// `[lo, hi)` — the budget this node's sub-hypergraph bisection has to
/// split in half between its two children.
fn range_upper_bound(config: &Config, lo: P, hi: P) -> f64 {
    config.upper_allowed_weight[lo as usize..hi as usize]
        .iter()
        .sum()
}
