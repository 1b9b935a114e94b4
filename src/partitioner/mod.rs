//! The three initial-partitioner families and their shared bookkeeping
//! base, all behind one trait so `recursive_bisection` can drive any of
//! them through its bisection entry point.

pub mod base;
pub mod bfs;
pub mod greedy;
pub mod label_propagation;

pub use base::PartitionerBase;

use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::hypergraph::Hypergraph;

/// Two entry points: a full `k`-way partition, and a 2-way bisection
/// (the latter is what `recursive_bisection` composes into a `k`-way
/// result for arbitrary `k`). `config.k` must match `k` for
/// `k_way_partition`, and must be 2 for `bisect`.
pub trait InitialPartitioner {
    fn k_way_partition(
        &mut self,
        hg: &mut Hypergraph,
        config: &Config,
        k: u32,
        rng: &mut ChaCha8Rng,
    );

    fn bisect(&mut self, hg: &mut Hypergraph, config: &Config, rng: &mut ChaCha8Rng);
}
