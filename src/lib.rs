//! Initial-partitioning core for a multilevel hypergraph partitioner.
//!
//! Given a weighted hypergraph and `k >= 2`, this crate's partitioner
//! families build a `k`-way partition minimizing the hyperedge-cut
//! objective under a balance constraint. It is meant to run as the
//! starting-partition stage of a larger multilevel partitioner: the
//! coarsening/uncoarsening phases and the FM local-search refiner that
//! would normally surround it are out of scope (see [`fm_refiner`] for
//! the abstract boundary this crate exposes toward the latter).

pub mod bitset;
pub mod config;
pub mod fm_refiner;
pub mod hgr_io;
pub mod hypergraph;
#[cfg(test)]
mod invariants;
pub mod metrics;
pub mod partitioner;
pub mod policies;
pub mod pq;
pub mod recursive_bisection;

pub use config::Config;
pub use hypergraph::Hypergraph;
pub use partitioner::InitialPartitioner;
