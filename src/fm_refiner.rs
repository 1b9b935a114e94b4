//! Abstract boundary to the enclosing multilevel algorithm's FM local
//! search. The core only ever calls it through this trait; no FM
//! implementation ships here (see Non-goals).

use crate::config::Config;
use crate::hypergraph::Hypergraph;

/// Contract: given a feasible partition, returns (by mutating `hg` in
/// place) a partition whose cut is <= the input cut and which remains
/// feasible.
pub trait FmRefiner {
    fn refine(&self, hg: &mut Hypergraph, config: &Config);
}

/// The refiner used when no real FM pass is wired in. `refine` on it is
/// a no-op, matching `performFMRefinement`'s "otherwise a no-op"
/// contract when `config.refinement` is false.
pub struct NullRefiner;

impl FmRefiner for NullRefiner {
    fn refine(&self, _hg: &mut Hypergraph, _config: &Config) {}
}
