//! Partitioning configuration, immutable for the duration of a call.

use serde::Serialize;

use crate::hypergraph::{Hypergraph, P, W};

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub k: u32,
    pub epsilon: f64,
    pub seed: u64,
    pub unassigned_block: Option<P>,
    pub rollback: bool,
    pub refinement: bool,
    pub nruns: u32,
    pub perfect_balance_weight: Vec<W>,
    pub upper_allowed_weight: Vec<f64>,
}

impl Config {
    /// Derives `perfect_balance_weight`/`upper_allowed_weight` from a
    /// hypergraph's total weight, per the spec:
    /// `perfect_balance_weight[p] = ceil(total_weight / k)`,
    /// `upper_allowed_weight[p] = perfect_balance_weight[p] * (1 + epsilon)`.
    pub fn new(hg: &Hypergraph, k: u32, epsilon: f64, seed: u64) -> Self {
        assert!(k >= 2, "k must be at least 2, got {k}");
        let perfect = (hg.total_weight() as f64 / k as f64).ceil() as W;
        Self {
            k,
            epsilon,
            seed,
            unassigned_block: None,
            rollback: true,
            refinement: false,
            nruns: 1,
            perfect_balance_weight: vec![perfect; k as usize],
            upper_allowed_weight: vec![perfect as f64 * (1.0 + epsilon); k as usize],
        }
    }

    /// Rebuilds the balance vectors for a different `k` (used by
    /// recursive bisection's `k := 2` bisection entry points and by
    /// sub-hypergraph instances with their own weight budgets).
    pub fn with_k_and_bounds(
        k: u32,
        epsilon: f64,
        seed: u64,
        perfect_balance_weight: Vec<W>,
        upper_allowed_weight: Vec<f64>,
    ) -> Self {
        assert_eq!(perfect_balance_weight.len(), k as usize);
        assert_eq!(upper_allowed_weight.len(), k as usize);
        Self {
            k,
            epsilon,
            seed,
            unassigned_block: None,
            rollback: true,
            refinement: false,
            nruns: 1,
            perfect_balance_weight,
            upper_allowed_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_balance_bounds_from_total_weight() {
        let hg = Hypergraph::from_pins(7, &[vec![0, 2], vec![0, 1, 3, 4]], None, None, 2);
        let cfg = Config::new(&hg, 2, 0.05, 1);
        assert_eq!(cfg.perfect_balance_weight, vec![4, 4]);
        assert!((cfg.upper_allowed_weight[0] - 4.2).abs() < 1e-9);
    }
}
