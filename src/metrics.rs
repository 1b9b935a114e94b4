//! Cut and balance metrics over a partitioned `Hypergraph`.

use crate::hypergraph::Hypergraph;

/// Sum of the weights of hyperedges with connectivity > 1 (the
/// objective the core minimizes).
pub fn cut(hg: &Hypergraph) -> u64 {
    hg.edges()
        .filter(|&e| hg.connectivity(e) > 1)
        .map(|e| hg.edge_weight(e))
        .sum()
}

/// `max_p partWeight(p) / (totalWeight / k) - 1`.
pub fn imbalance(hg: &Hypergraph) -> f64 {
    let k = hg.k();
    if k == 0 {
        return 0.0;
    }
    let avg = hg.total_weight() as f64 / k as f64;
    if avg == 0.0 {
        return 0.0;
    }
    let max_weight = (0..k).map(|p| hg.part_weight(p)).max().unwrap_or(0);
    max_weight as f64 / avg - 1.0
}
