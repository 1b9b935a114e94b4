//! Gain computation policies: the three concrete formulas for "how much
//! does the cut shrink if vertex `v` moves to block `t`", plus a shared
//! `delta_gain_update` that keeps a `KWayPriorityQueue`'s keys current
//! after a confirmed move.

use crate::bitset::FastResetBitSet;
use crate::hypergraph::{Hypergraph, E, P, V};
use crate::pq::KWayPriorityQueue;

pub type Gain = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainPolicy {
    /// Classical FM gain: cut reduction from moving `v` out of its
    /// source block and into `t`.
    Fm,
    /// Total pins of `v`'s incident edges already sitting in `t`.
    MaxPin,
    /// Number of `v`'s incident edges that already touch `t`.
    MaxNet,
}

impl GainPolicy {
    pub fn calculate_gain(self, hg: &Hypergraph, v: V, t: P) -> Gain {
        match self {
            GainPolicy::Fm => fm_gain(hg, v, t),
            GainPolicy::MaxPin => max_pin_gain(hg, v, t),
            GainPolicy::MaxNet => max_net_gain(hg, v, t),
        }
    }

    /// After `v` has been moved from `from` to `to`, recomputes the
    /// queue key of every vertex `w` incident to an edge containing `v`
    /// (excluding `v` itself, which the caller has already removed from
    /// the queue), for every block `w` currently has an entry in.
    /// `visited` must be freshly reset by the caller before this call
    /// and is used to touch each `w` at most once.
    pub fn delta_gain_update(
        self,
        hg: &Hypergraph,
        kpq: &mut KWayPriorityQueue,
        v: V,
        _from: P,
        _to: P,
        visited: &mut FastResetBitSet,
    ) {
        for &e in hg.incident_edges(v) {
            for &w in hg.pins(e) {
                if w == v || visited.is_set(w as usize) {
                    continue;
                }
                visited.set(w as usize);
                for block in 0..kpq.k() {
                    if kpq.contains(block, w) {
                        let gain = self.calculate_gain(hg, w, block);
                        kpq.update_key(block, w, gain);
                    }
                }
            }
        }
    }
}

fn fm_gain(hg: &Hypergraph, v: V, t: P) -> Gain {
    let source = hg.block(v);
    let mut first_term: i64 = 0;
    let mut second_term: i64 = 0;
    for &e in hg.incident_edges(v) {
        if let Some(s) = source {
            if hg.pin_count_in_block(e, s) == 1 {
                first_term += hg.edge_weight(e) as i64;
            }
        }
        if hg.pin_count_in_block(e, t) == 0 {
            second_term += hg.edge_weight(e) as i64;
        }
    }
    first_term - second_term
}

fn max_pin_gain(hg: &Hypergraph, v: V, t: P) -> Gain {
    hg.incident_edges(v)
        .iter()
        .map(|&e| hg.pin_count_in_block(e, t) as i64)
        .sum()
}

fn max_net_gain(hg: &Hypergraph, v: V, t: P) -> Gain {
    hg.incident_edges(v)
        .iter()
        .filter(|&&e: &&E| hg.pin_count_in_block(e, t) > 0)
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Hypergraph {
        Hypergraph::from_pins(
            7,
            &[vec![0, 2], vec![0, 1, 3, 4], vec![3, 4, 6], vec![2, 5, 6]],
            None,
            None,
            2,
        )
    }

    fn assign_s3(hg: &mut Hypergraph) {
        for v in 0..3 {
            hg.set_block(v, 0);
        }
        for v in 3..7 {
            hg.set_block(v, 1);
        }
    }

    #[test]
    fn fm_gains_match_scenario_s3() {
        let mut hg = fixture();
        assign_s3(&mut hg);
        assert_eq!(GainPolicy::Fm.calculate_gain(&hg, 0, 1), -1);
        assert_eq!(GainPolicy::Fm.calculate_gain(&hg, 1, 1), 0);
        assert_eq!(GainPolicy::Fm.calculate_gain(&hg, 2, 1), 0);
        assert_eq!(GainPolicy::Fm.calculate_gain(&hg, 3, 0), -1);
        assert_eq!(GainPolicy::Fm.calculate_gain(&hg, 4, 0), -1);
        assert_eq!(GainPolicy::Fm.calculate_gain(&hg, 5, 0), 0);
        assert_eq!(GainPolicy::Fm.calculate_gain(&hg, 6, 0), -1);
    }

    #[test]
    fn fm_gain_to_own_block_is_zero() {
        let mut hg = fixture();
        assign_s3(&mut hg);
        assert_eq!(GainPolicy::Fm.calculate_gain(&hg, 0, 0), 0);
    }

    #[test]
    fn max_pin_gains_match_scenario_s5() {
        let mut hg = fixture();
        assign_s3(&mut hg);
        assert_eq!(GainPolicy::MaxPin.calculate_gain(&hg, 0, 1), 2);
        assert_eq!(GainPolicy::MaxPin.calculate_gain(&hg, 1, 1), 2);
        assert_eq!(GainPolicy::MaxPin.calculate_gain(&hg, 2, 1), 2);
        assert_eq!(GainPolicy::MaxPin.calculate_gain(&hg, 3, 0), 2);
        assert_eq!(GainPolicy::MaxPin.calculate_gain(&hg, 4, 0), 2);
        assert_eq!(GainPolicy::MaxPin.calculate_gain(&hg, 5, 0), 1);
        assert_eq!(GainPolicy::MaxPin.calculate_gain(&hg, 6, 0), 1);
    }

    #[test]
    fn fm_delta_gain_update_matches_scenario_s4() {
        let mut hg = fixture();
        assign_s3(&mut hg);
        let mut kpq = KWayPriorityQueue::new(2, 7);
        kpq.insert(1, 0, GainPolicy::Fm.calculate_gain(&hg, 0, 1));
        kpq.insert(1, 1, GainPolicy::Fm.calculate_gain(&hg, 1, 1));
        kpq.insert(1, 2, GainPolicy::Fm.calculate_gain(&hg, 2, 1));
        kpq.insert(0, 4, GainPolicy::Fm.calculate_gain(&hg, 4, 0));
        kpq.insert(0, 5, GainPolicy::Fm.calculate_gain(&hg, 5, 0));
        kpq.insert(0, 6, GainPolicy::Fm.calculate_gain(&hg, 6, 0));

        hg.change_block(3, 1, 0);
        let mut visited = FastResetBitSet::new(hg.num_nodes());
        GainPolicy::Fm.delta_gain_update(&hg, &mut kpq, 3, 1, 0, &mut visited);

        assert_eq!(kpq.key(1, 0), -1);
        assert_eq!(kpq.key(1, 1), 0);
        assert_eq!(kpq.key(1, 2), 0);
        assert_eq!(kpq.key(0, 4), 1);
        assert_eq!(kpq.key(0, 5), 0);
        assert_eq!(kpq.key(0, 6), 0);
    }

    #[test]
    fn delta_update_matches_recompute_from_scratch() {
        // Section 8's "gain-computation law": deltaGainUpdate followed by
        // recomputing the touched vertices' gains from scratch yields
        // identical keys - true by construction here since the update
        // itself recomputes from the current hypergraph state.
        let mut hg = fixture();
        assign_s3(&mut hg);
        let mut kpq = KWayPriorityQueue::new(2, 7);
        for v in [0u32, 1, 2] {
            kpq.insert(1, v, GainPolicy::MaxNet.calculate_gain(&hg, v, 1));
        }
        for v in [4u32, 5, 6] {
            kpq.insert(0, v, GainPolicy::MaxNet.calculate_gain(&hg, v, 0));
        }
        hg.change_block(3, 1, 0);
        let mut visited = FastResetBitSet::new(hg.num_nodes());
        GainPolicy::MaxNet.delta_gain_update(&hg, &mut kpq, 3, 1, 0, &mut visited);

        for v in [0u32, 1, 2] {
            if kpq.contains(1, v) {
                assert_eq!(kpq.key(1, v), GainPolicy::MaxNet.calculate_gain(&hg, v, 1));
            }
        }
        for v in [4u32, 5, 6] {
            if kpq.contains(0, v) {
                assert_eq!(kpq.key(0, v), GainPolicy::MaxNet.calculate_gain(&hg, v, 0));
            }
        }
    }
}
