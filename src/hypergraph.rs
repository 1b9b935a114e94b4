//! The concrete hypergraph the partitioning core operates on.
//!
//! Stores pins and incident-edge lists in CSR form, plus the per-vertex
//! block assignment and the `pinCountInBlock`/`connectivity` counters the
//! spec requires to stay in sync with every `set_block`/`change_block`.

/// Vertex id, dense in `[0, num_nodes)`.
pub type V = u32;
/// Edge id, dense in `[0, num_edges)`.
pub type E = u32;
/// Block id, dense in `[0, k)`.
pub type P = u32;
/// Vertex/edge/partition weight.
pub type W = u64;

pub struct Hypergraph {
    num_nodes: usize,
    k: u32,

    edge_offsets: Vec<u32>,
    edge_pins: Vec<V>,
    edge_weight: Vec<W>,

    node_offsets: Vec<u32>,
    node_edges: Vec<E>,
    node_weight: Vec<W>,

    total_weight: W,

    block: Vec<Option<P>>,
    pin_count_in_block: Vec<u32>,
    connectivity: Vec<u32>,
    part_weight: Vec<W>,
    part_size: Vec<u32>,
}

impl Hypergraph {
    /// Builds a hypergraph from a pin-list representation. `k` is the
    /// number of blocks the derived counters are sized for; it need not
    /// equal the `k` any particular `partition()` call uses (bisection
    /// always builds its own k=2 sub-instances).
    pub fn from_pins(
        num_nodes: usize,
        edges: &[Vec<V>],
        node_weight: Option<Vec<W>>,
        edge_weight: Option<Vec<W>>,
        k: u32,
    ) -> Self {
        let num_edges = edges.len();
        let node_weight = node_weight.unwrap_or_else(|| vec![1; num_nodes]);
        let edge_weight = edge_weight.unwrap_or_else(|| vec![1; num_edges]);
        assert_eq!(node_weight.len(), num_nodes);
        assert_eq!(edge_weight.len(), num_edges);

        let mut edge_offsets = Vec::with_capacity(num_edges + 1);
        let mut edge_pins = Vec::new();
        edge_offsets.push(0u32);
        for e in edges {
            for &v in e {
                assert!((v as usize) < num_nodes, "pin {v} out of range");
                edge_pins.push(v);
            }
            edge_offsets.push(edge_pins.len() as u32);
        }

        let mut degree = vec![0u32; num_nodes];
        for &v in &edge_pins {
            degree[v as usize] += 1;
        }
        let mut node_offsets = vec![0u32; num_nodes + 1];
        for v in 0..num_nodes {
            node_offsets[v + 1] = node_offsets[v] + degree[v];
        }
        let mut cursor = node_offsets.clone();
        let mut node_edges = vec![0u32; edge_pins.len()];
        for (e_idx, e) in edges.iter().enumerate() {
            for &v in e {
                let pos = cursor[v as usize];
                node_edges[pos as usize] = e_idx as u32;
                cursor[v as usize] += 1;
            }
        }

        let total_weight = node_weight.iter().sum();

        let mut hg = Self {
            num_nodes,
            k,
            edge_offsets,
            edge_pins,
            edge_weight,
            node_offsets,
            node_edges,
            node_weight,
            total_weight,
            block: vec![None; num_nodes],
            pin_count_in_block: vec![0; num_edges * k as usize],
            connectivity: vec![0; num_edges],
            part_weight: vec![0; k as usize],
            part_size: vec![0; k as usize],
        };
        hg.recompute_derived_counters();
        hg
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Identical to `num_nodes` for this static representation; kept as
    /// a distinct method because the external hypergraph abstraction the
    /// spec describes distinguishes "current" from "initial" node counts
    /// (coarsening can shrink the former — not modeled here).
    pub fn initial_num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.edge_offsets.len() - 1
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn nodes(&self) -> impl Iterator<Item = V> {
        0..self.num_nodes as V
    }

    pub fn edges(&self) -> impl Iterator<Item = E> {
        0..self.num_edges() as E
    }

    pub fn incident_edges(&self, v: V) -> &[E] {
        let s = self.node_offsets[v as usize] as usize;
        let e = self.node_offsets[v as usize + 1] as usize;
        &self.node_edges[s..e]
    }

    pub fn pins(&self, e: E) -> &[V] {
        let s = self.edge_offsets[e as usize] as usize;
        let t = self.edge_offsets[e as usize + 1] as usize;
        &self.edge_pins[s..t]
    }

    pub fn edge_size(&self, e: E) -> usize {
        self.pins(e).len()
    }

    pub fn weight(&self, v: V) -> W {
        self.node_weight[v as usize]
    }

    pub fn edge_weight(&self, e: E) -> W {
        self.edge_weight[e as usize]
    }

    pub fn total_weight(&self) -> W {
        self.total_weight
    }

    pub fn block(&self, v: V) -> Option<P> {
        self.block[v as usize]
    }

    pub fn part_weight(&self, p: P) -> W {
        self.part_weight[p as usize]
    }

    pub fn part_size(&self, p: P) -> u32 {
        self.part_size[p as usize]
    }

    pub fn pin_count_in_block(&self, e: E, p: P) -> u32 {
        self.pin_count_in_block[e as usize * self.k as usize + p as usize]
    }

    pub fn connectivity(&self, e: E) -> u32 {
        self.connectivity[e as usize]
    }

    pub fn connectivity_set(&self, e: E) -> impl Iterator<Item = P> + '_ {
        let base = e as usize * self.k as usize;
        (0..self.k).filter(move |&p| self.pin_count_in_block[base + p as usize] > 0)
    }

    /// Assigns an as-yet-unassigned vertex to a block. Panics (a
    /// programmer-invariant violation, never expected on valid input) if
    /// `v` already has a block.
    pub fn set_block(&mut self, v: V, p: P) {
        assert!(
            self.block[v as usize].is_none(),
            "set_block called on already-assigned vertex {v}"
        );
        self.block[v as usize] = Some(p);
        self.part_weight[p as usize] += self.node_weight[v as usize];
        self.part_size[p as usize] += 1;
        for i in 0..self.incident_edges(v).len() {
            let e = self.incident_edges(v)[i];
            self.bump_pin_count(e, p, 1);
        }
    }

    /// Moves an already-assigned vertex from one block to another.
    /// Panics if `v` is not currently in `from`.
    pub fn change_block(&mut self, v: V, from: P, to: P) {
        assert_eq!(
            self.block[v as usize],
            Some(from),
            "change_block: vertex {v} is not in block {from}"
        );
        self.block[v as usize] = Some(to);
        self.part_weight[from as usize] -= self.node_weight[v as usize];
        self.part_weight[to as usize] += self.node_weight[v as usize];
        self.part_size[from as usize] -= 1;
        self.part_size[to as usize] += 1;
        for i in 0..self.incident_edges(v).len() {
            let e = self.incident_edges(v)[i];
            self.bump_pin_count(e, from, -1);
            self.bump_pin_count(e, to, 1);
        }
    }

    fn bump_pin_count(&mut self, e: E, p: P, delta: i32) {
        let idx = e as usize * self.k as usize + p as usize;
        let before = self.pin_count_in_block[idx];
        let after = (before as i64 + delta as i64) as u32;
        self.pin_count_in_block[idx] = after;
        if before == 0 && after > 0 {
            self.connectivity[e as usize] += 1;
        } else if before > 0 && after == 0 {
            self.connectivity[e as usize] -= 1;
        }
    }

    /// Rebuilds `pin_count_in_block`/`connectivity`/`part_weight`/
    /// `part_size` from the current `block` assignment. Called after a
    /// bulk reset and after extracting a sub-hypergraph.
    pub fn recompute_derived_counters(&mut self) {
        self.pin_count_in_block.iter_mut().for_each(|c| *c = 0);
        self.connectivity.iter_mut().for_each(|c| *c = 0);
        self.part_weight.iter_mut().for_each(|w| *w = 0);
        self.part_size.iter_mut().for_each(|s| *s = 0);

        for v in self.nodes() {
            if let Some(p) = self.block[v as usize] {
                self.part_weight[p as usize] += self.node_weight[v as usize];
                self.part_size[p as usize] += 1;
            }
        }
        for e in self.edges() {
            for &v in self.pins(e) {
                if let Some(p) = self.block[v as usize] {
                    let idx = e as usize * self.k as usize + p as usize;
                    if self.pin_count_in_block[idx] == 0 {
                        self.connectivity[e as usize] += 1;
                    }
                    self.pin_count_in_block[idx] += 1;
                }
            }
        }
    }

    /// Sets every vertex to `unassigned_block` (if it names a real
    /// block) or to `None` otherwise, then rebuilds derived counters.
    pub fn reset_partitioning(&mut self, unassigned_block: Option<P>) {
        match unassigned_block {
            Some(p) => self.block.iter_mut().for_each(|b| *b = Some(p)),
            None => self.block.iter_mut().for_each(|b| *b = None),
        }
        self.recompute_derived_counters();
    }

    /// Snapshot of the current block assignment, for best-cut rollback.
    pub fn assignment(&self) -> Vec<Option<P>> {
        self.block.clone()
    }

    /// Restores a previously captured assignment and rebuilds derived
    /// counters.
    pub fn restore_assignment(&mut self, assignment: &[Option<P>]) {
        assert_eq!(assignment.len(), self.num_nodes);
        self.block.copy_from_slice(assignment);
        self.recompute_derived_counters();
    }

    /// Extracts the induced sub-hypergraph on `vertices`, dropping any
    /// edge left with fewer than 2 pins inside the subset. Returns the
    /// sub-hypergraph (all-unassigned, `k` blocks) plus a map from
    /// sub-vertex id back to the original vertex id.
    pub fn sub_hypergraph(&self, vertices: &[V], k: u32) -> (Hypergraph, Vec<V>) {
        let mapping: Vec<V> = vertices.to_vec();
        let mut original_to_sub = vec![None; self.num_nodes];
        for (sub_id, &orig) in mapping.iter().enumerate() {
            original_to_sub[orig as usize] = Some(sub_id as V);
        }

        let mut touched_edges = Vec::new();
        let mut seen_edge = vec![false; self.num_edges()];
        for &orig in &mapping {
            for &e in self.incident_edges(orig) {
                if !seen_edge[e as usize] {
                    seen_edge[e as usize] = true;
                    touched_edges.push(e);
                }
            }
        }
        touched_edges.sort_unstable();

        let mut sub_edges = Vec::new();
        let mut sub_edge_weight = Vec::new();
        for &e in &touched_edges {
            let pins: Vec<V> = self
                .pins(e)
                .iter()
                .filter_map(|&v| original_to_sub[v as usize])
                .collect();
            if pins.len() >= 2 {
                sub_edges.push(pins);
                sub_edge_weight.push(self.edge_weight(e));
            }
        }

        let sub_node_weight: Vec<W> = mapping.iter().map(|&v| self.weight(v)).collect();
        let sub = Hypergraph::from_pins(
            mapping.len(),
            &sub_edges,
            Some(sub_node_weight),
            Some(sub_edge_weight),
            k,
        );
        (sub, mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Hypergraph {
        // The 7-vertex, 4-edge fixture used throughout the spec's test
        // scenarios: {0,2}, {0,1,3,4}, {3,4,6}, {2,5,6}.
        Hypergraph::from_pins(
            7,
            &[
                vec![0, 2],
                vec![0, 1, 3, 4],
                vec![3, 4, 6],
                vec![2, 5, 6],
            ],
            None,
            None,
            2,
        )
    }

    #[test]
    fn incident_edges_and_pins_match_fixture() {
        let hg = fixture();
        assert_eq!(hg.incident_edges(0), &[0, 1]);
        assert_eq!(hg.incident_edges(6), &[2, 3]);
        assert_eq!(hg.pins(1), &[0, 1, 3, 4]);
    }

    #[test]
    fn set_block_updates_counters() {
        let mut hg = fixture();
        hg.set_block(0, 0);
        assert_eq!(hg.block(0), Some(0));
        assert_eq!(hg.pin_count_in_block(0, 0), 1);
        assert_eq!(hg.connectivity(0), 1);
        assert_eq!(hg.part_weight(0), 1);
    }

    #[test]
    fn change_block_is_reversible() {
        let mut hg = fixture();
        for v in hg.nodes() {
            hg.set_block(v, 0);
        }
        hg.recompute_derived_counters();
        let before: Vec<u32> = hg.edges().map(|e| hg.connectivity(e)).collect();
        hg.change_block(3, 0, 1);
        hg.change_block(3, 1, 0);
        let after: Vec<u32> = hg.edges().map(|e| hg.connectivity(e)).collect();
        assert_eq!(before, after);
        assert_eq!(hg.part_weight(0), 7);
        assert_eq!(hg.part_weight(1), 0);
    }

    #[test]
    #[should_panic]
    fn set_block_on_assigned_vertex_panics() {
        let mut hg = fixture();
        hg.set_block(0, 0);
        hg.set_block(0, 1);
    }

    #[test]
    fn sub_hypergraph_drops_external_edges_and_remaps_ids() {
        let hg = fixture();
        let (sub, mapping) = hg.sub_hypergraph(&[0, 1, 2], 2);
        assert_eq!(mapping, vec![0, 1, 2]);
        // edge {0,2} survives (both endpoints in the subset).
        // edge {0,1,3,4} shrinks to {0,1} (3,4 outside the subset).
        // edge {2,5,6} shrinks to {2} alone and is dropped.
        assert_eq!(sub.num_edges(), 2);
        let sizes: Vec<usize> = sub.edges().map(|e| sub.edge_size(e)).collect();
        assert!(sizes.contains(&2));
    }
}
