//! Start-node (seed) selection policies.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::hypergraph::{Hypergraph, V};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartNodeSelection {
    /// `k` distinct uniformly random vertices.
    Random,
    /// Root chosen at random, then each subsequent seed is the vertex
    /// maximizing its minimum hypergraph-BFS distance to the
    /// already-chosen set (ties broken by lowest id).
    BfsFarthest,
    /// Seed `i` is vertex `i`. Deterministic, used to reproduce the
    /// fixed fixtures the rest of the core is tested against; not a
    /// sensible choice for production use, analogous to the original
    /// partitioner's `TestStartNodeSelectionPolicy`.
    Identity,
}

impl StartNodeSelection {
    pub fn calculate_start_nodes(
        self,
        hg: &Hypergraph,
        k: u32,
        rng: &mut ChaCha8Rng,
    ) -> Vec<V> {
        match self {
            StartNodeSelection::Random => random_start_nodes(hg, k, rng),
            StartNodeSelection::BfsFarthest => bfs_farthest_start_nodes(hg, k, rng),
            StartNodeSelection::Identity => (0..k).collect(),
        }
    }
}

fn random_start_nodes(hg: &Hypergraph, k: u32, rng: &mut ChaCha8Rng) -> Vec<V> {
    let n = hg.num_nodes();
    assert!(k as usize <= n, "cannot pick {k} distinct seeds from {n} vertices");
    rand::seq::index::sample(rng, n, k as usize)
        .iter()
        .map(|i| i as V)
        .collect()
}

fn bfs_farthest_start_nodes(hg: &Hypergraph, k: u32, rng: &mut ChaCha8Rng) -> Vec<V> {
    let n = hg.num_nodes();
    assert!(k as usize <= n, "cannot pick {k} distinct seeds from {n} vertices");

    let root = rng.gen_range(0..n as u32);
    let distances_from_root = bfs_distances(hg, &[root]);
    let seed0 = farthest_vertex(&distances_from_root).unwrap_or(root);

    let mut seeds = vec![seed0];
    while seeds.len() < k as usize {
        let distances = bfs_distances(hg, &seeds);
        let next = farthest_vertex_excluding(&distances, &seeds)
            .unwrap_or_else(|| first_unchosen(n, &seeds));
        seeds.push(next);
    }
    seeds
}

fn first_unchosen(n: usize, chosen: &[V]) -> V {
    (0..n as V).find(|v| !chosen.contains(v)).expect("no unchosen vertex left")
}

/// Among reachable vertices, the one with the largest distance; ties go
/// to the lowest id.
fn farthest_vertex(distances: &[Option<u32>]) -> Option<V> {
    distances
        .iter()
        .enumerate()
        .filter_map(|(v, d)| d.map(|d| (v as V, d)))
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(v, _)| v)
}

fn farthest_vertex_excluding(distances: &[Option<u32>], exclude: &[V]) -> Option<V> {
    distances
        .iter()
        .enumerate()
        .filter_map(|(v, d)| {
            let v = v as V;
            if exclude.contains(&v) {
                None
            } else {
                d.map(|d| (v, d))
            }
        })
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(v, _)| v)
}

/// Multi-source BFS over the hypergraph, treating every hyperedge as a
/// clique on its pins. Returns, for each vertex, its distance to the
/// nearest source (`None` if unreachable).
fn bfs_distances(hg: &Hypergraph, sources: &[V]) -> Vec<Option<u32>> {
    let mut dist = vec![None; hg.num_nodes()];
    let mut queue = VecDeque::new();
    for &s in sources {
        if dist[s as usize].is_none() {
            dist[s as usize] = Some(0);
            queue.push_back(s);
        }
    }
    while let Some(v) = queue.pop_front() {
        let d = dist[v as usize].unwrap();
        for &e in hg.incident_edges(v) {
            for &w in hg.pins(e) {
                if dist[w as usize].is_none() {
                    dist[w as usize] = Some(d + 1);
                    queue.push_back(w);
                }
            }
        }
    }
    dist
}
