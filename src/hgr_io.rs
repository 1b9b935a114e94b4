//! `.hgr` file I/O — the hMETIS/KaHyPar plain-text hypergraph format.
//!
//! Format: a header line `<num_hyperedges> <num_vertices> [fmt]`, where
//! `fmt` is an optional two-digit flag (tens digit = vertices weighted,
//! ones digit = hyperedges weighted); then one line per hyperedge
//! listing its 1-based pin ids (preceded by its weight if `fmt` says
//! edges are weighted); then, if `fmt` says vertices are weighted, one
//! line per vertex giving its weight. Kept close to the original crate's
//! `hgr.rs`, generalized to build the richer `hypergraph::Hypergraph`
//! (with real vertex/edge weights) instead of a bare CSR pin list.

use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::hypergraph::{Hypergraph, P, V, W};

struct Header {
    num_hyperedges: usize,
    num_vertices: usize,
    edges_weighted: bool,
    vertices_weighted: bool,
}

fn parse_header(line: &str) -> Result<Header> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(anyhow!("invalid .hgr header: {line:?}"));
    }
    let num_hyperedges: usize = parts[0].parse().context("parsing hyperedge count")?;
    let num_vertices: usize = parts[1].parse().context("parsing vertex count")?;
    let fmt: u32 = match parts.get(2) {
        Some(s) => s.parse().context("parsing fmt flag")?,
        None => 0,
    };
    Ok(Header {
        num_hyperedges,
        num_vertices,
        edges_weighted: fmt % 10 == 1,
        vertices_weighted: (fmt / 10) % 10 == 1,
    })
}

/// Reads an `.hgr` file into a [`Hypergraph`] sized for `k` blocks.
pub fn read_hgr(path: &Path, k: u32) -> Result<Hypergraph> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| anyhow!("{}: empty .hgr file", path.display()))??;
    let header = parse_header(&header_line)?;

    let mut edges: Vec<Vec<V>> = Vec::with_capacity(header.num_hyperedges);
    let mut edge_weight: Vec<W> = Vec::with_capacity(header.num_hyperedges);

    while edges.len() < header.num_hyperedges {
        let line = lines
            .next()
            .ok_or_else(|| anyhow!("{}: truncated hyperedge list", path.display()))??;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let weight: W = if header.edges_weighted {
            tokens
                .next()
                .ok_or_else(|| anyhow!("missing hyperedge weight"))?
                .parse()
                .context("parsing hyperedge weight")?
        } else {
            1
        };
        let pins: Vec<V> = tokens
            .map(|t| -> Result<V> {
                let id: i64 = t.parse().context("parsing pin id")?;
                Ok((id - 1) as V)
            })
            .collect::<Result<_>>()?;
        if pins.len() < 2 {
            return Err(anyhow!(
                "{}: hyperedge {} has fewer than 2 pins",
                path.display(),
                edges.len()
            ));
        }
        edges.push(pins);
        edge_weight.push(weight);
    }

    let node_weight = if header.vertices_weighted {
        let mut weights = Vec::with_capacity(header.num_vertices);
        while weights.len() < header.num_vertices {
            let line = lines
                .next()
                .ok_or_else(|| anyhow!("{}: truncated vertex weight list", path.display()))??;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            weights.push(line.parse::<W>().context("parsing vertex weight")?);
        }
        Some(weights)
    } else {
        None
    };

    Ok(Hypergraph::from_pins(
        header.num_vertices,
        &edges,
        node_weight,
        Some(edge_weight),
        k,
    ))
}

/// Writes one block id per line, in vertex order, 0-based.
pub fn write_partition(path: &Path, hg: &Hypergraph) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for v in hg.nodes() {
        let block = hg
            .block(v)
            .ok_or_else(|| anyhow!("vertex {v} has no block assigned"))?;
        writeln!(writer, "{block}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a partition file written by [`write_partition`] back into a
/// plain block-id vector (for the `score` subcommand, which re-derives
/// metrics without re-running a partitioner).
pub fn read_partition(path: &Path) -> Result<Vec<P>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut partition = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            partition.push(line.parse().context("parsing partition entry")?);
        }
    }
    Ok(partition)
}
