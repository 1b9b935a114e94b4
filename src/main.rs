use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hgip::config::Config;
use hgip::partitioner::bfs::BfsPartitioner;
use hgip::partitioner::greedy::GreedyHypergraphGrowingPartitioner;
use hgip::partitioner::label_propagation::LabelPropagationPartitioner;
use hgip::partitioner::InitialPartitioner;
use hgip::policies::{GainPolicy, QueueSelection, StartNodeSelection};
use hgip::{hgr_io, metrics, recursive_bisection};

#[derive(Parser)]
#[command(name = "hgip")]
#[command(about = "Initial-partitioning core for a multilevel hypergraph partitioner")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv). Overrides RUST_LOG if set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Family {
    Bfs,
    LabelPropagation,
    Greedy,
}

#[derive(Clone, Copy, ValueEnum)]
enum StartPolicyArg {
    Random,
    BfsFarthest,
}

impl From<StartPolicyArg> for StartNodeSelection {
    fn from(p: StartPolicyArg) -> Self {
        match p {
            StartPolicyArg::Random => StartNodeSelection::Random,
            StartPolicyArg::BfsFarthest => StartNodeSelection::BfsFarthest,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GainPolicyArg {
    Fm,
    MaxPin,
    MaxNet,
}

impl From<GainPolicyArg> for GainPolicy {
    fn from(p: GainPolicyArg) -> Self {
        match p {
            GainPolicyArg::Fm => GainPolicy::Fm,
            GainPolicyArg::MaxPin => GainPolicy::MaxPin,
            GainPolicyArg::MaxNet => GainPolicy::MaxNet,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum QueuePolicyArg {
    RoundRobin,
    Global,
    Sequential,
}

impl From<QueuePolicyArg> for QueueSelection {
    fn from(p: QueuePolicyArg) -> Self {
        match p {
            QueuePolicyArg::RoundRobin => QueueSelection::RoundRobin,
            QueuePolicyArg::Global => QueueSelection::Global,
            QueuePolicyArg::Sequential => QueueSelection::Sequential,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Partition a `.hgr` hypergraph into k blocks and write the result.
    Partition {
        /// Path to input .hgr file.
        #[arg(long)]
        hgr: PathBuf,

        /// Output path for the partition file.
        #[arg(short, long)]
        out: PathBuf,

        /// Number of blocks.
        #[arg(short, long, default_value_t = 2)]
        k: u32,

        /// Balance tolerance.
        #[arg(short, long, default_value_t = 0.03)]
        epsilon: f64,

        /// RNG seed.
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Which partitioner family drives each bisection step.
        #[arg(long, value_enum, default_value = "greedy")]
        family: Family,

        /// Start-node selection policy.
        #[arg(long, value_enum, default_value = "bfs-farthest")]
        start_policy: StartPolicyArg,

        /// Gain policy (greedy family only; bfs/label-propagation have
        /// their own fixed gain rules per the spec).
        #[arg(long, value_enum, default_value = "fm")]
        gain_policy: GainPolicyArg,

        /// Queue-selection policy (greedy family only).
        #[arg(long, value_enum, default_value = "global")]
        queue_policy: QueuePolicyArg,

        /// Number of independent runs to retain the best feasible cut
        /// from (greedy family only).
        #[arg(long, default_value_t = 1)]
        nruns: u32,

        /// Roll back to the best cut seen mid-run instead of keeping
        /// wherever the last move landed.
        #[arg(long, default_value_t = true)]
        rollback: bool,

        /// Run the FM refinement boundary after the initial partition
        /// (a no-op unless an `FmRefiner` has been wired in).
        #[arg(long, default_value_t = false)]
        refinement: bool,
    },

    /// Recompute cut/balance metrics for an existing partition file.
    Score {
        /// Path to .hgr file.
        #[arg(long)]
        hgr: PathBuf,

        /// Path to partition file (one block id per line).
        #[arg(long)]
        partition: PathBuf,

        /// Number of blocks.
        #[arg(short, long, default_value_t = 2)]
        k: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Partition {
            hgr,
            out,
            k,
            epsilon,
            seed,
            family,
            start_policy,
            gain_policy,
            queue_policy,
            nruns,
            rollback,
            refinement,
        } => run_partition(
            hgr,
            out,
            k,
            epsilon,
            seed,
            family,
            start_policy.into(),
            gain_policy.into(),
            queue_policy.into(),
            nruns,
            rollback,
            refinement,
        ),
        Commands::Score { hgr, partition, k } => run_score(hgr, partition, k),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_partition(
    hgr_path: PathBuf,
    out: PathBuf,
    k: u32,
    epsilon: f64,
    seed: u64,
    family: Family,
    start_policy: StartNodeSelection,
    gain_policy: GainPolicy,
    queue_policy: QueueSelection,
    nruns: u32,
    rollback: bool,
    refinement: bool,
) -> Result<()> {
    info!("loading {}", hgr_path.display());
    let mut hg = hgr_io::read_hgr(&hgr_path, k)?;
    info!(
        "loaded {} nodes, {} hyperedges, total weight {}",
        hg.num_nodes(),
        hg.num_edges(),
        hg.total_weight()
    );

    let mut config = Config::new(&hg, k, epsilon, seed);
    config.rollback = rollback;
    config.refinement = refinement;
    config.nruns = nruns;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let start = Instant::now();

    match family {
        Family::Bfs => {
            let mut partitioner = BfsPartitioner::new(start_policy);
            run(&mut hg, &config, &mut partitioner, k, &mut rng);
        }
        Family::LabelPropagation => {
            let mut partitioner = LabelPropagationPartitioner::new(start_policy);
            run(&mut hg, &config, &mut partitioner, k, &mut rng);
        }
        Family::Greedy => {
            let mut partitioner =
                GreedyHypergraphGrowingPartitioner::new(start_policy, gain_policy, queue_policy);
            run(&mut hg, &config, &mut partitioner, k, &mut rng);
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    hgr_io::write_partition(&out, &hg)?;

    let cut = metrics::cut(&hg);
    let imbalance = metrics::imbalance(&hg);
    println!("=== Results ===");
    println!("Nodes: {}", hg.num_nodes());
    println!("Hyperedges: {}", hg.num_edges());
    println!("k: {k}, epsilon: {epsilon}");
    println!("Cut: {cut}");
    println!("Imbalance: {imbalance:.4}");
    println!("Time: {elapsed:.2}s");
    println!("Partition written to: {}", out.display());

    let summary = serde_json::json!({
        "config": config,
        "cut": cut,
        "imbalance": imbalance,
        "elapsed_secs": elapsed,
    });
    info!("run summary: {}", serde_json::to_string(&summary)?);

    Ok(())
}

/// `k == 2` goes straight through the partitioner's own bisection entry
/// point; larger `k` is driven through `recursive_bisection`, which
/// composes that same entry point into a k-way result.
fn run(
    hg: &mut hgip::Hypergraph,
    config: &Config,
    partitioner: &mut dyn InitialPartitioner,
    k: u32,
    rng: &mut ChaCha8Rng,
) {
    if k == 2 {
        partitioner.k_way_partition(hg, config, 2, rng);
    } else {
        recursive_bisection::recursive_bisection(hg, config, partitioner, rng);
    }
}

fn run_score(hgr_path: PathBuf, partition_path: PathBuf, k: u32) -> Result<()> {
    let mut hg = hgr_io::read_hgr(&hgr_path, k)?;
    let partition = hgr_io::read_partition(&partition_path)?;
    anyhow::ensure!(
        partition.len() == hg.num_nodes(),
        "partition file has {} entries, hypergraph has {} vertices",
        partition.len(),
        hg.num_nodes()
    );

    hg.reset_partitioning(None);
    for v in hg.nodes() {
        hg.set_block(v, partition[v as usize]);
    }

    let cut = metrics::cut(&hg);
    let imbalance = metrics::imbalance(&hg);
    let max_weight = (0..k).map(|p| hg.part_weight(p)).max().unwrap_or(0);
    let min_weight = (0..k).map(|p| hg.part_weight(p)).min().unwrap_or(0);

    println!("=== Results ===");
    println!("Nodes: {}", hg.num_nodes());
    println!("Hyperedges: {}", hg.num_edges());
    println!("k: {k}");
    println!("Cut: {cut}");
    println!("Imbalance: {imbalance:.4}");
    println!("Max partition weight: {max_weight}");
    println!("Min partition weight: {min_weight}");

    Ok(())
}
