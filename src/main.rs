//! # Butterfly-load CLI
//!
//! Loads preprocessed graph and restriction files and reports what they contain.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use butterfly_load::validate::check_restriction_ids;
use butterfly_load::{
    load_graph_file, load_restrictions, DuplicateCheck, Fingerprint, LoadOptions,
    RestrictionKind,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::error;

#[derive(Parser)]
#[command(name = "butterfly-load")]
#[command(about = "Load and check preprocessed road graph files", long_about = None)]
#[command(version)]
struct Cli {
    /// Check edge invariants after loading (default: on in debug builds)
    #[arg(long, global = true, conflicts_with = "no_validate")]
    validate: bool,

    /// Skip edge invariant checks
    #[arg(long, global = true)]
    no_validate: bool,

    /// Duplicate edge detection strategy
    #[arg(long, global = true, value_enum, default_value = "sort")]
    duplicate_check: DuplicateCheckArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DuplicateCheckArg {
    Sort,
    Hash,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a graph file (nodes and edges)
    Graph {
        /// Graph file
        input: PathBuf,
    },
    /// Load a turn restriction file
    Restrictions {
        /// Restriction file
        input: PathBuf,
        /// Node count of the matching graph, to check restriction ids against
        #[arg(long)]
        nodes: Option<u32>,
    },
    /// Print the fingerprint this build writes and accepts
    Fingerprint,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::default().with_duplicate_check(match self.duplicate_check {
            DuplicateCheckArg::Sort => DuplicateCheck::ParallelSort,
            DuplicateCheckArg::Hash => DuplicateCheck::HashSet,
        });
        if self.validate {
            options = options.with_validate(true);
        }
        if self.no_validate {
            options = options.with_validate(false);
        }
        options
    }
}

fn main() {
    if let Err(e) = run() {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let options = cli.load_options();

    match &cli.command {
        Commands::Graph { input } => {
            let start = Instant::now();
            let graph = load_graph_file(input, &options)
                .with_context(|| format!("Failed to load graph {}", input.display()))?;

            println!("✓ {} loaded in {:.2?}", input.display(), start.elapsed());
            println!("  Nodes:          {}", graph.node_count());
            println!("  Barriers:       {}", graph.barrier_nodes.len());
            println!("  Traffic lights: {}", graph.traffic_lights.len());
            println!("  Edges:          {}", graph.edge_count());
            if options.validate {
                println!("  ✓ edge invariants hold");
            }
        }
        Commands::Restrictions { input, nodes } => {
            let mut restrictions = Vec::new();
            let count = load_restrictions(input, &mut restrictions)
                .with_context(|| format!("Failed to load restrictions {}", input.display()))?;

            let mandatory = restrictions
                .iter()
                .filter(|r| r.kind == RestrictionKind::Mandatory)
                .count();
            println!("✓ {} loaded", input.display());
            println!("  Restrictions: {}", count);
            println!("  Mandatory:    {}", mandatory);
            println!("  Prohibited:   {}", restrictions.len() - mandatory);

            if let Some(node_count) = nodes {
                check_restriction_ids(&restrictions, *node_count)
                    .context("Restriction file does not use internal node ids")?;
                println!("  ✓ all restriction ids within {} nodes", node_count);
            }
        }
        Commands::Fingerprint => {
            println!("{}", Fingerprint::valid());
        }
    }

    Ok(())
}
