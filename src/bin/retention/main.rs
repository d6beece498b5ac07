//! retention CLI tool
//!
//! Command-line interface for explaining why objects in a memory snapshot are still alive.
//!
//! ## Commands
//!
//! - `explain <snapshot> <node>`: print the retention paths of one node
//! - `roots <snapshot>`: count the roots of a snapshot per retention reason
//!
//! Snapshots are read from the JSON form of `retention_core::snapshot::SnapshotData`. Nodes are
//! written `<kind>:<index>`, with kind one of `native`, `managed`, `gchandle` or `static`.

use clap::{Parser, Subcommand};
use retention_core::{
    config::{ConfigProvider, LimitPolicy, TomlConfigProvider},
    node::Node,
    roots::summarize,
    search::RootPathFinder,
    snapshot::{Snapshot, SnapshotSource},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "retention")]
#[command(author, version, about = "Explain why objects in a memory snapshot are kept alive", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the retention paths of a node
    Explain {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Node to explain, e.g. `managed:42`
        node: Node,

        /// Print every path instead of only the preferred one
        #[arg(short, long)]
        all: bool,

        /// Emit the full path collection as JSON
        #[arg(long)]
        json: bool,

        /// Configuration file path ([search] table)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the search iteration limit
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Keep the paths found before the iteration limit is hit
        #[arg(long)]
        keep_partial: bool,
    },

    /// Count the roots of a snapshot per retention reason
    Roots {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Explain {
            snapshot,
            node,
            all,
            json,
            config,
            max_iterations,
            keep_partial,
        } => {
            let mut search_config = match config {
                Some(path) => TomlConfigProvider::new(path).get_search_config()?,
                None => Default::default(),
            };
            if let Some(max_iterations) = max_iterations {
                search_config.max_iterations = max_iterations;
            }
            if keep_partial {
                search_config.limit_policy = LimitPolicy::KeepPartial;
            }

            let snapshot = Snapshot::from_path(&snapshot)?;
            let paths = RootPathFinder::with_config(&snapshot, search_config).find(node)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&paths)?);
            } else if all {
                print!("{}", paths.render(&snapshot)?);
            } else {
                let best = paths.shortest_path();
                if best.is_empty() {
                    println!("{} is not retained by any root", snapshot.describe(node));
                } else {
                    println!("[{}] {}", best.reason(), best.explanation());
                    println!("  {}", best.render(&snapshot));
                    if paths.len() > 1 {
                        println!("({} more paths, use --all to list them)", paths.len() - 1);
                    }
                }
                for diagnostic in paths.diagnostics().iter().filter(|d| d.is_warning()) {
                    eprintln!("{diagnostic}");
                }
            }
        }
        Commands::Roots { snapshot } => {
            let snapshot = Snapshot::from_path(&snapshot)?;
            let summary = summarize(&snapshot, snapshot.nodes())?;
            println!("{summary}");
        }
    }

    Ok(())
}
