use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shortest paths, spring layout and viewport culling for graphs on a bounded plane.
#[derive(Parser, Debug)]
#[command(name = "graphplane")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (YAML) with `simulation` and `viewport` sections
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the shortest path between two vertices
    Path {
        /// Graph snapshot file (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Source vertex id
        #[arg(long)]
        from: u64,

        /// Target vertex id
        #[arg(long)]
        to: u64,
    },
    /// Relax the graph with the spring simulation and save the result
    Layout {
        /// Graph snapshot file (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Number of ticks to run
        #[arg(short, long, default_value = "60")]
        ticks: usize,

        /// Where to write the relaxed graph (defaults to overwriting --graph)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the vertices and edges inside the viewport
    Visible {
        /// Graph snapshot file (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Pan the view horizontally by this many world units first
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        x: f64,

        /// Pan the view vertically by this many world units first
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        y: f64,
    },
    /// Manage a snapshot store file
    Snapshots {
        /// Store file (JSON), created if missing
        #[arg(short, long)]
        store: PathBuf,

        #[command(subcommand)]
        action: SnapshotAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SnapshotAction {
    /// Print every snapshot in the store
    List,
    /// Add a graph file to the store under a new name
    Add {
        /// Graph snapshot file (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Name to store it under
        #[arg(short, long)]
        name: String,
    },
    /// Remove the snapshot at a list index
    Remove {
        index: usize,
    },
    /// Remove every snapshot
    Clear,
}
