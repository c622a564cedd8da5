use std::path::Path;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use graphplane::config::Settings;
use graphplane::geometry::{BBox, Point};
use graphplane::graph::{Graph, VertexId};
use graphplane::layout::LayoutSimulator;
use graphplane::pathfind::find_path_by_id;
use graphplane::snapshot::{EdgeRecord, GraphSnapshot, SnapshotStore};
use graphplane::viewport::GridView;

mod cli;

use cli::{Cli, Commands, SnapshotAction};

#[derive(Serialize)]
struct PathReport {
    found: bool,
    length: f64,
    edges: Vec<EdgeRecord>,
}

#[derive(Serialize)]
struct VisibleReport {
    region: BBox,
    vertices: Vec<VertexId>,
    edges: Vec<EdgeRecord>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn load_graph(path: &Path) -> anyhow::Result<(GraphSnapshot, Graph)> {
    let snapshot = GraphSnapshot::load(path)
        .with_context(|| format!("failed to read graph {}", path.display()))?;
    let graph = snapshot
        .to_graph()
        .with_context(|| format!("invalid graph in {}", path.display()))?;
    Ok((snapshot, graph))
}

fn edge_records(graph: &Graph, indices: &[usize]) -> Vec<EdgeRecord> {
    indices
        .iter()
        .filter_map(|&i| graph.edge(i))
        .map(|e| EdgeRecord {
            a: graph.vertices()[e.a].id,
            b: graph.vertices()[e.b].id,
        })
        .collect()
}

fn path(graph_path: &Path, from: VertexId, to: VertexId) -> anyhow::Result<()> {
    let (_, graph) = load_graph(graph_path)?;
    let result = find_path_by_id(&graph, from, to);
    let report = PathReport {
        found: result.found,
        length: result.length(&graph),
        edges: edge_records(&graph, &result.edges),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn layout(
    graph_path: &Path,
    ticks: usize,
    output: Option<&Path>,
    settings: &Settings,
) -> anyhow::Result<()> {
    let (snapshot, mut graph) = load_graph(graph_path)?;
    let mut simulator = LayoutSimulator::new(settings.simulation.clone())?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = simulator.start(&graph, move |positions: &[Point]| {
        let _ = tx.send(positions.to_vec());
    })?;

    let mut latest = None;
    let mut completed = 0;
    while completed < ticks {
        match rx.recv().await {
            Some(positions) => {
                latest = Some(positions);
                completed += 1;
            }
            None => break,
        }
    }
    handle.stop_and_wait().await?;

    if let Some(positions) = latest {
        graph.apply_positions(&positions)?;
    }

    let target = output.unwrap_or(graph_path);
    GraphSnapshot::from_graph(snapshot.name.clone(), snapshot.id, &graph)
        .save(target)
        .with_context(|| format!("failed to write {}", target.display()))?;
    println!(
        "Ran {} ticks on '{}', wrote {}",
        completed,
        snapshot.name,
        target.display()
    );
    Ok(())
}

fn visible(graph_path: &Path, pan: Point, settings: &Settings) -> anyhow::Result<()> {
    let (_, graph) = load_graph(graph_path)?;
    let mut view = GridView::from_config(&settings.viewport);
    view.translate(pan);
    let region = view.visible_region();

    let report = VisibleReport {
        region,
        vertices: graph
            .vertices_in(&region)
            .into_iter()
            .map(|slot| graph.vertices()[slot].id)
            .collect(),
        edges: edge_records(&graph, &graph.edges_in(&region)),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn snapshots(store_path: &Path, action: SnapshotAction) -> anyhow::Result<()> {
    let mut store = SnapshotStore::open(store_path)
        .with_context(|| format!("failed to open store {}", store_path.display()))?;

    match action {
        SnapshotAction::List => {
            for (index, snap) in store.snapshots().iter().enumerate() {
                println!(
                    "{index}\t{}\t{}\t{} vertices\t{} edges",
                    snap.id,
                    snap.name,
                    snap.vertices.len(),
                    snap.edges.len()
                );
            }
        }
        SnapshotAction::Add { graph, name } => {
            let (_, loaded) = load_graph(&graph)?;
            let id = store.next_id()?;
            store.add(GraphSnapshot::from_graph(name.clone(), id, &loaded))?;
            println!("Added '{name}' as snapshot {id}");
        }
        SnapshotAction::Remove { index } => {
            let removed = store.remove(index)?;
            println!("Removed '{}'", removed.name);
        }
        SnapshotAction::Clear => {
            store.clear()?;
            println!("Cleared {}", store_path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Path { graph, from, to } => path(&graph, from, to)?,
        Commands::Layout {
            graph,
            ticks,
            output,
        } => layout(&graph, ticks, output.as_deref(), &settings).await?,
        Commands::Visible { graph, x, y } => visible(&graph, Point::new(x, y), &settings)?,
        Commands::Snapshots { store, action } => snapshots(&store, action)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parses_path_subcommand() {
        let cli = Cli::try_parse_from([
            "graphplane", "path", "--graph", "g.json", "--from", "1", "--to", "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Path { graph, from, to } => {
                assert_eq!(graph, PathBuf::from("g.json"));
                assert_eq!((from, to), (1, 4));
            }
            _ => panic!("Expected Path command"),
        }
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_parses_layout_defaults() {
        let cli = Cli::try_parse_from(["graphplane", "-v", "layout", "-g", "g.json"]).unwrap();
        match cli.command {
            Commands::Layout { ticks, output, .. } => {
                assert_eq!(ticks, 60);
                assert!(output.is_none());
            }
            _ => panic!("Expected Layout command"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parses_negative_pan() {
        let cli = Cli::try_parse_from([
            "graphplane", "visible", "-g", "g.json", "-x", "-2.5", "-y", "1",
        ])
        .unwrap();
        match cli.command {
            Commands::Visible { x, y, .. } => assert_eq!((x, y), (-2.5, 1.0)),
            _ => panic!("Expected Visible command"),
        }
    }

    #[test]
    fn cli_parses_snapshot_actions() {
        let cli = Cli::try_parse_from(["graphplane", "snapshots", "-s", "s.json", "remove", "2"])
            .unwrap();
        match cli.command {
            Commands::Snapshots {
                action: SnapshotAction::Remove { index },
                ..
            } => assert_eq!(index, 2),
            _ => panic!("Expected Snapshots remove"),
        }
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["graphplane"]).is_err());
    }
}
