//! Graph snapshots and the snapshot store
//!
//! A snapshot is the plain vertex/edge list needed to rebuild a [`Graph`].
//! Edges refer to vertex ids, not slots, so the format stays valid if the
//! vertex order changes. The store keeps a named list of snapshots in one
//! JSON file and rewrites it on every change.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::geometry::Point;
use crate::graph::{Graph, GraphError, VertexId};

/// Errors that can occur while loading or saving snapshots
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The snapshot describes an invalid graph
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),

    #[error("no snapshot at index {index} (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The store already holds the largest representable id
    #[error("snapshot ids exhausted")]
    IdsExhausted,
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: VertexId,
    pub position: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub a: VertexId,
    pub b: VertexId,
}

/// Serializable form of a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub name: String,
    #[serde(default)]
    pub id: u64,
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphSnapshot {
    pub fn from_graph(name: impl Into<String>, id: u64, graph: &Graph) -> Self {
        let vertices = graph
            .vertices()
            .iter()
            .map(|v| VertexRecord {
                id: v.id,
                position: v.position,
                radius: v.radius,
            })
            .collect();
        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeRecord {
                a: graph.vertices()[e.a].id,
                b: graph.vertices()[e.b].id,
            })
            .collect();
        Self {
            name: name.into(),
            id,
            vertices,
            edges,
        }
    }

    /// Rebuild the graph, rejecting duplicate ids, bad radii and dangling edges
    pub fn to_graph(&self) -> SnapshotResult<Graph> {
        let graph = Graph::from_parts(
            self.vertices.iter().map(|v| (v.id, v.position, v.radius)),
            self.edges.iter().map(|e| (e.a, e.b)),
        )?;
        Ok(graph)
    }

    pub fn load(path: &Path) -> SnapshotResult<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: GraphSnapshot = serde_json::from_str(&content)?;
        debug!(path = %path.display(), name = %snapshot.name, "loaded snapshot");
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> SnapshotResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        debug!(path = %path.display(), name = %self.name, "saved snapshot");
        Ok(())
    }
}

/// A named list of snapshots backed by a JSON file
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    snapshots: Vec<GraphSnapshot>,
}

impl SnapshotStore {
    /// Open the store at `path`, creating an empty one if the file is missing
    pub fn open(path: impl Into<PathBuf>) -> SnapshotResult<Self> {
        let path = path.into();
        let snapshots = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            info!(path = %path.display(), "creating snapshot store");
            let store = Self {
                path: path.clone(),
                snapshots: Vec::new(),
            };
            store.persist()?;
            return Ok(store);
        };
        Ok(Self { path, snapshots })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshots(&self) -> &[GraphSnapshot] {
        &self.snapshots
    }

    pub fn get(&self, index: usize) -> Option<&GraphSnapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// One more than the largest id in the store
    pub fn next_id(&self) -> SnapshotResult<u64> {
        match self.snapshots.iter().map(|s| s.id).max() {
            Some(max) => max.checked_add(1).ok_or(SnapshotError::IdsExhausted),
            None => Ok(0),
        }
    }

    pub fn add(&mut self, snapshot: GraphSnapshot) -> SnapshotResult<()> {
        self.snapshots.push(snapshot);
        self.persist()
    }

    pub fn remove(&mut self, index: usize) -> SnapshotResult<GraphSnapshot> {
        if index >= self.snapshots.len() {
            return Err(SnapshotError::IndexOutOfRange {
                index,
                len: self.snapshots.len(),
            });
        }
        let removed = self.snapshots.remove(index);
        self.persist()?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> SnapshotResult<()> {
        self.snapshots.clear();
        self.persist()
    }

    fn persist(&self) -> SnapshotResult<()> {
        let content = serde_json::to_string_pretty(&self.snapshots)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
