//! Graph data model
//!
//! Vertices live in an arena and are addressed by *slot* (their position in
//! the arena). Edges store slots rather than references, so moving a vertex is
//! immediately visible to every edge touching it. The boolean adjacency matrix
//! is derived from the edge list and rebuilt wholesale whenever the structure
//! changes.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, trace};

use crate::geometry::{BBox, Point};

/// Extra room added around a vertex's box so clicks near the rim still hit
pub const HIT_TOLERANCE: f64 = 0.05;

/// Caller-assigned, stable vertex identifier
pub type VertexId = u64;

/// Errors for declined graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("vertex {0} already exists")]
    DuplicateVertex(VertexId),

    #[error("no vertex with id {0}")]
    UnknownVertex(VertexId),

    #[error("invalid radius {radius} for vertex {id}")]
    InvalidRadius { id: VertexId, radius: f64 },

    #[error("invalid position for vertex {0}")]
    InvalidPosition(VertexId),

    #[error("edge would connect vertex {0} to itself")]
    SelfLoop(VertexId),

    #[error("vertices {0} and {1} are already connected")]
    DuplicateEdge(VertexId, VertexId),

    #[error("no edge between vertices {0} and {1}")]
    UnknownEdge(VertexId, VertexId),

    #[error("slot {slot} out of range for {len} vertices")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("expected {expected} positions, got {actual}")]
    PositionCountMismatch { expected: usize, actual: usize },
}

/// A vertex on the plane
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Point,
    pub radius: f64,
    /// Hit-test box; stale until [`Vertex::recalculate_extents`] runs
    pub bbox: BBox,
}

impl Vertex {
    pub fn new(id: VertexId, position: Point, radius: f64) -> Self {
        let mut vertex = Self {
            id,
            position,
            radius,
            bbox: BBox::default(),
        };
        vertex.recalculate_extents();
        vertex
    }

    /// Recompute the cached box from position and radius
    pub fn recalculate_extents(&mut self) {
        let r = Point::new(self.radius, self.radius);
        self.bbox = BBox::new(self.position - r, 2.0 * self.radius, 2.0 * self.radius)
            .expanded(HIT_TOLERANCE);
    }
}

/// An undirected connection between two vertex slots
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    /// Box covering both endpoints; stale until recalculated
    pub bbox: BBox,
}

impl Edge {
    fn new(a: usize, b: usize, vertices: &[Vertex]) -> Self {
        let mut edge = Self {
            a,
            b,
            bbox: BBox::default(),
        };
        edge.recalculate_extents(vertices);
        edge
    }

    pub fn recalculate_extents(&mut self, vertices: &[Vertex]) {
        self.bbox = BBox::covering(vertices[self.a].position, vertices[self.b].position);
    }

    /// True if this edge joins slots `x` and `y` in either order
    pub fn connects(&self, x: usize, y: usize) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    pub fn touches(&self, slot: usize) -> bool {
        self.a == slot || self.b == slot
    }
}

/// Vertex arena, edge list and derived adjacency
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    matrix: Vec<Vec<bool>>,
    /// Mapping from vertex id to slot
    slots: HashMap<VertexId, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(id, position, radius)` triples and id pairs,
    /// validating everything and building adjacency once at the end
    pub fn from_parts(
        vertices: impl IntoIterator<Item = (VertexId, Point, f64)>,
        edges: impl IntoIterator<Item = (VertexId, VertexId)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for (id, position, radius) in vertices {
            graph.push_vertex(id, position, radius)?;
        }
        for (a, b) in edges {
            graph.push_edge(a, b)?;
        }
        graph.rebuild_adjacency();
        debug!(
            vertices = graph.vertices.len(),
            edges = graph.edges.len(),
            "built graph"
        );
        Ok(graph)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex(&self, slot: usize) -> Option<&Vertex> {
        self.vertices.get(slot)
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn slot_of(&self, id: VertexId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Add a vertex and return its slot
    pub fn add_vertex(
        &mut self,
        id: VertexId,
        position: Point,
        radius: f64,
    ) -> Result<usize, GraphError> {
        let slot = self.push_vertex(id, position, radius)?;
        self.rebuild_adjacency();
        trace!(id, slot, "added vertex");
        Ok(slot)
    }

    /// Remove a vertex and every edge touching it. Later slots shift down by one.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<Vertex, GraphError> {
        let slot = self.slot_of(id).ok_or(GraphError::UnknownVertex(id))?;

        self.edges.retain(|e| !e.touches(slot));
        for edge in &mut self.edges {
            if edge.a > slot {
                edge.a -= 1;
            }
            if edge.b > slot {
                edge.b -= 1;
            }
        }

        let removed = self.vertices.remove(slot);
        self.reindex_slots();
        self.rebuild_adjacency();
        trace!(id, slot, "removed vertex");
        Ok(removed)
    }

    /// Connect two existing vertices and return the new edge's index
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<usize, GraphError> {
        let index = self.push_edge(a, b)?;
        self.rebuild_adjacency();
        trace!(a, b, index, "added edge");
        Ok(index)
    }

    /// Remove the edge between two vertices (either order)
    pub fn remove_edge(&mut self, a: VertexId, b: VertexId) -> Result<Edge, GraphError> {
        let slot_a = self.slot_of(a).ok_or(GraphError::UnknownVertex(a))?;
        let slot_b = self.slot_of(b).ok_or(GraphError::UnknownVertex(b))?;
        let index = self
            .edge_connecting(slot_a, slot_b)
            .ok_or(GraphError::UnknownEdge(a, b))?;
        let removed = self.edges.remove(index);
        self.rebuild_adjacency();
        trace!(a, b, "removed edge");
        Ok(removed)
    }

    /// Move a vertex and refresh the boxes that depend on it
    pub fn move_vertex(&mut self, slot: usize, position: Point) -> Result<(), GraphError> {
        let vertex = self.vertex_mut(slot)?;
        if !position.is_finite() {
            return Err(GraphError::InvalidPosition(vertex.id));
        }
        vertex.position = position;
        vertex.recalculate_extents();
        self.recalculate_edges_touching(slot);
        Ok(())
    }

    pub fn set_radius(&mut self, slot: usize, radius: f64) -> Result<(), GraphError> {
        let vertex = self.vertex_mut(slot)?;
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(GraphError::InvalidRadius {
                id: vertex.id,
                radius,
            });
        }
        vertex.radius = radius;
        vertex.recalculate_extents();
        Ok(())
    }

    /// Write back one position per slot, e.g. from a layout tick
    pub fn apply_positions(&mut self, positions: &[Point]) -> Result<(), GraphError> {
        if positions.len() != self.vertices.len() {
            return Err(GraphError::PositionCountMismatch {
                expected: self.vertices.len(),
                actual: positions.len(),
            });
        }
        for (vertex, &position) in self.vertices.iter_mut().zip(positions) {
            vertex.position = position;
            vertex.recalculate_extents();
        }
        for edge in &mut self.edges {
            edge.recalculate_extents(&self.vertices);
        }
        Ok(())
    }

    /// Recompute the adjacency matrix from the edge list
    pub fn rebuild_adjacency(&mut self) {
        let n = self.vertices.len();
        self.matrix = vec![vec![false; n]; n];
        for edge in &self.edges {
            debug_assert!(edge.a < n && edge.b < n, "edge refers to a missing slot");
            self.matrix[edge.a][edge.b] = true;
            self.matrix[edge.b][edge.a] = true;
        }
    }

    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.matrix
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(false)
    }

    /// Slots adjacent to `slot`; empty if the slot does not exist
    pub fn neighbors_of(&self, slot: usize) -> Vec<usize> {
        self.matrix
            .get(slot)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter_map(|(i, &adjacent)| adjacent.then_some(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Index of the edge joining two slots, in either order
    pub fn edge_connecting(&self, a: usize, b: usize) -> Option<usize> {
        self.edges.iter().position(|e| e.connects(a, b))
    }

    /// Topmost vertex whose hit box contains `point`
    pub fn vertex_at(&self, point: Point) -> Option<usize> {
        self.vertices.iter().rposition(|v| v.bbox.inside(point))
    }

    /// Slots of vertices whose boxes intersect `region`
    pub fn vertices_in(&self, region: &BBox) -> Vec<usize> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.bbox.intersects(region))
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Indices of edges whose boxes intersect `region`
    pub fn edges_in(&self, region: &BBox) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.bbox.intersects(region))
            .map(|(index, _)| index)
            .collect()
    }

    fn push_vertex(
        &mut self,
        id: VertexId,
        position: Point,
        radius: f64,
    ) -> Result<usize, GraphError> {
        if self.slots.contains_key(&id) {
            return Err(GraphError::DuplicateVertex(id));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(GraphError::InvalidRadius { id, radius });
        }
        if !position.is_finite() {
            return Err(GraphError::InvalidPosition(id));
        }
        let slot = self.vertices.len();
        self.vertices.push(Vertex::new(id, position, radius));
        self.slots.insert(id, slot);
        Ok(slot)
    }

    fn push_edge(&mut self, a: VertexId, b: VertexId) -> Result<usize, GraphError> {
        let slot_a = self.slot_of(a).ok_or(GraphError::UnknownVertex(a))?;
        let slot_b = self.slot_of(b).ok_or(GraphError::UnknownVertex(b))?;
        if slot_a == slot_b {
            return Err(GraphError::SelfLoop(a));
        }
        if self.edge_connecting(slot_a, slot_b).is_some() {
            return Err(GraphError::DuplicateEdge(a, b));
        }
        self.edges.push(Edge::new(slot_a, slot_b, &self.vertices));
        Ok(self.edges.len() - 1)
    }

    fn vertex_mut(&mut self, slot: usize) -> Result<&mut Vertex, GraphError> {
        let len = self.vertices.len();
        self.vertices
            .get_mut(slot)
            .ok_or(GraphError::SlotOutOfRange { slot, len })
    }

    fn recalculate_edges_touching(&mut self, slot: usize) {
        for edge in self.edges.iter_mut().filter(|e| e.touches(slot)) {
            edge.recalculate_extents(&self.vertices);
        }
    }

    fn reindex_slots(&mut self) {
        self.slots = self
            .vertices
            .iter()
            .enumerate()
            .map(|(slot, v)| (v.id, slot))
            .collect();
    }
}
