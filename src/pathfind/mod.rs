//! Shortest-path search over the graph model
//!
//! Dijkstra's algorithm with Euclidean edge weights. The frontier lives in an
//! [`IndexedHeap`], a binary heap with a position map so relaxing an edge is a
//! logarithmic decrease-key instead of a re-insert.
//!
//! The search stops as soon as the target is extracted from the frontier, so
//! queries between nearby vertices in a large graph touch only a small part of
//! it.

mod dijkstra;
mod heap;

pub use dijkstra::{PathResult, find_path, find_path_by_id};
pub use heap::IndexedHeap;
