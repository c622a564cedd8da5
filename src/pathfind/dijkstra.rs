use serde::Serialize;
use tracing::debug;

use super::heap::IndexedHeap;
use crate::geometry::Point;
use crate::graph::{Graph, VertexId};

/// Outcome of a path query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathResult {
    pub found: bool,
    /// Edge indices, ordered from source to target
    pub edges: Vec<usize>,
}

impl PathResult {
    fn not_found() -> Self {
        Self::default()
    }

    /// Sum of the Euclidean lengths of the path's edges
    pub fn length(&self, graph: &Graph) -> f64 {
        self.edges
            .iter()
            .filter_map(|&i| graph.edge(i))
            .map(|e| {
                let a = graph.vertices()[e.a].position;
                let b = graph.vertices()[e.b].position;
                Point::distance(a, b)
            })
            .sum()
    }
}

/// Shortest path between two slots, weighting edges by Euclidean length.
///
/// Never fails: bad slots, empty graphs and unreachable targets all come back
/// as `found: false`.
pub fn find_path(graph: &Graph, source: usize, target: usize) -> PathResult {
    let n = graph.len();
    if source >= n || target >= n {
        debug!(source, target, vertices = n, "path query out of range");
        return PathResult::not_found();
    }
    if source == target {
        return PathResult {
            found: true,
            edges: Vec::new(),
        };
    }

    let search = settle(graph, source, target);
    let previous = search.previous;

    if previous[target].is_none() {
        debug!(source, target, "no path");
        return PathResult::not_found();
    }

    let mut edges = Vec::new();
    let mut current = target;
    while current != source {
        let Some(prev) = previous[current] else {
            return broken_path(edges);
        };
        let Some(edge) = graph.edge_connecting(prev, current) else {
            return broken_path(edges);
        };
        edges.push(edge);
        current = prev;
    }
    edges.reverse();

    debug!(
        source,
        target,
        hops = edges.len(),
        distance = search.distance,
        settled = search.settled,
        "path found"
    );
    PathResult { found: true, edges }
}

/// [`find_path`] addressed by vertex id
pub fn find_path_by_id(graph: &Graph, source: VertexId, target: VertexId) -> PathResult {
    match (graph.slot_of(source), graph.slot_of(target)) {
        (Some(s), Some(t)) => find_path(graph, s, t),
        _ => {
            debug!(source, target, "path query for unknown vertex");
            PathResult::not_found()
        }
    }
}

/// Predecessor links left by a search, plus bookkeeping for logging
struct Search {
    previous: Vec<Option<usize>>,
    /// Distance to the target, infinite when unreached
    distance: f64,
    /// Vertices extracted from the queue before the search stopped
    settled: usize,
}

/// Run Dijkstra from `source`, stopping as soon as `target` is extracted
fn settle(graph: &Graph, source: usize, target: usize) -> Search {
    let n = graph.len();
    let position = |slot: usize| graph.vertices()[slot].position;

    let mut distance = vec![f64::INFINITY; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    let mut finalized = vec![false; n];
    let mut settled = 0;
    distance[source] = 0.0;

    let mut heap = IndexedHeap::with_capacity(n);
    for (slot, &d) in distance.iter().enumerate() {
        heap.push(slot, d);
    }

    while let Some((u, dist_u)) = heap.pop() {
        // Everything still queued is unreachable
        if dist_u.is_infinite() {
            break;
        }
        finalized[u] = true;
        settled += 1;
        if u == target {
            break;
        }

        for v in graph.neighbors_of(u) {
            if finalized[v] {
                continue;
            }
            let through_u = dist_u + Point::distance(position(u), position(v));
            if through_u < distance[v] {
                distance[v] = through_u;
                previous[v] = Some(u);
                heap.decrease_key(v, through_u);
            }
        }
    }

    Search {
        previous,
        distance: distance[target],
        settled,
    }
}

fn broken_path(mut edges: Vec<usize>) -> PathResult {
    debug!(assembled = edges.len(), "path chain broken during reconstruction");
    edges.reverse();
    PathResult {
        found: false,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two routes from 0 to 2: straight along y=0 (length 2) or via (1,1)
    /// (length 2√2)
    fn diamond() -> Graph {
        Graph::from_parts(
            [
                (0, Point::new(0.0, 0.0), 0.1),
                (1, Point::new(1.0, 0.0), 0.1),
                (2, Point::new(2.0, 0.0), 0.1),
                (3, Point::new(1.0, 1.0), 0.1),
            ],
            [(0, 1), (1, 2), (0, 3), (3, 2)],
        )
        .unwrap()
    }

    #[test]
    fn picks_shorter_euclidean_route() {
        let graph = diamond();
        let result = find_path(&graph, 0, 2);
        assert!(result.found);
        assert_eq!(result.edges, vec![0, 1]);
        assert!((result.length(&graph) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn prefers_distance_over_hop_count() {
        // direct edge 0-2 is long; the three-hop detour is shorter
        let graph = Graph::from_parts(
            [
                (0, Point::new(0.0, 0.0), 0.1),
                (1, Point::new(1.0, 0.1), 0.1),
                (2, Point::new(2.0, 0.1), 0.1),
                (3, Point::new(3.0, 0.0), 0.1),
                (4, Point::new(1.5, 10.0), 0.1),
            ],
            [(0, 4), (4, 3), (0, 1), (1, 2), (2, 3)],
        )
        .unwrap();
        let result = find_path(&graph, 0, 3);
        assert!(result.found);
        assert_eq!(result.edges, vec![2, 3, 4]);
    }

    #[test]
    fn path_edges_run_from_source_to_target() {
        let graph = diamond();
        let result = find_path(&graph, 2, 0);
        assert!(result.found);
        assert_eq!(result.edges, vec![1, 0]);
    }

    #[test]
    fn stops_once_target_is_settled() {
        // target sits next to the source; a long reachable tail hangs off it
        let graph = Graph::from_parts(
            [
                (0, Point::new(0.0, 0.0), 0.1),
                (1, Point::new(1.0, 0.0), 0.1),
                (2, Point::new(-5.0, 0.0), 0.1),
                (3, Point::new(-6.0, 0.0), 0.1),
                (4, Point::new(-7.0, 0.0), 0.1),
            ],
            [(0, 1), (0, 2), (2, 3), (3, 4)],
        )
        .unwrap();

        let search = settle(&graph, 0, 1);
        assert_eq!(search.settled, 2);
        assert_eq!(search.distance, 1.0);
        assert_eq!(search.previous[3], None);
        assert_eq!(find_path(&graph, 0, 1).edges, vec![0]);
    }

    #[test]
    fn unreachable_component_is_never_settled() {
        let mut graph = diamond();
        graph.add_vertex(10, Point::new(8.0, 8.0), 0.1).unwrap();
        graph.add_vertex(11, Point::new(9.0, 8.0), 0.1).unwrap();
        graph.add_edge(10, 11).unwrap();

        let search = settle(&graph, 0, graph.slot_of(11).unwrap());
        assert_eq!(search.settled, 4);
        assert!(search.distance.is_infinite());
    }

    #[test]
    fn isolated_target_is_not_found() {
        let mut graph = diamond();
        graph.add_vertex(9, Point::new(5.0, 5.0), 0.1).unwrap();
        let result = find_path(&graph, 0, 4);
        assert!(!result.found);
        assert!(result.edges.is_empty());
    }

    #[test]
    fn self_path_is_found_and_empty() {
        let graph = diamond();
        for slot in 0..graph.len() {
            let result = find_path(&graph, slot, slot);
            assert!(result.found);
            assert!(result.edges.is_empty());
        }
    }

    #[test]
    fn bad_queries_degrade_to_not_found() {
        let empty = Graph::new();
        assert_eq!(find_path(&empty, 0, 0), PathResult::default());

        let graph = diamond();
        assert!(!find_path(&graph, 0, 42).found);
        assert!(!find_path(&graph, 42, 0).found);
        assert!(!find_path_by_id(&graph, 0, 77).found);
    }

    #[test]
    fn lookup_by_id_uses_slots() {
        let graph = Graph::from_parts(
            [
                (100, Point::new(0.0, 0.0), 0.1),
                (200, Point::new(0.0, 3.0), 0.1),
                (300, Point::new(4.0, 3.0), 0.1),
            ],
            [(100, 200), (200, 300)],
        )
        .unwrap();
        let result = find_path_by_id(&graph, 100, 300);
        assert!(result.found);
        assert_eq!(result.edges, vec![0, 1]);
        assert!((result.length(&graph) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn serializes_as_plain_data() {
        let graph = diamond();
        insta::assert_json_snapshot!(find_path(&graph, 0, 2), @r###"
        {
          "found": true,
          "edges": [
            0,
            1
          ]
        }
        "###);
    }
}
