use std::collections::HashMap;

use log::{debug, warn};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::Direction;
use serde::Serialize;

use crate::batch::{connected_edges, Batch, Edge, EdgeKey, Node};
use crate::settings::AnalysisSettings;

/// Node payload: the id and the delay charged when a path leaves (or ends at) the node.
#[derive(Debug, Clone)]
struct Stop {
    id: String,
    delay: i64,
}

/// Edge payload: parsed transit hours plus the edge identity.
#[derive(Debug, Clone)]
struct Leg {
    hours: i64,
    key: EdgeKey,
}

/// One enumerated root-to-leaf path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub duration: i64,
    /// Edges in travel order.
    pub path: Vec<EdgeKey>,
    /// Node ids in travel order, starting at the root.
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShortestPath {
    pub edges: Vec<EdgeKey>,
    pub nodes: Vec<String>,
}

/// Outcome of a path analysis over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathReport {
    pub min_duration: i64,
    pub shortest_path: ShortestPath,
    pub all_paths: Vec<PathResult>,
    /// Set when enumeration stopped at `max_paths` or `max_depth`.
    pub truncated: bool,
}

impl PathReport {
    pub fn contains_node(&self, id: &str) -> bool {
        self.shortest_path.nodes.iter().any(|n| n == id)
    }

    pub fn contains_edge(&self, key: &EdgeKey) -> bool {
        self.shortest_path.edges.contains(key)
    }
}

/// Enumerates root-to-leaf paths through a batch and picks the fastest one.
///
/// Builds a petgraph DiGraph over the nodes and every edge whose endpoints exist.
pub struct PathAnalyzer {
    graph: DiGraph<Stop, Leg>,
    /// Outgoing edges per node, kept in dataset order for deterministic tie-breaks.
    outgoing: Vec<Vec<EdgeIndex>>,
    /// Nodes with no incoming edges, in order of first appearance as an edge source.
    roots: Vec<NodeIndex>,
}

impl PathAnalyzer {
    pub fn new(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();

        for node in nodes {
            node_map.entry(node.id.as_str()).or_insert_with(|| {
                graph.add_node(Stop {
                    id: node.id.clone(),
                    delay: node.delay,
                })
            });
        }

        let mut outgoing = vec![Vec::new(); graph.node_count()];
        let mut sources = Vec::new();
        for (_, edge) in connected_edges(nodes, edges) {
            let src = node_map[edge.source.as_str()];
            let dst = node_map[edge.target.as_str()];
            let idx = graph.add_edge(
                src,
                dst,
                Leg {
                    hours: edge.duration_hours(),
                    key: edge.key(),
                },
            );
            outgoing[src.index()].push(idx);
            if !sources.contains(&src) {
                sources.push(src);
            }
        }

        let roots = sources
            .into_iter()
            .filter(|&idx| {
                graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();

        Self {
            graph,
            outgoing,
            roots,
        }
    }

    /// A leaf has incoming edges but no outgoing ones. Isolated nodes are neither.
    fn is_leaf(&self, idx: NodeIndex) -> bool {
        self.outgoing[idx.index()].is_empty()
            && self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_some()
    }

    pub fn analyze(&self, settings: &AnalysisSettings) -> PathReport {
        let mut walk = Walk {
            settings,
            on_path: vec![false; self.graph.node_count()],
            nodes: Vec::new(),
            legs: Vec::new(),
            found: Vec::new(),
            saturated: false,
            truncated: false,
        };

        for &root in &self.roots {
            if walk.saturated {
                break;
            }
            walk.on_path[root.index()] = true;
            walk.nodes.push(root);
            self.enumerate_paths(root, 0, &mut walk);
            walk.nodes.pop();
            walk.on_path[root.index()] = false;
        }

        if walk.truncated {
            warn!(
                "Path enumeration truncated after {} path(s) (max_paths = {}, max_depth = {})",
                walk.found.len(),
                settings.max_paths,
                settings.max_depth
            );
        }

        let report = summarize(walk.found, walk.truncated);
        debug!(
            "Enumerated {} path(s) from {} root(s); shortest takes {} hours",
            report.all_paths.len(),
            self.roots.len(),
            report.min_duration
        );
        report
    }

    /// Recursive DFS over simple paths, accumulating edge hours plus the delay of each node
    /// that is left behind.
    fn enumerate_paths(&self, current: NodeIndex, elapsed: i64, walk: &mut Walk<'_>) {
        if self.is_leaf(current) {
            let duration = elapsed.saturating_add(self.graph[current].delay);
            walk.record(&self.graph, duration);
            return;
        }

        if walk.legs.len() >= walk.settings.max_depth {
            walk.truncated = true;
            return;
        }

        let delay = self.graph[current].delay;
        for &edge_idx in &self.outgoing[current.index()] {
            if walk.saturated {
                return;
            }
            let Some((_, target)) = self.graph.edge_endpoints(edge_idx) else {
                continue;
            };
            if walk.on_path[target.index()] {
                continue;
            }

            walk.on_path[target.index()] = true;
            walk.nodes.push(target);
            walk.legs.push(edge_idx);
            let hours = self.graph[edge_idx].hours;
            let elapsed = elapsed.saturating_add(hours).saturating_add(delay);
            self.enumerate_paths(target, elapsed, walk);
            walk.legs.pop();
            walk.nodes.pop();
            walk.on_path[target.index()] = false;
        }
    }
}

/// Mutable state threaded through the DFS.
struct Walk<'a> {
    settings: &'a AnalysisSettings,
    on_path: Vec<bool>,
    nodes: Vec<NodeIndex>,
    legs: Vec<EdgeIndex>,
    found: Vec<PathResult>,
    /// A path beyond `max_paths` was reached; stop exploring.
    saturated: bool,
    truncated: bool,
}

impl Walk<'_> {
    fn record(&mut self, graph: &DiGraph<Stop, Leg>, duration: i64) {
        if self.found.len() >= self.settings.max_paths {
            self.saturated = true;
            self.truncated = true;
            return;
        }
        self.found.push(PathResult {
            duration,
            path: self.legs.iter().map(|&e| graph[e].key.clone()).collect(),
            nodes: self.nodes.iter().map(|&n| graph[n].id.clone()).collect(),
        });
    }
}

fn summarize(all_paths: Vec<PathResult>, truncated: bool) -> PathReport {
    // Ties go to the first path in enumeration order
    let (min_duration, shortest_path) = match all_paths.iter().min_by_key(|p| p.duration) {
        Some(p) => (
            p.duration,
            ShortestPath {
                edges: p.path.clone(),
                nodes: p.nodes.clone(),
            },
        ),
        None => (0, ShortestPath::default()),
    };

    PathReport {
        min_duration,
        shortest_path,
        all_paths,
        truncated,
    }
}

/// Enumerate every root-to-leaf path over `nodes`/`edges` and select the fastest.
pub fn compute_shortest_path(
    nodes: &[Node],
    edges: &[Edge],
    settings: &AnalysisSettings,
) -> PathReport {
    PathAnalyzer::new(nodes, edges).analyze(settings)
}

pub fn analyze_batch(batch: &Batch, settings: &AnalysisSettings) -> PathReport {
    compute_shortest_path(&batch.nodes, &batch.edges, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{chain_batch, diamond_batch, edge, node};
    use rstest::rstest;

    fn keys(path: &[EdgeKey]) -> Vec<String> {
        path.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    fn test_linear_chain(chain_batch: Batch) {
        let report = analyze_batch(&chain_batch, &AnalysisSettings::default());

        // 2h edge + 0 delay at A, 3h edge + 1h delay at B, 0 at C
        assert_eq!(report.min_duration, 6);
        assert_eq!(report.all_paths.len(), 1);
        assert_eq!(keys(&report.shortest_path.edges), ["A-B", "B-C"]);
        assert_eq!(report.shortest_path.nodes, ["A", "B", "C"]);
        assert!(!report.truncated);
    }

    #[rstest]
    fn test_diamond_enumerates_every_path(diamond_batch: Batch) {
        let report = analyze_batch(&diamond_batch, &AnalysisSettings::default());

        assert_eq!(report.all_paths.len(), 2);
        // S-L-T = 1 + 4, S-R-T = 2 + 1
        assert_eq!(report.all_paths[0].duration, 5);
        assert_eq!(report.all_paths[1].duration, 3);
        assert_eq!(report.min_duration, 3);
        assert_eq!(report.shortest_path.nodes, ["S", "R", "T"]);
        assert!(report.contains_node("R"));
        assert!(!report.contains_node("L"));
        assert!(report.contains_edge(&EdgeKey::new("R", "T")));
    }

    #[test]
    fn test_leaf_delay_counted_once() {
        let nodes = vec![node("A", 1), node("B", 2), node("C", 5)];
        let edges = vec![edge("A", "B", "1 hours"), edge("B", "C", "1 hours")];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        assert_eq!(report.min_duration, 1 + 1 + 1 + 2 + 5);
    }

    #[test]
    fn test_tie_break_is_first_in_enumeration_order() {
        let nodes = vec![node("S", 0), node("X", 0), node("Y", 0), node("T", 0)];
        let edges = vec![
            edge("S", "X", "2 hours"),
            edge("S", "Y", "2 hours"),
            edge("X", "T", "1 hours"),
            edge("Y", "T", "1 hours"),
        ];
        let settings = AnalysisSettings::default();
        let first = compute_shortest_path(&nodes, &edges, &settings);
        for _ in 0..5 {
            assert_eq!(compute_shortest_path(&nodes, &edges, &settings), first);
        }
        assert_eq!(first.shortest_path.nodes, ["S", "X", "T"]);
    }

    #[test]
    fn test_multiple_roots_in_edge_order() {
        let nodes = vec![node("R1", 0), node("R2", 0), node("M", 0), node("T", 0)];
        let edges = vec![
            edge("R2", "M", "3 hours"),
            edge("R1", "M", "3 hours"),
            edge("M", "T", "1 hours"),
        ];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        assert_eq!(report.all_paths.len(), 2);
        assert_eq!(report.all_paths[0].nodes[0], "R2");
        assert_eq!(report.shortest_path.nodes, ["R2", "M", "T"]);
    }

    #[test]
    fn test_empty_graph() {
        let report = compute_shortest_path(&[], &[], &AnalysisSettings::default());
        assert_eq!(report.min_duration, 0);
        assert!(report.all_paths.is_empty());
        assert!(report.shortest_path.edges.is_empty());
        assert!(report.shortest_path.nodes.is_empty());
    }

    #[test]
    fn test_disconnected_node_excluded() {
        let nodes = vec![node("A", 0), node("B", 0), node("Lonely", 9)];
        let edges = vec![edge("A", "B", "2 hours")];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        assert_eq!(report.all_paths.len(), 1);
        assert_eq!(report.min_duration, 2);
        assert!(report
            .all_paths
            .iter()
            .all(|p| !p.nodes.iter().any(|n| n == "Lonely")));
    }

    #[test]
    fn test_malformed_duration_counts_as_zero() {
        let nodes = vec![node("A", 0), node("B", 0), node("C", 0)];
        let edges = vec![edge("A", "B", "unknown"), edge("B", "C", "3 hours")];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        assert_eq!(report.min_duration, 3);
    }

    #[test]
    fn test_dangling_edges_ignored() {
        let nodes = vec![node("A", 0), node("B", 0)];
        let edges = vec![edge("A", "B", "2 hours"), edge("B", "Ghost", "1 hours")];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        assert_eq!(report.all_paths.len(), 1);
        assert_eq!(report.shortest_path.nodes, ["A", "B"]);
    }

    #[test]
    fn test_cycle_is_guarded() {
        // R -> A -> B -> A is a cycle; B -> T escapes it
        let nodes = vec![node("R", 0), node("A", 0), node("B", 0), node("T", 0)];
        let edges = vec![
            edge("R", "A", "1 hours"),
            edge("A", "B", "1 hours"),
            edge("B", "A", "1 hours"),
            edge("B", "T", "1 hours"),
        ];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        assert_eq!(report.all_paths.len(), 1);
        assert_eq!(report.shortest_path.nodes, ["R", "A", "B", "T"]);
    }

    #[test]
    fn test_duplicate_edges_yield_separate_paths() {
        let nodes = vec![node("A", 0), node("B", 0)];
        let edges = vec![edge("A", "B", "5 hours"), edge("A", "B", "2 hours")];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        assert_eq!(report.all_paths.len(), 2);
        assert_eq!(report.min_duration, 2);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let nodes = vec![node("A", 0), node("B", 5), node("C", 0)];
        let edges = vec![
            edge("A", "B", "9223372036854775807 hours"),
            edge("B", "C", "1 hours"),
        ];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        assert_eq!(report.min_duration, i64::MAX);
        assert_eq!(report.all_paths.len(), 1);
    }

    #[rstest]
    fn test_max_paths_truncates(diamond_batch: Batch) {
        let settings = AnalysisSettings {
            max_paths: 1,
            ..AnalysisSettings::default()
        };
        let report = analyze_batch(&diamond_batch, &settings);
        assert!(report.truncated);
        assert_eq!(report.all_paths.len(), 1);
        assert_eq!(report.min_duration, 5);
    }

    #[rstest]
    fn test_max_paths_exactly_reached(diamond_batch: Batch) {
        let settings = AnalysisSettings {
            max_paths: 2,
            ..AnalysisSettings::default()
        };
        let report = analyze_batch(&diamond_batch, &settings);
        assert!(!report.truncated);
        assert_eq!(report.min_duration, 3);
    }

    #[rstest]
    fn test_max_depth_truncates(chain_batch: Batch) {
        let settings = AnalysisSettings {
            max_depth: 1,
            ..AnalysisSettings::default()
        };
        let report = analyze_batch(&chain_batch, &settings);
        assert!(report.truncated);
        assert!(report.all_paths.is_empty());
        assert_eq!(report.min_duration, 0);
    }
}
