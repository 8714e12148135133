use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::batch::{connected_edges, Edge, Node};

/// Structural role of a node, derived from its degree in the current edge set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeRole {
    pub is_source: bool,
    pub is_split: bool,
    pub is_merge: bool,
    pub is_destination: bool,
}

impl NodeRole {
    fn from_degree(incoming: usize, outgoing: usize) -> Self {
        Self {
            is_source: incoming == 0,
            is_split: outgoing > 1,
            is_merge: incoming > 1,
            is_destination: outgoing == 0,
        }
    }
}

/// Classify every node, keyed by id in node order. Isolated nodes count as both source and
/// destination.
pub fn classify(nodes: &[Node], edges: &[Edge]) -> IndexMap<String, NodeRole> {
    let mut incoming: HashMap<&str, usize> = HashMap::new();
    let mut outgoing: HashMap<&str, usize> = HashMap::new();
    for (_, edge) in connected_edges(nodes, edges) {
        *outgoing.entry(edge.source.as_str()).or_default() += 1;
        *incoming.entry(edge.target.as_str()).or_default() += 1;
    }

    let mut roles = IndexMap::with_capacity(nodes.len());
    for node in nodes {
        let id = node.id.as_str();
        roles.entry(node.id.clone()).or_insert_with(|| {
            NodeRole::from_degree(
                incoming.get(id).copied().unwrap_or(0),
                outgoing.get(id).copied().unwrap_or(0),
            )
        });
    }
    roles
}
