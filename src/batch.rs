//! Batch records: shipment nodes, transfer edges and supply summaries.
use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize, Serializer};

use crate::duration;
use crate::schema::edge::{DEFAULT_MODE_OF_TRANSPORT, DEFAULT_QUANTITY_PERCENTAGE};

/// Condition reported for a shipment node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Delayed,
    Spoiled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeStatus {
    /// Lenient parse used by the tabular loaders.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "delayed" => Self::Delayed,
            "spoiled" => Self::Spoiled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Delayed => "delayed",
            Self::Spoiled => "spoiled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in the shipment's journey (farm, warehouse, port, store...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub temperature: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub humidity: String,
    #[serde(default)]
    pub status: NodeStatus,
    /// Accumulated delay in hours.
    #[serde(
        default,
        deserialize_with = "lenient::hours",
        serialize_with = "lenient::hours_as_string"
    )]
    pub delay: i64,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            timestamp: String::new(),
            location: String::new(),
            temperature: String::new(),
            humidity: String::new(),
            status: NodeStatus::Unknown,
            delay: 0,
        }
    }

    pub fn with_delay(mut self, delay: i64) -> Self {
        self.delay = delay;
        self
    }
}

/// Identity of an edge for traversal and highlighting: the ordered `(source, target)` pair.
///
/// Duplicate edges between the same pair share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: String,
    pub target: String,
}

impl EdgeKey {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

impl Serialize for EdgeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A transfer between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(deserialize_with = "lenient::text")]
    pub source: String,
    #[serde(deserialize_with = "lenient::text")]
    pub target: String,
    /// Transit time label, e.g. `"4 hours"`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub estimated_duration: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity_percentage: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode_of_transport: Option<String>,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        estimated_duration: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            estimated_duration: estimated_duration.into(),
            quantity_percentage: None,
            mode_of_transport: None,
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source.as_str(), self.target.as_str())
    }

    /// Transit time in hours; unparseable labels count as zero.
    pub fn duration_hours(&self) -> i64 {
        duration::parse_hours(&self.estimated_duration)
    }

    /// Share of the batch carried on this edge, defaulting to the whole batch.
    pub fn percentage(&self) -> &str {
        self.quantity_percentage
            .as_deref()
            .unwrap_or(DEFAULT_QUANTITY_PERCENTAGE)
    }

    pub fn transport(&self) -> &str {
        self.mode_of_transport
            .as_deref()
            .unwrap_or(DEFAULT_MODE_OF_TRANSPORT)
    }
}

/// Summary of a raw supply that fed the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub quantity: String,
    /// Shelf life in hours.
    #[serde(default, deserialize_with = "lenient::hours")]
    pub life: i64,
}

/// A named provenance graph as stored in the batch dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default)]
    pub supplies: Vec<Supply>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Batch {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            supplies: Vec::new(),
            nodes,
            edges,
        }
    }

    /// First node carrying the given id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges referencing a node that is not part of the batch.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        let known = node_ids(&self.nodes);
        self.edges
            .iter()
            .filter(|e| !is_connected(&known, e))
            .collect()
    }
}

fn node_ids(nodes: &[Node]) -> HashSet<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

fn is_connected(known: &HashSet<&str>, edge: &Edge) -> bool {
    known.contains(edge.source.as_str()) && known.contains(edge.target.as_str())
}

/// Edges whose endpoints both exist in `nodes`, in their original order.
///
/// Dangling edges are dropped so every consumer sees the same graph.
pub(crate) fn connected_edges<'a>(nodes: &[Node], edges: &'a [Edge]) -> Vec<(usize, &'a Edge)> {
    let known = node_ids(nodes);
    let mut kept = Vec::with_capacity(edges.len());
    let mut dropped = 0usize;
    for (i, edge) in edges.iter().enumerate() {
        if is_connected(&known, edge) {
            kept.push((i, edge));
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!("Ignoring {dropped} edge(s) that reference unknown nodes");
    }
    kept
}

/// Deserializers that accept either JSON numbers or strings for loosely typed fields.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::duration::parse_delay;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Bool(bool),
        Text(String),
    }

    impl Raw {
        fn into_text(self) -> String {
            match self {
                Raw::Int(v) => v.to_string(),
                Raw::Float(v) => v.to_string(),
                Raw::Bool(v) => v.to_string(),
                Raw::Text(s) => s,
            }
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<Raw>::deserialize(d)?
            .map(Raw::into_text)
            .unwrap_or_default())
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Raw>::deserialize(d)?.map(Raw::into_text))
    }

    pub fn hours<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(match Option::<Raw>::deserialize(d)? {
            Some(Raw::Int(v)) => v,
            Some(Raw::Float(v)) if v.is_finite() => v.trunc() as i64,
            Some(Raw::Text(s)) => parse_delay(&s),
            _ => 0,
        })
    }

    pub fn hours_as_string<S: Serializer>(hours: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(hours)
    }
}
