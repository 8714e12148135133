/// Visualization module: display annotations for the graph-rendering surface.
///
/// Combines a batch, its topology roles and a path report into per-node and per-edge
/// records carrying everything the renderer needs:
/// - Shortest-path highlighting for nodes and edges
/// - Shapes derived from split / merge / source / destination roles
/// - Multi-line node labels with arrival time, location and delay
/// - Edge widths scaled by the share of the batch they carry
///
/// Styling and layout stay on the rendering side. This module only decides what to show.
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde_json::{json, Value};

use crate::batch::{Batch, EdgeKey, NodeStatus, Supply};
use crate::error::Result;
use crate::path_analyzer::PathReport;
use crate::schema::edge::DEFAULT_QUANTITY_PERCENTAGE;
use crate::topology::{classify, NodeRole};

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

// ── Annotated records ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    Diamond,
    Octagon,
    Ellipse,
    Square,
    RoundRectangle,
}

impl NodeShape {
    /// Split wins over merge, merge over source, source over destination.
    pub fn for_role(role: &NodeRole) -> Self {
        if role.is_split {
            NodeShape::Diamond
        } else if role.is_merge {
            NodeShape::Octagon
        } else if role.is_source {
            NodeShape::Ellipse
        } else if role.is_destination {
            NodeShape::Square
        } else {
            NodeShape::RoundRectangle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeShape::Diamond => "diamond",
            NodeShape::Octagon => "octagon",
            NodeShape::Ellipse => "ellipse",
            NodeShape::Square => "square",
            NodeShape::RoundRectangle => "round-rectangle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedNode {
    pub id: String,
    pub label: String,
    pub display_label: String,
    pub timestamp: String,
    pub location: String,
    pub temperature: String,
    pub humidity: String,
    pub status: NodeStatus,
    /// `delayed` whenever the node carries a positive delay, otherwise `status`.
    pub display_status: NodeStatus,
    pub delay: i64,
    #[serde(flatten)]
    pub role: NodeRole,
    pub shape: NodeShape,
    pub is_on_shortest_path: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedEdge {
    pub id: EdgeKey,
    pub source: String,
    pub target: String,
    pub estimated_duration: String,
    pub quantity_percentage: String,
    pub mode_of_transport: String,
    /// Carries less than the whole batch.
    pub partial: bool,
    pub width: u32,
    pub is_on_shortest_path: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedGraph {
    pub nodes: Vec<AnnotatedNode>,
    pub edges: Vec<AnnotatedEdge>,
}

/// Headline figures shown above the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub shortest_path_hours: i64,
    pub total_delay_hours: i64,
    pub path_count: usize,
    pub truncated: bool,
    pub supplies: Vec<Supply>,
}

// ── Annotation ──────────────────────────────────────────────────────────────

/// Annotate every node and edge of `batch` for display.
pub fn annotate(batch: &Batch, report: &PathReport) -> AnnotatedGraph {
    let roles = classify(&batch.nodes, &batch.edges);

    let nodes = batch
        .nodes
        .iter()
        .map(|n| {
            let role = roles.get(n.id.as_str()).copied().unwrap_or_default();
            let display_status = if n.delay > 0 {
                NodeStatus::Delayed
            } else {
                n.status
            };
            AnnotatedNode {
                id: n.id.clone(),
                label: n.label.clone(),
                display_label: display_label(&n.label, &n.timestamp, &n.location, n.delay),
                timestamp: n.timestamp.clone(),
                location: n.location.clone(),
                temperature: n.temperature.clone(),
                humidity: n.humidity.clone(),
                status: n.status,
                display_status,
                delay: n.delay,
                shape: NodeShape::for_role(&role),
                role,
                is_on_shortest_path: report.contains_node(&n.id),
            }
        })
        .collect();

    let edges = batch
        .edges
        .iter()
        .map(|e| {
            let key = e.key();
            let is_on_shortest_path = report.contains_edge(&key);
            let percentage = e.percentage();
            AnnotatedEdge {
                source: e.source.clone(),
                target: e.target.clone(),
                estimated_duration: e.estimated_duration.clone(),
                quantity_percentage: percentage.to_string(),
                mode_of_transport: e.transport().to_string(),
                partial: percentage != DEFAULT_QUANTITY_PERCENTAGE,
                width: edge_width(percentage, is_on_shortest_path),
                is_on_shortest_path,
                id: key,
            }
        })
        .collect();

    AnnotatedGraph { nodes, edges }
}

/// Summary figures for a batch. Total delay is the delay at the first destination node.
pub fn summarize(batch: &Batch, report: &PathReport) -> BatchSummary {
    let roles = classify(&batch.nodes, &batch.edges);
    let total_delay_hours = batch
        .nodes
        .iter()
        .find(|n| roles.get(n.id.as_str()).is_some_and(|r| r.is_destination))
        .map_or(0, |n| n.delay);

    BatchSummary {
        shortest_path_hours: report.min_duration,
        total_delay_hours,
        path_count: report.all_paths.len(),
        truncated: report.truncated,
        supplies: batch.supplies.clone(),
    }
}

impl AnnotatedGraph {
    /// Element list for the renderer: every node, then every edge, each wrapped as
    /// `{"data": {...}}`.
    pub fn to_elements(&self) -> Result<Vec<Value>> {
        let mut elements = Vec::with_capacity(self.nodes.len() + self.edges.len());
        for node in &self.nodes {
            elements.push(json!({ "data": serde_json::to_value(node)? }));
        }
        for edge in &self.edges {
            elements.push(json!({ "data": serde_json::to_value(edge)? }));
        }
        Ok(elements)
    }

    pub fn to_elements_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_elements()?)?)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn display_label(label: &str, timestamp: &str, location: &str, delay: i64) -> String {
    let mut lines = vec![label.to_string()];
    if let Some(time) = clock_time(timestamp) {
        lines.push(time);
    }
    lines.push(location.to_string());
    if delay > 0 {
        lines.push(format!("Delay: +{delay}h"));
    }
    lines.join("\n")
}

/// `H:MM` in the timestamp's own offset, or `None` if the timestamp can't be parsed.
fn clock_time(timestamp: &str) -> Option<String> {
    let timestamp = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.format("%-H:%M").to_string());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
        .map(|dt| dt.format("%-H:%M").to_string())
}

/// A quarter of the carried percentage, never thinner than 2. Highlighted edges get +2.
fn edge_width(percentage: &str, highlighted: bool) -> u32 {
    let pct = percentage
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .unwrap_or(100.0);
    let base = (pct / 25.0).floor().max(2.0) as u32;
    if highlighted {
        base + 2
    } else {
        base
    }
}
