//! Propagation of a delay change from one node to everything downstream of it.
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use log::debug;

use crate::batch::{connected_edges, Batch};
use crate::duration::{format_hours, try_parse_hours};
use crate::settings::AnalysisSettings;

/// A one-hour change requested at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayDelta {
    Increase,
    Decrease,
}

impl DelayDelta {
    pub fn hours(self) -> i64 {
        match self {
            DelayDelta::Increase => 1,
            DelayDelta::Decrease => -1,
        }
    }

    /// Map a signed hour step onto a delta. Only `+1` and `-1` are meaningful.
    pub fn from_hours(hours: i64) -> Option<Self> {
        match hours {
            1 => Some(DelayDelta::Increase),
            -1 => Some(DelayDelta::Decrease),
            _ => None,
        }
    }
}

impl fmt::Display for DelayDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}h", self.hours())
    }
}

/// Apply `delta` at `origin` and return the updated batch. The input is left untouched.
///
/// Every node reachable from `origin` (the origin included) has its delay shifted by `delta`.
/// Only the edges leaving `origin` directly have their transit time shifted too. An origin that
/// is not part of the batch leaves it unchanged.
pub fn apply_delay_delta(
    batch: &Batch,
    origin: &str,
    delta: DelayDelta,
    settings: &AnalysisSettings,
) -> Batch {
    let mut updated = batch.clone();

    if batch.node(origin).is_none() {
        debug!("Ignoring {delta} at unknown node '{origin}'");
        return updated;
    }

    let mut outgoing: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, edge) in connected_edges(&batch.nodes, &batch.edges) {
        outgoing.entry(edge.source.as_str()).or_default().push(i);
    }

    let floor = settings.delay_floor;
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([origin]);
    let mut retimed = 0usize;

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }

        for &i in outgoing.get(current).into_iter().flatten() {
            let edge = &batch.edges[i];
            if visited.contains(edge.target.as_str()) {
                continue;
            }
            if current == origin {
                if let Some(hours) = try_parse_hours(&edge.estimated_duration) {
                    updated.edges[i].estimated_duration =
                        format_hours(floor.apply(hours.saturating_add(delta.hours())));
                    retimed += 1;
                }
            }
            queue.push_back(edge.target.as_str());
        }
    }

    for node in &mut updated.nodes {
        if visited.contains(node.id.as_str()) {
            node.delay = floor.apply(node.delay.saturating_add(delta.hours()));
        }
    }

    debug!(
        "Applied {delta} at '{origin}': {} node(s) delayed, {retimed} edge(s) retimed",
        visited.len()
    );
    updated
}
