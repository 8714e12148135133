//! Tabular views of path reports and annotated graphs as polars DataFrames.
use polars::prelude::{Column, DataFrame};

use crate::error::Result;
use crate::path_analyzer::PathReport;
use crate::schema::{annotation, edge, node, path};
use crate::visualization::{AnnotatedGraph, AnnotatedNode};

/// One row per enumerated path, in enumeration order.
///
/// Columns: path_index, duration, edges, nodes, is_shortest. Edge and node sequences are
/// flattened with [`path::SEPARATOR`]. Only the first path reaching the minimum is flagged.
pub fn paths_frame(report: &PathReport) -> Result<DataFrame> {
    let n = report.all_paths.len();
    let mut indices = Vec::with_capacity(n);
    let mut durations = Vec::with_capacity(n);
    let mut edge_seqs = Vec::with_capacity(n);
    let mut node_seqs = Vec::with_capacity(n);
    let mut shortest = Vec::with_capacity(n);

    let mut flagged = false;
    for (i, p) in report.all_paths.iter().enumerate() {
        indices.push(i as i64);
        durations.push(p.duration);
        edge_seqs.push(
            p.path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(path::SEPARATOR),
        );
        node_seqs.push(p.nodes.join(path::SEPARATOR));

        let is_shortest = !flagged && p.duration == report.min_duration;
        flagged |= is_shortest;
        shortest.push(is_shortest);
    }

    let df = DataFrame::new(vec![
        Column::new(path::PATH_INDEX.into(), &indices),
        Column::new(path::DURATION.into(), &durations),
        Column::new(path::EDGES.into(), &edge_seqs),
        Column::new(path::NODES.into(), &node_seqs),
        Column::new(path::IS_SHORTEST.into(), &shortest),
    ])?;
    Ok(df)
}

/// One row per node with its delay, display status and topology flags.
pub fn nodes_frame(graph: &AnnotatedGraph) -> Result<DataFrame> {
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    let labels: Vec<&str> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
    let locations: Vec<&str> = graph.nodes.iter().map(|n| n.location.as_str()).collect();
    let statuses: Vec<&str> = graph.nodes.iter().map(|n| n.status.as_str()).collect();
    let display: Vec<&str> = graph
        .nodes
        .iter()
        .map(|n| n.display_status.as_str())
        .collect();
    let delays: Vec<i64> = graph.nodes.iter().map(|n| n.delay).collect();
    let flag = |f: fn(&AnnotatedNode) -> bool| -> Vec<bool> {
        graph.nodes.iter().map(f).collect()
    };
    let shapes: Vec<&str> = graph.nodes.iter().map(|n| n.shape.as_str()).collect();

    let df = DataFrame::new(vec![
        Column::new(node::ID.into(), &ids),
        Column::new(node::LABEL.into(), &labels),
        Column::new(node::LOCATION.into(), &locations),
        Column::new(node::STATUS.into(), &statuses),
        Column::new(annotation::DISPLAY_STATUS.into(), &display),
        Column::new(node::DELAY.into(), &delays),
        Column::new(annotation::IS_SOURCE.into(), &flag(|n| n.role.is_source)),
        Column::new(annotation::IS_SPLIT.into(), &flag(|n| n.role.is_split)),
        Column::new(annotation::IS_MERGE.into(), &flag(|n| n.role.is_merge)),
        Column::new(
            annotation::IS_DESTINATION.into(),
            &flag(|n| n.role.is_destination),
        ),
        Column::new(
            annotation::IS_ON_SHORTEST_PATH.into(),
            &flag(|n| n.is_on_shortest_path),
        ),
        Column::new(annotation::SHAPE.into(), &shapes),
    ])?;
    Ok(df)
}

/// One row per edge with its transit label, share and highlighting.
pub fn edges_frame(graph: &AnnotatedGraph) -> Result<DataFrame> {
    let sources: Vec<&str> = graph.edges.iter().map(|e| e.source.as_str()).collect();
    let targets: Vec<&str> = graph.edges.iter().map(|e| e.target.as_str()).collect();
    let durations: Vec<&str> = graph
        .edges
        .iter()
        .map(|e| e.estimated_duration.as_str())
        .collect();
    let percentages: Vec<&str> = graph
        .edges
        .iter()
        .map(|e| e.quantity_percentage.as_str())
        .collect();
    let modes: Vec<&str> = graph
        .edges
        .iter()
        .map(|e| e.mode_of_transport.as_str())
        .collect();
    let on_path: Vec<bool> = graph.edges.iter().map(|e| e.is_on_shortest_path).collect();

    let df = DataFrame::new(vec![
        Column::new(edge::SOURCE.into(), &sources),
        Column::new(edge::TARGET.into(), &targets),
        Column::new(edge::ESTIMATED_DURATION.into(), &durations),
        Column::new(edge::QUANTITY_PERCENTAGE.into(), &percentages),
        Column::new(edge::MODE_OF_TRANSPORT.into(), &modes),
        Column::new(annotation::IS_ON_SHORTEST_PATH.into(), &on_path),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::fixture::{diamond_batch, edge as make_edge, node as make_node};
    use crate::path_analyzer::{analyze_batch, compute_shortest_path};
    use crate::settings::AnalysisSettings;
    use crate::visualization::annotate;
    use rstest::rstest;

    #[rstest]
    fn test_paths_frame(diamond_batch: Batch) {
        let report = analyze_batch(&diamond_batch, &AnalysisSettings::default());
        let df = paths_frame(&report).unwrap();

        assert_eq!(df.height(), 2);
        let durations = df.column(path::DURATION).unwrap().i64().unwrap();
        assert_eq!(durations.get(0), Some(5));
        assert_eq!(durations.get(1), Some(3));

        let edges = df.column(path::EDGES).unwrap().str().unwrap();
        assert_eq!(edges.get(1), Some("S-R > R-T"));

        let shortest = df.column(path::IS_SHORTEST).unwrap().bool().unwrap();
        assert_eq!(shortest.get(0), Some(false));
        assert_eq!(shortest.get(1), Some(true));
    }

    #[test]
    fn test_paths_frame_flags_first_tie_only() {
        let nodes = vec![make_node("A", 0), make_node("B", 0)];
        let edges = vec![make_edge("A", "B", "1 hours"), make_edge("A", "B", "1 hours")];
        let report = compute_shortest_path(&nodes, &edges, &AnalysisSettings::default());
        let df = paths_frame(&report).unwrap();
        let shortest = df.column(path::IS_SHORTEST).unwrap().bool().unwrap();
        assert_eq!(shortest.get(0), Some(true));
        assert_eq!(shortest.get(1), Some(false));
    }

    #[test]
    fn test_paths_frame_empty() {
        let df = paths_frame(&PathReport::default()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 5);
    }

    #[rstest]
    fn test_nodes_and_edges_frames(diamond_batch: Batch) {
        let report = analyze_batch(&diamond_batch, &AnalysisSettings::default());
        let graph = annotate(&diamond_batch, &report);

        let nodes = nodes_frame(&graph).unwrap();
        assert_eq!(nodes.height(), 4);
        let split = nodes.column(annotation::IS_SPLIT).unwrap().bool().unwrap();
        assert_eq!(split.get(0), Some(true));
        let shapes = nodes.column(annotation::SHAPE).unwrap().str().unwrap();
        assert_eq!(shapes.get(3), Some("octagon"));

        let edges = edges_frame(&graph).unwrap();
        assert_eq!(edges.height(), 4);
        let on_path = edges
            .column(annotation::IS_ON_SHORTEST_PATH)
            .unwrap()
            .bool()
            .unwrap();
        assert_eq!(on_path.get(0), Some(false));
        assert_eq!(on_path.get(1), Some(true));
    }
}
