use std::path::PathBuf;

use batch_provenance::dataset::DEFAULT_JSON_FILE;
use batch_provenance::{AnalysisSettings, BatchCatalog, EdgeKey, ImpactSession, NodeStatus};

fn sample_catalog() -> BatchCatalog {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(DEFAULT_JSON_FILE);
    BatchCatalog::from_json_file(&path).unwrap()
}

fn keys(pairs: &[(&str, &str)]) -> Vec<EdgeKey> {
    pairs.iter().map(|(s, t)| EdgeKey::new(*s, *t)).collect()
}

#[test]
fn test_sample_dataset_loads() {
    let catalog = sample_catalog();
    assert_eq!(catalog.ids().collect::<Vec<_>>(), ["B-1001", "B-1002"]);

    let batch = catalog.get("B-1001").unwrap();
    assert_eq!(batch.nodes.len(), 6);
    assert_eq!(batch.edges.len(), 6);
    assert_eq!(batch.supplies[1].life, 72);
    let dc_south = batch.node("dc_south").unwrap();
    assert_eq!(dc_south.delay, 2);
    assert_eq!(dc_south.temperature, "5");
    assert_eq!(dc_south.status, NodeStatus::Delayed);
}

#[test]
fn test_shortest_path_on_load() {
    let catalog = sample_catalog();
    let mut session = ImpactSession::new(AnalysisSettings::default());
    assert!(session.load(&catalog, "B-1001"));

    let report = session.report();
    let durations: Vec<i64> = report.all_paths.iter().map(|p| p.duration).collect();
    assert_eq!(durations, [16, 15]);
    assert_eq!(report.min_duration, 15);
    assert_eq!(
        report.shortest_path.nodes,
        ["farm", "packhouse", "dc_south", "retail"]
    );
    assert!(!report.truncated);
}

#[test]
fn test_delay_flips_shortest_path_and_round_trips() {
    let catalog = sample_catalog();
    let original = catalog.get("B-1001").unwrap();
    let mut session = ImpactSession::default();
    session.load(&catalog, "B-1001");

    assert!(session.select_node("dc_south"));
    assert!(session.increase_delay());

    let report = session.report();
    assert_eq!(report.min_duration, 17);
    assert_eq!(
        report.shortest_path.edges,
        keys(&[
            ("farm", "packhouse"),
            ("packhouse", "cold_store"),
            ("cold_store", "dc_north"),
            ("dc_north", "retail"),
        ])
    );

    let batch = session.batch().unwrap();
    assert_eq!(batch.node("dc_south").unwrap().delay, 3);
    assert_eq!(batch.node("retail").unwrap().delay, 1);
    assert_eq!(batch.node("dc_north").unwrap().delay, 0);
    assert_eq!(batch.edges[5].estimated_duration, "2 hours");
    assert_eq!(batch.edges[4].estimated_duration, "2 hours");

    let summary = session.summary().unwrap();
    assert_eq!(summary.shortest_path_hours, 17);
    assert_eq!(summary.total_delay_hours, 1);

    assert!(session.decrease_delay());
    assert_eq!(session.report().min_duration, 15);
    assert_eq!(session.batch(), Some(&original));

    // The dataset itself is never touched.
    assert_eq!(catalog.get("B-1001"), Some(original));
}

#[test]
fn test_annotation_of_sample_batch() {
    let catalog = sample_catalog();
    let mut session = ImpactSession::default();
    session.load(&catalog, "B-1001");
    let graph = session.annotated().unwrap();

    let packhouse = graph.nodes.iter().find(|n| n.id == "packhouse").unwrap();
    assert!(packhouse.role.is_split);
    assert!(packhouse.is_on_shortest_path);
    assert_eq!(packhouse.display_status, NodeStatus::Delayed);

    let retail = graph.nodes.iter().find(|n| n.id == "retail").unwrap();
    assert!(retail.role.is_merge);
    assert!(retail.role.is_destination);

    let rail = &graph.edges[2];
    assert!(rail.partial);
    assert_eq!(rail.mode_of_transport, "Rail");
    assert!(rail.is_on_shortest_path);
    assert_eq!(graph.edges[3].mode_of_transport, "Truck");
    assert!(!graph.edges[3].is_on_shortest_path);

    let elements: serde_json::Value =
        serde_json::from_str(&graph.to_elements_json().unwrap()).unwrap();
    assert_eq!(elements.as_array().unwrap().len(), 12);
    assert_eq!(elements[0]["data"]["id"], "farm");
    assert_eq!(elements[6]["data"]["id"], "farm-packhouse");
}

#[test]
fn test_disconnected_node_and_missing_batch() {
    let catalog = sample_catalog();
    let mut session = ImpactSession::default();
    assert!(session.load(&catalog, "B-1002"));

    let report = session.report();
    assert_eq!(report.min_duration, 6);
    assert_eq!(report.all_paths.len(), 1);
    assert!(report.all_paths.iter().all(|p| !p.nodes.iter().any(|n| n == "quarantine")));

    assert!(!session.load(&catalog, "B-9999"));
    assert_eq!(session.batch_id(), Some("B-1002"));
    assert!(catalog.get("B-9999").is_none());
}
