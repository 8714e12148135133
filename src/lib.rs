//! Supply-chain batch provenance: shortest-path analysis and delay-impact propagation over
//! per-batch directed graphs of locations and transfers.
pub mod batch;
pub mod dataset;
pub mod delay;
pub mod duration;
pub mod error;
pub mod frames;
pub mod logging;
pub mod path_analyzer;
pub mod schema;
pub mod session;
pub mod settings;
pub mod topology;
pub mod visualization;

#[cfg(test)]
mod fixture;

#[cfg(feature = "python")]
mod model;

pub use batch::{Batch, Edge, EdgeKey, Node, NodeStatus, Supply};
pub use dataset::BatchCatalog;
pub use delay::{apply_delay_delta, DelayDelta};
pub use error::{ProvenanceError, Result};
pub use path_analyzer::{analyze_batch, compute_shortest_path, PathReport, PathResult};
pub use session::ImpactSession;
pub use settings::{AnalysisSettings, DelayFloor};

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyModule;

#[cfg(feature = "python")]
use model::ProvenanceModel;

/// Export schema constants as Python submodules
#[cfg(feature = "python")]
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Batch
    let batch = PyModule::new(m.py(), "batch")?;
    batch.add("BATCH_ID", schema::batch::BATCH_ID)?;
    m.add_submodule(&batch)?;

    // Node
    let node = PyModule::new(m.py(), "node")?;
    node.add("ID", schema::node::ID)?;
    node.add("LABEL", schema::node::LABEL)?;
    node.add("TIMESTAMP", schema::node::TIMESTAMP)?;
    node.add("LOCATION", schema::node::LOCATION)?;
    node.add("TEMPERATURE", schema::node::TEMPERATURE)?;
    node.add("HUMIDITY", schema::node::HUMIDITY)?;
    node.add("STATUS", schema::node::STATUS)?;
    node.add("DELAY", schema::node::DELAY)?;
    m.add_submodule(&node)?;

    // Edge
    let edge = PyModule::new(m.py(), "edge")?;
    edge.add("SOURCE", schema::edge::SOURCE)?;
    edge.add("TARGET", schema::edge::TARGET)?;
    edge.add("ESTIMATED_DURATION", schema::edge::ESTIMATED_DURATION)?;
    edge.add("QUANTITY_PERCENTAGE", schema::edge::QUANTITY_PERCENTAGE)?;
    edge.add("MODE_OF_TRANSPORT", schema::edge::MODE_OF_TRANSPORT)?;
    m.add_submodule(&edge)?;

    // Supply
    let supply = PyModule::new(m.py(), "supply")?;
    supply.add("ID", schema::supply::ID)?;
    supply.add("QUANTITY", schema::supply::QUANTITY)?;
    supply.add("LIFE", schema::supply::LIFE)?;
    m.add_submodule(&supply)?;

    // Path
    let path = PyModule::new(m.py(), "path")?;
    path.add("PATH_INDEX", schema::path::PATH_INDEX)?;
    path.add("DURATION", schema::path::DURATION)?;
    path.add("EDGES", schema::path::EDGES)?;
    path.add("NODES", schema::path::NODES)?;
    path.add("IS_SHORTEST", schema::path::IS_SHORTEST)?;
    path.add("SEPARATOR", schema::path::SEPARATOR)?;
    m.add_submodule(&path)?;

    // Annotation
    let annotation = PyModule::new(m.py(), "annotation")?;
    annotation.add("IS_SOURCE", schema::annotation::IS_SOURCE)?;
    annotation.add("IS_SPLIT", schema::annotation::IS_SPLIT)?;
    annotation.add("IS_MERGE", schema::annotation::IS_MERGE)?;
    annotation.add("IS_DESTINATION", schema::annotation::IS_DESTINATION)?;
    annotation.add(
        "IS_ON_SHORTEST_PATH",
        schema::annotation::IS_ON_SHORTEST_PATH,
    )?;
    annotation.add("DISPLAY_STATUS", schema::annotation::DISPLAY_STATUS)?;
    annotation.add("SHAPE", schema::annotation::SHAPE)?;
    m.add_submodule(&annotation)?;

    Ok(())
}

/// Install the stderr logger. `BATCH_PROVENANCE_LOG_LEVEL` overrides `level`.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (level=None))]
fn init_logging(level: Option<&str>) -> PyResult<()> {
    crate::logging::init(level)?;
    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
#[pyo3(name = "_core")]
fn core_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ProvenanceModel>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
