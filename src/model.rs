use std::path::PathBuf;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use pyo3_polars::PyDataFrame;

use crate::dataset::{BatchCatalog, DEFAULT_JSON_FILE};
use crate::delay::DelayDelta;
use crate::error::ProvenanceError;
use crate::frames::{edges_frame, nodes_frame, paths_frame};
use crate::session::ImpactSession;
use crate::settings::{AnalysisSettings, SETTINGS_FILE_NAME};

#[pyclass]
pub struct ProvenanceModel {
    base_path: PathBuf,
    catalog: Option<BatchCatalog>,
    session: ImpactSession,
}

impl ProvenanceModel {
    fn catalog(&self) -> Result<&BatchCatalog, ProvenanceError> {
        self.catalog.as_ref().ok_or(ProvenanceError::NotLoaded)
    }

    fn require_batch(&self) -> Result<(), ProvenanceError> {
        match self.session.batch() {
            Some(_) => Ok(()),
            None => Err(ProvenanceError::NotLoaded),
        }
    }
}

#[pymethods]
impl ProvenanceModel {
    /// `settings_file` is resolved against `base_path` and defaults to `settings.toml`.
    /// A missing file means default settings. The logger is installed at the settings'
    /// `log_level` unless `BATCH_PROVENANCE_LOG_LEVEL` is set or logging is already running.
    #[new]
    #[pyo3(signature = (base_path, settings_file=None))]
    fn new(base_path: String, settings_file: Option<&str>) -> PyResult<Self> {
        let base_path = PathBuf::from(base_path);
        let settings_path = base_path.join(settings_file.unwrap_or(SETTINGS_FILE_NAME));
        let settings = AnalysisSettings::load_from_path(&settings_path)?;
        settings.init_logger()?;
        Ok(Self {
            base_path,
            catalog: None,
            session: ImpactSession::new(settings),
        })
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load the batch dataset from a JSON file. Returns the batch ids in file order.
    #[pyo3(signature = (filename=None))]
    fn load_batches(&mut self, filename: Option<&str>) -> PyResult<Vec<String>> {
        let path = self.base_path.join(filename.unwrap_or(DEFAULT_JSON_FILE));
        let catalog = BatchCatalog::from_json_file(&path)?;
        let ids = catalog.ids().map(str::to_string).collect();
        self.catalog = Some(catalog);
        Ok(ids)
    }

    /// Load the batch dataset from nodes.csv, edges.csv and optionally supplies.csv.
    ///
    /// Required columns:
    ///     nodes: id, batch_id
    ///     edges: source, target, batch_id
    /// All other columns are optional and read as strings.
    fn load_csv_tables(&mut self) -> PyResult<Vec<String>> {
        let catalog = BatchCatalog::from_csv_dir(&self.base_path)?;
        let ids = catalog.ids().map(str::to_string).collect();
        self.catalog = Some(catalog);
        Ok(ids)
    }

    // ── Interaction ─────────────────────────────────────────────────────────

    /// Make `batch_id` the current batch. Returns False if the dataset doesn't contain it.
    fn select_batch(&mut self, batch_id: &str) -> PyResult<bool> {
        let catalog = self.catalog.as_ref().ok_or(ProvenanceError::NotLoaded)?;
        Ok(self.session.load(catalog, batch_id))
    }

    fn select_node(&mut self, node_id: &str) -> bool {
        self.session.select_node(node_id)
    }

    fn increase_delay(&mut self) -> bool {
        self.session.increase_delay()
    }

    fn decrease_delay(&mut self) -> bool {
        self.session.decrease_delay()
    }

    /// Apply a +1 or -1 hour change at `node_id` without touching the selection.
    fn apply_delay(&mut self, node_id: &str, delta: i64) -> PyResult<bool> {
        let delta = DelayDelta::from_hours(delta)
            .ok_or_else(|| PyValueError::new_err(format!("delta must be 1 or -1, got {delta}")))?;
        Ok(self.session.apply_at(node_id, delta))
    }

    // ── Results ─────────────────────────────────────────────────────────────

    /// Shortest path of the current batch as a dict with keys
    /// `min_duration`, `edges`, `nodes` and `truncated`.
    fn shortest_path<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        self.require_batch()?;
        let report = self.session.report();
        let edges: Vec<String> = report
            .shortest_path
            .edges
            .iter()
            .map(ToString::to_string)
            .collect();

        let dict = PyDict::new(py);
        dict.set_item("min_duration", report.min_duration)?;
        dict.set_item("edges", edges)?;
        dict.set_item("nodes", report.shortest_path.nodes.clone())?;
        dict.set_item("truncated", report.truncated)?;
        Ok(dict)
    }

    fn paths_df(&self) -> PyResult<PyDataFrame> {
        self.require_batch()?;
        Ok(PyDataFrame(paths_frame(self.session.report())?))
    }

    fn nodes_df(&self) -> PyResult<PyDataFrame> {
        let graph = self.session.annotated().ok_or(ProvenanceError::NotLoaded)?;
        Ok(PyDataFrame(nodes_frame(&graph)?))
    }

    fn edges_df(&self) -> PyResult<PyDataFrame> {
        let graph = self.session.annotated().ok_or(ProvenanceError::NotLoaded)?;
        Ok(PyDataFrame(edges_frame(&graph)?))
    }

    /// Renderer element list as a JSON string.
    fn elements_json(&self) -> PyResult<String> {
        let graph = self.session.annotated().ok_or(ProvenanceError::NotLoaded)?;
        Ok(graph.to_elements_json()?)
    }

    fn summary_json(&self) -> PyResult<String> {
        let summary = self.session.summary().ok_or(ProvenanceError::NotLoaded)?;
        Ok(serde_json::to_string(&summary).map_err(ProvenanceError::from)?)
    }

    fn batch_ids(&self) -> PyResult<Vec<String>> {
        Ok(self.catalog()?.ids().map(str::to_string).collect())
    }

    #[getter]
    fn batch_id(&self) -> Option<String> {
        self.session.batch_id().map(str::to_string)
    }

    #[getter]
    fn selected_node(&self) -> Option<String> {
        self.session.selected_node().map(str::to_string)
    }
}
