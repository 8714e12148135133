//! Interactive delay-impact session over a single loaded batch.
//!
//! Mirrors the click-then-adjust flow of the rendering surface: a node is selected, then a
//! +1h / -1h intent is applied to it. Every change produces a fresh batch and a fresh path
//! report, so what is displayed always derives from the current state.
use log::{debug, info, warn};

use crate::batch::Batch;
use crate::dataset::BatchCatalog;
use crate::delay::{apply_delay_delta, DelayDelta};
use crate::path_analyzer::{analyze_batch, PathReport};
use crate::settings::AnalysisSettings;
use crate::visualization::{annotate, summarize, AnnotatedGraph, BatchSummary};

#[derive(Debug, Clone, Default)]
pub struct ImpactSession {
    settings: AnalysisSettings,
    batch_id: Option<String>,
    batch: Option<Batch>,
    selected: Option<String>,
    /// Report for the current `batch`, rebuilt after every change.
    report: PathReport,
}

impl ImpactSession {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Load `batch_id` from the catalog, replacing whatever was loaded before.
    ///
    /// Returns `false` and keeps the current state if the catalog doesn't know the id.
    pub fn load(&mut self, catalog: &BatchCatalog, batch_id: &str) -> bool {
        let Some(batch) = catalog.get(batch_id) else {
            warn!("Batch '{batch_id}' not found");
            return false;
        };
        self.load_batch(batch_id, batch);
        true
    }

    pub fn load_batch(&mut self, batch_id: impl Into<String>, batch: Batch) {
        let batch_id = batch_id.into();
        self.report = analyze_batch(&batch, &self.settings);
        info!(
            "Loaded batch '{batch_id}': {} node(s), {} edge(s), {} path(s)",
            batch.nodes.len(),
            batch.edges.len(),
            self.report.all_paths.len()
        );
        self.batch_id = Some(batch_id);
        self.batch = Some(batch);
        self.selected = None;
    }

    /// Handle a node click. Unknown ids are ignored and clear nothing.
    pub fn select_node(&mut self, node_id: &str) -> bool {
        let known = self.batch.as_ref().is_some_and(|b| b.node(node_id).is_some());
        if known {
            self.selected = Some(node_id.to_string());
        } else {
            debug!("Ignoring click on unknown node '{node_id}'");
        }
        known
    }

    /// Apply `delta` at the selected node. Returns `false` if nothing is selected.
    pub fn apply_intent(&mut self, delta: DelayDelta) -> bool {
        let Some(origin) = self.selected.clone() else {
            debug!("No node selected; ignoring {delta}");
            return false;
        };
        self.apply_at(&origin, delta)
    }

    pub fn increase_delay(&mut self) -> bool {
        self.apply_intent(DelayDelta::Increase)
    }

    pub fn decrease_delay(&mut self) -> bool {
        self.apply_intent(DelayDelta::Decrease)
    }

    /// Apply `delta` at `origin` directly, bypassing the selection.
    ///
    /// Returns `false` if no batch is loaded or `origin` is not one of its nodes.
    pub fn apply_at(&mut self, origin: &str, delta: DelayDelta) -> bool {
        let Some(batch) = self.batch.as_ref() else {
            return false;
        };
        if batch.node(origin).is_none() {
            debug!("Ignoring {delta} at unknown node '{origin}'");
            return false;
        }
        let updated = apply_delay_delta(batch, origin, delta, &self.settings);
        self.report = analyze_batch(&updated, &self.settings);
        self.batch = Some(updated);
        true
    }

    pub fn batch_id(&self) -> Option<&str> {
        self.batch_id.as_deref()
    }

    pub fn batch(&self) -> Option<&Batch> {
        self.batch.as_ref()
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn report(&self) -> &PathReport {
        &self.report
    }

    pub fn annotated(&self) -> Option<AnnotatedGraph> {
        self.batch.as_ref().map(|b| annotate(b, &self.report))
    }

    pub fn summary(&self) -> Option<BatchSummary> {
        self.batch.as_ref().map(|b| summarize(b, &self.report))
    }
}
