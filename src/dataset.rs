//! The static batch dataset: a lookup table from batch id to batch record.
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader, StringChunked};
use serde::{Deserialize, Serialize};

use crate::batch::{Batch, Edge, Node, NodeStatus, Supply};
use crate::duration::parse_delay;
use crate::error::{ProvenanceError, Result};
use crate::schema;

pub const DEFAULT_JSON_FILE: &str = "batches.json";
pub const NODES_CSV: &str = "nodes.csv";
pub const EDGES_CSV: &str = "edges.csv";
pub const SUPPLIES_CSV: &str = "supplies.csv";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchCatalog {
    batches: IndexMap<String, Batch>,
}

impl BatchCatalog {
    /// Parse the `{ "<batch-id>": { supplies, nodes, edges } }` layout.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(contents)?;
        debug!("Parsed {} batch(es) from JSON", catalog.len());
        Ok(catalog)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        info!(
            "Loaded {} batch(es) from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Load `nodes.csv`, `edges.csv` and (if present) `supplies.csv` from `dir`.
    ///
    /// Every table needs a `batch_id` column. Node tables additionally need `id`; edge tables
    /// need `source` and `target`. All other schema columns are optional. Every column is read
    /// as a string.
    pub fn from_csv_dir(dir: &Path) -> Result<Self> {
        let mut catalog = Self::default();

        let nodes = read_csv_as_strings(&dir.join(NODES_CSV))?;
        require_columns(&nodes, &schema::node::REQUIRED)?;
        for (batch_id, node) in nodes_from_frame(&nodes)? {
            catalog.entry(batch_id).nodes.push(node);
        }

        let edges = read_csv_as_strings(&dir.join(EDGES_CSV))?;
        require_columns(&edges, &schema::edge::REQUIRED)?;
        for (batch_id, edge) in edges_from_frame(&edges)? {
            catalog.entry(batch_id).edges.push(edge);
        }

        let supplies_path = dir.join(SUPPLIES_CSV);
        if supplies_path.is_file() {
            let supplies = read_csv_as_strings(&supplies_path)?;
            require_columns(&supplies, &[schema::batch::BATCH_ID, schema::supply::ID])?;
            for (batch_id, supply) in supplies_from_frame(&supplies)? {
                catalog.entry(batch_id).supplies.push(supply);
            }
        }

        info!(
            "Loaded {} batch(es) from CSV tables in {}",
            catalog.len(),
            dir.display()
        );
        Ok(catalog)
    }

    /// An independent copy of the batch, or `None` if the id is unknown.
    pub fn get(&self, batch_id: &str) -> Option<Batch> {
        self.batches.get(batch_id).cloned()
    }

    pub fn contains(&self, batch_id: &str) -> bool {
        self.batches.contains_key(batch_id)
    }

    pub fn insert(&mut self, batch_id: impl Into<String>, batch: Batch) {
        self.batches.insert(batch_id.into(), batch);
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.batches.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    fn entry(&mut self, batch_id: String) -> &mut Batch {
        self.batches.entry(batch_id).or_default()
    }
}

// ── CSV helpers ─────────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype, trimming column names.
fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(ProvenanceError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

fn optional_str<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    df.column(name).ok().and_then(|c| c.str().ok())
}

fn cell(col: Option<&StringChunked>, i: usize) -> String {
    col.and_then(|c| c.get(i))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn required_cell(col: &StringChunked, i: usize, name: &str) -> Result<String> {
    col.get(i)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProvenanceError::InvalidData(format!("Null {name} at row {i}")))
}

fn nodes_from_frame(df: &DataFrame) -> Result<Vec<(String, Node)>> {
    use schema::node::*;

    let batch_ids = df.column(schema::batch::BATCH_ID)?.str()?;
    let ids = df.column(ID)?.str()?;
    let labels = optional_str(df, LABEL);
    let timestamps = optional_str(df, TIMESTAMP);
    let locations = optional_str(df, LOCATION);
    let temperatures = optional_str(df, TEMPERATURE);
    let humidities = optional_str(df, HUMIDITY);
    let statuses = optional_str(df, STATUS);
    let delays = optional_str(df, DELAY);

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let batch_id = required_cell(batch_ids, i, schema::batch::BATCH_ID)?;
        let node = Node {
            id: required_cell(ids, i, ID)?,
            label: cell(labels, i),
            timestamp: cell(timestamps, i),
            location: cell(locations, i),
            temperature: cell(temperatures, i),
            humidity: cell(humidities, i),
            status: NodeStatus::parse(&cell(statuses, i)),
            delay: parse_delay(&cell(delays, i)),
        };
        rows.push((batch_id, node));
    }
    Ok(rows)
}

fn edges_from_frame(df: &DataFrame) -> Result<Vec<(String, Edge)>> {
    use schema::edge::*;

    let batch_ids = df.column(schema::batch::BATCH_ID)?.str()?;
    let sources = df.column(SOURCE)?.str()?;
    let targets = df.column(TARGET)?.str()?;
    let durations = optional_str(df, ESTIMATED_DURATION);
    let percentages = optional_str(df, QUANTITY_PERCENTAGE);
    let modes = optional_str(df, MODE_OF_TRANSPORT);

    let non_empty = |v: String| Some(v).filter(|s| !s.is_empty());

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let batch_id = required_cell(batch_ids, i, schema::batch::BATCH_ID)?;
        let edge = Edge {
            source: required_cell(sources, i, SOURCE)?,
            target: required_cell(targets, i, TARGET)?,
            estimated_duration: cell(durations, i),
            quantity_percentage: non_empty(cell(percentages, i)),
            mode_of_transport: non_empty(cell(modes, i)),
        };
        rows.push((batch_id, edge));
    }
    Ok(rows)
}

fn supplies_from_frame(df: &DataFrame) -> Result<Vec<(String, Supply)>> {
    use schema::supply::*;

    let batch_ids = df.column(schema::batch::BATCH_ID)?.str()?;
    let ids = df.column(ID)?.str()?;
    let quantities = optional_str(df, QUANTITY);
    let lives = optional_str(df, LIFE);

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let batch_id = required_cell(batch_ids, i, schema::batch::BATCH_ID)?;
        let supply = Supply {
            id: required_cell(ids, i, ID)?,
            quantity: cell(quantities, i),
            life: parse_delay(&cell(lives, i)),
        };
        rows.push((batch_id, supply));
    }
    Ok(rows)
}
