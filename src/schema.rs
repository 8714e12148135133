/// Field and column-name constants for batch-provenance tables.
/// Shared by the CSV loader, the DataFrame exports and the rendering payload.

// ── Batch key ───────────────────────────────────────────────────────────────
pub mod batch {
    pub const BATCH_ID: &str = "batch_id";
}

// ── Node columns ────────────────────────────────────────────────────────────
pub mod node {
    pub const ID: &str = "id";
    pub const LABEL: &str = "label";
    pub const TIMESTAMP: &str = "timestamp";
    pub const LOCATION: &str = "location";
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
    pub const STATUS: &str = "status";
    pub const DELAY: &str = "delay";

    pub const REQUIRED: [&str; 2] = [ID, super::batch::BATCH_ID];
}

// ── Edge columns ────────────────────────────────────────────────────────────
pub mod edge {
    pub const SOURCE: &str = "source";
    pub const TARGET: &str = "target";
    pub const ESTIMATED_DURATION: &str = "estimated_duration";
    pub const QUANTITY_PERCENTAGE: &str = "quantity_percentage";
    pub const MODE_OF_TRANSPORT: &str = "mode_of_transport";

    pub const DEFAULT_QUANTITY_PERCENTAGE: &str = "100";
    pub const DEFAULT_MODE_OF_TRANSPORT: &str = "Truck";

    pub const REQUIRED: [&str; 3] = [SOURCE, TARGET, super::batch::BATCH_ID];
}

// ── Supply columns ──────────────────────────────────────────────────────────
pub mod supply {
    pub const ID: &str = "id";
    pub const QUANTITY: &str = "quantity";
    pub const LIFE: &str = "life";
}

// ── Path report columns ─────────────────────────────────────────────────────
pub mod path {
    pub const PATH_INDEX: &str = "path_index";
    pub const DURATION: &str = "duration";
    pub const EDGES: &str = "edges";
    pub const NODES: &str = "nodes";
    pub const IS_SHORTEST: &str = "is_shortest";

    /// Separator used when a path is flattened into a single string cell.
    pub const SEPARATOR: &str = " > ";
}

// ── Annotation columns ──────────────────────────────────────────────────────
pub mod annotation {
    pub const IS_SOURCE: &str = "is_source";
    pub const IS_SPLIT: &str = "is_split";
    pub const IS_MERGE: &str = "is_merge";
    pub const IS_DESTINATION: &str = "is_destination";
    pub const IS_ON_SHORTEST_PATH: &str = "is_on_shortest_path";
    pub const DISPLAY_STATUS: &str = "display_status";
    pub const SHAPE: &str = "shape";
}

// ── Duration strings ────────────────────────────────────────────────────────
pub mod duration {
    pub const UNIT_SUFFIX: &str = "hours";
}
