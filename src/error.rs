#[cfg(feature = "python")]
use pyo3::exceptions::PyRuntimeError;
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvenanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Settings error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Unknown log level: {0}")]
    UnknownLogLevel(String),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("No batch loaded")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, ProvenanceError>;

#[cfg(feature = "python")]
impl From<ProvenanceError> for PyErr {
    fn from(err: ProvenanceError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
