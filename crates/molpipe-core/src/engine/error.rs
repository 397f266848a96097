use super::config::ConfigError;
use crate::core::io::npy::NpyError;
use crate::core::io::sdf::SdfError;
use crate::sampling::model::ModelError;
use crate::sampling::report::ReportError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write sampled output: {0}")]
    Output(#[from] csv::Error),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Model contract violated: {0}")]
    ModelContract(String),

    #[error("Reporting failed: {0}")]
    Report(#[from] ReportError),

    #[error("Failed to read structure file '{path}': {source}", path = path.display())]
    Structure {
        path: PathBuf,
        #[source]
        source: SdfError,
    },

    #[error("No valid molecule record found in '{path}'", path = path.display())]
    NoValidMolecule { path: PathBuf },

    #[error(transparent)]
    Npy(#[from] NpyError),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
