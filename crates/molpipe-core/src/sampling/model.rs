use crate::engine::config::SamplingMode;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model file '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model file '{path}': {source}", path = path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid model: {0}")]
    Invalid(String),
    #[error("Sampling failed: {0}")]
    Sampling(String),
}

/// One batch of generated strings and their log-likelihoods, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledBatch {
    pub smiles: Vec<String>,
    pub likelihoods: Vec<f64>,
}

impl SampledBatch {
    pub fn len(&self) -> usize {
        self.smiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smiles.is_empty()
    }
}

/// A generative model that emits molecule strings in batches.
pub trait SequenceModel {
    /// Generates `batch_count` strings, running inference in chunks of at most
    /// `batch_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot produce the batch.
    fn sample(
        &mut self,
        batch_count: usize,
        batch_size: usize,
        sampling_type: SamplingMode,
        k: usize,
        p: f64,
        temperature: f64,
    ) -> Result<SampledBatch, ModelError>;
}

impl<T: SequenceModel + ?Sized> SequenceModel for &mut T {
    fn sample(
        &mut self,
        batch_count: usize,
        batch_size: usize,
        sampling_type: SamplingMode,
        k: usize,
        p: f64,
        temperature: f64,
    ) -> Result<SampledBatch, ModelError> {
        (**self).sample(batch_count, batch_size, sampling_type, k, p, temperature)
    }
}

impl<T: SequenceModel + ?Sized> SequenceModel for Box<T> {
    fn sample(
        &mut self,
        batch_count: usize,
        batch_size: usize,
        sampling_type: SamplingMode,
        k: usize,
        p: f64,
        temperature: f64,
    ) -> Result<SampledBatch, ModelError> {
        (**self).sample(batch_count, batch_size, sampling_type, k, p, temperature)
    }
}

/// Loads a model from disk.
pub trait ModelLoader: Sized {
    /// `sampling_mode` loads the model for inference rather than training.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a valid model.
    fn load_from_file(path: &Path, sampling_mode: bool) -> Result<Self, ModelError>;
}
