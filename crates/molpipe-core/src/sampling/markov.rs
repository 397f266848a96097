//! A token-level Markov chain over SMILES vocabularies.
//!
//! The model file is JSON:
//!
//! ```json
//! {
//!   "max_sequence_length": 64,
//!   "vocabulary": ["^", "$", "C", "O"],
//!   "transitions": {
//!     "^": { "C": 3.0, "O": 1.0 },
//!     "C": { "C": 1.0, "O": 1.0, "$": 2.0 },
//!     "O": { "C": 1.0, "$": 1.0 }
//!   }
//! }
//! ```
//!
//! `^` starts and `$` ends every sequence. Transition weights are non-negative
//! and normalised per state.

use super::model::{ModelError, ModelLoader, SampledBatch, SequenceModel};
use crate::engine::config::SamplingMode;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

pub const START_TOKEN: &str = "^";
pub const END_TOKEN: &str = "$";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MarkovModelFile {
    max_sequence_length: usize,
    vocabulary: Vec<String>,
    transitions: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Candidate next token with its untempered log-probability.
#[derive(Debug, Clone, Copy)]
struct Transition {
    token: usize,
    log_prob: f64,
}

#[derive(Debug, Clone)]
pub struct MarkovModel {
    vocabulary: Vec<String>,
    transitions: Vec<Vec<Transition>>,
    start: usize,
    end: usize,
    max_sequence_length: usize,
    sampling_mode: bool,
    rng: StdRng,
}

impl MarkovModel {
    fn from_file_data(data: MarkovModelFile, sampling_mode: bool) -> Result<Self, ModelError> {
        if data.max_sequence_length == 0 {
            return Err(ModelError::Invalid(
                "max_sequence_length must be greater than zero".to_string(),
            ));
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, token) in data.vocabulary.iter().enumerate() {
            if token.is_empty() {
                return Err(ModelError::Invalid("vocabulary contains an empty token".to_string()));
            }
            if index.insert(token.as_str(), i).is_some() {
                return Err(ModelError::Invalid(format!("duplicate token '{token}'")));
            }
        }
        let lookup = |token: &str| {
            index
                .get(token)
                .copied()
                .ok_or_else(|| ModelError::Invalid(format!("token '{token}' is not in the vocabulary")))
        };
        let start = lookup(START_TOKEN)?;
        let end = lookup(END_TOKEN)?;

        let mut transitions = vec![Vec::new(); data.vocabulary.len()];
        for (from, targets) in &data.transitions {
            let from_id = lookup(from)?;
            if from_id == end {
                return Err(ModelError::Invalid("the end token cannot have transitions".to_string()));
            }
            let total: f64 = targets.values().sum();
            if targets.values().any(|w| !w.is_finite() || *w < 0.0) || total <= 0.0 {
                return Err(ModelError::Invalid(format!(
                    "transition weights from '{from}' must be non-negative with a positive sum"
                )));
            }
            for (to, weight) in targets {
                let to_id = lookup(to)?;
                if to_id == start {
                    return Err(ModelError::Invalid("no transition may lead to the start token".to_string()));
                }
                if *weight > 0.0 {
                    transitions[from_id].push(Transition {
                        token: to_id,
                        log_prob: (weight / total).ln(),
                    });
                }
            }
        }
        if transitions[start].is_empty() {
            return Err(ModelError::Invalid("the start token has no transitions".to_string()));
        }

        Ok(Self {
            vocabulary: data.vocabulary,
            transitions,
            start,
            end,
            max_sequence_length: data.max_sequence_length,
            sampling_mode,
            rng: StdRng::from_entropy(),
        })
    }

    /// Parses a model from its JSON text.
    pub fn from_json(json: &str, sampling_mode: bool) -> Result<Self, ModelError> {
        let data: MarkovModelFile = serde_json::from_str(json).map_err(|source| ModelError::Format {
            path: "<inline>".into(),
            source,
        })?;
        Self::from_file_data(data, sampling_mode)
    }

    /// Replaces the random source with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Restricts `candidates` to the tokens the sampling mode allows.
    fn truncate_candidates(
        candidates: &mut Vec<(usize, f64, f64)>,
        sampling_type: SamplingMode,
        k: usize,
        p: f64,
    ) {
        // (token, untempered log-prob, tempered logit), sorted by logit descending
        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));
        if sampling_type.uses_top_k() && k > 0 {
            candidates.truncate(k);
        }
        if sampling_type.uses_top_p() && p < 1.0 {
            let max = candidates.first().map(|c| c.2).unwrap_or(0.0);
            let weights: Vec<f64> = candidates.iter().map(|c| (c.2 - max).exp()).collect();
            let total: f64 = weights.iter().sum();
            let mut cumulative = 0.0;
            let mut keep = candidates.len();
            for (i, w) in weights.iter().enumerate() {
                cumulative += w / total;
                if cumulative >= p {
                    keep = i + 1;
                    break;
                }
            }
            candidates.truncate(keep.max(1));
        }
    }

    fn sample_one(
        &mut self,
        sampling_type: SamplingMode,
        k: usize,
        p: f64,
        temperature: f64,
    ) -> Result<(String, f64), ModelError> {
        let mut smiles = String::new();
        let mut log_likelihood = 0.0;
        let mut state = self.start;

        for _ in 0..self.max_sequence_length {
            let mut candidates: Vec<(usize, f64, f64)> = self.transitions[state]
                .iter()
                .map(|t| (t.token, t.log_prob, t.log_prob / temperature))
                .collect();
            if candidates.is_empty() {
                break;
            }
            Self::truncate_candidates(&mut candidates, sampling_type, k, p);

            let max = candidates[0].2;
            let weights = candidates.iter().map(|c| (c.2 - max).exp());
            let distribution =
                WeightedIndex::new(weights).map_err(|e| ModelError::Sampling(e.to_string()))?;
            let (token, log_prob, _) = candidates[distribution.sample(&mut self.rng)];

            log_likelihood += log_prob;
            if token == self.end {
                break;
            }
            smiles.push_str(&self.vocabulary[token]);
            state = token;
        }
        Ok((smiles, log_likelihood))
    }
}

impl ModelLoader for MarkovModel {
    fn load_from_file(path: &Path, sampling_mode: bool) -> Result<Self, ModelError> {
        debug!("Loading Markov model from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data: MarkovModelFile =
            serde_json::from_str(&content).map_err(|source| ModelError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_file_data(data, sampling_mode)
    }
}

impl SequenceModel for MarkovModel {
    fn sample(
        &mut self,
        batch_count: usize,
        batch_size: usize,
        sampling_type: SamplingMode,
        k: usize,
        p: f64,
        temperature: f64,
    ) -> Result<SampledBatch, ModelError> {
        if !self.sampling_mode {
            return Err(ModelError::Sampling(
                "model was not loaded in sampling mode".to_string(),
            ));
        }
        if batch_size == 0 {
            return Err(ModelError::Sampling("batch size must be positive".to_string()));
        }
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(ModelError::Sampling(format!(
                "temperature must be positive, got {temperature}"
            )));
        }

        let mut batch = SampledBatch {
            smiles: Vec::with_capacity(batch_count),
            likelihoods: Vec::with_capacity(batch_count),
        };
        for _ in 0..batch_count {
            let (smiles, log_likelihood) = self.sample_one(sampling_type, k, p, temperature)?;
            batch.smiles.push(smiles);
            batch.likelihoods.push(log_likelihood);
        }
        Ok(batch)
    }
}
