use crate::core::chem::smiles;
use crate::engine::config::SamplingConfig;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const REPORT_FILE_NAME: &str = "report.json";
pub const INPUT_CONFIG_FILE_NAME: &str = "input.json";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Receives the outcome of a sampling run.
pub trait SamplingLogger {
    /// Summarises every string generated during the run.
    fn timestep_report(&mut self, smiles: &[String], likelihoods: &[f64])
    -> Result<(), ReportError>;

    /// Records the configuration the run was started with.
    fn log_out_input_configuration(&mut self) -> Result<(), ReportError>;
}

impl<T: SamplingLogger + ?Sized> SamplingLogger for &mut T {
    fn timestep_report(
        &mut self,
        smiles: &[String],
        likelihoods: &[f64],
    ) -> Result<(), ReportError> {
        (**self).timestep_report(smiles, likelihoods)
    }

    fn log_out_input_configuration(&mut self) -> Result<(), ReportError> {
        (**self).log_out_input_configuration()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LikelihoodStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingSummary {
    pub total: usize,
    pub valid: usize,
    pub unique: usize,
    pub fraction_valid: f64,
    pub fraction_unique: f64,
    pub likelihood: Option<LikelihoodStats>,
}

impl SamplingSummary {
    pub fn from_run(smiles: &[String], likelihoods: &[f64]) -> Self {
        let total = smiles.len();
        let valid = smiles.iter().filter(|s| smiles::is_valid(s)).count();
        let unique = smiles.iter().collect::<HashSet<_>>().len();
        let fraction = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };

        let likelihood = (!likelihoods.is_empty()).then(|| LikelihoodStats {
            mean: likelihoods.iter().sum::<f64>() / likelihoods.len() as f64,
            min: likelihoods.iter().copied().fold(f64::INFINITY, f64::min),
            max: likelihoods.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        });

        Self {
            total,
            valid,
            unique,
            fraction_valid: fraction(valid),
            fraction_unique: fraction(unique),
            likelihood,
        }
    }
}

/// Logs run summaries through `tracing` and, with a logging directory, persists
/// them as JSON next to an echo of the run configuration.
pub struct LocalSamplingLogger {
    config: SamplingConfig,
    last_summary: Option<SamplingSummary>,
}

impl LocalSamplingLogger {
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            last_summary: None,
        }
    }

    pub fn last_summary(&self) -> Option<&SamplingSummary> {
        self.last_summary.as_ref()
    }

    fn write_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<(), ReportError> {
        fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(file_name);
        let file = File::create(&path).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), value)?;
        Ok(())
    }
}

impl SamplingLogger for LocalSamplingLogger {
    fn timestep_report(
        &mut self,
        smiles: &[String],
        likelihoods: &[f64],
    ) -> Result<(), ReportError> {
        let summary = SamplingSummary::from_run(smiles, likelihoods);
        info!(
            "Sampled {} SMILES: {:.1}% valid, {:.1}% unique.",
            summary.total,
            summary.fraction_valid * 100.0,
            summary.fraction_unique * 100.0
        );
        if let Some(stats) = &summary.likelihood {
            info!(
                "Log-likelihood mean {:.3} (min {:.3}, max {:.3}).",
                stats.mean, stats.min, stats.max
            );
        }
        if let Some(dir) = &self.config.logging_path {
            Self::write_json(dir, REPORT_FILE_NAME, &summary)?;
        }
        self.last_summary = Some(summary);
        Ok(())
    }

    fn log_out_input_configuration(&mut self) -> Result<(), ReportError> {
        info!(
            "Run configuration: model {:?}, output {:?}, {} SMILES in batches of {}, mode {}, temperature {}, k {}, p {}.",
            self.config.model_path,
            self.config.output_path,
            self.config.num_smiles,
            self.config.batch_size,
            self.config.sampling_mode,
            self.config.temperature,
            self.config.k,
            self.config.p
        );
        if let Some(dir) = &self.config.logging_path {
            Self::write_json(dir, INPUT_CONFIG_FILE_NAME, &self.config)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SamplingConfigBuilder;
    use tempfile::tempdir;

    fn config(logging_path: Option<PathBuf>) -> SamplingConfig {
        SamplingConfigBuilder::new()
            .model_path(PathBuf::from("prior.json"))
            .output_path(PathBuf::from("sampled.smi"))
            .num_smiles(4)
            .batch_size(2)
            .with_likelihood(true)
            .sampling_mode("top_k")
            .temperature(0.7)
            .k(3)
            .p(1.0)
            .logging_path(logging_path)
            .build()
            .unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn summary_counts_valid_and_unique_strings() {
        let smiles = strings(&["CCO", "CCO", "C1CC", "c1ccccc1"]);
        let summary = SamplingSummary::from_run(&smiles, &[-1.0, -3.0, -2.0, -6.0]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.valid, 3);
        assert_eq!(summary.unique, 3);
        assert_eq!(summary.fraction_valid, 0.75);
        let stats = summary.likelihood.unwrap();
        assert_eq!(stats.mean, -3.0);
        assert_eq!(stats.min, -6.0);
        assert_eq!(stats.max, -1.0);
    }

    #[test]
    fn summary_of_empty_run_has_no_likelihood_stats() {
        let summary = SamplingSummary::from_run(&[], &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.fraction_unique, 0.0);
        assert!(summary.likelihood.is_none());
    }

    #[test]
    fn logger_without_directory_only_keeps_summary_in_memory() {
        let mut logger = LocalSamplingLogger::new(config(None));
        logger
            .timestep_report(&strings(&["C"]), &[-0.5])
            .unwrap();
        logger.log_out_input_configuration().unwrap();
        assert_eq!(logger.last_summary().unwrap().total, 1);
    }

    #[test]
    fn logger_writes_report_and_configuration_echo() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let mut logger = LocalSamplingLogger::new(config(Some(log_dir.clone())));

        logger
            .timestep_report(&strings(&["CCO", "CCN"]), &[-1.0, -2.0])
            .unwrap();
        logger.log_out_input_configuration().unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(log_dir.join(REPORT_FILE_NAME)).unwrap())
                .unwrap();
        assert_eq!(report["total"], 2);
        assert_eq!(report["likelihood"]["max"], -1.0);

        let input: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(log_dir.join(INPUT_CONFIG_FILE_NAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(input["sampling_mode"], "top_k");
        assert_eq!(input["batch_size"], 2);
    }
}
