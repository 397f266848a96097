use crate::engine::config::SamplingConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::sampling::model::{SampledBatch, SequenceModel};
use crate::sampling::report::SamplingLogger;
use csv::{QuoteStyle, WriterBuilder};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Outcome of a completed sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingRun {
    pub output_path: PathBuf,
    pub total_written: usize,
    pub batches: usize,
}

/// A sampling run bound to its model, run logger, and open output file.
///
/// The output file is created when the job is constructed and closed once the
/// run summary has been reported.
pub struct SamplingJob<M: SequenceModel, L: SamplingLogger> {
    config: SamplingConfig,
    model: M,
    logger: L,
    output: csv::Writer<File>,
}

impl<M: SequenceModel, L: SamplingLogger> SamplingJob<M, L> {
    /// Validates `config` and opens the output file.
    ///
    /// The parent directory of the output path is created if it does not exist.
    /// An existing directory is fine; any other directory-creation failure is
    /// returned. Nothing is created when validation fails.
    pub fn new(config: SamplingConfig, model: M, logger: L) -> Result<Self, EngineError> {
        config.validate()?;
        let output = open_output(&config.output_path)?;
        Ok(Self {
            config,
            model,
            logger,
            output,
        })
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Samples `num_smiles` strings and writes one line per string.
    ///
    /// Each model call requests `min(batch_size, remaining)` strings. Lines are
    /// `smiles` or `smiles\tlikelihood` depending on `with_likelihood`. After the
    /// last batch the logger receives every string and likelihood, the output is
    /// closed, and the run configuration is logged.
    #[instrument(skip_all, name = "sampling_workflow")]
    pub fn run(self, reporter: &ProgressReporter) -> Result<SamplingRun, EngineError> {
        let Self {
            config,
            mut model,
            mut logger,
            mut output,
        } = self;

        reporter.report(Progress::PhaseStart { name: "Sampling" });
        reporter.report(Progress::TaskStart {
            total_steps: config.num_smiles as u64,
        });
        info!(
            "Sampling {} SMILES in batches of {} ({} mode, temperature {}).",
            config.num_smiles, config.batch_size, config.sampling_mode, config.temperature
        );

        let mut all_smiles = Vec::with_capacity(config.num_smiles);
        let mut all_likelihoods = Vec::with_capacity(config.num_smiles);
        let mut remaining = config.num_smiles;
        let mut batches = 0;

        while remaining > 0 {
            let requested = config.batch_size.min(remaining);
            debug!("Requesting {} SMILES ({} left).", requested, remaining);
            let batch = model.sample(
                requested,
                config.batch_size,
                config.sampling_mode,
                config.k,
                config.p,
                config.temperature,
            )?;
            check_batch(&batch, requested)?;

            for (smiles, likelihood) in batch.smiles.iter().zip(&batch.likelihoods) {
                if config.with_likelihood {
                    let likelihood = format_likelihood(*likelihood);
                    output.write_record([smiles.as_str(), likelihood.as_str()])?;
                } else {
                    output.write_record([smiles.as_str()])?;
                }
            }

            remaining -= batch.len();
            batches += 1;
            reporter.report(Progress::TaskAdvance {
                steps: batch.len() as u64,
            });
            all_smiles.extend(batch.smiles);
            all_likelihoods.extend(batch.likelihoods);
        }
        reporter.report(Progress::TaskFinish);

        logger.timestep_report(&all_smiles, &all_likelihoods)?;

        output
            .flush()
            .map_err(|e| EngineError::io(&config.output_path, e))?;
        drop(output);

        logger.log_out_input_configuration()?;
        reporter.report(Progress::PhaseFinish);

        info!(
            "Wrote {} SMILES to {:?} in {} batch(es).",
            all_smiles.len(),
            config.output_path,
            batches
        );
        Ok(SamplingRun {
            output_path: config.output_path,
            total_written: all_smiles.len(),
            batches,
        })
    }
}

fn open_output(path: &Path) -> Result<csv::Writer<File>, EngineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        match fs::create_dir(parent) {
            Ok(()) => debug!("Created output directory {:?}.", parent),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(EngineError::io(parent, e)),
        }
    }
    let file = File::create(path).map_err(|e| EngineError::io(path, e))?;
    Ok(WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(file))
}

fn check_batch(batch: &SampledBatch, requested: usize) -> Result<(), EngineError> {
    if batch.smiles.len() != batch.likelihoods.len() {
        return Err(EngineError::ModelContract(format!(
            "model returned {} strings but {} likelihoods",
            batch.smiles.len(),
            batch.likelihoods.len()
        )));
    }
    if batch.is_empty() {
        return Err(EngineError::ModelContract(format!(
            "model returned no strings when {requested} were requested"
        )));
    }
    if batch.len() > requested {
        return Err(EngineError::ModelContract(format!(
            "model returned {} strings when {requested} were requested",
            batch.len()
        )));
    }
    Ok(())
}

/// Integral values keep a trailing `.0` so every likelihood reads as a float.
fn format_likelihood(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
