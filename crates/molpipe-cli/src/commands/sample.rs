use crate::cli::SampleArgs;
use crate::config::builder;
use crate::error::Result;
use crate::utils::progress::WorkflowProgressBar;
use molpipe::engine::error::EngineError;
use molpipe::engine::progress::ProgressReporter;
use molpipe::sampling::markov::MarkovModel;
use molpipe::sampling::model::ModelLoader;
use molpipe::sampling::report::LocalSamplingLogger;
use molpipe::workflows::sample::SamplingJob;
use tracing::info;

pub fn run(args: SampleArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = builder::build_sampling_config(&args)?;

    info!("Loading model from {:?}", &config.model_path);
    let mut model =
        MarkovModel::load_from_file(&config.model_path, true).map_err(EngineError::from)?;
    if let Some(seed) = config.seed {
        model = model.with_seed(seed);
    }

    let logger = LocalSamplingLogger::new(config.clone());
    let job = SamplingJob::new(config, model, logger)?;

    let progress = WorkflowProgressBar::new();
    let reporter = ProgressReporter::with_callback(progress.callback());

    println!(
        "Sampling {} SMILES from {}...",
        job.config().num_smiles,
        job.config().model_path.display()
    );
    let outcome = job.run(&reporter)?;

    println!(
        "✓ Wrote {} SMILES to {}",
        outcome.total_written,
        outcome.output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const ALCOHOL_MODEL: &str = r#"{
        "max_sequence_length": 8,
        "vocabulary": ["^", "$", "C", "O"],
        "transitions": {
            "^": { "C": 1.0 },
            "C": { "O": 1.0 },
            "O": { "$": 1.0 }
        }
    }"#;

    #[test]
    fn sample_command_writes_output_and_reports() {
        let dir = tempdir().unwrap();
        let model_path = dir.path().join("prior.json");
        fs::write(&model_path, ALCOHOL_MODEL).unwrap();
        let output_path = dir.path().join("out").join("sampled.smi");
        let logging_path = dir.path().join("logs");

        let cli = Cli::parse_from([
            "molpipe",
            "sample",
            "-m",
            model_path.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
            "-n",
            "5",
            "-b",
            "2",
            "--seed",
            "3",
            "--logging-path",
            logging_path.to_str().unwrap(),
        ]);
        let Commands::Sample(args) = cli.command else {
            panic!("Expected 'sample' subcommand");
        };
        run(args).unwrap();

        let content = fs::read_to_string(&output_path).unwrap();
        assert_eq!(content.lines().count(), 5);
        assert!(content.lines().all(|line| line == "CO\t0.0"));
        assert!(logging_path.join("report.json").exists());
        assert!(logging_path.join("input.json").exists());
    }

    #[test]
    fn missing_model_file_fails_before_output_is_created() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("out").join("sampled.smi");

        let cli = Cli::parse_from([
            "molpipe",
            "sample",
            "-m",
            dir.path().join("absent.json").to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
        ]);
        let Commands::Sample(args) = cli.command else {
            panic!("Expected 'sample' subcommand");
        };
        assert!(run(args).is_err());
        assert!(!output_path.exists());
    }
}
