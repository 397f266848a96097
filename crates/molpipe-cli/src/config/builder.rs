use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileConvertConfig, FileSamplingConfig};
use crate::cli::{ConvertArgs, LikelihoodColumn, SampleArgs};
use crate::error::{CliError, Result};
use molpipe::engine::config as core_config;
use std::path::{Path, PathBuf};
use std::str::FromStr;

fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

pub fn build_sampling_config(args: &SampleArgs) -> Result<core_config::SamplingConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let file_config = apply_set_values(file_config, &args.set_values)?;
    let file = file_config.sampling.unwrap_or_default();

    let model_path = args.model.clone().or(file.model_path).ok_or_else(|| {
        CliError::Config(
            "A model path is required either via --model or `sampling.model-path`.".to_string(),
        )
    })?;
    let output_path = args.output.clone().or(file.output_path).ok_or_else(|| {
        CliError::Config(
            "An output path is required either via --output or `sampling.output-path`."
                .to_string(),
        )
    })?;

    core_config::SamplingConfigBuilder::new()
        .model_path(model_path)
        .output_path(output_path)
        .num_smiles(
            args.num_smiles
                .or(file.num_smiles)
                .unwrap_or(defaults.num_smiles),
        )
        .batch_size(
            args.batch_size
                .or(file.batch_size)
                .unwrap_or(defaults.batch_size),
        )
        .with_likelihood(merge_likelihood(
            args.likelihood,
            file.with_likelihood,
            defaults.with_likelihood,
        ))
        .sampling_mode(
            args.sampling_mode
                .clone()
                .or(file.sampling_mode)
                .unwrap_or(defaults.sampling_mode),
        )
        .temperature(
            args.temperature
                .or(file.temperature)
                .unwrap_or(defaults.temperature),
        )
        .k(args.top_k.or(file.k).unwrap_or(defaults.k))
        .p(args.top_p.or(file.p).unwrap_or(defaults.p))
        .logging_path(args.logging_path.clone().or(file.logging_path))
        .seed(args.seed.or(file.seed))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

pub fn build_conversion_config(args: &ConvertArgs) -> Result<core_config::ConversionConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let file_config = apply_set_values(file_config, &args.set_values)?;
    let file = file_config.convert.unwrap_or_default();

    let input_paths = if args.inputs.is_empty() {
        file.input_paths.unwrap_or_default()
    } else {
        args.inputs.clone()
    };
    if input_paths.is_empty() {
        return Err(CliError::Config(
            "At least one SDF input is required either as an argument or via `convert.input-paths`."
                .to_string(),
        ));
    }
    let output_dir = args.output_dir.clone().or(file.output_dir).ok_or_else(|| {
        CliError::Config(
            "An output directory is required either via --output-dir or `convert.output-dir`."
                .to_string(),
        )
    })?;

    core_config::ConversionConfigBuilder::new()
        .input_paths(input_paths)
        .output_dir(output_dir)
        .num_conformers(
            args.num_conformers
                .or(file.num_conformers)
                .unwrap_or(defaults.num_conformers),
        )
        .torsion_noise(
            args.torsion_noise
                .or(file.torsion_noise)
                .unwrap_or(defaults.torsion_noise),
        )
        .seed(args.seed.or(file.seed))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn merge_likelihood(cli_flags: LikelihoodColumn, file_val: Option<bool>, default: bool) -> bool {
    match (cli_flags.with_likelihood, cli_flags.no_likelihood) {
        (true, false) => true,
        (false, true) => false,
        _ => file_val.unwrap_or(default),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut file_config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;

        match key.split_once('.') {
            Some(("sampling", field)) => {
                let sampling = file_config
                    .sampling
                    .get_or_insert_with(FileSamplingConfig::default);
                set_sampling_value(sampling, key, field, value)?;
            }
            Some(("convert", field)) => {
                let convert = file_config
                    .convert
                    .get_or_insert_with(FileConvertConfig::default);
                set_convert_value(convert, key, field, value)?;
            }
            _ => return Err(unsupported_key(key)),
        }
    }
    Ok(file_config)
}

fn set_sampling_value(
    sampling: &mut FileSamplingConfig,
    key: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    match field {
        "model-path" => sampling.model_path = Some(PathBuf::from(value)),
        "output-path" => sampling.output_path = Some(PathBuf::from(value)),
        "num-smiles" => sampling.num_smiles = Some(parse_value(key, value, "integer")?),
        "batch-size" => sampling.batch_size = Some(parse_value(key, value, "integer")?),
        "with-likelihood" => {
            sampling.with_likelihood = Some(parse_value(key, value, "boolean")?)
        }
        "sampling-mode" => sampling.sampling_mode = Some(value.to_string()),
        "temperature" => sampling.temperature = Some(parse_value(key, value, "float")?),
        "k" => sampling.k = Some(parse_value(key, value, "integer")?),
        "p" => sampling.p = Some(parse_value(key, value, "float")?),
        "logging-path" => sampling.logging_path = Some(PathBuf::from(value)),
        "seed" => sampling.seed = Some(parse_value(key, value, "integer")?),
        _ => return Err(unsupported_key(key)),
    }
    Ok(())
}

fn set_convert_value(
    convert: &mut FileConvertConfig,
    key: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    match field {
        "output-dir" => convert.output_dir = Some(PathBuf::from(value)),
        "num-conformers" => convert.num_conformers = Some(parse_value(key, value, "integer")?),
        "torsion-noise" => convert.torsion_noise = Some(parse_value(key, value, "float")?),
        "seed" => convert.seed = Some(parse_value(key, value, "integer")?),
        _ => return Err(unsupported_key(key)),
    }
    Ok(())
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}
