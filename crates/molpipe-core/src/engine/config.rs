use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error(
        "'{0}' is invalid. Sampling mode must be one of [multinomial, top_k, top_p, top_k_top_p]"
    )]
    InvalidSamplingMode(String),

    #[error("top_p sampling with p = {0} is not yet implemented; p must be 1.0")]
    UnsupportedTopP(f64),

    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Token selection strategy requested from the sequence model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    Multinomial,
    TopK,
    TopP,
    TopKTopP,
}

impl SamplingMode {
    pub const ALL: [Self; 4] = [Self::Multinomial, Self::TopK, Self::TopP, Self::TopKTopP];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multinomial => "multinomial",
            Self::TopK => "top_k",
            Self::TopP => "top_p",
            Self::TopKTopP => "top_k_top_p",
        }
    }

    /// Whether the top-k cutoff applies in this mode.
    pub fn uses_top_k(self) -> bool {
        matches!(self, Self::TopK | Self::TopKTopP)
    }

    /// Whether the nucleus (top-p) cutoff applies in this mode.
    pub fn uses_top_p(self) -> bool {
        matches!(self, Self::TopP | Self::TopKTopP)
    }
}

impl FromStr for SamplingMode {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidSamplingMode(s.to_string()))
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable parameters of a sampling run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingConfig {
    pub model_path: PathBuf,
    pub output_path: PathBuf,
    pub num_smiles: usize,
    pub batch_size: usize,
    pub with_likelihood: bool,
    pub sampling_mode: SamplingMode,
    pub temperature: f64,
    pub k: usize,
    pub p: f64,
    /// Directory receiving the run report and configuration echo.
    pub logging_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl SamplingConfig {
    /// Checks the value invariants: `p` must be exactly `1.0`, the batch size
    /// positive, and the temperature a positive number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.p != 1.0 {
            return Err(ConfigError::UnsupportedTopP(self.p));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "batch_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "temperature",
                reason: format!("must be a positive number, got {}", self.temperature),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SamplingConfigBuilder {
    model_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    num_smiles: Option<usize>,
    batch_size: Option<usize>,
    with_likelihood: Option<bool>,
    sampling_mode: Option<String>,
    temperature: Option<f64>,
    k: Option<usize>,
    p: Option<f64>,
    logging_path: Option<PathBuf>,
    seed: Option<u64>,
}

impl SamplingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_path(mut self, path: PathBuf) -> Self {
        self.model_path = Some(path);
        self
    }
    pub fn output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }
    pub fn num_smiles(mut self, n: usize) -> Self {
        self.num_smiles = Some(n);
        self
    }
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }
    pub fn with_likelihood(mut self, enabled: bool) -> Self {
        self.with_likelihood = Some(enabled);
        self
    }
    pub fn sampling_mode(mut self, mode: impl Into<String>) -> Self {
        self.sampling_mode = Some(mode.into());
        self
    }
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }
    pub fn p(mut self, p: f64) -> Self {
        self.p = Some(p);
        self
    }
    pub fn logging_path(mut self, path: Option<PathBuf>) -> Self {
        self.logging_path = path;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// Fails on an unknown sampling mode or any violation of
    /// [`SamplingConfig::validate`].
    pub fn build(self) -> Result<SamplingConfig, ConfigError> {
        let sampling_mode: SamplingMode = self
            .sampling_mode
            .ok_or(ConfigError::MissingParameter("sampling_mode"))?
            .parse()?;

        let config = SamplingConfig {
            model_path: self
                .model_path
                .ok_or(ConfigError::MissingParameter("model_path"))?,
            output_path: self
                .output_path
                .ok_or(ConfigError::MissingParameter("output_path"))?,
            num_smiles: self
                .num_smiles
                .ok_or(ConfigError::MissingParameter("num_smiles"))?,
            batch_size: self
                .batch_size
                .ok_or(ConfigError::MissingParameter("batch_size"))?,
            with_likelihood: self
                .with_likelihood
                .ok_or(ConfigError::MissingParameter("with_likelihood"))?,
            sampling_mode,
            temperature: self
                .temperature
                .ok_or(ConfigError::MissingParameter("temperature"))?,
            k: self.k.ok_or(ConfigError::MissingParameter("k"))?,
            p: self.p.ok_or(ConfigError::MissingParameter("p"))?,
            logging_path: self.logging_path,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parameters of a conformer-to-array conversion run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionConfig {
    pub input_paths: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Accepted for interface compatibility; it does not cap the conformers written.
    pub num_conformers: usize,
    /// Maximum torsion perturbation in degrees; `0.0` disables it.
    pub torsion_noise: f64,
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct ConversionConfigBuilder {
    input_paths: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    num_conformers: Option<usize>,
    torsion_noise: Option<f64>,
    seed: Option<u64>,
}

impl ConversionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.input_paths = paths;
        self
    }
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }
    pub fn num_conformers(mut self, n: usize) -> Self {
        self.num_conformers = Some(n);
        self
    }
    pub fn torsion_noise(mut self, degrees: f64) -> Self {
        self.torsion_noise = Some(degrees);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<ConversionConfig, ConfigError> {
        let torsion_noise = self.torsion_noise.unwrap_or(0.0);
        if !(torsion_noise.is_finite() && torsion_noise >= 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "torsion_noise",
                reason: format!("must be a non-negative number of degrees, got {torsion_noise}"),
            });
        }
        Ok(ConversionConfig {
            input_paths: self.input_paths,
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            num_conformers: self
                .num_conformers
                .ok_or(ConfigError::MissingParameter("num_conformers"))?,
            torsion_noise,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_sampling_builder() -> SamplingConfigBuilder {
        SamplingConfigBuilder::new()
            .model_path(PathBuf::from("prior.json"))
            .output_path(PathBuf::from("out/sampled.smi"))
            .num_smiles(10)
            .batch_size(4)
            .with_likelihood(true)
            .sampling_mode("multinomial")
            .temperature(1.0)
            .k(5)
            .p(1.0)
    }

    #[test]
    fn sampling_modes_parse_from_their_tags() {
        for mode in SamplingMode::ALL {
            assert_eq!(mode.as_str().parse::<SamplingMode>(), Ok(mode));
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }

    #[test]
    fn valid_sampling_config_builds() {
        let config = valid_sampling_builder().build().unwrap();
        assert_eq!(config.sampling_mode, SamplingMode::Multinomial);
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.logging_path, None);
    }

    #[test]
    fn invalid_sampling_mode_is_rejected() {
        let result = valid_sampling_builder().sampling_mode("invalid_tag").build();
        assert_eq!(
            result,
            Err(ConfigError::InvalidSamplingMode("invalid_tag".to_string()))
        );
    }

    #[test]
    fn any_p_other_than_one_is_rejected() {
        for p in [0.5, 0.0, 0.999, 1.5] {
            let result = valid_sampling_builder().p(p).build();
            assert_eq!(result, Err(ConfigError::UnsupportedTopP(p)));
        }
    }

    #[test]
    fn top_p_modes_are_accepted_with_p_of_one() {
        for mode in ["top_p", "top_k_top_p"] {
            assert!(valid_sampling_builder().sampling_mode(mode).build().is_ok());
        }
    }

    #[test]
    fn zero_batch_size_and_bad_temperature_are_rejected() {
        assert!(matches!(
            valid_sampling_builder().batch_size(0).build(),
            Err(ConfigError::InvalidValue {
                parameter: "batch_size",
                ..
            })
        ));
        for temperature in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                valid_sampling_builder().temperature(temperature).build(),
                Err(ConfigError::InvalidValue {
                    parameter: "temperature",
                    ..
                })
            ));
        }
    }

    #[test]
    fn missing_parameters_are_named() {
        let result = SamplingConfigBuilder::new()
            .sampling_mode("top_k")
            .p(1.0)
            .batch_size(1)
            .temperature(1.0)
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("model_path")));
    }

    #[test]
    fn conversion_config_defaults_to_no_torsion_noise() {
        let config = ConversionConfigBuilder::new()
            .input_paths(vec![PathBuf::from("a.sdf")])
            .output_dir(PathBuf::from("npy"))
            .num_conformers(1)
            .build()
            .unwrap();
        assert_eq!(config.torsion_noise, 0.0);
        assert_eq!(config.input_paths.len(), 1);
    }

    #[test]
    fn conversion_config_rejects_negative_torsion_noise() {
        let result = ConversionConfigBuilder::new()
            .output_dir(PathBuf::from("npy"))
            .num_conformers(1)
            .torsion_noise(-5.0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                parameter: "torsion_noise",
                ..
            })
        ));
    }
}
