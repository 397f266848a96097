use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Molpipe Developers",
    version,
    about = "molpipe - Sample molecules from a generative model and convert 3-D conformers into model-ready arrays.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample SMILES strings from a sequence model into a tab-separated file.
    Sample(SampleArgs),
    /// Convert SDF conformers into coordinate and atom-type `.npy` arrays.
    Convert(ConvertArgs),
}

/// Arguments for the `sample` subcommand.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Path to a configuration file in TOML format (uses the `[sampling]` table).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the model file.
    #[arg(short, long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Path of the output file; its parent directory is created if missing.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of SMILES to sample.
    #[arg(short, long, value_name = "INT")]
    pub num_smiles: Option<usize>,

    /// Maximum number of SMILES requested from the model per call.
    #[arg(short, long, value_name = "INT")]
    pub batch_size: Option<usize>,

    /// Token selection strategy: multinomial, top_k, top_p or top_k_top_p.
    #[arg(long, value_name = "MODE")]
    pub sampling_mode: Option<String>,

    /// Softmax temperature applied during sampling.
    #[arg(short, long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Number of candidate tokens kept by top-k sampling.
    #[arg(short = 'k', long, value_name = "INT")]
    pub top_k: Option<usize>,

    /// Cumulative probability kept by nucleus sampling. Only 1.0 is supported.
    #[arg(short = 'p', long, value_name = "FLOAT")]
    pub top_p: Option<f64>,

    /// Override `sampling.with-likelihood` from the config file.
    #[command(flatten)]
    pub likelihood: LikelihoodColumn,

    /// Directory receiving the run report and configuration echo.
    #[arg(long, value_name = "PATH")]
    pub logging_path: Option<PathBuf>,

    /// Seed for reproducible sampling.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sampling.temperature=0.7
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive flags for the likelihood column of the output.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct LikelihoodColumn {
    /// Append each SMILES' log-likelihood as a second column.
    #[arg(long)]
    pub with_likelihood: bool,
    /// Write SMILES only.
    #[arg(long)]
    pub no_likelihood: bool,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// SDF files to convert. Only the first valid molecule of each file is used.
    #[arg(value_name = "SDF")]
    pub inputs: Vec<PathBuf>,

    /// Path to a configuration file in TOML format (uses the `[convert]` table).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory receiving the `.npy` files.
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Requested number of conformers per molecule. Recorded only; every conformer is written.
    #[arg(short, long, value_name = "INT")]
    pub num_conformers: Option<usize>,

    /// Maximum random torsion perturbation in degrees (0 disables it).
    #[arg(long, value_name = "DEGREES")]
    pub torsion_noise: Option<f64>,

    /// Seed for reproducible torsion noise.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S convert.torsion-noise=15
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}
