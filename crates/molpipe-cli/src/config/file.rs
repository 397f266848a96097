use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSamplingConfig {
    pub model_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub num_smiles: Option<usize>,
    pub batch_size: Option<usize>,
    pub with_likelihood: Option<bool>,
    pub sampling_mode: Option<String>,
    pub temperature: Option<f64>,
    pub k: Option<usize>,
    pub p: Option<f64>,
    pub logging_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConvertConfig {
    pub input_paths: Option<Vec<PathBuf>>,
    pub output_dir: Option<PathBuf>,
    pub num_conformers: Option<usize>,
    pub torsion_noise: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub sampling: Option<FileSamplingConfig>,
    pub convert: Option<FileConvertConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_both_tables_with_kebab_case_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("molpipe.toml");
        fs::write(
            &path,
            r#"
            [sampling]
            model-path = "prior.json"
            num-smiles = 50
            sampling-mode = "top_k"
            with-likelihood = false

            [convert]
            input-paths = ["a.sdf", "b.sdf"]
            torsion-noise = 12.5
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let sampling = config.sampling.unwrap();
        assert_eq!(sampling.model_path, Some(PathBuf::from("prior.json")));
        assert_eq!(sampling.num_smiles, Some(50));
        assert_eq!(sampling.sampling_mode.as_deref(), Some("top_k"));
        assert_eq!(sampling.with_likelihood, Some(false));
        assert_eq!(sampling.batch_size, None);

        let convert = config.convert.unwrap();
        assert_eq!(convert.input_paths.unwrap().len(), 2);
        assert_eq!(convert.torsion_noise, Some(12.5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("typo.toml");
        fs::write(&path, "[sampling]\nnum_smiles = 5\n").unwrap();

        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            FileConfig::from_file(&dir.path().join("absent.toml")),
            Err(CliError::Io(_))
        ));
    }
}
