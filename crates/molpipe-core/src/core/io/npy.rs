use crate::core::models::conformer::EncodedConformer;
use ndarray_npy::{WriteNpyError, write_npy};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const XYZ_SUFFIX: &str = "atomxyz";
pub const TYPES_SUFFIX: &str = "atomtypes";
const NPY_EXTENSION: &str = "npy";

#[derive(Debug, Error)]
#[error("Failed to write array file '{path}': {source}", path = path.display())]
pub struct NpyError {
    pub path: PathBuf,
    #[source]
    pub source: WriteNpyError,
}

/// Output paths of one encoded conformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformerArrayPaths {
    pub xyz: PathBuf,
    pub types: PathBuf,
}

impl ConformerArrayPaths {
    /// Builds `{dir}/{stem}_{index}_atomxyz.npy` and `{dir}/{stem}_{index}_atomtypes.npy`.
    pub fn new(dir: &Path, stem: &str, index: usize) -> Self {
        let file = |suffix: &str| dir.join(format!("{stem}_{index}_{suffix}.{NPY_EXTENSION}"));
        Self {
            xyz: file(XYZ_SUFFIX),
            types: file(TYPES_SUFFIX),
        }
    }
}

/// Writes both arrays of `conformer`, overwriting existing files.
pub fn write_encoded_conformer(
    conformer: &EncodedConformer,
    paths: &ConformerArrayPaths,
) -> Result<(), NpyError> {
    for (path, array) in [(&paths.xyz, &conformer.xyz), (&paths.types, &conformer.types)] {
        write_npy(path, array).map_err(|source| NpyError {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}
