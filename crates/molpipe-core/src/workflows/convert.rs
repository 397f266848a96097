use crate::core::chem::encoding::encode_record;
use crate::core::chem::torsion::add_noise_to_torsion_angles;
use crate::core::io::npy::{ConformerArrayPaths, write_encoded_conformer};
use crate::core::io::sdf::SdfFile;
use crate::core::io::traits::MolecularFile;
use crate::core::models::conformer::{Conformer, ConformerRecord, EncodedConformer};
use crate::engine::config::ConversionConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::vec;
use tracing::{debug, info, instrument, warn};

/// Lazy sequence of the conformers of one molecule, paired with its symbols.
///
/// Each item is checked as it is produced; a conformer whose position count
/// differs from the atom count panics.
#[derive(Debug)]
pub struct Conformers {
    symbols: Vec<String>,
    remaining: vec::IntoIter<Conformer>,
}

impl Iterator for Conformers {
    type Item = ConformerRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let conformer = self.remaining.next()?;
        Some(ConformerRecord::new(
            self.symbols.clone(),
            conformer.to_array(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining.size_hint()
    }
}

impl ExactSizeIterator for Conformers {}

/// Files and conformers handled by a conversion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub files_processed: usize,
    pub conformers_written: usize,
}

/// Reads the first valid molecule of the SDF file at `path` and returns its
/// conformers.
///
/// Malformed records before it are skipped and later records are never read.
/// With a positive `torsion_noise` every rotatable torsion of the selected
/// molecule is perturbed by up to that many degrees first.
///
/// # Errors
///
/// Returns [`EngineError::Structure`] if the file cannot be read and
/// [`EngineError::NoValidMolecule`] if no record parses.
pub fn get_conformers_and_atoms<R: Rng + ?Sized>(
    path: &Path,
    torsion_noise: f64,
    rng: &mut R,
) -> Result<Conformers, EngineError> {
    let mut molecule = SdfFile::read_first_valid_from_path(path)
        .map_err(|source| EngineError::Structure {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| EngineError::NoValidMolecule {
            path: path.to_path_buf(),
        })?;

    if torsion_noise > 0.0 {
        let perturbed = add_noise_to_torsion_angles(&mut molecule, torsion_noise, rng);
        debug!(
            "Applied torsion noise to {} bond(s) of '{}'.",
            perturbed, molecule.name
        );
    }

    let (symbols, conformers) = molecule.into_symbols_and_conformers();
    Ok(Conformers {
        symbols,
        remaining: conformers.into_iter(),
    })
}

/// Encodes every conformer of the first valid molecule in `path`, in parse order.
pub fn load_sdf_np<R: Rng + ?Sized>(
    path: &Path,
    center: bool,
    torsion_noise: f64,
    rng: &mut R,
) -> Result<Vec<EncodedConformer>, EngineError> {
    Ok(get_conformers_and_atoms(path, torsion_noise, rng)?
        .map(|record| encode_record(&record, center))
        .collect())
}

/// Converts each SDF file in `paths` to `.npy` pairs under `output_dir`.
///
/// Coordinates are written uncentered. `num_conformers` is recorded but does
/// not limit how many conformers are written. Existing files are overwritten
/// and the first failing file aborts the batch.
#[instrument(skip_all, name = "conversion_workflow")]
pub fn convert_smiles<R: Rng + ?Sized>(
    paths: &[PathBuf],
    num_conformers: usize,
    output_dir: &Path,
    torsion_noise: f64,
    rng: &mut R,
    reporter: &ProgressReporter,
) -> Result<ConversionSummary, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Conversion" });
    info!(
        "Converting {} structure file(s) into {:?}.",
        paths.len(),
        output_dir
    );
    debug!(
        "num_conformers = {} is not applied; every conformer is written.",
        num_conformers
    );

    fs::create_dir_all(output_dir).map_err(|e| EngineError::io(output_dir, e))?;
    reporter.report(Progress::TaskStart {
        total_steps: paths.len() as u64,
    });

    let mut summary = ConversionSummary::default();
    for path in paths {
        let stem = file_stem(path)?;
        let encoded = load_sdf_np(path, false, torsion_noise, rng)?;
        if encoded.is_empty() {
            warn!("'{}' has a valid molecule but no conformers.", path.display());
        }
        for (index, conformer) in encoded.iter().enumerate() {
            let targets = ConformerArrayPaths::new(output_dir, &stem, index);
            write_encoded_conformer(conformer, &targets)?;
        }
        debug!(
            "Wrote {} conformer(s) from '{}'.",
            encoded.len(),
            path.display()
        );

        summary.files_processed += 1;
        summary.conformers_written += encoded.len();
        reporter.report(Progress::TaskAdvance { steps: 1 });
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        "Converted {} file(s), {} conformer(s) written.",
        summary.files_processed, summary.conformers_written
    );
    Ok(summary)
}

/// Runs [`convert_smiles`] with the parameters of `config`, seeding the
/// torsion-noise generator from `config.seed` when given.
pub fn run(
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Result<ConversionSummary, EngineError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    convert_smiles(
        &config.input_paths,
        config.num_conformers,
        &config.output_dir,
        config.torsion_noise,
        &mut rng,
        reporter,
    )
}

fn file_stem(path: &Path) -> Result<String, EngineError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| {
            EngineError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "input path has no file name"),
            )
        })
}
