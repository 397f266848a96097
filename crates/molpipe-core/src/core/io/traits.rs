use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing multi-record molecular files.
///
/// Readers behave like a molecule supplier: each record either parses into a
/// [`Molecule`] or yields `None` when it is malformed. Only I/O failures are
/// surfaced as errors.
pub trait MolecularFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Lazy iterator over the records of a reader.
    type Records<R: BufRead>: Iterator<Item = Result<Option<Molecule>, Self::Error>>;

    /// Streams the records of `reader` in file order.
    fn records<R: BufRead>(reader: R) -> Self::Records<R>;

    /// Writes every conformer of `molecule` as its own record.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Returns the first record that parses, skipping malformed ones.
    ///
    /// Reading stops at the first success; later records are never parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails.
    fn read_first_valid<R: BufRead>(reader: R) -> Result<Option<Molecule>, Self::Error> {
        for record in Self::records(reader) {
            if let Some(molecule) = record? {
                return Ok(Some(molecule));
            }
        }
        Ok(None)
    }

    /// Reads the first valid record of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_first_valid_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Option<Molecule>, Self::Error> {
        let file = File::open(path)?;
        Self::read_first_valid(BufReader::new(file))
    }

    /// Reads all valid records of the file at `path`, dropping malformed ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_all_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Molecule>, Self::Error> {
        let file = File::open(path)?;
        let mut molecules = Vec::new();
        for record in Self::records(BufReader::new(file)) {
            molecules.extend(record?);
        }
        Ok(molecules)
    }

    /// Writes `molecule` to a new file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(molecule: &Molecule, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecule, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
