//! Provides input/output functionality for molecular file formats.
//!
//! Structure files are read through the [`traits::MolecularFile`] interface, which
//! exposes a file as a stream of molecule records where unparseable records are
//! reported as `None` rather than aborting the stream. Array output for the
//! shape-alignment model lives in [`npy`].

pub mod npy;
pub mod sdf;
pub mod traits;
