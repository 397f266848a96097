//! Chemistry helpers layered on top of the core models.
//!
//! - [`elements`] - The static element-to-category table used for atom typing
//! - [`encoding`] - One-hot encoding and centering of conformers
//! - [`torsion`] - Random perturbation of rotatable torsion angles
//! - [`smiles`] - A lightweight syntactic SMILES check used by sampling reports

pub mod elements;
pub mod encoding;
pub mod smiles;
pub mod torsion;
