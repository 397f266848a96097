//! # Core Module
//!
//! The stateless foundation shared by both workflows.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Molecules, conformers and their array encodings
//! - **File I/O** ([`io`]) - SDF records in, NumPy arrays out
//! - **Chemistry** ([`chem`]) - Element categories, one-hot encoding, torsion noise, SMILES syntax
//! - **Utilities** ([`utils`]) - Geometry helpers built on `nalgebra`

pub mod chem;
pub mod io;
pub mod models;
pub mod utils;
