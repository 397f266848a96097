//! # Core Models Module
//!
//! Data structures for small molecules as they are read from structure files and
//! handed to the conversion workflow.
//!
//! ## Key Components
//!
//! - [`molecule`] - Atoms, bonds and the [`molecule::Molecule`] record holding zero or
//!   more 3-D conformers
//! - [`conformer`] - Per-conformer views: raw [`conformer::ConformerRecord`]s and their
//!   array encodings ([`conformer::EncodedConformer`])
//!
//! ```ignore
//! use molpipe::core::models::molecule::{Atom, Molecule};
//!
//! let mut molecule = Molecule::new("water");
//! molecule.add_atom(Atom::new("O"));
//! molecule.add_atom(Atom::new("H"));
//! molecule.add_atom(Atom::new("H"));
//! ```

pub mod conformer;
pub mod molecule;
