//! # molpipe Core Library
//!
//! Data-preparation and generation utilities for a molecular design pipeline:
//! sampling molecule strings from a generative sequence model, and turning 3-D
//! conformer files into the array encoding consumed by a shape-alignment model.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Conformer`),
//!   chemistry helpers (element categories, the array encoding, torsion noise,
//!   SMILES syntax checks), geometry utilities, and SDF / `.npy` I/O.
//!
//! - **[`engine`]: Shared Plumbing.** Validated run configurations built through
//!   builders, the crate-wide `EngineError`, and the `ProgressReporter` callback
//!   used by every long-running operation.
//!
//! - **[`sampling`]: Model Collaborators.** The `SequenceModel` and `SamplingLogger`
//!   traits that sampling jobs are generic over, plus a bundled Markov-chain model
//!   and a local run logger.
//!
//! - **[`workflows`]: The Public API.** Complete runs: the batched sampling job and
//!   the SDF-to-array conversion driver.

pub mod core;
pub mod engine;
pub mod sampling;
pub mod workflows;
