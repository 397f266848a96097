//! # Workflows Module
//!
//! High-level entry points that tie the [`core`](crate::core), [`engine`](crate::engine)
//! and [`sampling`](crate::sampling) layers together into complete runs.
//!
//! - **Sampling** ([`sample`]) - Draws molecule strings from a sequence model in
//!   batches and streams them to a tab-separated output file.
//! - **Conversion** ([`convert`]) - Reads the first valid molecule of each structure
//!   file, optionally perturbs its torsions, and writes every conformer as a pair
//!   of `.npy` arrays.
//!
//! Each workflow reports its phases through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and returns an
//! [`EngineError`](crate::engine::error::EngineError) on failure.

pub mod convert;
pub mod sample;
