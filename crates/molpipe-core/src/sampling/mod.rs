//! Generative-model abstractions used by the sampling workflow.
//!
//! - [`model`] - The [`model::SequenceModel`] and [`model::ModelLoader`] traits
//! - [`markov`] - A JSON-backed token Markov chain implementing both
//! - [`report`] - End-of-run reporting through [`report::SamplingLogger`]

pub mod markov;
pub mod model;
pub mod report;
