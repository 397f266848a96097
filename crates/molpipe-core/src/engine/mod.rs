//! # Engine Module
//!
//! Run-level plumbing shared by the workflows.
//!
//! - **Configuration** ([`config`]) - Validated, immutable run parameters built through builders
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front-ends
//! - **Error Handling** ([`error`]) - The error type every workflow returns

pub mod config;
pub mod error;
pub mod progress;
