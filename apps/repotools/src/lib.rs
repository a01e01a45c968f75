//! repotools core library.
//!
//! This crate exposes programmatic APIs for checking project trees against
//! architecture rules and for training the bundled forest models.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `check`: Directory walk applying the SharedTypes import and TODO rules.
//! - `train`: Synthetic data, random forests, metrics, and model files.
//! - `models`: Serializable report structs.
//! - `output`: Human/JSON printers for check/train.
//! - `error`: Crate error type.
//! - `utils`: Supporting helpers.
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod train;
pub mod utils;
