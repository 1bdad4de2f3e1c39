//! Error types for uapi

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid override '{0}': expected KEY=VALUE")]
    InvalidOverride(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Unknown suite '{suite}' for model '{model}'")]
    UnknownSuite { suite: String, model: String },

    #[error("Model '{model}' does not support the '{api}' API")]
    UnsupportedApi { model: String, api: String },

    #[error("Invalid device specifier: {0}")]
    InvalidDevice(String),

    #[error("Runner failed during {verb} (config {config}): {status}")]
    RunnerFailed {
        verb: &'static str,
        config: PathBuf,
        status: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
