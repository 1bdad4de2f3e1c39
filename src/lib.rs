//! # uapi: verb-level task façade over YAML-configured training suites
//!
//! uapi maps `train`, `predict`, `export`, `infer` and `compression` onto
//! overlays of a suite's YAML config, then hands the overlaid file to a runner
//! that does the real work.
//!
//! ## Architecture
//!
//! - **config**: YAML documents with dotted key-path overlays, tool settings, CLI
//! - **registry**: Suite/model registration and runner name aliases
//! - **runner**: The runner seam, a process-spawning runner and a dry-run runner
//! - **task**: The façade that resolves paths, overlays, dumps and dispatches
//! - **logging**: `tracing` subscriber setup for the binary

pub mod config;
pub mod logging;
pub mod registry;
pub mod runner;
pub mod task;

pub mod error;

// Re-export commonly used types
pub use config::{ConfigDoc, Settings};
pub use error::{Error, Result};
pub use registry::{Api, ModelInfo, Registry, SuiteInfo, SuiteKind};
pub use runner::{DryRunRunner, ProcessRunner, Runner};
pub use task::{PathResolver, Task, TaskOutcome};
