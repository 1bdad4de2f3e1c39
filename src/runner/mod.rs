//! Runners: the seam to the external training framework
//!
//! A runner receives a fully overlaid config file and does the real work.
//! [`ProcessRunner`] launches the suite's scripts; [`DryRunRunner`] only
//! records what would have been launched.

mod device;
mod dry_run;
mod process;

pub use device::DeviceSpec;
pub use dry_run::{DryRunRunner, Invocation};
pub use process::ProcessRunner;

use crate::error::Result;
use std::path::Path;

/// Executes a verb against a dumped config file
pub trait Runner {
    /// Root of the suite checkout the runner works in
    fn root_path(&self) -> &Path;

    fn train(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()>;

    fn predict(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()>;

    fn export(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()>;

    fn infer(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()>;

    /// Compression-aware training followed by export of the compressed weights.
    /// `model_name` is the name the runner knows the model by.
    fn compression(
        &self,
        config: &Path,
        cli_args: &[String],
        device: Option<&str>,
        save_dir: &Path,
        model_name: &str,
    ) -> Result<()>;
}
