//! Runner that records invocations instead of launching anything

use super::Runner;
use crate::error::{Error, Result};
use crate::registry::Api;
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// One recorded runner call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    pub verb: Api,
    pub config: PathBuf,
    pub cli_args: Vec<String>,
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl Invocation {
    /// Single-line JSON, as printed by `uapi --dry-run`
    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::ConfigError(format!("JSON serialization error: {e}")))
    }
}

#[derive(Debug, Default)]
pub struct DryRunRunner {
    root: PathBuf,
    calls: RefCell<Vec<Invocation>>,
}

impl DryRunRunner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Calls recorded so far, oldest first
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn last(&self) -> Option<Invocation> {
        self.calls.borrow().last().cloned()
    }

    fn record(
        &self,
        verb: Api,
        config: &Path,
        cli_args: &[String],
        device: Option<&str>,
    ) {
        tracing::info!(verb = %verb, config = %config.display(), "dry run: runner not launched");
        self.calls.borrow_mut().push(Invocation {
            verb,
            config: config.to_path_buf(),
            cli_args: cli_args.to_vec(),
            device: device.map(str::to_string),
            save_dir: None,
            model_name: None,
        });
    }
}

impl Runner for DryRunRunner {
    fn root_path(&self) -> &Path {
        &self.root
    }

    fn train(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()> {
        self.record(Api::Train, config, cli_args, device);
        Ok(())
    }

    fn predict(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()> {
        self.record(Api::Predict, config, cli_args, device);
        Ok(())
    }

    fn export(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()> {
        self.record(Api::Export, config, cli_args, device);
        Ok(())
    }

    fn infer(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()> {
        self.record(Api::Infer, config, cli_args, device);
        Ok(())
    }

    fn compression(
        &self,
        config: &Path,
        cli_args: &[String],
        device: Option<&str>,
        save_dir: &Path,
        model_name: &str,
    ) -> Result<()> {
        self.record(Api::Compression, config, cli_args, device);
        if let Some(call) = self.calls.borrow_mut().last_mut() {
            call.save_dir = Some(save_dir.to_path_buf());
            call.model_name = Some(model_name.to_string());
        }
        Ok(())
    }
}
