//! Runner that launches the suite's Python entry points

use super::{DeviceSpec, Runner};
use crate::error::{Error, Result};
use crate::registry::{Api, SuiteInfo, SuiteKind};
use std::path::{Path, PathBuf};
use std::process::Command;

const TRAIN_SCRIPT: &str = "tools/train.py";
const PREDICT_SCRIPT: &str = "tools/infer.py";
const EXPORT_SCRIPT: &str = "tools/export_model.py";
const DISTRIBUTED_LAUNCH: &str = "paddle.distributed.launch";

/// Spawns `<python> <script> -c <config> [args...]` in the runner root
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    root: PathBuf,
    python: String,
    kind: SuiteKind,
}

impl ProcessRunner {
    pub fn new(root: impl Into<PathBuf>, python: impl Into<String>, kind: SuiteKind) -> Self {
        Self {
            root: root.into(),
            python: python.into(),
            kind,
        }
    }

    pub fn for_suite(suite: &SuiteInfo, python: impl Into<String>) -> Self {
        Self::new(&suite.runner_root_path, python, suite.kind)
    }

    /// Build the command for `verb` without running it
    pub fn command(
        &self,
        verb: Api,
        config: &Path,
        cli_args: &[String],
        device: Option<&DeviceSpec>,
    ) -> Command {
        let (workdir, script) = match verb {
            Api::Train | Api::Compression => (self.root.clone(), TRAIN_SCRIPT),
            Api::Predict => (self.root.clone(), PREDICT_SCRIPT),
            Api::Export => (self.root.clone(), EXPORT_SCRIPT),
            Api::Infer => (self.root.join("deploy"), self.kind.infer_script()),
        };

        let mut cmd = Command::new(&self.python);
        cmd.current_dir(workdir);

        let gpus = device.filter(|d| d.is_gpu() && !d.ids.is_empty());
        match (verb, gpus) {
            (Api::Train | Api::Compression, Some(device)) if device.is_multi_card() => {
                cmd.args(["-m", DISTRIBUTED_LAUNCH, "--gpus"])
                    .arg(device.id_list());
            }
            (_, Some(device)) => {
                cmd.env("CUDA_VISIBLE_DEVICES", device.id_list());
            }
            (_, None) => {}
        }

        cmd.arg(script).arg("-c").arg(config).args(cli_args);
        cmd
    }

    fn run(
        &self,
        verb: Api,
        config: &Path,
        cli_args: &[String],
        device: Option<&str>,
    ) -> Result<()> {
        let device = device.map(DeviceSpec::parse).transpose()?;
        let mut cmd = self.command(verb, config, cli_args, device.as_ref());
        tracing::info!(verb = %verb, config = %config.display(), "launching runner");
        tracing::debug!(command = ?cmd, "runner command");

        let status = cmd.status()?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::RunnerFailed {
                verb: verb.as_str(),
                config: config.to_path_buf(),
                status: status.to_string(),
            })
        }
    }
}

impl Runner for ProcessRunner {
    fn root_path(&self) -> &Path {
        &self.root
    }

    fn train(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()> {
        self.run(Api::Train, config, cli_args, device)
    }

    fn predict(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()> {
        self.run(Api::Predict, config, cli_args, device)
    }

    fn export(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()> {
        self.run(Api::Export, config, cli_args, device)
    }

    fn infer(&self, config: &Path, cli_args: &[String], device: Option<&str>) -> Result<()> {
        self.run(Api::Infer, config, cli_args, device)
    }

    fn compression(
        &self,
        config: &Path,
        cli_args: &[String],
        device: Option<&str>,
        save_dir: &Path,
        model_name: &str,
    ) -> Result<()> {
        self.run(Api::Compression, config, cli_args, device)?;

        // Checkpoints land in <output_dir>/<architecture name>/.
        let weights = save_dir.join(model_name).join("latest");
        let mut export_args = cli_args.to_vec();
        export_args.extend([
            "-o".to_string(),
            format!("Global.pretrained_model={}", weights.display()),
            "-o".to_string(),
            format!("Global.save_inference_dir={}", save_dir.join("export").display()),
        ]);
        self.run(Api::Export, config, &export_args, None)
    }
}
