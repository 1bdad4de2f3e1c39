//! Verb-level task façade
//!
//! A [`Task`] binds one registered model to a runner. Each verb resolves the
//! caller's paths, overlays them on a copy of the model's base config, dumps
//! the result to the task's config path and hands that file to the runner.
//! Unset parameters never touch the config.

mod params;
mod paths;


pub use params::{CompressionParams, ExportParams, InferParams, PredictParams, TrainParams};
pub use paths::{strip_weights_extension, PathResolver, WEIGHTS_EXTENSION};

use crate::config::{ConfigDoc, DatasetLayout};
use crate::error::Result;
use crate::registry::{Api, ModelInfo, Registry, SuiteInfo};
use crate::runner::Runner;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a verb produced: the dumped config and the directory results go to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutcome {
    pub api: Api,
    pub config_path: PathBuf,
    pub save_dir: PathBuf,
}

/// A registered model bound to a runner
#[derive(Debug)]
pub struct Task<'r, R> {
    model: &'r ModelInfo,
    suite: &'r SuiteInfo,
    runner_model_name: &'r str,
    config: ConfigDoc,
    config_path: PathBuf,
    paths: PathResolver,
    runner: R,
}

impl<'r, R: Runner> Task<'r, R> {
    /// Look up `model_name`, open its base config, and place the overlaid
    /// config at `<cache_dir>/<model_name>.yml`.
    pub fn new(
        registry: &'r Registry,
        model_name: &str,
        runner: R,
        cache_dir: &Path,
        paths: PathResolver,
    ) -> Result<Self> {
        let (model, suite) = registry.suite_for_model(model_name)?;
        let config = ConfigDoc::open(&model.config_path)?;
        let config_path = paths.abspath(cache_dir.join(format!("{}.yml", model.model_name)));
        Ok(Self {
            model,
            suite,
            runner_model_name: registry.runner_model_name(&model.model_name),
            config,
            config_path,
            paths,
            runner,
        })
    }

    pub fn name(&self) -> &str {
        &self.model.model_name
    }

    pub fn model(&self) -> &ModelInfo {
        self.model
    }

    pub fn suite(&self) -> &SuiteInfo {
        self.suite
    }

    /// Base configuration; verbs overlay copies of it
    pub fn config(&self) -> &ConfigDoc {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn layout(&self) -> DatasetLayout {
        self.suite.kind.dataset_layout()
    }

    fn begin(&self, api: Api, save_dir: Option<&Path>) -> Result<PathBuf> {
        self.model.ensure_supports(api)?;
        Ok(self
            .paths
            .save_dir_or_default(save_dir, api.default_output_subdir()))
    }

    fn finish(&self, api: Api, config: &ConfigDoc, save_dir: PathBuf) -> Result<TaskOutcome> {
        config.dump(&self.config_path)?;
        tracing::info!(
            model = %self.name(),
            verb = %api,
            config = %self.config_path.display(),
            save_dir = %save_dir.display(),
            "dispatching to runner"
        );
        Ok(TaskOutcome {
            api,
            config_path: self.config_path.clone(),
            save_dir,
        })
    }

    pub fn train(&self, params: &TrainParams) -> Result<TaskOutcome> {
        let save_dir = self.begin(Api::Train, params.save_dir.as_deref())?;
        let dataset = params.dataset.as_ref().map(|p| self.paths.abspath(p));
        let resume_path = params.resume_path.as_ref().map(|p| self.paths.abspath(p));

        let mut config = self.config.copy();
        config.update_dataset(dataset.as_deref(), self.layout())?;
        config.update_amp(params.amp.as_deref())?;
        config.update_device(&params.device)?;

        if let Some(batch_size) = params.batch_size {
            config.update_batch_size(batch_size)?;
        }
        if let Some(lr) = params.learning_rate {
            config.update_lr_scheduler(lr)?;
        }
        if let Some(epochs) = params.epochs_iters {
            config.update([format!("Global.epochs={epochs}")])?;
        }
        if let Some(resume) = &resume_path {
            config.update([format!(
                "Global.checkpoints={}",
                strip_weights_extension(resume)
            )])?;
        }
        if params.dy2st {
            config.update(["Global.to_static=true"])?;
        }
        if params.use_vdl {
            config.update(["Global.use_visualdl=true"])?;
        }
        config.update([format!("Global.output_dir={}", save_dir.display())])?;

        let outcome = self.finish(Api::Train, &config, save_dir)?;
        self.runner
            .train(&outcome.config_path, &[], Some(&params.device))?;
        Ok(outcome)
    }

    /// Note: the resolved save dir is reported in the outcome but is not
    /// written into the config.
    pub fn predict(&self, params: &PredictParams) -> Result<TaskOutcome> {
        let save_dir = self.begin(Api::Predict, params.save_dir.as_deref())?;
        let weight_path = self.paths.abspath(&params.weight_path);
        let input_path = self.paths.abspath(&params.input_path);

        let mut config = self.config.copy();
        config.update([
            format!(
                "Global.pretrained_model={}",
                strip_weights_extension(&weight_path)
            ),
            format!("Infer.infer_imgs={}", input_path.display()),
        ])?;

        let outcome = self.finish(Api::Predict, &config, save_dir)?;
        self.runner
            .predict(&outcome.config_path, &[], Some(&params.device))?;
        Ok(outcome)
    }

    pub fn export(&self, params: &ExportParams) -> Result<TaskOutcome> {
        let save_dir = self.begin(Api::Export, params.save_dir.as_deref())?;
        let weight_path = self.paths.abspath(&params.weight_path);

        let mut config = self.config.copy();
        config.update([
            format!(
                "Global.pretrained_model={}",
                strip_weights_extension(&weight_path)
            ),
            format!("Global.save_inference_dir={}", save_dir.display()),
        ])?;

        let outcome = self.finish(Api::Export, &config, save_dir)?;
        self.runner.export(&outcome.config_path, &[], None)?;
        Ok(outcome)
    }

    /// Starts from the suite's inference template instead of the training config.
    pub fn infer(&self, params: &InferParams) -> Result<TaskOutcome> {
        let save_dir = self.begin(Api::Infer, params.save_dir.as_deref())?;
        let model_dir = self.paths.abspath(&params.model_dir);
        let input_path = self.paths.abspath(&params.input_path);
        let template = self
            .runner
            .root_path()
            .join(self.suite.kind.infer_config());

        let mut config = self.config.copy();
        config.load(&template)?;
        config.update([
            format!("Global.inference_model_dir={}", model_dir.display()),
            format!("Global.infer_imgs={}", input_path.display()),
        ])?;
        if let Some(device) = &params.device {
            let use_gpu = device.split(':').next() == Some("gpu");
            config.update([format!("Global.use_gpu={use_gpu}")])?;
        }

        let outcome = self.finish(Api::Infer, &config, save_dir)?;
        self.runner
            .infer(&outcome.config_path, &[], params.device.as_deref())?;
        Ok(outcome)
    }

    /// The runner receives the model under its alias, if one is registered.
    pub fn compression(&self, params: &CompressionParams) -> Result<TaskOutcome> {
        let save_dir = self.begin(Api::Compression, params.save_dir.as_deref())?;
        let weight_path = self.paths.abspath(&params.weight_path);
        let dataset = params.dataset.as_ref().map(|p| self.paths.abspath(p));

        let mut config = self.config.copy();
        config.update_dataset(dataset.as_deref(), self.layout())?;
        config.update_device(&params.device)?;

        if let Some(batch_size) = params.batch_size {
            config.update_batch_size(batch_size)?;
        }
        if let Some(lr) = params.learning_rate {
            config.update_lr_scheduler(lr)?;
        }
        if let Some(epochs) = params.epochs_iters {
            config.update([format!("Global.epochs={epochs}")])?;
        }
        config.update([format!(
            "Global.pretrained_model={}",
            strip_weights_extension(&weight_path)
        )])?;
        if params.use_vdl {
            config.update(["Global.use_visualdl=true"])?;
        }
        config.update([format!("Global.output_dir={}", save_dir.display())])?;

        let outcome = self.finish(Api::Compression, &config, save_dir)?;
        tracing::debug!(
            model = %self.name(),
            runner_model = %self.runner_model_name,
            "compression model name"
        );
        self.runner.compression(
            &outcome.config_path,
            &[],
            Some(&params.device),
            &outcome.save_dir,
            self.runner_model_name,
        )?;
        Ok(outcome)
    }
}
