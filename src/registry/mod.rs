//! Model and suite registration
//!
//! A [`Registry`] maps model names to their suite and base config, records
//! which verbs each model supports, and owns the alias table used when a
//! runner knows a model under a different name. It is an ordinary value:
//! build it at startup, pass it by reference, drop it at exit.

mod builtin;
mod manifest;

pub use manifest::RegistryManifest;

use crate::config::DatasetLayout;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Verbs a model can support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Api {
    Train,
    Predict,
    Export,
    Infer,
    Compression,
}

impl Api {
    pub const ALL: [Api; 5] = [
        Api::Train,
        Api::Predict,
        Api::Export,
        Api::Infer,
        Api::Compression,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Predict => "predict",
            Self::Export => "export",
            Self::Infer => "infer",
            Self::Compression => "compression",
        }
    }

    /// Directory under `output/` used when the caller gives no save dir
    pub fn default_output_subdir(&self) -> &'static str {
        match self {
            Self::Compression => "compress",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Api {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(Self::Train),
            "predict" => Ok(Self::Predict),
            "export" => Ok(Self::Export),
            "infer" => Ok(Self::Infer),
            "compression" | "compress" => Ok(Self::Compression),
            _ => Err(format!(
                "Unknown API: {s}. Valid APIs: train, predict, export, infer, compression"
            )),
        }
    }
}

/// Family of conventions shared by a suite's model, runner and config handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuiteKind {
    /// Image classification
    #[serde(rename = "cls")]
    Cls,
    /// General recognition (retrieval)
    #[serde(rename = "shitu")]
    ShiTu,
}

impl SuiteKind {
    pub fn dataset_layout(&self) -> DatasetLayout {
        match self {
            Self::Cls => DatasetLayout::Classification,
            Self::ShiTu => DatasetLayout::Recognition,
        }
    }

    /// Inference config template, relative to the runner root
    pub fn infer_config(&self) -> &'static str {
        match self {
            Self::Cls => "deploy/configs/inference_cls.yaml",
            Self::ShiTu => "deploy/configs/inference_rec.yaml",
        }
    }

    /// Inference entry point, relative to `<runner root>/deploy`
    pub fn infer_script(&self) -> &'static str {
        match self {
            Self::Cls => "python/predict_cls.py",
            Self::ShiTu => "python/predict_rec.py",
        }
    }
}

/// Suite registration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteInfo {
    pub suite_name: String,
    pub kind: SuiteKind,
    pub runner_root_path: PathBuf,
}

impl SuiteInfo {
    pub fn new(
        suite_name: impl Into<String>,
        kind: SuiteKind,
        runner_root_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            suite_name: suite_name.into(),
            kind,
            runner_root_path: runner_root_path.into(),
        }
    }
}

/// Model registration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub suite: String,
    pub config_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_compression_config_path: Option<PathBuf>,
    pub supported_apis: BTreeSet<Api>,
}

impl ModelInfo {
    pub fn new(
        model_name: impl Into<String>,
        suite: impl Into<String>,
        config_path: impl Into<PathBuf>,
        supported_apis: impl IntoIterator<Item = Api>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            suite: suite.into(),
            config_path: config_path.into(),
            auto_compression_config_path: None,
            supported_apis: supported_apis.into_iter().collect(),
        }
    }

    pub fn with_auto_compression_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.auto_compression_config_path = Some(path.into());
        self
    }

    pub fn supports(&self, api: Api) -> bool {
        self.supported_apis.contains(&api)
    }

    /// Fail with [`Error::UnsupportedApi`] unless `api` is supported
    pub fn ensure_supports(&self, api: Api) -> Result<()> {
        if self.supports(api) {
            Ok(())
        } else {
            Err(Error::UnsupportedApi {
                model: self.model_name.clone(),
                api: api.to_string(),
            })
        }
    }
}

/// Model name → name the runner expects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last registration for `from` wins
    pub fn register(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    /// Aliased name, or `name` itself when no alias exists
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Suites, models and aliases known to the process
#[derive(Debug, Clone, Default)]
pub struct Registry {
    suites: HashMap<String, SuiteInfo>,
    models: BTreeMap<String, ModelInfo>,
    aliases: AliasTable,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the bundled suites, rooted at `repo_root`
    pub fn with_builtin(repo_root: &Path) -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry, repo_root);
        registry
    }

    /// Insert a suite; replaces any previous suite of the same name
    pub fn register_suite_info(&mut self, info: SuiteInfo) {
        tracing::debug!(suite = %info.suite_name, root = %info.runner_root_path.display(), "suite registered");
        self.suites.insert(info.suite_name.clone(), info);
    }

    /// Insert a model; replaces any previous model of the same name
    pub fn register_model_info(&mut self, info: ModelInfo) {
        tracing::debug!(model = %info.model_name, suite = %info.suite, "model registered");
        self.models.insert(info.model_name.clone(), info);
    }

    pub fn register_alias(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.aliases.register(from, to);
    }

    pub fn suite(&self, name: &str) -> Option<&SuiteInfo> {
        self.suites.get(name)
    }

    pub fn model(&self, name: &str) -> Option<&ModelInfo> {
        self.models.get(name)
    }

    /// Resolve a model name to its record and the record of its suite
    pub fn suite_for_model(&self, name: &str) -> Result<(&ModelInfo, &SuiteInfo)> {
        let model = self
            .model(name)
            .ok_or_else(|| Error::UnknownModel(name.to_string()))?;
        let suite = self.suite(&model.suite).ok_or_else(|| Error::UnknownSuite {
            suite: model.suite.clone(),
            model: name.to_string(),
        })?;
        Ok((model, suite))
    }

    /// Name the runner should see for `model_name`
    pub fn runner_model_name<'a>(&'a self, model_name: &'a str) -> &'a str {
        self.aliases.resolve(model_name)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Registered models, ordered by name
    pub fn models(&self) -> impl Iterator<Item = &ModelInfo> {
        self.models.values()
    }

    pub fn suites(&self) -> impl Iterator<Item = &SuiteInfo> {
        self.suites.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drop every registration
    pub fn clear(&mut self) {
        self.suites.clear();
        self.models.clear();
        self.aliases = AliasTable::new();
    }

    /// Merge the suites, models and aliases of a YAML manifest
    pub fn load_manifest(&mut self, path: &Path) -> Result<()> {
        let manifest = RegistryManifest::load(path)?;
        manifest.apply(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_suite_info(SuiteInfo::new("PaddleClas", SuiteKind::Cls, "/repo"));
        registry.register_model_info(ModelInfo::new(
            "ResNet50",
            "PaddleClas",
            "/repo/ResNet50.yaml",
            [Api::Train, Api::Export],
        ));
        registry
    }

    #[test]
    fn test_suite_for_model() {
        let registry = registry();
        let (model, suite) = registry.suite_for_model("ResNet50").unwrap();
        assert_eq!(model.config_path, PathBuf::from("/repo/ResNet50.yaml"));
        assert_eq!(suite.kind, SuiteKind::Cls);
    }

    #[test]
    fn test_unknown_model() {
        let registry = registry();
        assert!(matches!(
            registry.suite_for_model("nope"),
            Err(Error::UnknownModel(_))
        ));
    }

    #[test]
    fn test_model_with_unregistered_suite() {
        let mut registry = registry();
        registry.register_model_info(ModelInfo::new("Orphan", "Missing", "/x.yaml", Api::ALL));
        assert!(matches!(
            registry.suite_for_model("Orphan"),
            Err(Error::UnknownSuite { .. })
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = registry();
        registry.register_model_info(ModelInfo::new(
            "ResNet50",
            "PaddleClas",
            "/other/ResNet50.yaml",
            Api::ALL,
        ));
        assert_eq!(registry.len(), 1);
        let model = registry.model("ResNet50").unwrap();
        assert_eq!(model.config_path, PathBuf::from("/other/ResNet50.yaml"));
        assert!(model.supports(Api::Predict));
    }

    #[test]
    fn test_ensure_supports() {
        let registry = registry();
        let model = registry.model("ResNet50").unwrap();
        assert!(model.ensure_supports(Api::Train).is_ok());
        let err = model.ensure_supports(Api::Infer).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model 'ResNet50' does not support the 'infer' API"
        );
    }

    #[test]
    fn test_alias_resolution() {
        let mut registry = registry();
        assert_eq!(registry.runner_model_name("ResNet50"), "ResNet50");
        registry.register_alias("ResNet50", "ResNet");
        assert_eq!(registry.runner_model_name("ResNet50"), "ResNet");
        assert_eq!(registry.aliases().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut registry = registry();
        registry.register_alias("a", "b");
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.suite("PaddleClas").is_none());
        assert!(registry.aliases().is_empty());
    }

    #[test]
    fn test_api_parse_and_output_dirs() {
        assert_eq!("compress".parse::<Api>().unwrap(), Api::Compression);
        assert_eq!("Train".parse::<Api>().unwrap(), Api::Train);
        assert!("deploy".parse::<Api>().is_err());
        assert_eq!(Api::Compression.default_output_subdir(), "compress");
        assert_eq!(Api::Predict.default_output_subdir(), "predict");
    }
}
