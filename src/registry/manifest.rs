//! YAML registry manifests
//!
//! ```yaml
//! suites:
//!   - suite_name: PaddleClas
//!     kind: cls
//!     runner_root_path: ../PaddleClas
//! models:
//!   - model_name: ResNet50
//!     suite: PaddleClas
//!     config_path: ../PaddleClas/ppcls/configs/ImageNet/ResNet/ResNet50.yaml
//!     supported_apis: [train, predict, export, infer]
//! aliases:
//!   ResNet50: ResNet
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use super::{ModelInfo, Registry, SuiteInfo};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Registrations read from a manifest file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryManifest {
    #[serde(default)]
    pub suites: Vec<SuiteInfo>,
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl RegistryManifest {
    /// Read a manifest and anchor its relative paths at the manifest directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read registry manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut manifest: Self = serde_yaml::from_str(&content).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to parse registry manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        if let Some(base) = path.parent() {
            manifest.anchor(base);
        }
        Ok(manifest)
    }

    fn anchor(&mut self, base: &Path) {
        for suite in &mut self.suites {
            suite.runner_root_path = base.join(&suite.runner_root_path);
        }
        for model in &mut self.models {
            model.config_path = base.join(&model.config_path);
            if let Some(path) = model.auto_compression_config_path.as_mut() {
                *path = base.join(&*path);
            }
        }
    }

    /// Register everything in this manifest
    pub fn apply(self, registry: &mut Registry) {
        for suite in self.suites {
            registry.register_suite_info(suite);
        }
        for model in self.models {
            registry.register_model_info(model);
        }
        for (from, to) in self.aliases {
            registry.register_alias(from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Api, SuiteKind};
    use std::path::PathBuf;

    const MANIFEST: &str = r#"
suites:
  - suite_name: PaddleClas
    kind: cls
    runner_root_path: PaddleClas
models:
  - model_name: ResNet50
    suite: PaddleClas
    config_path: PaddleClas/ResNet50.yaml
    supported_apis: [train, predict]
  - model_name: Absolute
    suite: PaddleClas
    config_path: /abs/Absolute.yaml
    supported_apis: [export]
aliases:
  ResNet50: ResNet
"#;

    #[test]
    fn test_load_manifest_anchors_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.yaml");
        fs::write(&path, MANIFEST).unwrap();

        let mut registry = Registry::new();
        registry.load_manifest(&path).unwrap();

        let (model, suite) = registry.suite_for_model("ResNet50").unwrap();
        assert_eq!(suite.kind, SuiteKind::Cls);
        assert_eq!(suite.runner_root_path, dir.path().join("PaddleClas"));
        assert_eq!(model.config_path, dir.path().join("PaddleClas/ResNet50.yaml"));
        assert!(model.supports(Api::Predict));
        assert!(!model.supports(Api::Export));

        let absolute = registry.model("Absolute").unwrap();
        assert_eq!(absolute.config_path, PathBuf::from("/abs/Absolute.yaml"));

        assert_eq!(registry.runner_model_name("ResNet50"), "ResNet");
    }

    #[test]
    fn test_manifest_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.yaml");
        fs::write(
            &path,
            "models:\n  - model_name: PPLCNetV2_base\n    suite: PaddleClas\n    config_path: custom.yaml\n    supported_apis: [train]\n",
        )
        .unwrap();

        let mut registry = Registry::with_builtin(Path::new("/opt/PaddleClas"));
        registry.load_manifest(&path).unwrap();

        let model = registry.model("PPLCNetV2_base").unwrap();
        assert_eq!(model.config_path, dir.path().join("custom.yaml"));
        assert!(!model.supports(Api::Export));
    }

    #[test]
    fn test_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.yaml");
        fs::write(&path, "suites: {not: [a, list}").unwrap();

        let err = Registry::new().load_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
