//! Tool settings: where suites live, where overlaid configs go, how to run Python

use crate::error::{Error, Result};
use ::config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of the environment variables that override the settings file
pub const ENV_PREFIX: &str = "UAPI";

/// Runtime settings for the `uapi` front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the suite checkout that bundled registrations point into
    pub repo_root: PathBuf,

    /// Directory receiving the per-model overlaid config files
    pub cache_dir: PathBuf,

    /// Python interpreter used to launch runner scripts
    pub python: String,

    /// Optional registry manifest merged over the bundled registrations
    pub registry: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            cache_dir: std::env::temp_dir().join("uapi"),
            python: "python".to_string(),
            registry: None,
        }
    }
}

impl Settings {
    /// Layer an optional YAML file under the process's `UAPI_*` variables
    ///
    /// `UAPI_REPO_ROOT`, `UAPI_CACHE_DIR`, `UAPI_PYTHON` and `UAPI_REGISTRY`
    /// win over the file; keys missing from both keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, None)
    }

    /// Like [`Settings::load`], reading overrides from `env` instead of the
    /// process environment when given
    pub fn load_from(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading settings");
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Yaml)
                    .required(true),
            );
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).source(env));

        builder
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build settings: {e}")))?
            .try_deserialize()
            .map_err(|e| Error::ConfigError(format!("Failed to deserialize settings: {e}")))
    }
}
