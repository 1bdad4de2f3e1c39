//! Absolute path resolution against a fixed base directory

use crate::error::Result;
use std::path::{Component, Path, PathBuf};

/// Weights extension dropped before a path is handed to the framework
pub const WEIGHTS_EXTENSION: &str = ".pdparams";

/// Resolves caller paths so results do not depend on where the tool was started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    base: PathBuf,
}

impl PathResolver {
    /// Resolve against the process working directory
    pub fn current_dir() -> Result<Self> {
        Self::with_base(std::env::current_dir()?)
    }

    /// Resolve against `base`; a relative base is taken from the working directory
    pub fn with_base(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        let base = if base.is_absolute() {
            base
        } else {
            std::env::current_dir()?.join(base)
        };
        Ok(Self {
            base: normalize(&base),
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Absolute, normalized form of `path`. `.` and `..` are folded lexically;
    /// symlinks are not followed.
    pub fn abspath(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.base.join(path))
        }
    }

    /// `save_dir` made absolute, or `output/<subdir>` under the base
    pub fn save_dir_or_default(&self, save_dir: Option<&Path>, subdir: &str) -> PathBuf {
        match save_dir {
            Some(dir) => self.abspath(dir),
            None => self.abspath(Path::new("output").join(subdir)),
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Drop every `.pdparams` from the path so the framework can append its own suffixes
pub fn strip_weights_extension(path: &Path) -> String {
    path.to_string_lossy().replace(WEIGHTS_EXTENSION, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_relative_path_joins_base() {
        let paths = PathResolver::with_base("/work").unwrap();
        assert_eq!(paths.abspath("data/train"), PathBuf::from("/work/data/train"));
    }

    #[test]
    fn test_absolute_path_is_kept() {
        let paths = PathResolver::with_base("/work").unwrap();
        assert_eq!(paths.abspath("/data/train"), PathBuf::from("/data/train"));
    }

    #[test]
    fn test_dots_are_folded() {
        let paths = PathResolver::with_base("/work/sub").unwrap();
        assert_eq!(paths.abspath("../data/./x"), PathBuf::from("/work/data/x"));
        assert_eq!(paths.abspath("/../../x"), PathBuf::from("/x"));
    }

    #[test]
    fn test_default_save_dir() {
        let paths = PathResolver::with_base("/work").unwrap();
        assert_eq!(
            paths.save_dir_or_default(None, "train"),
            PathBuf::from("/work/output/train")
        );
        assert_eq!(
            paths.save_dir_or_default(Some(Path::new("runs/a")), "train"),
            PathBuf::from("/work/runs/a")
        );
    }

    #[test]
    fn test_current_dir_is_absolute() {
        assert!(PathResolver::current_dir().unwrap().base().is_absolute());
    }

    #[test]
    fn test_relative_base_uses_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        let paths = PathResolver::with_base("jobs/../runs").unwrap();
        assert_eq!(paths.base(), normalize(&cwd.join("runs")));
        assert!(paths.base().is_absolute());
    }

    #[test]
    fn test_strip_weights_extension() {
        assert_eq!(
            strip_weights_extension(Path::new("/w/best_model.pdparams")),
            "/w/best_model"
        );
        assert_eq!(strip_weights_extension(Path::new("/w/best_model")), "/w/best_model");
    }

    #[test]
    fn test_strip_weights_extension_removes_every_occurrence() {
        assert_eq!(
            strip_weights_extension(Path::new("/runs/a.pdparams/latest.pdparams")),
            "/runs/a/latest"
        );
    }

    proptest! {
        #[test]
        fn prop_resolved_paths_are_absolute(
            segments in proptest::collection::vec("[a-z0-9_]{1,8}|\\.|\\.\\.", 0..6),
            leading_slash in any::<bool>(),
        ) {
            let raw = segments.join("/");
            let raw = if leading_slash { format!("/{raw}") } else { raw };
            let resolved = PathResolver::with_base("/base/dir").unwrap().abspath(&raw);
            prop_assert!(resolved.is_absolute());
            prop_assert!(!resolved
                .components()
                .any(|c| matches!(c, Component::CurDir | Component::ParentDir)));
        }
    }
}
