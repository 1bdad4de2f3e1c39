//! In-memory YAML configuration document with dotted key-path overlays

use super::assign::Assignment;
use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Where a suite expects its dataset lists inside the config tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetLayout {
    /// Image classification: `Train` and `Eval` splits with label lists
    Classification,
    /// Retrieval/recognition: `Train` split plus `Eval.Gallery` and `Eval.Query`
    Recognition,
}

/// A YAML configuration tree that can be overlaid with `KEY=VALUE` updates.
///
/// `copy()` yields an independent snapshot; nothing done to the copy is
/// visible through the original.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDoc {
    root: Value,
}

impl Default for ConfigDoc {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigDoc {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
        }
    }

    /// Open a template file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut doc = Self::new();
        doc.load(path)?;
        Ok(doc)
    }

    /// Parse a document from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(yaml)?;
        Ok(Self::from_value(root))
    }

    /// Wrap an existing YAML value; a null root becomes an empty mapping
    pub fn from_value(root: Value) -> Self {
        match root {
            Value::Null => Self::new(),
            root => Self { root },
        }
    }

    /// Independent snapshot of this document
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Replace the in-memory document with the one parsed from `path`
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        *self = Self::from_yaml_str(&content)?;
        Ok(())
    }

    /// Serialize the document to `path`, creating parent directories
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml_string()?)?;
        tracing::debug!(path = %path.display(), "config dumped");
        Ok(())
    }

    /// Render as YAML text
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Root of the tree
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Apply each `KEY=VALUE` assignment in order
    pub fn update<I, S>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            let assignment = Assignment::parse(item.as_ref())?;
            let segments: Vec<&str> = assignment.segments().collect();
            tracing::debug!(key = assignment.key, value = ?assignment.value, "overlay");
            set_path(&mut self.root, &segments, assignment.value, assignment.key)?;
        }
        Ok(())
    }

    /// Set a typed value at a dotted path
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let segments: Vec<&str> = key.split('.').collect();
        set_path(&mut self.root, &segments, value, key)
    }

    /// Look up a dotted path
    pub fn get(&self, key: &str) -> Option<&Value> {
        key.split('.').try_fold(&self.root, |node, segment| match node {
            Value::Mapping(map) => map.get(segment),
            Value::Sequence(seq) => segment.parse::<usize>().ok().and_then(|i| seq.get(i)),
            _ => None,
        })
    }

    /// Look up a dotted path and return it as a string slice
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Remove a dotted path, returning the old value if it existed
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (self.get_mut(parent)?, leaf),
            None => (&mut self.root, key),
        };
        match parent {
            Value::Mapping(map) => map.remove(leaf),
            _ => None,
        }
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        key.split('.').try_fold(&mut self.root, |node, segment| match node {
            Value::Mapping(map) => map.get_mut(segment),
            Value::Sequence(seq) => segment
                .parse::<usize>()
                .ok()
                .and_then(move |i| seq.get_mut(i)),
            _ => None,
        })
    }

    /// Point the train/eval splits at `dataset`; `None` leaves the document untouched
    pub fn update_dataset(&mut self, dataset: Option<&Path>, layout: DatasetLayout) -> Result<()> {
        let Some(root) = dataset else {
            return Ok(());
        };
        let root = root.display();
        let mut items = vec![
            format!("DataLoader.Train.dataset.image_root={root}"),
            format!("DataLoader.Train.dataset.cls_label_path={root}/train_list.txt"),
        ];
        match layout {
            DatasetLayout::Classification => {
                items.push(format!("DataLoader.Eval.dataset.image_root={root}"));
                items.push(format!(
                    "DataLoader.Eval.dataset.cls_label_path={root}/val_list.txt"
                ));
            }
            DatasetLayout::Recognition => {
                for (split, list) in [("Gallery", "gallery_list.txt"), ("Query", "query_list.txt")] {
                    items.push(format!("DataLoader.Eval.{split}.dataset.image_root={root}"));
                    items.push(format!(
                        "DataLoader.Eval.{split}.dataset.cls_label_path={root}/{list}"
                    ));
                }
            }
        }
        self.update(items)
    }

    /// `Global.device` takes the device kind, without card ids
    pub fn update_device(&mut self, device: &str) -> Result<()> {
        let kind = device.split(':').next().unwrap_or(device);
        self.update([format!("Global.device={kind}")])
    }

    pub fn update_batch_size(&mut self, batch_size: u32) -> Result<()> {
        self.update([format!("DataLoader.Train.sampler.batch_size={batch_size}")])
    }

    pub fn update_lr_scheduler(&mut self, learning_rate: f64) -> Result<()> {
        self.set("Optimizer.lr.learning_rate", Value::from(learning_rate))
    }

    /// Mixed precision. `None` is a no-op, `OFF` drops the `AMP` section.
    pub fn update_amp(&mut self, amp: Option<&str>) -> Result<()> {
        match amp {
            None => Ok(()),
            Some(level) if level.eq_ignore_ascii_case("off") => {
                self.remove("AMP");
                Ok(())
            }
            Some(level) => self.update([
                format!("AMP.level={level}"),
                "AMP.scale_loss=65536".to_string(),
                "AMP.use_dynamic_loss_scaling=true".to_string(),
            ]),
        }
    }
}

fn set_path(node: &mut Value, segments: &[&str], value: Value, key: &str) -> Result<()> {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return Ok(());
    };

    if let Value::Sequence(seq) = node {
        let len = seq.len();
        let slot = head
            .parse::<usize>()
            .ok()
            .and_then(|i| seq.get_mut(i))
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "'{key}': '{head}' is not a valid index into a list of {len} items"
                ))
            })?;
        return set_path(slot, rest, value, key);
    }

    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    let map = node
        .as_mapping_mut()
        .ok_or_else(|| Error::ConfigError(format!("'{key}': '{head}' is not a mapping")))?;
    let child_key = Value::String((*head).to_string());
    if rest.is_empty() {
        map.insert(child_key, value);
        return Ok(());
    }
    let child = map
        .entry(child_key)
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    set_path(child, rest, value, key)
}
