//! Integration tests for config module

use super::*;
use serde_yaml::Value;
use std::io::Write;
use tempfile::NamedTempFile;

const TEMPLATE: &str = r#"
Global:
  checkpoints: null
  pretrained_model: null
  output_dir: ./output/
  device: gpu
  epochs: 360
  use_visualdl: False
Arch:
  name: RecModel
Optimizer:
  lr:
    name: Cosine
    learning_rate: 0.1
DataLoader:
  Train:
    sampler:
      batch_size: 64
"#;

#[test]
fn test_open_update_dump_reopen() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(TEMPLATE.as_bytes()).unwrap();

    let base = ConfigDoc::open(temp_file.path()).unwrap();
    let mut overlay = base.copy();
    overlay
        .update([
            "Global.epochs=10",
            "Global.checkpoints=/ckpt/epoch_5",
            "Global.use_visualdl=True",
        ])
        .unwrap();
    overlay.update_batch_size(16).unwrap();
    overlay.update_lr_scheduler(0.05).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/cache/RecModel.yml");
    overlay.dump(&out).unwrap();

    let reopened = ConfigDoc::open(&out).unwrap();
    assert_eq!(reopened, overlay);
    assert_eq!(reopened.get("Global.epochs"), Some(&Value::from(10)));
    assert_eq!(reopened.get_str("Global.checkpoints"), Some("/ckpt/epoch_5"));
    assert_eq!(reopened.get("Global.use_visualdl"), Some(&Value::Bool(true)));
    assert_eq!(
        reopened.get("DataLoader.Train.sampler.batch_size"),
        Some(&Value::from(16))
    );
    assert_eq!(reopened.get_str("Optimizer.lr.name"), Some("Cosine"));

    assert_eq!(base.get("Global.epochs"), Some(&Value::from(360)));
    assert_eq!(base.get("Global.use_visualdl"), Some(&Value::Bool(false)));
}

#[test]
fn test_load_replaces_document() {
    let mut first = NamedTempFile::new().unwrap();
    first.write_all(TEMPLATE.as_bytes()).unwrap();
    let mut second = NamedTempFile::new().unwrap();
    second
        .write_all(b"Global:\n  use_gpu: true\n  infer_imgs: ./images\n")
        .unwrap();

    let mut doc = ConfigDoc::open(first.path()).unwrap();
    doc.load(second.path()).unwrap();

    assert!(doc.get("Arch").is_none());
    assert!(doc.get("Global.epochs").is_none());
    assert_eq!(doc.get_str("Global.infer_imgs"), Some("./images"));
}

#[test]
fn test_open_missing_file() {
    let result = ConfigDoc::open("/nonexistent/config.yaml");
    assert!(matches!(result, Err(crate::Error::ConfigError(_))));
}

#[test]
fn test_open_malformed_yaml() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"this is not valid yaml: [}").unwrap();

    let result = ConfigDoc::open(temp_file.path());
    assert!(matches!(result, Err(crate::Error::Yaml(_))));
}

#[test]
fn test_update_stops_at_first_bad_item() {
    let mut doc = ConfigDoc::from_yaml_str(TEMPLATE).unwrap();
    let result = doc.update(["Global.epochs=1", "Global.device", "Global.seed=3"]);

    assert!(result.is_err());
    assert_eq!(doc.get("Global.epochs"), Some(&Value::from(1)));
    assert!(doc.get("Global.seed").is_none());
}

#[test]
fn test_typed_set() {
    let mut doc = ConfigDoc::new();
    doc.set("Global.image_shape", Value::Sequence(vec![3.into(), 224.into(), 224.into()]))
        .unwrap();
    assert_eq!(doc.get("Global.image_shape.2"), Some(&Value::from(224)));
}
