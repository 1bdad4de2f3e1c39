//! Verb parameters
//!
//! Every `Option` field is a "leave the base config alone" sentinel when `None`.

use std::path::PathBuf;

const DEFAULT_DEVICE: &str = "gpu";

#[derive(Debug, Clone, PartialEq)]
pub struct TrainParams {
    pub dataset: Option<PathBuf>,
    pub batch_size: Option<u32>,
    pub learning_rate: Option<f64>,
    pub epochs_iters: Option<u32>,
    pub device: String,
    pub resume_path: Option<PathBuf>,
    /// Convert the dynamic graph to a static one during training
    pub dy2st: bool,
    /// Mixed precision level (`O1`, `O2`, `OFF`)
    pub amp: Option<String>,
    pub use_vdl: bool,
    pub save_dir: Option<PathBuf>,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            dataset: None,
            batch_size: None,
            learning_rate: None,
            epochs_iters: None,
            device: DEFAULT_DEVICE.to_string(),
            resume_path: None,
            dy2st: false,
            amp: None,
            use_vdl: true,
            save_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictParams {
    pub weight_path: PathBuf,
    pub input_path: PathBuf,
    pub device: String,
    pub save_dir: Option<PathBuf>,
}

impl PredictParams {
    pub fn new(weight_path: impl Into<PathBuf>, input_path: impl Into<PathBuf>) -> Self {
        Self {
            weight_path: weight_path.into(),
            input_path: input_path.into(),
            device: DEFAULT_DEVICE.to_string(),
            save_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportParams {
    pub weight_path: PathBuf,
    pub save_dir: Option<PathBuf>,
}

impl ExportParams {
    pub fn new(weight_path: impl Into<PathBuf>) -> Self {
        Self {
            weight_path: weight_path.into(),
            save_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferParams {
    pub model_dir: PathBuf,
    pub input_path: PathBuf,
    /// `None` leaves `Global.use_gpu` as the inference template has it
    pub device: Option<String>,
    pub save_dir: Option<PathBuf>,
}

impl InferParams {
    pub fn new(model_dir: impl Into<PathBuf>, input_path: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            input_path: input_path.into(),
            device: Some(DEFAULT_DEVICE.to_string()),
            save_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionParams {
    pub weight_path: PathBuf,
    pub dataset: Option<PathBuf>,
    pub batch_size: Option<u32>,
    pub learning_rate: Option<f64>,
    pub epochs_iters: Option<u32>,
    pub device: String,
    pub use_vdl: bool,
    pub save_dir: Option<PathBuf>,
}

impl CompressionParams {
    pub fn new(weight_path: impl Into<PathBuf>) -> Self {
        Self {
            weight_path: weight_path.into(),
            dataset: None,
            batch_size: None,
            learning_rate: None,
            epochs_iters: None,
            device: DEFAULT_DEVICE.to_string(),
            use_vdl: true,
            save_dir: None,
        }
    }
}
