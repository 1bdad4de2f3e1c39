//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! uapi train PPLCNetV2_base --dataset ./dataset/flowers102 --epochs-iters 10
//! uapi predict PPLCNetV2_base --weights output/train/best_model.pdparams --input demo.jpg
//! uapi export PPLCNetV2_base --weights output/train/best_model.pdparams
//! uapi infer PPLCNetV2_base --model-dir output/export --input ./images
//! uapi compress PPLCNetV2_base_ShiTu --weights output/train/latest.pdparams
//! uapi models --format yaml
//! ```

use crate::task::{CompressionParams, ExportParams, InferParams, PredictParams, TrainParams};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// uapi: run suite models through train/predict/export/infer/compress
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "uapi")]
#[command(version)]
#[command(about = "Overlay YAML configs and dispatch train/predict/export/infer/compress to a suite runner")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Write the overlaid config but do not launch the runner
    #[arg(long, global = true)]
    pub dry_run: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train a model
    Train(TrainArgs),

    /// Predict with trained weights
    Predict(PredictArgs),

    /// Export trained weights to an inference model
    Export(ExportArgs),

    /// Run an exported inference model
    Infer(InferArgs),

    /// Compression-aware training and export
    Compress(CompressArgs),

    /// List registered models
    Models(ModelsArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Registered model name
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Dataset root directory
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Override batch size
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Override learning rate
    #[arg(long)]
    pub lr: Option<f64>,

    /// Override number of epochs/iterations
    #[arg(long, visible_alias = "epochs")]
    pub epochs_iters: Option<u32>,

    /// Device, e.g. gpu, gpu:0,1, cpu
    #[arg(long, default_value = "gpu")]
    pub device: String,

    /// Resume from checkpoint
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Train with dynamic-to-static conversion
    #[arg(long)]
    pub dy2st: bool,

    /// Mixed precision level (O1, O2, OFF)
    #[arg(long)]
    pub amp: Option<String>,

    /// Disable VisualDL logging
    #[arg(long)]
    pub no_vdl: bool,

    /// Output directory (default: output/train)
    #[arg(short, long)]
    pub save_dir: Option<PathBuf>,
}

impl TrainArgs {
    pub fn to_params(&self) -> TrainParams {
        TrainParams {
            dataset: self.dataset.clone(),
            batch_size: self.batch_size,
            learning_rate: self.lr,
            epochs_iters: self.epochs_iters,
            device: self.device.clone(),
            resume_path: self.resume.clone(),
            dy2st: self.dy2st,
            amp: self.amp.clone(),
            use_vdl: !self.no_vdl,
            save_dir: self.save_dir.clone(),
        }
    }
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    /// Registered model name
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Trained weights (.pdparams)
    #[arg(short, long)]
    pub weights: PathBuf,

    /// Input image or directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Device, e.g. gpu, gpu:0, cpu
    #[arg(long, default_value = "gpu")]
    pub device: String,

    /// Output directory (default: output/predict)
    #[arg(short, long)]
    pub save_dir: Option<PathBuf>,
}

impl PredictArgs {
    pub fn to_params(&self) -> PredictParams {
        PredictParams {
            weight_path: self.weights.clone(),
            input_path: self.input.clone(),
            device: self.device.clone(),
            save_dir: self.save_dir.clone(),
        }
    }
}

/// Arguments for the export command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ExportArgs {
    /// Registered model name
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Trained weights (.pdparams)
    #[arg(short, long)]
    pub weights: PathBuf,

    /// Output directory (default: output/export)
    #[arg(short, long)]
    pub save_dir: Option<PathBuf>,
}

impl ExportArgs {
    pub fn to_params(&self) -> ExportParams {
        ExportParams {
            weight_path: self.weights.clone(),
            save_dir: self.save_dir.clone(),
        }
    }
}

/// Arguments for the infer command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InferArgs {
    /// Registered model name
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Exported inference model directory
    #[arg(short, long)]
    pub model_dir: PathBuf,

    /// Input image or directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Device, e.g. gpu, gpu:0, cpu
    #[arg(long, default_value = "gpu")]
    pub device: String,

    /// Output directory (default: output/infer)
    #[arg(short, long)]
    pub save_dir: Option<PathBuf>,
}

impl InferArgs {
    pub fn to_params(&self) -> InferParams {
        InferParams {
            model_dir: self.model_dir.clone(),
            input_path: self.input.clone(),
            device: Some(self.device.clone()),
            save_dir: self.save_dir.clone(),
        }
    }
}

/// Arguments for the compress command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CompressArgs {
    /// Registered model name
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Trained weights to compress (.pdparams)
    #[arg(short, long)]
    pub weights: PathBuf,

    /// Dataset root directory
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Override batch size
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Override learning rate
    #[arg(long)]
    pub lr: Option<f64>,

    /// Override number of epochs/iterations
    #[arg(long, visible_alias = "epochs")]
    pub epochs_iters: Option<u32>,

    /// Device, e.g. gpu, gpu:0,1, cpu
    #[arg(long, default_value = "gpu")]
    pub device: String,

    /// Disable VisualDL logging
    #[arg(long)]
    pub no_vdl: bool,

    /// Output directory (default: output/compress)
    #[arg(short, long)]
    pub save_dir: Option<PathBuf>,
}

impl CompressArgs {
    pub fn to_params(&self) -> CompressionParams {
        CompressionParams {
            weight_path: self.weights.clone(),
            dataset: self.dataset.clone(),
            batch_size: self.batch_size,
            learning_rate: self.lr,
            epochs_iters: self.epochs_iters,
            device: self.device.clone(),
            use_vdl: !self.no_vdl,
            save_dir: self.save_dir.clone(),
        }
    }
}

/// Arguments for the models command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ModelsArgs {
    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for the models listing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats: text, json, yaml",
                s
            )),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_command() {
        let cli = parse_args(["uapi", "train", "PPLCNetV2_base"]).unwrap();
        match cli.command {
            Command::Train(args) => {
                assert_eq!(args.model, "PPLCNetV2_base");
                assert_eq!(args.device, "gpu");
                assert!(!args.dy2st);

                let params = args.to_params();
                assert_eq!(params, TrainParams::default());
            }
            _ => panic!("Expected Train command"),
        }
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_parse_train_with_overrides() {
        let cli = parse_args([
            "uapi",
            "train",
            "PPLCNetV2_base",
            "--dataset",
            "./dataset/flowers",
            "--batch-size",
            "32",
            "--lr",
            "0.001",
            "--epochs",
            "10",
            "--device",
            "gpu:0,1",
            "--amp",
            "O1",
            "--no-vdl",
            "--dy2st",
            "--save-dir",
            "./runs",
        ])
        .unwrap();

        match cli.command {
            Command::Train(args) => {
                let params = args.to_params();
                assert_eq!(params.dataset, Some(PathBuf::from("./dataset/flowers")));
                assert_eq!(params.batch_size, Some(32));
                assert!((params.learning_rate.unwrap() - 0.001).abs() < 1e-12);
                assert_eq!(params.epochs_iters, Some(10));
                assert_eq!(params.device, "gpu:0,1");
                assert_eq!(params.amp.as_deref(), Some("O1"));
                assert!(!params.use_vdl);
                assert!(params.dy2st);
                assert_eq!(params.save_dir, Some(PathBuf::from("./runs")));
            }
            _ => panic!("Expected Train command"),
        }
    }

    #[test]
    fn test_parse_predict_command() {
        let cli = parse_args([
            "uapi",
            "predict",
            "PPLCNetV2_base",
            "--weights",
            "best.pdparams",
            "--input",
            "demo.jpg",
        ])
        .unwrap();

        match cli.command {
            Command::Predict(args) => {
                let params = args.to_params();
                assert_eq!(params, PredictParams::new("best.pdparams", "demo.jpg"));
            }
            _ => panic!("Expected Predict command"),
        }
    }

    #[test]
    fn test_predict_requires_weights() {
        assert!(parse_args(["uapi", "predict", "M", "--input", "x.jpg"]).is_err());
    }

    #[test]
    fn test_parse_infer_command() {
        let cli = parse_args([
            "uapi", "infer", "M", "-m", "export", "-i", "imgs", "--device", "cpu",
        ])
        .unwrap();

        match cli.command {
            Command::Infer(args) => {
                let params = args.to_params();
                assert_eq!(params.model_dir, PathBuf::from("export"));
                assert_eq!(params.device.as_deref(), Some("cpu"));
            }
            _ => panic!("Expected Infer command"),
        }
    }

    #[test]
    fn test_parse_compress_command() {
        let cli = parse_args([
            "uapi",
            "compress",
            "PPLCNetV2_base_ShiTu",
            "-w",
            "latest.pdparams",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.dry_run);
        match cli.command {
            Command::Compress(args) => {
                assert_eq!(args.to_params(), CompressionParams::new("latest.pdparams"));
            }
            _ => panic!("Expected Compress command"),
        }
    }

    #[test]
    fn test_parse_export_command() {
        let cli = parse_args(["uapi", "export", "M", "-w", "w.pdparams", "-s", "out"]).unwrap();
        match cli.command {
            Command::Export(args) => {
                let params = args.to_params();
                assert_eq!(params.save_dir, Some(PathBuf::from("out")));
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_parse_models_format() {
        let cli = parse_args(["uapi", "models", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Models(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("Expected Models command"),
        }
    }

    #[test]
    fn test_parse_global_settings() {
        let cli = parse_args(["uapi", "--settings", "uapi.yaml", "models"]).unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("uapi.yaml")));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
