//! YAML configuration overlays, tool settings and the command line
//!
//! # Example
//!
//! ```
//! use uapi::config::ConfigDoc;
//!
//! let base = ConfigDoc::from_yaml_str("Global:\n  epochs: 120\n")?;
//! let mut overlay = base.copy();
//! overlay.update(["Global.epochs=10", "Global.use_visualdl=true"])?;
//!
//! assert_eq!(overlay.get("Global.epochs").and_then(|v| v.as_u64()), Some(10));
//! assert_eq!(base.get("Global.epochs").and_then(|v| v.as_u64()), Some(120));
//! # Ok::<(), uapi::Error>(())
//! ```

mod assign;
mod cli;
mod document;
mod settings;

#[cfg(test)]
mod tests;


pub use assign::{parse_value, Assignment};
pub use cli::{
    parse_args, Cli, Command, CompressArgs, ExportArgs, InferArgs, ModelsArgs, OutputFormat,
    PredictArgs, TrainArgs,
};
pub use document::{ConfigDoc, DatasetLayout};
pub use settings::Settings;
