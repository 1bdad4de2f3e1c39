//! uapi CLI
//!
//! Single entry point for running registered suite models.
//!
//! # Usage
//!
//! ```bash
//! # Train with overrides
//! uapi train PPLCNetV2_base --dataset ./dataset/flowers102 --epochs 10 --lr 0.01
//!
//! # Export trained weights
//! uapi export PPLCNetV2_base --weights output/train/best_model.pdparams
//!
//! # Write the overlaid config without launching anything
//! uapi --dry-run compress PPLCNetV2_base_ShiTu --weights output/train/latest.pdparams
//!
//! # List registered models
//! uapi models --format yaml
//! ```

use clap::Parser;
use std::process::ExitCode;
use uapi::config::{Cli, Command, ModelsArgs, OutputFormat, Settings};
use uapi::logging::{self, LogLevel};
use uapi::runner::{DryRunRunner, ProcessRunner, Runner};
use uapi::{PathResolver, Registry, Task, TaskOutcome};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(LogLevel::from_flags(cli.quiet, cli.verbose));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> uapi::Result<()> {
    let settings = Settings::load(cli.settings.as_deref())?;
    let paths = PathResolver::current_dir()?;

    let mut registry = Registry::with_builtin(&paths.abspath(&settings.repo_root));
    if let Some(manifest) = &settings.registry {
        registry.load_manifest(&paths.abspath(manifest))?;
    }

    let model = match &cli.command {
        Command::Models(args) => return list_models(&registry, args),
        Command::Train(args) => &args.model,
        Command::Predict(args) => &args.model,
        Command::Export(args) => &args.model,
        Command::Infer(args) => &args.model,
        Command::Compress(args) => &args.model,
    };

    let (_, suite) = registry.suite_for_model(model)?;
    let outcome = if cli.dry_run {
        let runner = DryRunRunner::new(&suite.runner_root_path);
        let task = Task::new(&registry, model, runner, &settings.cache_dir, paths)?;
        let outcome = dispatch(&task, &cli.command)?;
        for call in task.runner().invocations() {
            println!("{}", call.to_json_line()?);
        }
        outcome
    } else {
        let runner = ProcessRunner::for_suite(suite, &settings.python);
        let task = Task::new(&registry, model, runner, &settings.cache_dir, paths)?;
        dispatch(&task, &cli.command)?
    };

    if !cli.quiet {
        println!("Config: {}", outcome.config_path.display());
        println!("Output: {}", outcome.save_dir.display());
    }
    Ok(())
}

fn dispatch<R: Runner>(task: &Task<'_, R>, command: &Command) -> uapi::Result<TaskOutcome> {
    match command {
        Command::Train(args) => task.train(&args.to_params()),
        Command::Predict(args) => task.predict(&args.to_params()),
        Command::Export(args) => task.export(&args.to_params()),
        Command::Infer(args) => task.infer(&args.to_params()),
        Command::Compress(args) => task.compression(&args.to_params()),
        Command::Models(_) => unreachable!("models is handled before a task is built"),
    }
}

fn list_models(registry: &Registry, args: &ModelsArgs) -> uapi::Result<()> {
    let models: Vec<_> = registry.models().collect();
    match args.format {
        OutputFormat::Text => {
            for model in models {
                let apis: Vec<_> = model.supported_apis.iter().map(|a| a.as_str()).collect();
                println!("{} ({})", model.model_name, model.suite);
                println!("  Config: {}", model.config_path.display());
                println!("  APIs: {}", apis.join(", "));
                let runner_name = registry.runner_model_name(&model.model_name);
                if runner_name != model.model_name {
                    println!("  Runner name: {runner_name}");
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&models).map_err(|e| {
                uapi::Error::ConfigError(format!("JSON serialization error: {e}"))
            })?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&models)?);
        }
    }
    Ok(())
}
