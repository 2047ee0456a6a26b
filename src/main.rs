// Box packing trainer launcher
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use boxpack_trainer::cli::{AssumeYes, Confirm, ReadlineConfirm};
use boxpack_trainer::config::{
    apply_env_overrides, default_project_root, load_config, LauncherConfig,
};
use boxpack_trainer::errors;
use boxpack_trainer::training::{
    check_setup, default_run_id, parse_time_scale, FilesystemLayout, SubprocessRunner,
    TrainerLauncher, TrainingMode, TrainingRequest,
};

const EXAMPLES: &str = "\
Examples:
  # Basic training
  train-box-packing --mode basic --run-id MyFirstTry

  # Curriculum learning
  train-box-packing --mode curriculum --num-envs 4

  # Imitation learning
  train-box-packing --mode imitation --time-scale 20

  # Resume previous training
  train-box-packing --mode basic --run-id MyFirstTry --resume

  # Check setup
  train-box-packing --check";

#[derive(Parser, Debug)]
#[command(name = "train-box-packing")]
#[command(about = "Train 3D Box Packing ML-Agents", version, after_help = EXAMPLES)]
struct Args {
    /// Training mode to use
    #[arg(long, value_enum, default_value_t = TrainingMode::Basic)]
    mode: TrainingMode,

    /// Unique identifier for this training run [default: BoxPacking_<mode>_<timestamp>]
    #[arg(long = "run-id")]
    run_id: Option<String>,

    /// Resume from previous training run
    #[arg(long)]
    resume: bool,

    /// Force overwrite existing run
    #[arg(long)]
    force: bool,

    /// Time scale for Unity simulation (higher = faster)
    #[arg(long = "time-scale", default_value = "1.0", value_parser = parse_time_scale)]
    time_scale: f64,

    /// Number of parallel environments
    #[arg(long = "num-envs", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    num_envs: u32,

    /// Check ML-Agents setup and exit
    #[arg(long)]
    check: bool,

    /// Project directory holding config/, results/ and demos/
    #[arg(long = "project-root", env = "BOXPACK_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Trainer executable (overrides config and BOXPACK_TRAINER)
    #[arg(long)]
    trainer: Option<String>,

    /// Continue imitation training without demonstrations instead of asking
    #[arg(short = 'y', long)]
    yes: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[1;31mError:\x1b[0m {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let project_root = args.project_root.clone().unwrap_or_else(default_project_root);

    let mut config = match load_config(&project_root) {
        Ok(config) => config,
        // The setup check reports on a broken config instead of failing
        Err(e) if args.check => {
            eprintln!("\x1b[1;33mWarning:\x1b[0m {}", config_error(&e));
            eprintln!("Checking with default settings.\n");
            apply_env_overrides(LauncherConfig::default(), |key| std::env::var(key).ok())
        }
        Err(e) => return Err(anyhow::anyhow!(config_error(&e))),
    };
    if let Some(trainer) = &args.trainer {
        config.trainer_binary = trainer.clone();
    }

    init_tracing(&config);
    tracing::debug!(root = %project_root.display(), ?config, "Launcher configured");

    let layout = FilesystemLayout::new(&project_root, &config);
    layout
        .ensure_dirs()
        .with_context(|| format!("Failed to create project directories under {}", project_root.display()))?;

    if args.check {
        let report = check_setup(&config.trainer_binary, &layout, config.probe_timeout()).await;
        print!("{}", report.render());
        return Ok(ExitCode::SUCCESS);
    }

    let request = TrainingRequest {
        mode: args.mode,
        run_id: args.run_id.unwrap_or_else(|| default_run_id(args.mode)),
        resume: args.resume,
        force: args.force,
        time_scale: args.time_scale,
        num_envs: args.num_envs,
    };

    let confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(ReadlineConfirm)
    };

    let launcher = TrainerLauncher::new(
        layout,
        config.trainer_binary.clone(),
        Box::new(SubprocessRunner::new(config.terminate_grace())),
        confirm,
    );

    match launcher.launch(&request).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!(error = %e, "Launch failed");
            Ok(ExitCode::from(e.exit_code() as u8))
        }
    }
}

fn config_error(e: &anyhow::Error) -> String {
    errors::wrap_error_with_suggestion(
        format!("{:#}", e),
        "Fix or remove boxpacking.toml in the project root",
    )
}

/// Log to stderr so relayed trainer output on stdout stays clean
///
/// RUST_LOG wins; otherwise `warn`, or `debug` when debug logging is on.
fn init_tracing(config: &LauncherConfig) {
    let default_level = if config.debug_logging { "debug" } else { "warn" };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["train-box-packing"]).unwrap();
        assert_eq!(args.mode, TrainingMode::Basic);
        assert_eq!(args.run_id, None);
        assert_eq!(args.time_scale, 1.0);
        assert_eq!(args.num_envs, 1);
        assert!(!args.resume && !args.force && !args.check && !args.yes);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "train-box-packing",
            "--mode",
            "curriculum",
            "--run-id",
            "Run7",
            "--resume",
            "--force",
            "--time-scale",
            "20",
            "--num-envs",
            "4",
            "-y",
        ])
        .unwrap();
        assert_eq!(args.mode, TrainingMode::Curriculum);
        assert_eq!(args.run_id.as_deref(), Some("Run7"));
        assert!(args.resume && args.force && args.yes);
        assert_eq!(args.time_scale, 20.0);
        assert_eq!(args.num_envs, 4);
    }

    #[test]
    fn test_rejects_bad_values() {
        for bad in [
            vec!["train-box-packing", "--mode", "reinforce"],
            vec!["train-box-packing", "--num-envs", "0"],
            vec!["train-box-packing", "--time-scale", "-2"],
        ] {
            assert!(Args::try_parse_from(bad.clone()).is_err(), "{:?} should fail", bad);
        }
    }
}
