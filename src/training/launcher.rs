// Trainer launcher
//
// Turns a training request into one trainer run: checks the files the mode
// needs, asks before training imitation without demonstrations, prints the
// command, runs it and reports the outcome.

use std::io;

use crate::cli::Confirm;
use crate::errors::{self, LaunchError};

use super::command::TrainerCommand;
use super::layout::{FilesystemLayout, ModeFiles, ProjectFile};
use super::request::TrainingRequest;
use super::runner::{ProcessRunner, RunOutcome};

const SEPARATOR_WIDTH: usize = 80;

pub const CONTINUE_PROMPT: &str = "Continue anyway? (y/n): ";

/// Launches the external trainer for box packing runs
pub struct TrainerLauncher {
    layout: FilesystemLayout,
    trainer_binary: String,
    runner: Box<dyn ProcessRunner>,
    confirm: Box<dyn Confirm>,
}

impl TrainerLauncher {
    pub fn new(
        layout: FilesystemLayout,
        trainer_binary: impl Into<String>,
        runner: Box<dyn ProcessRunner>,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        Self {
            layout,
            trainer_binary: trainer_binary.into(),
            runner,
            confirm,
        }
    }

    pub fn layout(&self) -> &FilesystemLayout {
        &self.layout
    }

    /// Build the command a request would run, after checking its files
    pub fn prepare(&self, request: &TrainingRequest) -> Result<TrainerCommand, LaunchError> {
        let files = self.layout.files_for(request.mode);
        self.check_required(&files)?;
        self.check_demonstrations(&files)?;
        Ok(TrainerCommand::build(&self.trainer_binary, request, &files))
    }

    /// Run one training session; Ok means the trainer exited with code 0
    pub async fn launch(&self, request: &TrainingRequest) -> Result<(), LaunchError> {
        let command = self.prepare(request)?;

        println!(
            "Starting {} with run ID: {}",
            request.mode.label(),
            request.run_id
        );
        println!("Command: {}", command);
        println!("{}", "-".repeat(SEPARATOR_WIDTH));

        tracing::info!(
            mode = %request.mode,
            run_id = %request.run_id,
            num_envs = request.num_envs,
            time_scale = request.time_scale,
            resume = request.resume,
            force = request.force,
            "Launching trainer"
        );

        let result = self.runner.run(&command).await;
        report(result)
    }

    fn check_required(&self, files: &ModeFiles) -> Result<(), LaunchError> {
        for file in files.required() {
            if !file.exists() {
                tracing::debug!(path = %file.path.display(), "Required file missing");
                eprintln!(
                    "{}",
                    errors::missing_file_error(
                        file.kind,
                        &file.path.display().to_string(),
                        &file.file_name(),
                        &parent_dir_name(file),
                    )
                );
                return Err(LaunchError::MissingFile {
                    kind: file.kind,
                    path: file.path.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_demonstrations(&self, files: &ModeFiles) -> Result<(), LaunchError> {
        let Some(demo) = &files.demonstrations else {
            return Ok(());
        };
        if demo.exists() {
            return Ok(());
        }

        eprintln!(
            "{}",
            errors::missing_demo_warning(&demo.path.display().to_string())
        );

        if self.confirm.confirm(CONTINUE_PROMPT) {
            tracing::warn!(path = %demo.path.display(), "Launching imitation without demonstrations");
            Ok(())
        } else {
            Err(LaunchError::DemonstrationDeclined {
                path: demo.path.clone(),
            })
        }
    }
}

/// "config" for config/BoxPacking_config.yaml
fn parent_dir_name(file: &ProjectFile) -> String {
    file.path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Print the outcome of a run and map it to the launch result
fn report(result: Result<RunOutcome, LaunchError>) -> Result<(), LaunchError> {
    match result {
        Ok(RunOutcome::Exited(0)) => {
            println!("\nTraining completed successfully!");
            Ok(())
        }
        Ok(RunOutcome::Exited(code)) => {
            println!("\nTraining failed with return code: {}", code);
            Err(LaunchError::ChildFailed { code })
        }
        Ok(RunOutcome::Signaled) => {
            println!("\nTraining failed: trainer terminated by signal");
            Err(LaunchError::Terminated)
        }
        Ok(RunOutcome::Interrupted) => {
            println!("\n\nTraining interrupted by user");
            Err(LaunchError::Interrupted)
        }
        Err(LaunchError::Spawn { binary, source }) if source.kind() == io::ErrorKind::NotFound => {
            eprintln!(
                "\nError during training: {}",
                errors::trainer_not_installed_error(&binary)
            );
            Err(LaunchError::Spawn { binary, source })
        }
        Err(e) => {
            tracing::error!(error = %e, "Trainer run failed");
            eprintln!("\nError during training: {}", e);
            Err(e)
        }
    }
}
