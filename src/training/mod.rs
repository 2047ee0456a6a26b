// Training module - launching ML-Agents runs for the box packing environment

pub mod command;
pub mod launcher;
pub mod layout;
pub mod mode;
pub mod request;
pub mod runner;
pub mod setup_check;

pub use command::TrainerCommand;
pub use launcher::TrainerLauncher;
pub use layout::{FilesystemLayout, ModeFiles, ProjectFile};
pub use mode::TrainingMode;
pub use request::{default_run_id, parse_time_scale, TrainingRequest};
pub use runner::{ProcessRunner, RunOutcome, SubprocessRunner};
pub use setup_check::{check_setup, SetupReport, TrainerStatus};
