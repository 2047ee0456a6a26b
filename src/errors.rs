// Launch errors and user-friendly messages
//
// `LaunchError` is the failure taxonomy of a training launch. The formatter
// helpers turn the common failures into actionable console messages.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a training launch did not succeed
#[derive(Debug, Error)]
pub enum LaunchError {
    /// A required configuration file is missing; nothing was spawned
    #[error("{kind} file not found: {}", path.display())]
    MissingFile { kind: &'static str, path: PathBuf },

    /// Demonstration data is missing and the user chose not to continue
    #[error("demonstration file not found and launch was declined: {}", path.display())]
    DemonstrationDeclined { path: PathBuf },

    /// The trainer executable could not be started
    #[error("failed to start trainer '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The trainer exited with a non-zero code
    #[error("training failed with return code: {code}")]
    ChildFailed { code: i32 },

    /// The trainer was killed by a signal and has no exit code
    #[error("training process terminated by signal")]
    Terminated,

    /// The user interrupted the run
    #[error("training interrupted by user")]
    Interrupted,

    /// Reading trainer output or waiting on it failed
    #[error("error during training: {0}")]
    Io(#[from] std::io::Error),
}

impl LaunchError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// True when the trainer was never spawned
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            LaunchError::MissingFile { .. } | LaunchError::DemonstrationDeclined { .. }
        )
    }
}

/// Format a missing required file with a hint on where it belongs
pub fn missing_file_error(kind: &str, path: &str, file_name: &str, dir_name: &str) -> String {
    format!(
        "Error: {} file not found: {}\n\
        Make sure {} is in the {}/ directory",
        kind, path, file_name, dir_name
    )
}

/// Format the missing demonstration warning shown before the confirmation prompt
pub fn missing_demo_warning(path: &str) -> String {
    format!(
        "\x1b[1;33mWarning:\x1b[0m Demonstration file not found: {}\n\
        Imitation learning requires demonstration data.\n\
        Please record demonstrations first using Unity's Demonstration Recorder.",
        path
    )
}

/// Format a trainer-not-installed error with install instructions
pub fn trainer_not_installed_error(binary: &str) -> String {
    format!(
        "'{}' was not found on PATH\n\n\
        \x1b[1;32mInstall with:\x1b[0m\n\
           \x1b[36mpip install mlagents\x1b[0m\n\n\
        Or point the launcher at another executable with --trainer or BOXPACK_TRAINER",
        binary
    )
}

/// Wrap a generic error with a suggestion
pub fn wrap_error_with_suggestion(error: impl fmt::Display, suggestion: &str) -> String {
    format!("{}\n\n\x1b[1;33mSuggestion:\x1b[0m {}", error, suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_failures_exit_with_one() {
        let errors = vec![
            LaunchError::MissingFile {
                kind: "Configuration",
                path: PathBuf::from("config/x.yaml"),
            },
            LaunchError::ChildFailed { code: 3 },
            LaunchError::Terminated,
            LaunchError::Interrupted,
            LaunchError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom")),
        ];
        for e in errors {
            assert_eq!(e.exit_code(), 1, "{}", e);
        }
    }

    #[test]
    fn test_child_failure_message_includes_code() {
        let e = LaunchError::ChildFailed { code: 42 };
        assert!(e.to_string().contains("42"));
        assert!(!e.is_precondition());
    }

    #[test]
    fn test_missing_file_is_precondition() {
        let e = LaunchError::MissingFile {
            kind: "Curriculum",
            path: PathBuf::from("config/BoxPacking_curriculum.yaml"),
        };
        assert!(e.is_precondition());
        assert!(e.to_string().contains("BoxPacking_curriculum.yaml"));
    }

    #[test]
    fn test_not_installed_has_pip_hint() {
        let msg = trainer_not_installed_error("mlagents-learn");
        assert!(msg.contains("pip install mlagents"));
        assert!(msg.contains("BOXPACK_TRAINER"));
    }
}
