// Setup diagnostics
//
// Probes the trainer executable and reports which project files are present.
// Never fails: every problem is part of the report.

use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::errors;

use super::layout::{FilesystemLayout, ProjectFile};

const SEPARATOR_WIDTH: usize = 80;

/// Result of running `<trainer> --help`
#[derive(Debug, Clone, PartialEq)]
pub enum TrainerStatus {
    Installed,
    /// Ran but exited unsuccessfully
    Failed(Option<i32>),
    /// Not found on PATH
    NotInstalled,
    /// Did not answer within the probe timeout
    TimedOut,
    /// Any other spawn or wait error
    Error(String),
}

/// Presence of one project file
#[derive(Debug, Clone, PartialEq)]
pub struct FileStatus {
    pub name: &'static str,
    pub path: PathBuf,
    pub present: bool,
    /// Shown under a missing file
    pub note: Option<&'static str>,
}

impl FileStatus {
    fn check(name: &'static str, file: ProjectFile, note: Option<&'static str>) -> Self {
        Self {
            name,
            present: file.exists(),
            path: file.path,
            note,
        }
    }
}

/// Everything `--check` reports
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub trainer_binary: String,
    pub trainer: TrainerStatus,
    pub files: Vec<FileStatus>,
}

impl SetupReport {
    /// Console rendering with ✓/✗ markers
    pub fn render(&self) -> String {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "Checking ML-Agents setup...");
        let _ = writeln!(out, "{}", separator);

        match &self.trainer {
            TrainerStatus::Installed => {
                let _ = writeln!(out, "✓ ML-Agents is installed ({})", self.trainer_binary);
            }
            TrainerStatus::Failed(code) => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                let _ = writeln!(
                    out,
                    "✗ ML-Agents installation issue: '{} --help' exited with {}",
                    self.trainer_binary, code
                );
            }
            TrainerStatus::NotInstalled => {
                let _ = writeln!(out, "✗ ML-Agents is not installed");
                let _ = writeln!(out, "{}", errors::trainer_not_installed_error(&self.trainer_binary));
            }
            TrainerStatus::TimedOut => {
                let _ = writeln!(
                    out,
                    "✗ '{} --help' did not respond in time",
                    self.trainer_binary
                );
            }
            TrainerStatus::Error(message) => {
                let _ = writeln!(out, "✗ Error checking ML-Agents: {}", message);
            }
        }

        for file in &self.files {
            if file.present {
                let _ = writeln!(out, "✓ {} found: {}", file.name, file.path.display());
            } else {
                let _ = writeln!(out, "✗ {} not found: {}", file.name, file.path.display());
                if let Some(note) = file.note {
                    let _ = writeln!(out, "  ({})", note);
                }
            }
        }

        let _ = writeln!(out, "{}", separator);
        let _ = writeln!(out, "Setup check complete!");
        out
    }
}

/// Probe the trainer and report on every known project file
pub async fn check_setup(
    trainer: &str,
    layout: &FilesystemLayout,
    probe_timeout: Duration,
) -> SetupReport {
    let status = probe_trainer(trainer, probe_timeout).await;
    tracing::debug!(trainer, ?status, "Trainer probe finished");

    let files = vec![
        FileStatus::check("Basic Config", layout.basic_config(), None),
        FileStatus::check("Curriculum Config", layout.curriculum(), None),
        FileStatus::check("Imitation Config", layout.imitation_config(), None),
        FileStatus::check(
            "Demonstration file",
            layout.demonstrations(),
            Some("Only needed for imitation learning"),
        ),
    ];

    SetupReport {
        trainer_binary: trainer.to_string(),
        trainer: status,
        files,
    }
}

/// Run `<trainer> --help` with output discarded
pub async fn probe_trainer(trainer: &str, probe_timeout: Duration) -> TrainerStatus {
    let output = Command::new(trainer)
        .arg("--help")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(probe_timeout, output).await {
        Ok(Ok(output)) if output.status.success() => TrainerStatus::Installed,
        Ok(Ok(output)) => TrainerStatus::Failed(output.status.code()),
        Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => TrainerStatus::NotInstalled,
        Ok(Err(e)) => TrainerStatus::Error(e.to_string()),
        Err(_) => TrainerStatus::TimedOut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LauncherConfig;
    use std::fs;
    use tempfile::TempDir;

    fn layout(dir: &TempDir) -> FilesystemLayout {
        let layout = FilesystemLayout::new(dir.path(), &LauncherConfig::default());
        layout.ensure_dirs().unwrap();
        layout
    }

    #[tokio::test]
    async fn test_missing_trainer_and_files_still_reports() {
        let dir = TempDir::new().unwrap();
        let layout = layout(&dir);

        let report = check_setup("boxpack-no-such-trainer", &layout, Duration::from_secs(5)).await;

        assert_eq!(report.trainer, TrainerStatus::NotInstalled);
        assert_eq!(report.files.len(), 4);
        assert!(report.files.iter().all(|f| !f.present));

        let text = report.render();
        assert!(text.contains("✗ ML-Agents is not installed"));
        assert!(text.contains("✗ Demonstration file not found"));
        assert!(text.contains("(Only needed for imitation learning)"));
        assert!(text.ends_with("Setup check complete!\n"));
    }

    #[tokio::test]
    async fn test_present_files_marked_found() {
        let dir = TempDir::new().unwrap();
        let layout = layout(&dir);
        fs::write(layout.basic_config().path, "behaviors: {}\n").unwrap();
        fs::write(layout.demonstrations().path, b"demo").unwrap();

        let report = check_setup("boxpack-no-such-trainer", &layout, Duration::from_secs(5)).await;

        let present: Vec<_> = report
            .files
            .iter()
            .filter(|f| f.present)
            .map(|f| f.name)
            .collect();
        assert_eq!(present, vec!["Basic Config", "Demonstration file"]);
        assert!(report.render().contains("✓ Basic Config found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_outcomes() {
        assert_eq!(
            probe_trainer("true", Duration::from_secs(5)).await,
            TrainerStatus::Installed
        );
        assert_eq!(
            probe_trainer("false", Duration::from_secs(5)).await,
            TrainerStatus::Failed(Some(1))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_times_out() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("slow-trainer");
        fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
        make_executable(&script);

        let status = probe_trainer(script.to_str().unwrap(), Duration::from_millis(200)).await;
        assert_eq!(status, TrainerStatus::TimedOut);
    }

    #[cfg(unix)]
    fn make_executable(path: &std::path::Path) {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).unwrap();
    }
}
