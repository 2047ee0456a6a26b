// Configuration structs

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the optional config file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "boxpacking.toml";

/// Launcher configuration
///
/// Every field has a default, so a missing or partial `boxpacking.toml`
/// is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// External trainer executable, resolved on PATH
    pub trainer_binary: String,

    /// Directory names relative to the project root
    pub config_dir: String,
    pub results_dir: String,
    pub demos_dir: String,

    /// Trainer configuration used by basic and curriculum modes
    pub config_file: String,

    /// Curriculum passed with --curriculum
    pub curriculum_file: String,

    /// Trainer configuration for imitation learning (BC + GAIL)
    pub imitation_config_file: String,

    /// Recorded expert demonstrations
    pub demo_file: String,

    /// Timeout for the `--help` probe in setup checks
    pub probe_timeout_secs: u64,

    /// How long to wait for the trainer after SIGTERM before killing it
    pub terminate_grace_secs: u64,

    /// Raise log level to debug
    pub debug_logging: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            trainer_binary: "mlagents-learn".to_string(),
            config_dir: "config".to_string(),
            results_dir: "results".to_string(),
            demos_dir: "demos".to_string(),
            config_file: "BoxPacking_config.yaml".to_string(),
            curriculum_file: "BoxPacking_curriculum.yaml".to_string(),
            imitation_config_file: "BoxPacking_imitation.yaml".to_string(),
            demo_file: "BoxPacking_expert.demo".to_string(),
            probe_timeout_secs: 5,
            terminate_grace_secs: 10,
            debug_logging: false,
        }
    }
}

impl LauncherConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn terminate_grace(&self) -> Duration {
        Duration::from_secs(self.terminate_grace_secs)
    }
}

/// Directory the launcher treats as its project root when none is given
///
/// This is the directory holding the executable, except for cargo build
/// output where it is the workspace root above `target/{debug,release}`.
pub fn default_project_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(project_root_for))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Project root for an executable living in `exe_dir`
pub fn project_root_for(exe_dir: &Path) -> PathBuf {
    let is_profile_dir = exe_dir.ends_with("debug") || exe_dir.ends_with("release");
    match exe_dir.parent() {
        Some(target) if is_profile_dir && target.ends_with("target") => target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| exe_dir.to_path_buf()),
        _ => exe_dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_box_packing_layout() {
        let config = LauncherConfig::default();
        assert_eq!(config.trainer_binary, "mlagents-learn");
        assert_eq!(config.config_file, "BoxPacking_config.yaml");
        assert_eq!(config.demo_file, "BoxPacking_expert.demo");
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_cargo_profile_dirs_resolve_to_workspace() {
        assert_eq!(
            project_root_for(Path::new("/work/boxpack/target/debug")),
            PathBuf::from("/work/boxpack")
        );
        assert_eq!(
            project_root_for(Path::new("/work/boxpack/target/release")),
            PathBuf::from("/work/boxpack")
        );
    }

    #[test]
    fn test_install_dirs_are_kept() {
        assert_eq!(
            project_root_for(Path::new("/opt/x/release")),
            PathBuf::from("/opt/x/release")
        );
        assert_eq!(
            project_root_for(Path::new("/srv/debug")),
            PathBuf::from("/srv/debug")
        );
        assert_eq!(
            project_root_for(Path::new("/opt/boxpack/bin")),
            PathBuf::from("/opt/boxpack/bin")
        );
    }
}
