// Filesystem layout of a box packing training project
//
// config/   trainer configs and curriculum
// results/  written by the trainer
// demos/    recorded demonstrations

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::LauncherConfig;

use super::mode::TrainingMode;

/// A file the launcher checks before starting the trainer
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFile {
    /// Human-readable kind, e.g. "Configuration"
    pub kind: &'static str,
    pub path: PathBuf,
}

impl ProjectFile {
    fn new(kind: &'static str, path: PathBuf) -> Self {
        Self { kind, path }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Files needed for one mode
#[derive(Debug, Clone, PartialEq)]
pub struct ModeFiles {
    /// Trainer configuration, passed as the first argument
    pub config: ProjectFile,
    /// Passed with --curriculum
    pub curriculum: Option<ProjectFile>,
    /// Checked but not required
    pub demonstrations: Option<ProjectFile>,
}

impl ModeFiles {
    /// Files that must exist before launching
    pub fn required(&self) -> impl Iterator<Item = &ProjectFile> {
        std::iter::once(&self.config).chain(self.curriculum.iter())
    }
}

/// Directories and named files under the project root
#[derive(Debug, Clone)]
pub struct FilesystemLayout {
    config_dir: PathBuf,
    results_dir: PathBuf,
    demos_dir: PathBuf,
    config_file: String,
    curriculum_file: String,
    imitation_config_file: String,
    demo_file: String,
}

impl FilesystemLayout {
    pub fn new(root: impl AsRef<Path>, config: &LauncherConfig) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join(&config.config_dir),
            results_dir: root.join(&config.results_dir),
            demos_dir: root.join(&config.demos_dir),
            config_file: config.config_file.clone(),
            curriculum_file: config.curriculum_file.clone(),
            imitation_config_file: config.imitation_config_file.clone(),
            demo_file: config.demo_file.clone(),
        }
    }

    /// Create config/, results/ and demos/ if absent
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [&self.config_dir, &self.results_dir, &self.demos_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn basic_config(&self) -> ProjectFile {
        ProjectFile::new("Configuration", self.config_dir.join(&self.config_file))
    }

    pub fn curriculum(&self) -> ProjectFile {
        ProjectFile::new("Curriculum", self.config_dir.join(&self.curriculum_file))
    }

    pub fn imitation_config(&self) -> ProjectFile {
        ProjectFile::new(
            "Configuration",
            self.config_dir.join(&self.imitation_config_file),
        )
    }

    pub fn demonstrations(&self) -> ProjectFile {
        ProjectFile::new("Demonstration", self.demos_dir.join(&self.demo_file))
    }

    /// Resolve the files a mode depends on
    pub fn files_for(&self, mode: TrainingMode) -> ModeFiles {
        let config = if mode.wants_demonstrations() {
            self.imitation_config()
        } else {
            self.basic_config()
        };

        ModeFiles {
            config,
            curriculum: mode.uses_curriculum().then(|| self.curriculum()),
            demonstrations: mode.wants_demonstrations().then(|| self.demonstrations()),
        }
    }
}
