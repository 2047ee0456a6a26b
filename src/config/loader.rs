// Configuration loader
// Loads boxpacking.toml from the project root, then applies environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::settings::{LauncherConfig, CONFIG_FILE_NAME};

/// Load configuration for the given project root
///
/// Missing config file means defaults. A config file that fails to parse
/// is an error.
pub fn load_config(project_root: &Path) -> Result<LauncherConfig> {
    let config = load_config_file(&project_root.join(CONFIG_FILE_NAME))?;
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Parse a config file, or return defaults if it does not exist
pub fn load_config_file(path: &Path) -> Result<LauncherConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(LauncherConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: LauncherConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Apply `BOXPACK_TRAINER` and `BOXPACK_DEBUG`
pub fn apply_env_overrides<F>(mut config: LauncherConfig, lookup: F) -> LauncherConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(trainer) = lookup("BOXPACK_TRAINER").filter(|v| !v.trim().is_empty()) {
        config.trainer_binary = trainer;
    }

    if let Some(debug) = lookup("BOXPACK_DEBUG") {
        if debug == "1" || debug.eq_ignore_ascii_case("true") {
            config.debug_logging = true;
        }
    }

    config
}
