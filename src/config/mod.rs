// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{apply_env_overrides, load_config, load_config_file};
pub use settings::{default_project_root, project_root_for, LauncherConfig, CONFIG_FILE_NAME};
