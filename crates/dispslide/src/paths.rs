use std::env;
use std::path::PathBuf;

use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "DISPSLIDE_CONFIG_DIR";
pub const CONFIG_FILE: &str = "slider.toml";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "Dispslide";
const APPLICATION: &str = "dispslide";

/// Directory searched for `slider.toml` when no file is named explicitly.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os(ENV_CONFIG_DIR).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}
