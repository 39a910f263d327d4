//! Configuration: data root resolution and fixed service addresses.

use std::path::{Path, PathBuf};

/// Default bind addresses, one fixed port per service.
pub const RECOMMEND_ADDR: &str = "127.0.0.1:5555";
pub const RANDOM_ADDR: &str = "127.0.0.1:5556";
pub const SONG_BY_YEAR_ADDR: &str = "127.0.0.1:5557";
pub const TOTAL_DURATION_ADDR: &str = "127.0.0.1:5558";

/// Environment variable naming the data root folder.
pub const ROOT_ENV_VAR: &str = "TUNEDECK_ROOT";

/// Resolve the data root folder (liked songs, account store).
///
/// Priority order:
/// 1. Command-line argument
/// 2. `TUNEDECK_ROOT` environment variable
/// 3. `root_folder` in the platform config file
/// 4. OS-dependent compiled default
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        return PathBuf::from(path);
    }
    if let Some(path) = root_from_config_file() {
        return path;
    }
    default_root_folder()
}

fn root_from_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("tunedeck").join("config.toml");
    let text = std::fs::read_to_string(path).ok()?;
    let config: toml::Value = toml::from_str(&text).ok()?;
    config
        .get("root_folder")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
}

fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tunedeck"))
        .unwrap_or_else(|| PathBuf::from("./tunedeck_data"))
}
