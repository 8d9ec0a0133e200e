//! Optional `fluentus.toml` settings for the command line.
//!
//! ```toml
//! [ftl_field]
//! check = "check"
//! indent = 4
//! extension = "ftl"
//! ```

use fluentus::Config;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the project folder when no `--config` is given.
pub const CONFIG_FILE: &str = "fluentus.toml";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    ftl_field: Config,
}

/// Resolve the configuration for a project.
///
/// An explicit path must exist and parse. The implicit project file is optional.
pub fn load_config(project: &Path, explicit: Option<&Path>) -> Result<Config, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = project.join(CONFIG_FILE);
            if !path.is_file() {
                tracing::debug!("Configuration file not found: {:?}", path);
                return Ok(Config::default());
            }
            path
        }
    };
    load_from_path(&path)
}

/// Read a configuration file.
pub fn load_from_path(path: &Path) -> Result<Config, String> {
    tracing::debug!("Loading configuration from: {:?}", path);
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let file: ConfigFile = toml::from_str(&content)
        .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;

    let config = file.ftl_field;
    // Normalise through the builders so a `.ftl` extension or a zero indent are accepted.
    Ok(Config::new()
        .with_check_token(config.check_token)
        .with_indent(config.indent)
        .with_extension(config.extension))
}

/// Default location of the config file for a project, for messages.
pub fn default_config_path(project: &Path) -> PathBuf {
    project.join(CONFIG_FILE)
}
