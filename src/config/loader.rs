use super::QuizConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "reflect.toml";

/// Load configuration from `explicit`, else `reflect.toml` in `working_dir`
/// if it exists, else defaults. Environment overrides are merged last and
/// relative paths are resolved against the directory the file came from.
pub fn load_config(explicit: Option<&Path>, working_dir: &Path) -> Result<QuizConfig> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = working_dir.join(DEFAULT_CONFIG_FILE);
            default_path.exists().then_some(default_path)
        }
    };

    let mut config = match &candidate {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("cannot read config {}: {e}", path.display()))
            })?;
            let config: QuizConfig = toml::from_str(&content)?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => {
            debug!("No configuration file found; using defaults");
            QuizConfig::default()
        }
    };

    config.merge_env_vars();

    let base = candidate
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(working_dir);
    config.resolve_paths(base);

    if config.top_k == 0 {
        return Err(Error::Config("top_k must be at least 1".to_string()));
    }

    Ok(config)
}
