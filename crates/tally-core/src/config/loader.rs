//! Configuration loading from file and environment

use super::ClientConfig;
use crate::error::{TallyError, TallyResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// `~/.config/tally/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("tally").join(DEFAULT_CONFIG_FILE))
}

/// Load configuration from a TOML file
pub fn load_config_from_file(path: &Path) -> TallyResult<ClientConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        TallyError::config_with_context(
            format!("Failed to read config file: {}", e),
            path.display().to_string(),
        )
    })?;
    let config: ClientConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded client config");
    Ok(config)
}

/// Apply `TALLY_*` overrides using `lookup` to read variables
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F) -> TallyResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("TALLY_API_URL") {
        config.base_url = url;
    }
    if let Some(dir) = lookup("TALLY_DATA_DIR") {
        config.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(secs) = lookup("TALLY_REQUEST_TIMEOUT") {
        let secs: u64 = secs
            .parse()
            .map_err(|_| TallyError::config("Invalid TALLY_REQUEST_TIMEOUT value"))?;
        config.request_timeout_secs = Some(secs);
    }
    Ok(())
}

/// Load the effective configuration.
///
/// An explicit `path` must exist; the default location is optional.
pub fn load_config(path: Option<&Path>) -> TallyResult<ClientConfig> {
    let mut config = match path {
        Some(path) => load_config_from_file(path)?,
        None => match default_config_path() {
            Some(default) if default.exists() => load_config_from_file(&default)?,
            _ => ClientConfig::default(),
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"https://tally.example.com/api\"\nhistory_limit = 25\n",
        )
        .unwrap();

        let config = load_config_from_file(&path).unwrap();
        assert_eq!(config.base_url, "https://tally.example.com/api");
        assert_eq!(config.history_limit, 25);
        assert_eq!(config.recent_limit, 8);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = load_config(Some(&temp.path().join("absent.toml")));
        assert!(matches!(result, Err(TallyError::Config { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TALLY_API_URL", "http://10.0.0.5:8000/api"),
            ("TALLY_DATA_DIR", "/var/lib/tally"),
            ("TALLY_REQUEST_TIMEOUT", "45"),
        ]);
        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:8000/api");
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/tally")));
        assert_eq!(config.request_timeout_secs, Some(45));
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = ClientConfig::default();
        let result = apply_env_overrides(&mut config, |key| {
            (key == "TALLY_REQUEST_TIMEOUT").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
