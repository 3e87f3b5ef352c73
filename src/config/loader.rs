//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ProxyConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rewriting-proxy-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let path = write_temp("valid.toml", "[listener]\nbind_address = \"127.0.0.1:4000\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_reports_validation_errors() {
        let path = write_temp("invalid.toml", "[upstream]\ntimeout_secs = 0\n");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("upstream.timeout_secs"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_syntax_error() {
        let path = write_temp("broken.toml", "[listener\n");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
        fs::remove_file(path).unwrap();
    }
}
