use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl Config {
    /// `<config dir>/ptyattach/config.toml`, or `./ptyattach/config.toml` on
    /// platforms without a config dir.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ptyattach")
            .join("config.toml")
    }

    /// Read the default config file. No file means built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text, &path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Read an explicitly named config file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "shell",
                reason: "must not be empty",
            });
        }
        if self.detach.debounce_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "detach.debounce_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}
