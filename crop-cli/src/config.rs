//! `cropwise.toml` configuration.
//!
//! ```toml
//! [data]
//! state_prices = "crop-data/dataset/state_prices.json"
//! msp = "crop-data/dataset/msp.csv"   # optional; built-in table otherwise
//!
//! [logging]
//! level = "info"
//! file = "cropwise.log"               # optional
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file. Command-line flags are applied on top with [`AppConfig::apply`].

use std::path::{Path, PathBuf};

use crop_data::ReferenceSources;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "cropwise.toml";

/// State price file used when neither the config nor the command line names one.
pub const DEFAULT_STATE_PRICES_PATH: &str = "crop-data/dataset/state_prices.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub state_prices: PathBuf,
    pub msp: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            state_prices: PathBuf::from(DEFAULT_STATE_PRICES_PATH),
            msp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Bare level ("warn", "debug", ...) or any `EnvFilter` directive.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

/// Values given on the command line; each one replaces its config entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub state_prices: Option<PathBuf>,
    pub msp: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// [`DEFAULT_CONFIG_PATH`] is used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_relative_to(base_dir))
    }

    /// Parses TOML text; paths are returned exactly as written.
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    fn resolve_relative_to(
        mut self,
        base_dir: &Path,
    ) -> Self {
        let resolve = |p: &Path| -> PathBuf {
            if p.is_relative() {
                base_dir.join(p)
            } else {
                p.to_path_buf()
            }
        };
        self.data.state_prices = resolve(&self.data.state_prices);
        self.data.msp = self.data.msp.as_deref().map(resolve);
        self.logging.file = self.logging.file.as_deref().map(resolve);
        self
    }

    /// Applies command-line overrides.
    pub fn apply(
        mut self,
        overrides: Overrides,
    ) -> Self {
        if let Some(path) = overrides.state_prices {
            self.data.state_prices = path;
        }
        if let Some(path) = overrides.msp {
            self.data.msp = Some(path);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self
    }

    pub fn reference_sources(&self) -> ReferenceSources {
        ReferenceSources {
            state_prices: self.data.state_prices.clone(),
            msp: self.data.msp.clone(),
        }
    }
}
