//! Advisor configuration loader.
//!
//! Settings are read from a TOML file. The first of these that exists wins:
//!
//! 1. the path passed with `--config`
//! 2. the path in the `TAX_REGIME_CONFIG` environment variable
//! 3. `tax-regime.toml` in the working directory
//!
//! With none present, [`AdvisorConfig::default`] is used. Command-line flags
//! override whatever the file sets.
//!
//! ```toml
//! log-level = "debug"
//! log-file = "tax-regime.log"
//! debounce-ms = 300
//! break-even-tolerance = "1"
//! output = "json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::calculations::DEFAULT_TOLERANCE;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV_VAR: &str = "TAX_REGIME_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "tax-regime.toml";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdvisorConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"tax_core=debug"`.
    pub log_level: Option<String>,
    /// Append log records to this file in addition to stderr.
    pub log_file: Option<PathBuf>,
    /// Quiet period before an interactive recomputation runs.
    pub debounce_ms: u64,
    /// Rupee tolerance for the break-even search.
    pub break_even_tolerance: Decimal,
    pub output: OutputFormat,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            log_file: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            break_even_tolerance: DEFAULT_TOLERANCE,
            output: OutputFormat::Text,
        }
    }
}

impl AdvisorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn from_toml_str(
        content: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        debug!("loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Resolves the config file location and loads it.
    ///
    /// An explicit path (flag or environment variable) must exist; the
    /// working-directory default is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load_file(Path::new(&path));
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load_file(default_path)
        } else {
            debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }
}
