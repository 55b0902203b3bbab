//! Service configuration.
//!
//! A [`Config`] is assembled once at startup and passed by value into the
//! components that need it. Sources, lowest precedence first:
//!
//! 1. built-in defaults ([`crate::constants`])
//! 2. an optional TOML file
//! 3. environment variables (via [`EnvCache`])
//! 4. command-line [`Overrides`]
//!
//! The table/column allowlist and the row ceiling are deliberately absent:
//! they are compiled into `nlq-guard` and cannot be configured.

use crate::constants::{
    DEFAULT_BIND, DEFAULT_DATABASE, DEFAULT_EXECUTE_TIMEOUT_SECS, DEFAULT_GEMINI_BASE_URL,
    DEFAULT_GEMINI_MODEL, DEFAULT_GENERATE_TIMEOUT_SECS, ENV_BIND, ENV_DATABASE,
    ENV_EXECUTE_TIMEOUT, ENV_GEMINI_API_KEY, ENV_GEMINI_BASE_URL, ENV_GEMINI_MODEL,
    ENV_GENERATE_TIMEOUT, ENV_LOG_JSON,
};
use crate::env::EnvCache;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`FileConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// A setting has an unusable value.
    #[error("invalid value for {key}: {value:?}")]
    Invalid {
        /// Setting name (environment variable or file key).
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// No Gemini API key was provided.
    #[error("missing Gemini API key: set GEMINI_API_KEY or gemini_api_key in the config file")]
    MissingApiKey,
}

/// Settings accepted in the TOML config file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Listen address.
    pub bind: Option<String>,
    /// `SQLite` database file.
    pub database: Option<PathBuf>,
    /// Gemini API key.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: Option<String>,
    /// Gemini REST endpoint.
    pub gemini_base_url: Option<String>,
    /// Generation timeout in seconds.
    pub generate_timeout_secs: Option<u64>,
    /// Execution timeout in seconds.
    pub execute_timeout_secs: Option<u64>,
    /// Emit logs as JSON lines.
    pub log_json: Option<bool>,
}

impl FileConfig {
    /// Read and parse a TOML config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Command-line overrides; `None` leaves lower-precedence values alone.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Listen address.
    pub bind: Option<String>,
    /// `SQLite` database file.
    pub database: Option<PathBuf>,
    /// Emit logs as JSON lines.
    pub log_json: Option<bool>,
}

/// Text-generation endpoint settings.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Model name, e.g. `gemini-pro`.
    pub model: String,
    /// REST base URL without trailing slash.
    pub base_url: String,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Resolved service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listen address.
    pub bind: SocketAddr,
    /// `SQLite` database file.
    pub database: PathBuf,
    /// Generator endpoint.
    pub gemini: GeminiConfig,
    /// Upper bound on one generation call.
    pub generate_timeout: Duration,
    /// Upper bound on one query execution.
    pub execute_timeout: Duration,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Config {
    /// Load from an optional file, the environment and overrides.
    pub fn load(
        file: Option<&Path>,
        env: &EnvCache,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let file = file.map(FileConfig::from_path).transpose()?.unwrap_or_default();
        Self::from_sources(file, env, overrides)
    }

    /// Merge already-loaded sources.
    pub fn from_sources(
        file: FileConfig,
        env: &EnvCache,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let bind = overrides
            .bind
            .clone()
            .or_else(|| env.get(ENV_BIND).map(str::to_string))
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid { key: ENV_BIND, value: bind })?;

        let database = overrides
            .database
            .clone()
            .or_else(|| env.get(ENV_DATABASE).map(PathBuf::from))
            .or(file.database)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

        let api_key = env
            .get(ENV_GEMINI_API_KEY)
            .map(str::to_string)
            .or(file.gemini_api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = env
            .get(ENV_GEMINI_MODEL)
            .map(str::to_string)
            .or(file.gemini_model)
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let base_url = env
            .get(ENV_GEMINI_BASE_URL)
            .map(str::to_string)
            .or(file.gemini_base_url)
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let generate_timeout = timeout(
            env,
            ENV_GENERATE_TIMEOUT,
            file.generate_timeout_secs,
            DEFAULT_GENERATE_TIMEOUT_SECS,
        )?;
        let execute_timeout = timeout(
            env,
            ENV_EXECUTE_TIMEOUT,
            file.execute_timeout_secs,
            DEFAULT_EXECUTE_TIMEOUT_SECS,
        )?;

        let log_json = overrides
            .log_json
            .unwrap_or_else(|| env.bool(ENV_LOG_JSON, file.log_json.unwrap_or(false)));

        Ok(Self {
            bind,
            database,
            gemini: GeminiConfig {
                api_key,
                model,
                base_url,
            },
            generate_timeout,
            execute_timeout,
            log_json,
        })
    }
}

/// Resolve a timeout in whole seconds; zero is rejected.
fn timeout(
    env: &EnvCache,
    key: &'static str,
    file: Option<u64>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let secs = env
        .parse::<u64>(key)
        .map_err(|value| ConfigError::Invalid { key, value })?
        .or(file)
        .unwrap_or(default);
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: secs.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
