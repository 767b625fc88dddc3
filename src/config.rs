//! Server configuration
//!
//! Read from a TOML file given with `--config` or the `GNOSIS_CONFIG`
//! environment variable. Every field has a default, so an empty file (or no
//! file at all) yields a working configuration.

use crate::error::{GnosisError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "GNOSIS_CONFIG";

/// Default HTTP listen address
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3000";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GnosisConfig {
    /// HTTP/SSE transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Diagnosticator registry settings
    #[serde(default)]
    pub pathology: PathologyConfig,
}

/// HTTP/SSE transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,

    /// Interval between SSE keep-alive comments (in seconds)
    #[serde(default = "default_keepalive", with = "serde_duration")]
    pub keepalive: Duration,

    /// Capacity of each session's outbound message queue
    #[serde(default = "default_session_capacity")]
    pub session_capacity: usize,
}

/// Diagnosticator registry settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathologyConfig {
    /// Additional table files appended after the built-in ones
    #[serde(default)]
    pub extra_tables: Vec<PathBuf>,

    /// Built-in diagnosticators to drop (by id or display name)
    #[serde(default)]
    pub disabled: Vec<String>,
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_keepalive() -> Duration {
    Duration::from_secs(15)
}

fn default_session_capacity() -> usize {
    32
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            keepalive: default_keepalive(),
            session_capacity: default_session_capacity(),
        }
    }
}

// Duration as whole seconds
mod serde_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl GnosisConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GnosisError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml(&contents)?;
        config.resolve_relative_paths(path);
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: GnosisConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration source
    ///
    /// An explicit path wins over `GNOSIS_CONFIG`; with neither the defaults
    /// are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match std::env::var(CONFIG_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::from_file(Path::new(value.trim())),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.http.keepalive < Duration::from_secs(1) {
            return Err(GnosisError::Config(
                "http.keepalive must be at least 1 second".to_string(),
            ));
        }

        if self.http.session_capacity == 0 {
            return Err(GnosisError::Config(
                "http.session_capacity must be greater than 0".to_string(),
            ));
        }

        for name in &self.pathology.disabled {
            if name.trim().is_empty() {
                return Err(GnosisError::Config(
                    "pathology.disabled entries must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    // Table paths in a config file are relative to that file
    fn resolve_relative_paths(&mut self, config_path: &Path) {
        let Some(base) = config_path.parent() else {
            return;
        };
        for table in &mut self.pathology.extra_tables {
            if table.is_relative() {
                *table = base.join(&*table);
            }
        }
    }
}
