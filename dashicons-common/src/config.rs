//! Bootstrap configuration loading and setting resolution
//!
//! Settings follow a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "dashicons";

/// Default config file name
const CONFIG_FILE_NAME: &str = "import.toml";

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional. A missing default config file yields
/// `TomlConfig::default()`.
#[derive(Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Backend base URL (fallback for `PB_URL`)
    #[serde(default)]
    pub pb_url: Option<String>,

    /// Admin bearer credential (fallback for `PB_ADMIN_TOKEN`)
    #[serde(default)]
    pub pb_admin_token: Option<String>,

    /// Per-request HTTP timeout; unset means no timeout
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    /// How long to wait for the metadata store lock
    #[serde(default)]
    pub lock_timeout_secs: Option<u64>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Hand-written so the admin token never reaches log output.
impl fmt::Debug for TomlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TomlConfig")
            .field("pb_url", &self.pb_url)
            .field(
                "pb_admin_token",
                &self.pb_admin_token.as_ref().map(|_| "<redacted>"),
            )
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("lock_timeout_secs", &self.lock_timeout_secs)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// Where a resolved setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    CommandLine,
    Environment,
    TomlFile,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingSource::CommandLine => write!(f, "command line"),
            SettingSource::Environment => write!(f, "environment"),
            SettingSource::TomlFile => write!(f, "TOML config"),
        }
    }
}

/// Default config file location for the platform
///
/// `~/.config/dashicons/import.toml` on Linux, the platform equivalent
/// elsewhere. `None` when the platform has no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load bootstrap configuration
///
/// An explicitly requested file must exist. The default location is optional:
/// when it is absent the compiled defaults are used.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let (path, required) = match explicit_path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => {
                debug!("No platform config directory; using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    if !path.exists() {
        if required {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        debug!(path = %path.display(), "Config file not present; using defaults");
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!(path = %path.display(), "Loaded TOML config");
    Ok(config)
}

/// Resolve a string setting by priority: CLI → environment → TOML
///
/// Empty and whitespace-only values are treated as unset at every tier.
pub fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Option<(String, SettingSource)> {
    if let Some(value) = cli_arg.filter(|v| is_set(v)) {
        return Some((value.to_string(), SettingSource::CommandLine));
    }

    if let Ok(value) = std::env::var(env_var_name) {
        if is_set(&value) {
            return Some((value, SettingSource::Environment));
        }
    }

    toml_value
        .filter(|v| is_set(v))
        .map(|v| (v.to_string(), SettingSource::TomlFile))
}

fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}
