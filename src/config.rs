use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use groupstore_core::BasicCredentials;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Credentials sent with every request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl AuthConfig {
    /// Returns Basic credentials when both username and password are set
    pub fn credentials(&self) -> Option<BasicCredentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(BasicCredentials::new(user, pass)),
            _ => None,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Root URL of the store API
    pub api_url: ConfigValue<String>,
    /// Request timeout in seconds
    pub timeout_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Ambient credentials
    pub auth: AuthConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    auth: Option<AuthConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut timeout_secs = ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default);
        let mut config_file = None;
        let mut auth = AuthConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(secs) = file_config.timeout_secs {
                timeout_secs = ConfigValue::new(secs, ConfigSource::File);
            }
            if let Some(auth_config) = file_config.auth {
                auth = auth_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("GROUPSTORE_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(secs) = std::env::var("GROUPSTORE_TIMEOUT_SECS") {
            let secs = secs
                .parse()
                .map_err(|_| ConfigError::InvalidValue("GROUPSTORE_TIMEOUT_SECS", secs))?;
            timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }
        if let Ok(user) = std::env::var("GROUPSTORE_USERNAME") {
            auth.username = Some(user);
        }
        if let Ok(pass) = std::env::var("GROUPSTORE_PASSWORD") {
            auth.password = Some(pass);
        }

        Ok(Self {
            api_url,
            timeout_secs,
            config_file,
            auth,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/groupstore/
    /// - macOS: ~/Library/Application Support/groupstore/
    /// - Windows: %APPDATA%/groupstore/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("groupstore")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
