/// Service configuration.
///
/// Loaded from a TOML file (every field has a default, and a missing file
/// means "all defaults"), then overridden by environment variables, which
/// may come from a `.env` file via `dotenv`.
///
/// ```toml
/// [client]
/// base_url = "https://www.surf-forecast.com"
/// request_timeout_secs = 10
///
/// [logging]
/// level = "info"
/// file = "surfcast.log"
///
/// [timezones]
/// MYT = ["Asia/Kuala_Lumpur"]
///
/// [[watchlist]]
/// name = "Cherating"
/// ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::logging::LogLevel;

pub const DEFAULT_BASE_URL: &str = "https://www.surf-forecast.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONFIG_PATH: &str = "surfcast.toml";

pub const ENV_BASE_URL: &str = "SURFCAST_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "SURFCAST_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "SURFCAST_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "SURFCAST_LOG_FILE";

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub logging: LoggingConfig,
    /// Extra abbreviation → IANA zone candidates, checked before the
    /// built-in registry.
    pub timezones: BTreeMap<String, Vec<String>>,
    pub watchlist: Vec<WatchedBreak>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: format!("surfcast/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn min_level(&self) -> Result<LogLevel, ConfigError> {
        self.level.parse().map_err(ConfigError::Invalid)
    }
}

/// A break checked by the `verify` command.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WatchedBreak {
    pub name: String,
    #[serde(default)]
    pub twelve_days: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read config: {}", e),
            ConfigError::Toml(e) => write!(f, "could not parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Toml(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file; a file that does not exist yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// `load`, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.client.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.client.request_timeout_secs = secs.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be a whole number of seconds: {:?}", ENV_TIMEOUT_SECS, secs))
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(file) = lookup(ENV_LOG_FILE) {
            self.logging.file = Some(file);
        }
        self.validate()
    }

    /// Load `.env`, the config file, then environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("client.base_url must not be empty".to_string()));
        }
        if self.client.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "client.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.logging.min_level()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.logging.min_level().unwrap(), LogLevel::Info);
        assert!(config.watchlist.is_empty());
    }

    #[test]
    fn test_full_file_parses() {
        let config = Config::from_toml_str(
            r#"
            [client]
            base_url = "http://localhost:8080"
            request_timeout_secs = 3

            [logging]
            level = "debug"
            timestamps = true

            [timezones]
            MYT = ["Asia/Kuching"]

            [[watchlist]]
            name = "Cherating"

            [[watchlist]]
            name = "Uluwatu"
            twelve_days = true
            "#,
        )
        .unwrap();

        assert_eq!(config.client.base_url, "http://localhost:8080");
        assert_eq!(config.client.request_timeout_secs, 3);
        assert!(config.logging.timestamps);
        assert_eq!(config.timezones["MYT"], vec!["Asia/Kuching".to_string()]);
        assert_eq!(config.watchlist.len(), 2);
        assert!(config.watchlist[1].twelve_days);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_toml_str("[client]\nrequest_timeout_secs = 0").is_err());
        assert!(Config::from_toml_str("[logging]\nlevel = \"loud\"").is_err());
        assert!(Config::from_toml_str("[client\n").is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = Config::from_toml_str("[client]\nbase_url = \"http://file\"").unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://env"),
            (ENV_TIMEOUT_SECS, "25"),
            (ENV_LOG_FILE, "/tmp/surfcast.log"),
        ]
        .into_iter()
        .collect();

        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.client.base_url, "http://env");
        assert_eq!(config.client.request_timeout_secs, 25);
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/surfcast.log"));
    }

    #[test]
    fn test_bad_timeout_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|k| (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_reads_and_missing_file_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[watchlist]]\nname = \"Cherating\"").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.watchlist[0].name, "Cherating");

        let missing = Config::from_file(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(missing.client.base_url, DEFAULT_BASE_URL);
    }
}
