use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default address of the prediction service in local development
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable selecting the prediction service address
pub const API_URL_ENV: &str = "PICKWISE_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sports: SportsConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base address of the prediction service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connection establishment timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    format!("pickwise/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Defaults, with the base address taken from `PICKWISE_API_URL` when set
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(url) = env_api_url() {
            cfg.base_url = url;
        }
        cfg
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Base address without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn env_api_url() -> Option<String> {
    std::env::var(API_URL_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct SportsConfig {
    /// League key loaded when the sports page first mounts
    #[serde(default = "default_sport")]
    pub default_sport: String,
}

fn default_sport() -> String {
    crate::domain::DEFAULT_SPORT.to_string()
}

impl Default for SportsConfig {
    fn default() -> Self {
        Self {
            default_sport: default_sport(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Number of picks shown in the dashboard's recent list
    #[serde(default = "default_recent_picks")]
    pub recent_picks: usize,
}

fn default_recent_picks() -> usize {
    5
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_picks: default_recent_picks(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .set_default("api.base_url", DEFAULT_API_URL)?
            .set_default("api.timeout_ms", default_timeout_ms() as i64)?
            .set_default("api.connect_timeout_ms", default_connect_timeout_ms() as i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Environment-specific overrides (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("PICKWISE_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // PICKWISE_API__TIMEOUT_MS, PICKWISE_LOGGING__LEVEL, ...
            .add_source(
                Environment::with_prefix("PICKWISE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: AppConfig = builder.build()?.try_deserialize()?;
        if let Some(url) = env_api_url() {
            cfg.api.base_url = url;
        }
        Ok(cfg)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match url::Url::parse(self.api.base()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            )),
            Err(e) => errors.push(format!("api.base_url is not a valid URL: {}", e)),
        }

        if self.api.timeout_ms == 0 {
            errors.push("api.timeout_ms must be positive".to_string());
        }

        if self.api.connect_timeout_ms == 0 {
            errors.push("api.connect_timeout_ms must be positive".to_string());
        }

        if self.sports.default_sport.trim().is_empty() {
            errors.push("sports.default_sport must not be empty".to_string());
        }

        if self.dashboard.recent_picks == 0 {
            errors.push("dashboard.recent_picks must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api.base_url, "http://localhost:8000");
        assert_eq!(cfg.sports.default_sport, "basketball_nba");
        assert_eq!(cfg.dashboard.recent_picks, 5);
        assert_eq!(cfg.api.timeout(), Duration::from_secs(10));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_base_strips_trailing_slash() {
        let api = ApiConfig::with_base_url("https://api.example.com/");
        assert_eq!(api.base(), "https://api.example.com");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut cfg = AppConfig::default();
        cfg.api.base_url = "ftp://example.com".to_string();
        cfg.api.timeout_ms = 0;
        cfg.dashboard.recent_picks = 0;

        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("http or https"));
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let cfg = AppConfig::load_from("/nonexistent/pickwise-config").unwrap();
        assert_eq!(cfg.sports.default_sport, "basketball_nba");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        unsafe { std::env::set_var("PICKWISE_API__TIMEOUT_MS", "1234") };
        unsafe { std::env::set_var("PICKWISE_DASHBOARD__RECENT_PICKS", "3") };
        let cfg = AppConfig::load_from("/nonexistent/pickwise-config");
        unsafe { std::env::remove_var("PICKWISE_API__TIMEOUT_MS") };
        unsafe { std::env::remove_var("PICKWISE_DASHBOARD__RECENT_PICKS") };

        let cfg = cfg.unwrap();
        assert_eq!(cfg.api.timeout_ms, 1234);
        assert_eq!(cfg.api.timeout(), Duration::from_millis(1234));
        assert_eq!(cfg.dashboard.recent_picks, 3);
    }
}
