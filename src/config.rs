use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Unset means no client-side timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: None,
        }
    }
}

fn default_backend_url() -> String { "http://localhost:8000".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "warn".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with FUNDING__)
    /// 4. BACKEND_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FUNDING__BACKEND__URL -> backend.url
            .add_source(env_source())
            .build()?;

        let settings = apply_backend_override(settings, std::env::var("BACKEND_URL").ok())?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        let settings = apply_backend_override(settings, std::env::var("BACKEND_URL").ok())?;

        settings.try_deserialize()
    }

    /// Replace the backend URL, e.g. from a command-line flag
    pub fn with_backend_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.backend.url = url;
        }
        self
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("FUNDING")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Layer a plain backend URL on top of the loaded sources
///
/// Empty values are ignored so an exported-but-blank variable falls back to
/// the configured URL.
fn apply_backend_override(settings: Config, url: Option<String>) -> Result<Config, ConfigError> {
    match url.filter(|u| !u.is_empty()) {
        Some(url) => Config::builder()
            .add_source(settings)
            .set_override("backend.url", url)?
            .build(),
        None => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend() {
        let settings = Settings::default();
        assert_eq!(settings.backend.url, "http://localhost:8000");
        assert!(settings.backend.timeout_secs.is_none());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "warn");
        assert_eq!(format, "compact");
    }

    #[test]
    fn test_empty_sources_deserialize_to_defaults() {
        let config = Config::builder().build().unwrap();
        let settings: Settings = config.try_deserialize().unwrap();
        assert_eq!(settings.backend.url, "http://localhost:8000");
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn test_backend_override() {
        let config = Config::builder().build().unwrap();
        let config = apply_backend_override(config, Some("https://grants.example".to_string())).unwrap();
        let settings: Settings = config.try_deserialize().unwrap();
        assert_eq!(settings.backend.url, "https://grants.example");
    }

    #[test]
    fn test_blank_backend_override_ignored() {
        let config = Config::builder().build().unwrap();
        let config = apply_backend_override(config, Some(String::new())).unwrap();
        let settings: Settings = config.try_deserialize().unwrap();
        assert_eq!(settings.backend.url, "http://localhost:8000");
    }

    #[test]
    fn test_with_backend_url() {
        let settings = Settings::default().with_backend_url(Some("http://10.0.0.2:9000".to_string()));
        assert_eq!(settings.backend.url, "http://10.0.0.2:9000");

        let settings = settings.with_backend_url(None);
        assert_eq!(settings.backend.url, "http://10.0.0.2:9000");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("funding-finder-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[backend]\nurl = \"http://match.internal:8080\"\ntimeout_secs = 12\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // BACKEND_URL in the environment would legitimately win
        if std::env::var("BACKEND_URL").map(|v| v.is_empty()).unwrap_or(true) {
            assert_eq!(settings.backend.url, "http://match.internal:8080");
        }
        assert_eq!(settings.backend.timeout_secs, Some(12));
        assert_eq!(settings.logging.format, "json");
        assert_eq!(settings.logging.level, "warn");
    }
}
