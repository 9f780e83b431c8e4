//! Configuration management for medbook.
//!
//! Loads configuration from ${MEDBOOK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default API base URL used when neither flag, env nor config provide one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";

/// Environment variable overriding the configured API base URL.
pub const API_BASE_URL_ENV: &str = "MEDBOOK_API_BASE_URL";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// Keeps the template's comments while preserving the user's values.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;

    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    // the config is flat; only top-level values carry over
    for (key, item) in user_doc.iter() {
        if let Some(value) = item.as_value() {
            doc[key] = toml_edit::Item::Value(value.clone());
        }
    }

    Ok(doc.to_string())
}

pub mod paths {
    //! Path resolution for medbook configuration and session data.
    //!
    //! MEDBOOK_HOME resolution order:
    //! 1. MEDBOOK_HOME environment variable (if set)
    //! 2. ~/.config/medbook (default)

    use std::path::PathBuf;

    /// Returns the medbook home directory.
    pub fn medbook_home() -> PathBuf {
        if let Ok(home) = std::env::var("MEDBOOK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".medbook"),
            |h| h.join(".config").join("medbook"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        medbook_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        medbook_home().join("session.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        medbook_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the booking API (optional; see [`Config::resolve_api_base_url`])
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Log filter directive used when MEDBOOK_LOG is unset
    pub log_level: Option<String>,

    /// Whether to also write logs to `<home>/logs/medbook.log`
    pub log_file: bool,
}

impl Config {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the API base URL with precedence: flag > env > config > default.
    ///
    /// The result always ends with `/` so relative endpoint paths join under it.
    ///
    /// # Errors
    /// Returns an error if the chosen value is not a valid URL.
    pub fn resolve_api_base_url(&self, flag: Option<&str>) -> Result<url::Url> {
        let env_value = std::env::var(API_BASE_URL_ENV).ok();
        let candidates = [flag, env_value.as_deref(), self.api_base_url.as_deref()];

        let raw = candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);

        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };

        url::Url::parse(&normalized).with_context(|| format!("Invalid API base URL: {raw}"))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Saves only the api_base_url field to the default config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or written.
    pub fn save_api_base_url(url: &str) -> Result<()> {
        Self::save_api_base_url_to(&paths::config_path(), url)
    }

    /// Saves only the api_base_url field to a specific config file path.
    ///
    /// Creates the file with the default template if it doesn't exist.
    /// If the file exists, merges user values into the latest template.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or written.
    pub fn save_api_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api_base_url"] = value(url);

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: None,
            log_file: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.log_file);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "api_base_url = \"http://clinic.local/api/\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("http://clinic.local/api/")
        );
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# api_base_url ="));
        assert!(contents.contains("request_timeout_secs = 30"));
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_flag_wins_and_gets_trailing_slash() {
        let config = Config {
            api_base_url: Some("http://from-config/api/".to_string()),
            ..Default::default()
        };

        let url = config
            .resolve_api_base_url(Some("http://from-flag:9000/api"))
            .unwrap();
        assert_eq!(url.as_str(), "http://from-flag:9000/api/");
    }

    #[test]
    fn test_blank_flag_is_ignored() {
        let config = Config {
            api_base_url: Some("http://from-config/api/".to_string()),
            ..Default::default()
        };

        // Only meaningful when the env override is not set in the test environment.
        if std::env::var(API_BASE_URL_ENV).is_err() {
            let url = config.resolve_api_base_url(Some("   ")).unwrap();
            assert_eq!(url.as_str(), "http://from-config/api/");
        }
    }

    #[test]
    fn test_invalid_flag_url_is_rejected() {
        let config = Config::default();
        let err = config.resolve_api_base_url(Some("not a url")).unwrap_err();
        assert!(err.to_string().contains("Invalid API base URL"));
    }

    #[test]
    fn test_save_api_base_url_creates_file_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_api_base_url_to(&config_path, "http://clinic.local/api/").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("http://clinic.local/api/")
        );

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# medbook Configuration"));
    }

    #[test]
    fn test_save_api_base_url_preserves_user_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "request_timeout_secs = 5\nlog_file = true\n").unwrap();

        Config::save_api_base_url_to(&config_path, "http://clinic.local/api/").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.request_timeout_secs, 5);
        assert!(config.log_file);
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("http://clinic.local/api/")
        );
    }

    #[test]
    fn test_save_api_base_url_rejects_invalid_url() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        assert!(Config::save_api_base_url_to(&config_path, "::nope").is_err());
        assert!(!config_path.exists());
    }
}
