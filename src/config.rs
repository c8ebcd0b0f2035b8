use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default backend location used by the browser extension
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Title shown when the page has no resolvable video heading
pub const DEFAULT_VIDEO_TITLE: &str = "YouTube Video";

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the insights client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Backend service settings
    pub backend: BackendConfig,

    /// Per-feature request defaults
    pub features: FeatureDefaults,

    /// Page context resolution settings
    pub page: PageConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the insights backend
    pub base_url: String,

    /// Whole-request timeout in seconds (0 = wait indefinitely)
    pub request_timeout_seconds: u64,

    /// TCP connect timeout in seconds
    pub connect_timeout_seconds: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureDefaults {
    /// Minimum summary length passed to `summarize`
    pub summary_min_length: u32,

    /// Maximum summary length passed to `summarize`
    pub summary_max_length: u32,

    /// Number of key terms requested from `keypoints_wiki`
    pub key_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Display title used when no heading is found
    pub default_title: String,

    /// CSS selectors tried in order to locate the video title heading
    pub title_selectors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    pub level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_seconds: 300, // summarization on CPU is slow
            connect_timeout_seconds: 5,
            user_agent: format!("yt-insights/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for FeatureDefaults {
    fn default() -> Self {
        Self {
            summary_min_length: 150,
            summary_max_length: 300,
            key_points: 8,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_VIDEO_TITLE.to_string(),
            title_selectors: vec![
                "h1.ytd-watch-metadata yt-formatted-string".to_string(),
                "h1.ytd-video-primary-info-renderer".to_string(),
                "#title h1".to_string(),
                "h1.title".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl BackendConfig {
    /// Request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Parse the configured base URL
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {}", self.base_url, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Invalid(format!(
                "base_url must use http or https, got '{}'",
                other
            ))),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, or defaults plus environment
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::candidate_paths() {
            if path.exists() {
                let config = Self::load_from(&path)?.with_env_overrides();
                tracing::info!("📄 Loaded configuration from: {}", path.display());
                return Ok(config);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::from_env())
    }

    /// Config file locations, in lookup order
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("yt-insights.toml"),
            PathBuf::from("config/yt-insights.toml"),
        ];

        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("yt-insights").join("config.toml"));
        }

        paths
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("YT_INSIGHTS_BASE_URL") {
            self.backend.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("YT_INSIGHTS_TIMEOUT") {
            match timeout.parse() {
                Ok(secs) => self.backend.request_timeout_seconds = secs,
                Err(_) => tracing::warn!("Ignoring invalid YT_INSIGHTS_TIMEOUT: {}", timeout),
            }
        }

        if let Ok(level) = std::env::var("YT_INSIGHTS_LOG_LEVEL") {
            self.logging.level = level;
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.parsed_base_url()?;

        if self.features.summary_min_length > self.features.summary_max_length {
            return Err(ConfigError::Invalid(format!(
                "summary_min_length ({}) exceeds summary_max_length ({})",
                self.features.summary_min_length, self.features.summary_max_length
            )));
        }

        if self.features.key_points == 0 {
            return Err(ConfigError::Invalid("key_points must be greater than 0".to_string()));
        }

        if self.page.default_title.trim().is_empty() {
            return Err(ConfigError::Invalid("default_title must not be empty".to_string()));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        let timeout = match self.backend.request_timeout() {
            Some(t) => format!("{}s", t.as_secs()),
            None => "none".to_string(),
        };

        format!(
            "YT Insights Configuration:\n\
            - Backend: {}\n\
            - Request Timeout: {}\n\
            - Summary Length: {}-{}\n\
            - Key Points: {}\n\
            - Log Level: {}",
            self.backend.base_url,
            timeout,
            self.features.summary_min_length,
            self.features.summary_max_length,
            self.features.key_points,
            self.logging.level
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.backend.base_url = base_url.into();
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.config.backend.request_timeout_seconds = seconds;
        self
    }

    pub fn with_summary_length(mut self, min: u32, max: u32) -> Self {
        self.config.features.summary_min_length = min;
        self.config.features.summary_max_length = max;
        self
    }

    pub fn with_key_points(mut self, count: u32) -> Self {
        self.config.features.key_points = count;
        self
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.config.page.default_title = title.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
