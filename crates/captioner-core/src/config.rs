use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub publisher: PublisherConfig,

    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of media ids processed at once by `run`.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            concurrency: default_concurrency(),
        }
    }
}

/// Hosted storage account used both to read transcripts and to publish captions.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_cloud_name")]
    pub cloud_name: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub api_secret: Option<String>,

    #[serde(default = "default_delivery_url")]
    pub delivery_url: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Overrides the `{delivery_url}/{cloud_name}/raw/upload` transcript location.
    #[serde(default)]
    pub transcript_base_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cloud_name: default_cloud_name(),
            api_key: None,
            api_secret: None,
            delivery_url: default_delivery_url(),
            api_url: default_api_url(),
            transcript_base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StorageConfig {
    /// Base location of raw assets, under which `{id}.transcript` files live.
    pub fn raw_delivery_base(&self) -> String {
        format!(
            "{}/{}/raw/upload",
            self.delivery_url.trim_end_matches('/'),
            self.cloud_name
        )
    }

    pub fn transcript_base(&self) -> String {
        match self.transcript_base_url {
            Some(ref base) => base.trim_end_matches('/').to_string(),
            None => self.raw_delivery_base(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PublisherConfig {
    #[serde(default = "default_publisher_plugin")]
    pub plugin: String,

    #[serde(flatten)]
    pub extra: toml::Value,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            plugin: default_publisher_plugin(),
            extra: toml::Value::Table(Default::default()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    #[serde(default = "default_media_ids")]
    pub default_ids: Vec<String>,

    #[serde(default = "default_source_url")]
    pub source_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            default_ids: default_media_ids(),
            source_url: default_source_url(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_concurrency() -> usize {
    2
}

fn default_cloud_name() -> String {
    "demo".to_string()
}

fn default_delivery_url() -> String {
    "https://res.cloudinary.com".to_string()
}

fn default_api_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_publisher_plugin() -> String {
    "cloudinary".to_string()
}

fn default_media_ids() -> Vec<String> {
    vec!["accessible_demo_video".to_string()]
}

fn default_source_url() -> String {
    "https://demo-res.cloudinary.com/video/upload/lincoln.mp4".to_string()
}

/// Interpolate `${VAR}` patterns with environment variable values.
/// `${VAR:-fallback}` uses `fallback` when `VAR` is unset.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is a valid regex");
    let mut result = input.to_string();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let value = match (std::env::var(var_name), cap.get(2)) {
            (Ok(val), _) => val,
            (Err(_), Some(fallback)) => fallback.as_str().to_string(),
            (Err(_), None) => return Err(ConfigError::EnvVarNotFound(var_name.to_string())),
        };
        result = result.replace(&cap[0], &value);
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Like [`load_from_file`](Self::load_from_file), but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.cloud_name.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.cloud_name must not be empty".to_string()));
        }
        if self.storage.timeout_secs == 0 {
            return Err(ConfigError::Invalid("storage.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
