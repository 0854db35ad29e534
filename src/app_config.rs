use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use std::time::Duration;

/// Application configuration module
/// This module handles the application configuration including loading,
/// layering environment overrides on top of it, and validating it.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Access credential for the completion service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the completion API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Base timeout of a single attempt in milliseconds, scaled by the attempt number
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Attempts per chunk before it is dropped
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between failed attempts in milliseconds, doubled every attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Minimum number of subtitle blocks per request
    #[serde(default = "default_min_blocks_per_chunk")]
    pub min_blocks_per_chunk: usize,

    /// Chunks in flight at once; 1 keeps dispatch strictly sequential
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Language tag inserted into the output file name
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "OPENAI_KEY";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_ENDPOINT: &str = "OPENAI_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "OPENAI_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "BISRT_MAX_RETRIES";
pub const ENV_RETRY_BACKOFF_MS: &str = "BISRT_RETRY_BACKOFF_MS";
pub const ENV_CHUNK_SIZE: &str = "BISRT_CHUNK_SIZE";
pub const ENV_CONCURRENCY: &str = "BISRT_CONCURRENCY";

fn default_model() -> String {
    "gpt-5-mini-2025-08-07".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_ms() -> u64 {
    240_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_min_blocks_per_chunk() -> usize {
    50
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_output_suffix() -> String {
    "zh-CN".to_string()
}

impl Config {
    /// Load a configuration file; missing keys fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Overlay the process environment on top of this configuration
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay values returned by `lookup` on top of this configuration
    ///
    /// Empty values are treated as unset. Numeric values that do not parse
    /// are reported as errors rather than silently ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY).or_else(|| get(ENV_API_KEY_FALLBACK)) {
            self.api_key = key.trim().to_string();
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model = model.trim().to_string();
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(value) = get(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_env(ENV_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = get(ENV_MAX_RETRIES) {
            self.max_retries = parse_env(ENV_MAX_RETRIES, &value)?;
        }
        if let Some(value) = get(ENV_RETRY_BACKOFF_MS) {
            self.retry_backoff_ms = parse_env(ENV_RETRY_BACKOFF_MS, &value)?;
        }
        if let Some(value) = get(ENV_CHUNK_SIZE) {
            self.min_blocks_per_chunk = parse_env(ENV_CHUNK_SIZE, &value)?;
        }
        if let Some(value) = get(ENV_CONCURRENCY) {
            self.concurrent_requests = parse_env(ENV_CONCURRENCY, &value)?;
        }
        Ok(())
    }

    /// Base per-attempt timeout
    pub fn base_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base retry backoff
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "OpenAI API key is not set. Set the environment variable {} (or {})",
                ENV_API_KEY,
                ENV_API_KEY_FALLBACK
            ));
        }
        if self.model.trim().is_empty() {
            return Err(anyhow!("Model identifier must not be empty"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(anyhow!("API endpoint must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(anyhow!("Timeout must be greater than zero"));
        }
        if self.max_retries == 0 {
            return Err(anyhow!("At least one attempt per chunk is required"));
        }
        if self.min_blocks_per_chunk == 0 {
            return Err(anyhow!("Chunk size must be greater than zero"));
        }
        if self.concurrent_requests == 0 {
            return Err(anyhow!("Concurrency must be greater than zero"));
        }
        if self.output_suffix.trim().is_empty() {
            return Err(anyhow!("Output suffix must not be empty"));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| anyhow!("Invalid value for {}: {:?}", key, value))
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            min_blocks_per_chunk: default_min_blocks_per_chunk(),
            concurrent_requests: default_concurrent_requests(),
            output_suffix: default_output_suffix(),
            log_level: LogLevel::default(),
        }
    }
}
