use std::time::Duration;

use crate::error::ConfigError;
use crate::extractors::retry::RetryPolicy;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const MAX_ATTEMPTS_VAR: &str = "EXTRACTION_MAX_ATTEMPTS";

/// Settings injected into [`crate::TravelExtractor`] and [`crate::GeminiClient`].
///
/// A missing key is not rejected here; `extract` reports it on every call
/// before touching the network.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ExtractorConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            ..Self::default()
        }
    }

    /// Reads `GEMINI_API_KEY` (or `API_KEY`) and the optional overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("API_KEY").ok());

        let mut config = Self::new(api_key);

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(value) = std::env::var(MAX_ATTEMPTS_VAR) {
            config.retry.max_attempts = parse_max_attempts(&value)?;
        }
        if let Ok(value) = std::env::var("EXTRACTION_RETRY_DELAY_MS") {
            let millis: u64 = parse_number("EXTRACTION_RETRY_DELAY_MS", &value)?;
            config.retry.initial_delay = Duration::from_millis(millis);
        }
        if let Ok(value) = std::env::var("EXTRACTION_TIMEOUT_SECS") {
            let secs: u64 = parse_number("EXTRACTION_TIMEOUT_SECS", &value)?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// The configured key, if it is non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Replaces the key only when `api_key` is non-blank, so an empty flag or
    /// variable does not shadow a key resolved earlier.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}

/// Total number of calls per extraction, first attempt included.
fn parse_max_attempts(value: &str) -> Result<u32, ConfigError> {
    match parse_number(MAX_ATTEMPTS_VAR, value)? {
        0 => Err(ConfigError::Zero {
            name: MAX_ATTEMPTS_VAR,
        }),
        attempts => Ok(attempts),
    }
}
