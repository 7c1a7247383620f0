//! Process configuration, read from the environment (and `.env`).

use thiserror::Error;

use crate::messages::Locale;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_NATIONALITY: &str = "Korean";
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Google API key is not set (GOOGLE_API_KEY or GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub bind: String,
    pub model: String,
    pub api_base: String,
    pub locale: Locale,
    pub nationality: String,
    pub body_limit: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("bind", &self.bind)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("locale", &self.locale)
            .field("nationality", &self.nationality)
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let locale = match non_empty("FACE_READER_LOCALE") {
            Some(raw) => raw.parse::<Locale>().map_err(|reason| ConfigError::InvalidValue {
                field: "FACE_READER_LOCALE".to_string(),
                reason,
            })?,
            None => Locale::default(),
        };

        let body_limit = match non_empty("FACE_READER_BODY_LIMIT") {
            Some(raw) => raw.parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                field: "FACE_READER_BODY_LIMIT".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_BODY_LIMIT,
        };

        Ok(Self {
            api_key: non_empty("GOOGLE_API_KEY").or_else(|| non_empty("GEMINI_API_KEY")),
            bind: non_empty("FACE_READER_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: non_empty("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            locale,
            nationality: non_empty("FACE_READER_NATIONALITY")
                .unwrap_or_else(|| DEFAULT_NATIONALITY.to_string()),
            body_limit,
        })
    }

    /// The key is only needed to serve; the CLI client runs without it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}
