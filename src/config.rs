use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-preview-05-20";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    Missing(&'static str),
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout_ms: u64,
    pub deck_path: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let gemini_api_key = lookup("GEMINI_API_KEY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let port = var_or("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?;

        let timeout_ms = var_or("GEMINI_TIMEOUT_MS", "60000")
            .parse::<u64>()
            .map_err(|e| ConfigError::Invalid {
                key: "GEMINI_TIMEOUT_MS",
                reason: e.to_string(),
            })?;

        let log_level = var_or("LOG_LEVEL", "info")
            .trim()
            .parse::<LevelFilter>()
            .map_err(|e| ConfigError::Invalid {
                key: "LOG_LEVEL",
                reason: e.to_string(),
            })?
            .to_string();

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port,
            gemini_api_key,
            gemini_base_url: var_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            text_model: var_or("GEMINI_TEXT_MODEL", DEFAULT_TEXT_MODEL),
            image_model: var_or("GEMINI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            timeout_ms,
            deck_path: PathBuf::from(var_or("DECK_PATH", "cards.json")),
            static_dir: lookup("STATIC_DIR")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            log_level,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
