use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.thecatapi.com/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CAT_API_KEY is not set in the environment variables")]
    MissingApiKey,
    #[error("CAT_API_BASE_URL is not a usable base URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_key: String,
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub templates_dir: PathBuf,
    pub css_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("CAT_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let raw_base = lookup("CAT_API_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let base_url = Url::parse(&raw_base)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or(ConfigError::InvalidBaseUrl(raw_base))?;

        let upstream = UpstreamConfig {
            api_key,
            base_url,
            timeout: Duration::from_secs(
                lookup("CAT_API_TIMEOUT_SECS")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(10),
            ),
        };

        Ok(Self {
            upstream,
            templates_dir: lookup("TEMPLATES_DIR")
                .unwrap_or_else(|| "./templates".into())
                .into(),
            css_dir: lookup("CSS_DIR").unwrap_or_else(|| "./css".into()).into(),
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("APP_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(3000),
        })
    }
}
