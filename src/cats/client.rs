//! Upstream client for the cat image API.
//!
//! The API answers some routes with a JSON array of images and others with a
//! single image object. Bodies are decoded permissively into [`Payload`] without
//! guessing the shape from the URL.

use axum::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, UpstreamConfig};

/// A single image record exactly as the upstream sent it.
pub type RawImage = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    List(Vec<RawImage>),
    Object(RawImage),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::List(_) => "list",
            Payload::Object(_) => "object",
        }
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("upstream request failed: {0}")]
    Transport(String),
    #[error("upstream body is neither a JSON array of objects nor a JSON object: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        UpstreamError::Transport(e.to_string())
    }
}

#[async_trait]
pub trait CatApi: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Payload, UpstreamError>;
}

/// Array of objects first, then a single object. First success wins.
pub fn decode_payload(body: &[u8]) -> Result<Payload, UpstreamError> {
    if let Ok(list) = serde_json::from_slice::<Vec<RawImage>>(body) {
        return Ok(Payload::List(list));
    }
    serde_json::from_slice::<RawImage>(body)
        .map(Payload::Object)
        .map_err(UpstreamError::Decode)
}

#[derive(Clone)]
pub struct CatClient {
    http: reqwest::Client,
    api_key: String,
}

impl CatClient {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self, UpstreamError> {
        if cfg.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        let http = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl CatApi for CatClient {
    async fn fetch(&self, url: &str) -> Result<Payload, UpstreamError> {
        let resp = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, %url, "upstream request failed");
                UpstreamError::from(e)
            })?;

        let status = resp.status();
        let body = resp.bytes().await?;
        debug!(%url, %status, bytes = body.len(), "upstream responded");

        let payload = decode_payload(&body).map_err(|e| {
            warn!(error = %e, %url, %status, "upstream body could not be decoded");
            e
        })?;
        debug!(%url, kind = payload.kind(), "upstream payload decoded");
        Ok(payload)
    }
}
