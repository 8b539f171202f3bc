use crate::cats::client::{CatApi, CatClient};
use crate::config::AppConfig;
use crate::views::Templates;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cats: Arc<dyn CatApi>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let cats = Arc::new(CatClient::new(&config.upstream)?) as Arc<dyn CatApi>;
        let templates = Arc::new(Templates::from_dir(&config.templates_dir)?);

        Ok(Self::from_parts(config, cats, templates))
    }

    pub fn from_parts(config: Arc<AppConfig>, cats: Arc<dyn CatApi>, templates: Arc<Templates>) -> Self {
        Self {
            config,
            cats,
            templates,
        }
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use crate::cats::client::{decode_payload, Payload, UpstreamError};
    use axum::async_trait;
    use std::sync::Mutex;

    /// Serves one canned body for every URL and records what was asked for.
    /// `None` behaves like an unreachable upstream.
    pub struct FakeCats {
        body: Option<String>,
        pub requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CatApi for FakeCats {
        async fn fetch(&self, url: &str) -> Result<Payload, UpstreamError> {
            self.requested.lock().unwrap().push(url.to_string());
            match &self.body {
                Some(body) => decode_payload(body.as_bytes()),
                None => Err(UpstreamError::Transport("connection refused".into())),
            }
        }
    }

    impl AppState {
        pub fn fake(body: Option<&str>) -> (Self, Arc<FakeCats>) {
            let manifest = env!("CARGO_MANIFEST_DIR");
            let config = Arc::new(
                AppConfig::from_lookup(|key| match key {
                    "CAT_API_KEY" => Some("test".into()),
                    "TEMPLATES_DIR" => Some(format!("{}/templates", manifest)),
                    "CSS_DIR" => Some(format!("{}/css", manifest)),
                    _ => None,
                })
                .expect("test config"),
            );
            let cats = Arc::new(FakeCats {
                body: body.map(str::to_string),
                requested: Mutex::new(Vec::new()),
            });
            let templates =
                Arc::new(Templates::from_dir(&config.templates_dir).expect("templates load"));
            let state = Self::from_parts(config, cats.clone() as Arc<dyn CatApi>, templates);
            (state, cats)
        }
    }
}
