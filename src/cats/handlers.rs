use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use minijinja::context;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::client::Payload;
use super::projection::{DetailView, Projection};
use crate::state::AppState;
use crate::views::{CAT_DETAIL, INDEX};

const GALLERY_SIZE: u32 = 20;

const GALLERY_FAILED: &str = "Failed to get cat images";
const BY_ID_FAILED: &str = "Failed to get cat image by ID";
const URL_MISSING: &str = "Failed to get URL from cat data";
const RENDER_FAILED: &str = "Failed to render template";

type HtmlResult = Result<Html<String>, (StatusCode, String)>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery))
        .route("/cat/:id", get(cat_by_id))
        .route("/search", get(search))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Appends `segments` to the base path, each one percent-encoded as a single
/// segment. Bases are checked to be hierarchical when the config is loaded.
fn upstream_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn gallery_url(base: &Url) -> Url {
    let mut url = upstream_url(base, &["images", "search"]);
    url.query_pairs_mut()
        .append_pair("has_breeds", "1")
        .append_pair("limit", &GALLERY_SIZE.to_string());
    url
}

fn image_url(base: &Url, id: &str) -> Url {
    upstream_url(base, &["images", id])
}

fn breed_url(base: &Url, breed: &str) -> Url {
    let mut url = upstream_url(base, &["images", "search"]);
    url.query_pairs_mut()
        .append_pair("has_breeds", "1")
        .append_pair("limit", "1")
        .append_pair("breed_ids", breed);
    url
}

#[instrument(skip(state))]
pub async fn gallery(State(state): State<AppState>) -> HtmlResult {
    let url = gallery_url(&state.config.upstream.base_url);
    let images = match state.cats.fetch(url.as_str()).await {
        Ok(Payload::List(images)) => images,
        Ok(other) => {
            error!(kind = other.kind(), "gallery expected a list of images");
            return Err(internal(GALLERY_FAILED));
        }
        Err(e) => {
            error!(error = %e, "gallery fetch failed");
            return Err(internal(GALLERY_FAILED));
        }
    };
    debug!(count = images.len(), "gallery images fetched");
    render(&state, INDEX, context! { Results => images })
}

#[instrument(skip(state))]
pub async fn cat_by_id(State(state): State<AppState>, Path(id): Path<String>) -> HtmlResult {
    let url = image_url(&state.config.upstream.base_url, &id);
    let image = match state.cats.fetch(url.as_str()).await {
        Ok(Payload::Object(image)) => image,
        Ok(other) => {
            error!(kind = other.kind(), %id, "expected a single image");
            return Err(internal(BY_ID_FAILED));
        }
        Err(e) => {
            error!(error = %e, %id, "image fetch failed");
            return Err(internal(BY_ID_FAILED));
        }
    };

    let projection = Projection::from_image(&image).map_err(|e| {
        error!(error = %e, %id, "image has no url");
        internal(URL_MISSING)
    })?;
    render(&state, CAT_DETAIL, DetailView::Found(projection))
}

#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> HtmlResult {
    let breed = query.q.to_lowercase();
    let url = breed_url(&state.config.upstream.base_url, &breed);

    let first = match state.cats.fetch(url.as_str()).await {
        Ok(Payload::List(images)) => images.into_iter().next(),
        Ok(other) => {
            warn!(kind = other.kind(), %breed, "breed search expected a list");
            None
        }
        Err(e) => {
            warn!(error = %e, %breed, "breed search failed");
            None
        }
    };

    let Some(image) = first else {
        debug!(%breed, "no cat for breed");
        return render(&state, CAT_DETAIL, DetailView::no_such_breed());
    };
    debug!(%breed, ?image, "breed search hit");

    let projection = Projection::from_image(&image).map_err(|e| {
        error!(error = %e, %breed, "image has no url");
        internal(URL_MISSING)
    })?;
    render(&state, CAT_DETAIL, DetailView::Found(projection))
}

fn render<S: Serialize>(state: &AppState, name: &str, bindings: S) -> HtmlResult {
    state.templates.render(name, bindings).map_err(|e| {
        error!(error = %e, template = name, "template render failed");
        internal(RENDER_FAILED)
    })
}

fn internal(msg: &str) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string())
}
