use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::client::RawImage;

pub const NO_SUCH_BREED: &str = "Oops! There seems to be no cat by that breed in our database.";

const MAX_TEMPERAMENTS: usize = 3;
const TEMPERAMENT_DELIMITER: &str = ", ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("image record has no non-empty string `url`")]
    MissingUrl,
}

/// Flat view-model bound by the `cat-detail` template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    pub image_url: String,
    pub name: String,
    pub weight: String,
    pub temperaments: Vec<String>,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DetailView {
    Found(Projection),
    Missing {
        #[serde(rename = "Error")]
        error: String,
    },
}

impl DetailView {
    pub fn no_such_breed() -> Self {
        DetailView::Missing {
            error: NO_SUCH_BREED.into(),
        }
    }
}

impl Projection {
    pub fn from_image(image: &RawImage) -> Result<Self, ShapeError> {
        let image_url = image
            .get("url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .ok_or(ShapeError::MissingUrl)?
            .to_string();

        let mut projection = Projection {
            image_url,
            ..Default::default()
        };

        let Some(breed) = image
            .get("breeds")
            .and_then(Value::as_array)
            .and_then(|breeds| breeds.first())
            .and_then(Value::as_object)
        else {
            return Ok(projection);
        };

        let text = |v: Option<&Value>| v.and_then(Value::as_str).unwrap_or_default().to_string();

        projection.name = capitalize(&text(breed.get("name")));
        projection.weight = text(breed.get("weight").and_then(|w| w.get("metric")));
        projection.temperaments = split_temperaments(&text(breed.get("temperament")));
        projection.origin = text(breed.get("origin"));
        Ok(projection)
    }
}

/// Splits on the literal `", "`; other separators yield a single item.
pub fn split_temperaments(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(TEMPERAMENT_DELIMITER)
        .take(MAX_TEMPERAMENTS)
        .map(str::to_string)
        .collect()
}

/// Uppercases the first codepoint and lowercases the rest. When the uppercase
/// form of the first codepoint is several chars (`ß` -> `SS`) only the first is kept.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .take(1)
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
