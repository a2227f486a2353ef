use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MAX_DISPLAY_SNIPPETS: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ConfigError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewSnippet {
    #[serde(alias = "title")]
    pub text: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceAnswerSource {
    #[serde(
        default,
        deserialize_with = "lenient_snippets",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_snippets: Option<Vec<ReviewSnippet>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MapPlace {
    pub uri: String,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub place_answer_sources: Option<Vec<PlaceAnswerSource>>,
}

impl MapPlace {
    // Only the first answer source is consulted.
    pub fn review_snippets(&self) -> &[ReviewSnippet] {
        self.place_answer_sources
            .as_deref()
            .and_then(|sources| sources.first())
            .and_then(|source| source.review_snippets.as_deref())
            .unwrap_or_default()
    }

    pub fn display_snippets(&self) -> &[ReviewSnippet] {
        let snippets = self.review_snippets();
        &snippets[..snippets.len().min(MAX_DISPLAY_SNIPPETS)]
    }
}

// The live API sends `placeAnswerSources` as a single object, older payloads as a list.
// Entries that don't decode are skipped so a place is never lost over display data.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<PlaceAnswerSource>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        Some(source @ Value::Object(_)) => serde_json::from_value(source)
            .ok()
            .map(|source| vec![source]),
        _ => None,
    })
}

fn lenient_snippets<'de, D>(deserializer: D) -> Result<Option<Vec<ReviewSnippet>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroundingChunk {
    pub maps: MapPlace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundingSource {
    Maps(MapPlace),
    Unmapped,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub text: String,
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub answer_text: String,
    pub places: Vec<MapPlace>,
}

impl From<SearchResponse> for SearchResult {
    fn from(response: SearchResponse) -> Self {
        Self {
            answer_text: response.text,
            places: response
                .grounding_chunks
                .into_iter()
                .map(|chunk| chunk.maps)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    Empty,
    Loading,
    Failed(&'a str),
    Succeeded(&'a SearchResult),
}
