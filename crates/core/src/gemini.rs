use crate::normalize::normalize;
use crate::prompt::GenerateContentRequest;
use crate::traits::PlacesBackend;
use crate::{Coordinates, SearchError, SearchResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

pub struct GeminiClient {
    client: Client,
    url: Url,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, SearchError> {
        let url = Url::parse(&format!("{}/", config.endpoint.trim_end_matches('/')))?
            .join(&format!("v1beta/models/{}:generateContent", config.model))?;

        Ok(Self {
            client: Client::new(),
            url,
            model: config.model,
            api_key: config.api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        query: &str,
        coordinates: Coordinates,
    ) -> Result<SearchResponse, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::Request("query is empty".to_string()));
        }

        let request = GenerateContentRequest::maps_grounded(query, coordinates);
        let response = self
            .client
            .post(self.url.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SearchError::BackendResponse {
                status: status.as_u16(),
                details: api_error_message(&body).unwrap_or(body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|error| SearchError::MalformedResponse(error.to_string()))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::MalformedResponse("response has no candidates".to_string()))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(SearchError::MalformedResponse(
                "response contained no answer text".to_string(),
            ));
        }

        let raw_chunks = candidate
            .grounding_metadata
            .map(|metadata| metadata.grounding_chunks)
            .unwrap_or_default();

        Ok(SearchResponse {
            text,
            grounding_chunks: normalize(raw_chunks),
        })
    }
}

#[async_trait]
impl PlacesBackend for GeminiClient {
    async fn search(
        &self,
        query: &str,
        coordinates: Coordinates,
    ) -> Result<SearchResponse, SearchError> {
        debug!(
            model = %self.model,
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "calling gemini generateContent"
        );

        let result = self.generate(query, coordinates).await;
        match &result {
            Ok(response) => debug!(places = response.grounding_chunks.len(), "gemini answered"),
            Err(err) => error!(error = %err, "error calling gemini api"),
        }
        result
    }
}

fn api_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_built_from_endpoint_and_model() {
        let mut config = GeminiConfig::new("secret");
        config.endpoint = "http://localhost:8080/".to_string();
        config.model = "gemini-test".to_string();
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.url.as_str(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(client.model(), "gemini-test");
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let mut config = GeminiConfig::new("secret");
        config.endpoint = "not a url".to_string();
        assert!(matches!(GeminiClient::new(config), Err(SearchError::Url(_))));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let rendered = format!("{:?}", GeminiConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains(DEFAULT_GEMINI_MODEL));
    }

    #[test]
    fn api_error_message_is_extracted() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(api_error_message(body).as_deref(), Some("API key not valid"));
        assert_eq!(api_error_message("<html>"), None);
    }
}
