use crate::Coordinates;
use serde::Serialize;

pub fn build_prompt(query: &str) -> String {
    format!(
        "You are DJBook.in, an expert AI assistant helping a user find the perfect DJ. \
         The user is looking for: \"{query}\". Based on their current location, find and \
         recommend nearby DJs, clubs, or venues that host DJs using Google Maps data. \
         Provide a friendly, engaging summary and highlight the best options. \
         Be enthusiastic and use a modern, Gen-Z tone."
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
    pub tool_config: ToolConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_maps: GoogleMaps,
}

#[derive(Debug, Default, Serialize)]
pub struct GoogleMaps {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    pub lat_lng: Coordinates,
}

impl GenerateContentRequest {
    pub fn maps_grounded(query: &str, coordinates: Coordinates) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart {
                    text: build_prompt(query),
                }],
            }],
            tools: vec![Tool {
                google_maps: GoogleMaps::default(),
            }],
            tool_config: ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: coordinates,
                },
            },
        }
    }
}
