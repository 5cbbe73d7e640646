//! Request construction for location lookups.

use serde_json::json;

use super::gemini::{Content, GenerateContentRequest, GenerationConfig, Tool};

/// Upper bound on suggestions the model is asked for.
pub const MAX_SUGGESTIONS: usize = 5;

pub const LOCATION_SYSTEM_PROMPT: &str = "\
You are a specialized location search engine. Based on the user's query, use the Google Search tool \
to find relevant businesses, landmarks, or addresses. For each location, return the name, the full \
address, and its precise latitude and longitude as numbers. Return the results as a JSON array of \
objects. Only return the JSON: no commentary, no markdown, no text outside the JSON. Prefer accurate, \
well-known locations.";

/// Response schema: an array of `{name, address, latitude, longitude}`, all required.
pub fn location_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "description": "A list of suggested locations.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": {"type": "STRING", "description": "The name of the location or business."},
                "address": {"type": "STRING", "description": "The full address of the location."},
                "latitude": {"type": "NUMBER", "description": "The latitude of the location."},
                "longitude": {"type": "NUMBER", "description": "The longitude of the location."}
            },
            "required": ["name", "address", "latitude", "longitude"]
        }
    })
}

/// Build the `generateContent` body for an already-trimmed query.
pub fn suggestion_request(query: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::text(format!(
            "Find up to {MAX_SUGGESTIONS} locations for \"{query}\""
        ))],
        tools: vec![Tool::google_search()],
        system_instruction: Some(Content::text(LOCATION_SYSTEM_PROMPT)),
        generation_config: Some(GenerationConfig::json(location_schema())),
    }
}
