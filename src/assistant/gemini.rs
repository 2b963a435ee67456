// SPDX-License-Identifier: MIT

//! Gemini Model - Google's Gemini API implementation

use super::{Content, GenerationConfig, Model, Part, Role};
use crate::config::SessionConfig;
use crate::error::ModelError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

const PROVIDER: &str = "Gemini";

/// Google Gemini model implementation
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model_name: String,
    api_base: Url,
}

impl GeminiModel {
    /// Create a GeminiModel from explicit session settings
    pub fn new(session: &SessionConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: session.api_key.clone(),
            model_name: session.model_name.clone(),
            api_base: session.api_base.clone(),
        }
    }

    /// `{base}models/{model}:generateContent?key=...`
    fn endpoint(&self) -> Result<Url, ModelError> {
        let mut url = self
            .api_base
            .join(&format!("models/{}:generateContent", self.model_name))
            .map_err(|e| ModelError::InvalidResponse(format!("bad endpoint: {}", e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl Model for GeminiModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError> {
        if self.api_key.trim().is_empty() {
            return Err(ModelError::ApiKeyMissing(PROVIDER.to_string()));
        }

        let body = request_body(history, config);
        log::debug!(
            "Gemini request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self.client.post(self.endpoint()?).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            log::warn!("Gemini returned {}: {}", status, text);
            return Err(ModelError::status(PROVIDER, status.as_u16(), text));
        }

        let resp_json: Value = serde_json::from_str(&text)
            .map_err(|e| ModelError::InvalidResponse(format!("malformed JSON: {}", e)))?;
        log::debug!("Gemini response: {}", resp_json);

        parse_response(&resp_json)
    }
}

/// Build the `generateContent` request body
pub fn request_body(history: &[Content], config: Option<&GenerationConfig>) -> Value {
    let contents: Vec<Value> = history
        .iter()
        .map(|c| {
            let parts: Vec<Value> = c.parts.iter().filter_map(part_to_gemini_json).collect();
            json!({ "role": c.role.as_str(), "parts": parts })
        })
        .collect();

    let mut body = json!({ "contents": contents });
    if let Some(config) = config {
        body["generationConfig"] = json!(config);
    }
    body
}

/// Turn a `generateContent` response into a model turn
pub fn parse_response(resp_json: &Value) -> Result<Content, ModelError> {
    if let Some(reason) = resp_json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(ModelError::Blocked(reason.to_string()));
    }

    let candidate = resp_json["candidates"]
        .as_array()
        .and_then(|c| c.first())
        .ok_or_else(|| ModelError::InvalidResponse("no candidates in response".into()))?;

    if let Some(finish_reason) = candidate.get("finishReason").and_then(|v| v.as_str()) {
        log::debug!("Gemini finish reason: {}", finish_reason);
        if finish_reason == "SAFETY" {
            return Err(ModelError::Blocked(
                "Gemini blocked response due to safety filters.".into(),
            ));
        }
    }

    let parts_json = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| {
            log::error!("No content parts in candidate: {}", candidate);
            ModelError::InvalidResponse("no content parts in candidate".into())
        })?;

    let parts: Vec<Part> = parts_json.iter().flat_map(parse_gemini_part).collect();
    Ok(Content {
        role: Role::Model,
        parts,
    })
}

/// Serialize a Part to Gemini API JSON format
/// Returns None for parts that shouldn't be sent (e.g., Thinking)
pub fn part_to_gemini_json(part: &Part) -> Option<Value> {
    match part {
        Part::Text(t) => Some(json!({ "text": t })),
        Part::Thinking(_) => None,
    }
}

/// Parse a Gemini API JSON part into Parts
///
/// Thought summaries arrive as text parts flagged with `"thought": true`.
pub fn parse_gemini_part(p: &Value) -> Vec<Part> {
    let Some(text) = p["text"].as_str() else {
        return Vec::new();
    };
    if p["thought"].as_bool() == Some(true) {
        vec![Part::Thinking(text.to_string())]
    } else {
        vec![Part::Text(text.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Serialization Tests ===

    #[test]
    fn test_serialize_text_part() {
        let part = Part::Text("Hello world".to_string());
        let json = part_to_gemini_json(&part).unwrap();
        assert_eq!(json, json!({ "text": "Hello world" }));
    }

    #[test]
    fn test_serialize_thinking_part_returns_none() {
        let part = Part::Thinking("Internal reasoning".to_string());
        assert!(part_to_gemini_json(&part).is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let history = [
            Content::text(Role::User, "instructions"),
            Content::text(Role::Model, "greeting"),
            Content::text(Role::User, "I have cramps"),
        ];
        let body = request_body(&history, Some(&GenerationConfig::femibot()));

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "I have cramps");
        assert_eq!(body["generationConfig"]["topP"], json!(0.95f32));
        assert_eq!(body["generationConfig"]["temperature"], json!(0.7f32));
    }

    #[test]
    fn test_request_body_without_config() {
        let body = request_body(&[Content::text(Role::User, "hi")], None);
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_endpoint_carries_model_and_key() {
        let session = SessionConfig::new("secret").with_model("gemini-2.0-flash");
        let url = GeminiModel::new(&session).endpoint().unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=secret"
        );
    }

    // === Parsing Tests ===

    #[test]
    fn test_parse_text_part() {
        let parts = parse_gemini_part(&json!({ "text": "Hello world" }));
        assert_eq!(parts, vec![Part::Text("Hello world".to_string())]);
    }

    #[test]
    fn test_parse_thinking_part() {
        let parts = parse_gemini_part(&json!({ "text": "Let me think about this...", "thought": true }));
        assert_eq!(
            parts,
            vec![Part::Thinking("Let me think about this...".to_string())]
        );
    }

    #[test]
    fn test_parse_thought_false_is_text() {
        let parts = parse_gemini_part(&json!({ "thought": false, "text": "Hello" }));
        assert_eq!(parts, vec![Part::Text("Hello".to_string())]);
    }

    #[test]
    fn test_thought_summary_not_in_reply_text() {
        let resp = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "text": "Weighing cycle length against symptoms.", "thought": true },
                    { "text": "Irregular cycles are worth discussing with a doctor." }
                ] },
                "finishReason": "STOP"
            }]
        });
        let content = parse_response(&resp).unwrap();
        assert_eq!(
            content.joined_text(),
            "Irregular cycles are worth discussing with a doctor."
        );
    }

    #[test]
    fn test_parse_response_text() {
        let resp = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hi! " }, { "text": "How are you?" }] },
                "finishReason": "STOP"
            }]
        });
        let content = parse_response(&resp).unwrap();
        assert_eq!(content.role, Role::Model);
        assert_eq!(content.joined_text(), "Hi! How are you?");
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let err = parse_response(&json!({ "candidates": [] })).unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));

        let err = parse_response(&json!({})).unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_response_safety_block() {
        let resp = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        assert!(matches!(
            parse_response(&resp).unwrap_err(),
            ModelError::Blocked(_)
        ));

        let resp = json!({ "promptFeedback": { "blockReason": "OTHER" } });
        assert!(matches!(
            parse_response(&resp).unwrap_err(),
            ModelError::Blocked(reason) if reason == "OTHER"
        ));
    }

    #[test]
    fn test_parse_response_missing_parts() {
        let resp = json!({ "candidates": [{ "content": { "role": "model" } }] });
        assert!(matches!(
            parse_response(&resp).unwrap_err(),
            ModelError::InvalidResponse(_)
        ));
    }
}
