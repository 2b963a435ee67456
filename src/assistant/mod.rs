// SPDX-License-Identifier: MIT

//! FemiBot chat assistant
//!
//! The language model is an opaque collaborator behind the `Model` trait:
//! it receives an ordered history and returns one reply. Implementations:
//! - [gemini] - Google's Gemini `generateContent` API
//!
//! On top of it sit `FemiBot` (persona, greeting, history assembly) and
//! `ChatSession` (the transcript, with a fallback reply on failure).

mod agent;
mod conversation;
pub mod gemini;
pub mod prompts;

pub use agent::FemiBot;
pub use conversation::{Author, ChatSession, Message, Reply};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::ModelError;

/// Configuration for model generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Sampling settings FemiBot runs with
    pub fn femibot() -> Self {
        Self {
            temperature: Some(0.7),
            top_k: Some(40),
            top_p: Some(0.95),
            max_output_tokens: Some(1024),
        }
    }
}

/// Who authored a turn, in the model's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// A turn in the conversation sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts; thinking parts are left out
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Thinking(_) => None,
            })
            .collect()
    }
}

/// Parts of a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Part {
    /// Regular text
    Text(String),
    /// Reasoning content from thinking models; never shown to the user
    Thinking(String),
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, ModelError>;
}

/// Builds the model a session talks to
///
/// The HTTP relay receives credentials per request, so it needs a model per
/// session config rather than one shared instance.
pub trait ModelProvider: Send + Sync {
    fn model_for(&self, session: &SessionConfig) -> Arc<dyn Model>;
}

/// Provides `GeminiModel`s
#[derive(Debug, Clone, Default)]
pub struct GeminiProvider;

impl ModelProvider for GeminiProvider {
    fn model_for(&self, session: &SessionConfig) -> Arc<dyn Model> {
        Arc::new(gemini::GeminiModel::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generation_config_wire_names() {
        let json = serde_json::to_value(GenerationConfig::femibot()).unwrap();
        assert_eq!(json["topK"], json!(40));
        assert_eq!(json["maxOutputTokens"], json!(1024));
        assert!(json.get("max_output_tokens").is_none());
    }

    #[test]
    fn test_default_generation_config_is_empty_object() {
        let json = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(json, json!({}));
    }

    #[test]
    fn test_joined_text_skips_thinking() {
        let content = Content {
            role: Role::Model,
            parts: vec![
                Part::Thinking("hmm".into()),
                Part::Text("Hello".into()),
                Part::Text(" there".into()),
            ],
        };
        assert_eq!(content.joined_text(), "Hello there");
    }
}
