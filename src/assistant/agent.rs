// SPDX-License-Identifier: MIT

//! FemiBot - persona wrapper around a `Model`
//!
//! Every request carries the whole conversation: the persona instruction,
//! the fixed greeting, the prior transcript and finally the new message.

use std::sync::Arc;

use super::conversation::{Author, Message};
use super::prompts::{GREETING, SYSTEM_PROMPT};
use super::{Content, GenerationConfig, Model, Role};
use crate::error::ModelError;

pub struct FemiBot {
    model: Arc<dyn Model>,
    instruction: String,
    greeting: String,
    generation: GenerationConfig,
}

impl FemiBot {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self {
            model,
            instruction: SYSTEM_PROMPT.to_string(),
            greeting: GREETING.to_string(),
            generation: GenerationConfig::femibot(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Assemble the history sent to the model
    pub fn build_history(&self, transcript: &[Message], message: &str) -> Vec<Content> {
        let mut history = Vec::with_capacity(transcript.len() + 3);
        history.push(Content::text(Role::User, self.instruction.clone()));
        history.push(Content::text(Role::Model, self.greeting.clone()));
        history.extend(transcript.iter().map(|m| {
            let role = match m.author {
                Author::User => Role::User,
                Author::Bot => Role::Model,
            };
            Content::text(role, m.content.clone())
        }));
        history.push(Content::text(Role::User, message));
        history
    }

    /// Ask the model for a reply to `message` given the prior transcript
    pub async fn generate_reply(
        &self,
        transcript: &[Message],
        message: &str,
    ) -> Result<String, ModelError> {
        let history = self.build_history(transcript, message);
        log::info!("FemiBot sending {} turns to the model", history.len());

        let response = self
            .model
            .generate_content(&history, Some(&self.generation))
            .await?;

        let text = response.joined_text();
        if text.trim().is_empty() {
            return Err(ModelError::InvalidResponse("empty reply".into()));
        }
        log::info!(
            "FemiBot received reply (length: {}, preview: '{}')",
            text.len(),
            text.chars().take(100).collect::<String>()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Part;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the history it was given and answers with a fixed reply
    struct EchoModel {
        seen: Mutex<Vec<Content>>,
        reply: Vec<Part>,
    }

    impl EchoModel {
        fn new(reply: Vec<Part>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                reply,
            }
        }
    }

    #[async_trait]
    impl Model for EchoModel {
        async fn generate_content(
            &self,
            history: &[Content],
            config: Option<&GenerationConfig>,
        ) -> Result<Content, ModelError> {
            assert_eq!(config, Some(&GenerationConfig::femibot()));
            *self.seen.lock().unwrap() = history.to_vec();
            Ok(Content {
                role: Role::Model,
                parts: self.reply.clone(),
            })
        }
    }

    #[test]
    fn test_history_layout() {
        let bot = FemiBot::new(Arc::new(EchoModel::new(vec![])));
        let transcript = vec![
            Message::bot("Welcome"),
            Message::user("I have cramps"),
            Message::bot("How long?"),
        ];
        let history = bot.build_history(&transcript, "Two days");

        let roles: Vec<Role> = history.iter().map(|c| c.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::User,
                Role::Model,
                Role::Model,
                Role::User,
                Role::Model,
                Role::User
            ]
        );
        assert_eq!(history[0].joined_text(), SYSTEM_PROMPT);
        assert_eq!(history[1].joined_text(), GREETING);
        assert_eq!(history[5].joined_text(), "Two days");
    }

    #[tokio::test]
    async fn test_generate_reply_returns_text() {
        let model = Arc::new(EchoModel::new(vec![Part::Text("Tell me more.".into())]));
        let bot = FemiBot::new(model.clone());

        let reply = bot.generate_reply(&[], "Hello").await.unwrap();
        assert_eq!(reply, "Tell me more.");
        assert_eq!(model.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_reply_is_invalid_response() {
        let model = Arc::new(EchoModel::new(vec![Part::Thinking("...".into())]));
        let bot = FemiBot::new(model);

        let err = bot.generate_reply(&[], "Hello").await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }
}
