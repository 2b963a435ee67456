// SPDX-License-Identifier: MIT

//! Chat transcript and the send/fallback loop

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::agent::FemiBot;
use super::prompts::{FALLBACK_REPLY, WELCOME_MESSAGE};
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub author: Author,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(author: Author, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Author::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Author::Bot, content)
    }
}

/// What `ChatSession::send` appended for the bot
#[derive(Debug)]
pub struct Reply {
    /// Text shown to the user: the model's reply or the fallback
    pub content: String,
    /// Set when the model call failed and `content` is the fallback
    pub error: Option<ModelError>,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// A FemiBot conversation, opened with the welcome message
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::bot(WELCOME_MESSAGE)],
        }
    }

    /// Read-only view of the transcript
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Send a user message and append the bot's answer
    ///
    /// Blank input is ignored and returns `None`. A failed model call never
    /// ends the session: the fallback reply is appended instead and the
    /// error is handed back in the `Reply`.
    pub async fn send(&mut self, bot: &FemiBot, content: &str) -> Option<Reply> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let history_len = self.messages.len();
        self.messages.push(Message::user(content));

        let reply = match bot
            .generate_reply(&self.messages[..history_len], content)
            .await
        {
            Ok(text) => Reply {
                content: text,
                error: None,
            },
            Err(e) => {
                log::error!("Error sending message: {}", e);
                Reply {
                    content: FALLBACK_REPLY.to_string(),
                    error: Some(e),
                }
            }
        };

        self.messages.push(Message::bot(reply.content.clone()));
        Some(reply)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_session_has_welcome_message() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].author, Author::Bot);
        assert_eq!(session.messages()[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn test_history_entry_accepts_minimal_json() {
        let msg: Message =
            serde_json::from_value(json!({ "type": "user", "content": "hi" })).unwrap();
        assert_eq!(msg.author, Author::User);
        assert_eq!(msg.content, "hi");
        assert!(msg.id.is_empty());
    }

    #[test]
    fn test_message_serializes_author_as_type() {
        let json = serde_json::to_value(Message::bot("hello")).unwrap();
        assert_eq!(json["type"], "bot");
        assert!(json["timestamp"].is_string());
    }
}
