// SPDX-License-Identifier: MIT

//! Health report built from a chat transcript
//!
//! The transcript is only read. The opening welcome message is left out of
//! the report, so at least one exchange is needed before one can be made.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assistant::{Author, Message};
use crate::error::{FemiverseError, Result};

pub const REPORT_TITLE: &str = "FemiVerse Health Report";
pub const DISCLAIMER: &str = "DISCLAIMER: This report is for informational purposes only and is not a substitute for professional medical advice, diagnosis, or treatment. Always seek the advice of your physician or other qualified health provider.";
const FOOTER: &str = "FemiVerse - Empowering Women's Health";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    /// "You" or "FemiBot"
    pub speaker: String,
    /// HH:MM of the message
    pub time: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub disclaimer: String,
    pub entries: Vec<ReportEntry>,
}

impl HealthReport {
    pub fn from_transcript(messages: &[Message], generated_at: DateTime<Utc>) -> Result<Self> {
        if messages.len() <= 1 {
            return Err(FemiverseError::Report(
                "Please have a conversation with FemiBot before generating a report.".into(),
            ));
        }

        let entries = messages[1..]
            .iter()
            .map(|m| ReportEntry {
                speaker: match m.author {
                    Author::User => "You",
                    Author::Bot => "FemiBot",
                }
                .to_string(),
                time: m.timestamp.format("%H:%M").to_string(),
                content: m.content.clone(),
            })
            .collect();

        Ok(Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            disclaimer: DISCLAIMER.to_string(),
            entries,
        })
    }

    /// `FemiVerse-Health-Report-2025-01-31T09-05-00.txt`
    pub fn file_name(&self) -> String {
        format!(
            "FemiVerse-Health-Report-{}.txt",
            self.generated_at.format("%Y-%m-%dT%H-%M-%S")
        )
    }

    /// Plain-text rendering
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            self.title.clone(),
            format!(
                "Generated on: {}",
                self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            String::new(),
            self.disclaimer.clone(),
            String::new(),
            "Conversation Summary".to_string(),
        ];
        for entry in &self.entries {
            lines.push(String::new());
            lines.push(format!("{} ({})", entry.speaker, entry.time));
            lines.push(entry.content.clone());
        }
        lines.push(String::new());
        lines.push(FOOTER.to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 8, h, m, 0).unwrap()
    }

    fn transcript() -> Vec<Message> {
        let mut welcome = Message::bot("Welcome!");
        welcome.timestamp = at(9, 0);
        let mut question = Message::user("Are cramps normal?");
        question.timestamp = at(9, 1);
        let mut answer = Message::bot("Mild cramps are common.");
        answer.timestamp = at(9, 2);
        vec![welcome, question, answer]
    }

    #[test]
    fn test_welcome_only_is_rejected() {
        let err = HealthReport::from_transcript(&transcript()[..1], at(10, 0)).unwrap_err();
        assert!(matches!(err, FemiverseError::Report(_)));
    }

    #[test]
    fn test_entries_skip_welcome() {
        let report = HealthReport::from_transcript(&transcript(), at(10, 0)).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].speaker, "You");
        assert_eq!(report.entries[0].time, "09:01");
        assert_eq!(report.entries[1].speaker, "FemiBot");
    }

    #[test]
    fn test_file_name_uses_generation_time() {
        let report = HealthReport::from_transcript(&transcript(), at(10, 30)).unwrap();
        assert_eq!(
            report.file_name(),
            "FemiVerse-Health-Report-2025-03-08T10-30-00.txt"
        );
    }

    #[test]
    fn test_render_text() {
        let messages = transcript();
        let report = HealthReport::from_transcript(&messages, at(10, 0)).unwrap();
        let text = report.render_text();
        assert!(text.starts_with(REPORT_TITLE));
        assert!(text.contains(DISCLAIMER));
        assert!(text.contains("You (09:01)\nAre cramps normal?"));
        assert!(!text.contains("Welcome!"));
        assert!(text.ends_with(FOOTER));
        assert_eq!(messages.len(), 3);
    }
}
