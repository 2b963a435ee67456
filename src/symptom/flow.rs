// SPDX-License-Identifier: MIT

//! Questionnaire flow controller
//!
//! The question sequence is never patched in place. After every recorded
//! answer it is re-derived from the base questions and the full answer set,
//! so the same answers always produce the same sequence.

use serde::Serialize;
use std::sync::Arc;

use super::answer::{AnswerSet, AnswerValue};
use super::question::{self, Question, PRIMARY_CONCERN};
use super::rules::{Assessment, RuleBook};
use crate::error::{FemiverseError, Result};

/// Outcome of an `advance` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Advance {
    /// Moved to the question at `index`
    Next { index: usize },
    /// The current question is required and unanswered; nothing changed
    Blocked,
    /// Past the last question; the assessment is ready
    Finished { result: Assessment },
}

/// Base questions followed by the follow-up block the primary concern selects
pub fn derive_sequence(base: &[Question], answers: &AnswerSet) -> Vec<Question> {
    let mut sequence = base.to_vec();
    if let Some(concern) = answers.choice(PRIMARY_CONCERN) {
        sequence.extend_from_slice(question::follow_ups_for(concern));
    }
    sequence
}

/// A single user's walk through the symptom checker
#[derive(Debug, Clone)]
pub struct Questionnaire {
    base: Vec<Question>,
    sequence: Vec<Question>,
    answers: AnswerSet,
    index: usize,
    rules: Arc<RuleBook>,
    result: Option<Assessment>,
}

impl Questionnaire {
    /// Start a session over the built-in catalog
    pub fn new(rules: Arc<RuleBook>) -> Self {
        Self::with_base(question::base_questions().to_vec(), rules)
    }

    /// Start a session over a custom base sequence
    ///
    /// An empty base finishes on the first `advance`.
    pub fn with_base(base: Vec<Question>, rules: Arc<RuleBook>) -> Self {
        let answers = AnswerSet::new();
        let sequence = derive_sequence(&base, &answers);
        Self {
            base,
            sequence,
            answers,
            index: 0,
            rules,
            result: None,
        }
    }

    /// Store or overwrite an answer, then re-derive the sequence
    ///
    /// Answers are frozen once the assessment has been produced.
    pub fn record_answer(&mut self, question_id: &str, value: AnswerValue) -> Result<()> {
        if self.result.is_some() {
            return Err(FemiverseError::invalid_answer(
                question_id,
                "the questionnaire is already complete",
            ));
        }
        let question = self
            .sequence
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| {
                FemiverseError::invalid_answer(question_id, "not part of the current sequence")
            })?;
        value.validate_for(question)?;

        self.answers.record(question_id, value);
        let before = self.sequence.len();
        self.sequence = derive_sequence(&self.base, &self.answers);
        if self.sequence.len() != before {
            log::debug!(
                "Sequence re-derived after '{}': {} -> {} questions",
                question_id,
                before,
                self.sequence.len()
            );
        }
        self.index = self.index.min(self.sequence.len().saturating_sub(1));
        Ok(())
    }

    /// Move forward if the current question's required constraint holds
    pub fn advance(&mut self) -> Advance {
        if let Some(result) = &self.result {
            return Advance::Finished {
                result: result.clone(),
            };
        }
        if let Some(current) = self.current() {
            if !self.answers.satisfies(current) {
                log::debug!("Advance blocked on required question '{}'", current.id);
                return Advance::Blocked;
            }
        }

        if self.index + 1 < self.sequence.len() {
            self.index += 1;
            Advance::Next { index: self.index }
        } else {
            let result = self.rules.evaluate(&self.answers);
            self.result = Some(result.clone());
            Advance::Finished { result }
        }
    }

    /// Move back one question; no-op at the start or once finished
    pub fn retreat(&mut self) -> usize {
        if self.result.is_none() && self.index > 0 {
            self.index -= 1;
        }
        self.index
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&Assessment> {
        self.result.as_ref()
    }

    pub fn current(&self) -> Option<&Question> {
        self.sequence.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn sequence(&self) -> &[Question] {
        &self.sequence
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Percentage of the sequence reached, counting the current question
    pub fn progress(&self) -> u8 {
        if self.sequence.is_empty() {
            return 100;
        }
        let pct = (self.index + 1) as f64 / self.sequence.len() as f64 * 100.0;
        pct.round() as u8
    }
}
