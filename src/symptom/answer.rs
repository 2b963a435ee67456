// SPDX-License-Identifier: MIT

//! Answer storage for a questionnaire session

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::question::{Question, QuestionKind};
use crate::error::{FemiverseError, Result};

/// A recorded answer, one variant per question kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Choice(String),
    Choices(BTreeSet<String>),
}

impl AnswerValue {
    /// Build a multi-choice answer from labels
    pub fn choices<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Choices(labels.into_iter().map(Into::into).collect())
    }

    pub fn choice(label: impl Into<String>) -> Self {
        AnswerValue::Choice(label.into())
    }

    /// An answer counts for a required question only when it carries something
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Flag(_) => false,
            AnswerValue::Choice(s) => s.is_empty(),
            AnswerValue::Choices(set) => set.is_empty(),
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_choices(&self) -> Option<&BTreeSet<String>> {
        match self {
            AnswerValue::Choices(set) => Some(set),
            _ => None,
        }
    }

    /// Check that the value has the shape `question` expects and uses its vocabulary
    pub fn validate_for(&self, question: &Question) -> Result<()> {
        match (question.kind, self) {
            (QuestionKind::Boolean, AnswerValue::Flag(_)) => Ok(()),
            (QuestionKind::Single, AnswerValue::Choice(label)) => {
                if label.is_empty() || question.has_option(label) {
                    Ok(())
                } else {
                    Err(FemiverseError::invalid_answer(
                        &question.id,
                        format!("'{}' is not an option", label),
                    ))
                }
            }
            (QuestionKind::Multiple, AnswerValue::Choices(labels)) => {
                match labels.iter().find(|l| !question.has_option(l)) {
                    Some(unknown) => Err(FemiverseError::invalid_answer(
                        &question.id,
                        format!("'{}' is not an option", unknown),
                    )),
                    None => Ok(()),
                }
            }
            (kind, _) => Err(FemiverseError::invalid_answer(
                &question.id,
                format!("expected a {:?} answer", kind).to_lowercase(),
            )),
        }
    }
}

/// Answers keyed by question id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite an answer
    pub fn record(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.answers.insert(question_id.into(), value);
    }

    /// Builder-style `record`, handy for assembling fixtures
    pub fn with(mut self, question_id: impl Into<String>, value: AnswerValue) -> Self {
        self.record(question_id, value);
        self
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    /// The single-choice label recorded for a question, if any
    pub fn choice(&self, question_id: &str) -> Option<&str> {
        self.get(question_id).and_then(AnswerValue::as_choice)
    }

    /// Whether the question's required constraint is met
    pub fn satisfies(&self, question: &Question) -> bool {
        if !question.required {
            return true;
        }
        self.get(&question.id).is_some_and(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.answers.iter()
    }
}
