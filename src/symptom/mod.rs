// SPDX-License-Identifier: MIT

//! Symptom checker
//!
//! This module provides:
//! - `question` - the fixed question catalog and follow-up blocks
//! - `AnswerSet` - typed answers keyed by question id
//! - `Questionnaire` - the branching flow controller
//! - `RuleBook` - the ordered decision table producing an `Assessment`

mod answer;
mod condition;
mod flow;
pub mod question;
mod rules;

pub use answer::{AnswerSet, AnswerValue};
pub use condition::Condition;
pub use flow::{derive_sequence, Advance, Questionnaire};
pub use question::{Question, QuestionKind};
pub use rules::{Assessment, Rule, RuleBook};
