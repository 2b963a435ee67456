// SPDX-License-Identifier: MIT

//! Rule predicates over an answer set
//!
//! Conditions are a small typed tree. In YAML they look like:
//! - `equals: { question: primary_concern, value: "Weight changes" }`
//! - `contains: { question: period_frequency, text: irregular }`
//! - `includes_all: { question: period_symptoms, options: [...] }`
//! - `all: [ ... ]`, `any: [ ... ]`, `not: { ... }`

use serde::{Deserialize, Serialize};
use std::fmt;

use super::answer::{AnswerSet, AnswerValue};

/// A predicate over recorded answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// The recorded answer equals `value` exactly
    Equals { question: String, value: AnswerValue },
    /// Substring match on a single-choice answer, membership on a multi-choice answer
    Contains { question: String, text: String },
    /// The multi-choice answer is a superset of `options`
    IncludesAll {
        question: String,
        options: Vec<String>,
    },
    /// Every inner condition holds
    All(Vec<Condition>),
    /// At least one inner condition holds
    Any(Vec<Condition>),
    Not(Box<Condition>),
    Always,
}

impl Condition {
    pub fn equals(question: &str, value: impl Into<String>) -> Self {
        Condition::Equals {
            question: question.to_string(),
            value: AnswerValue::Choice(value.into()),
        }
    }

    pub fn contains(question: &str, text: impl Into<String>) -> Self {
        Condition::Contains {
            question: question.to_string(),
            text: text.into(),
        }
    }

    pub fn includes_all(question: &str, options: &[&str]) -> Self {
        Condition::IncludesAll {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    /// Evaluate this condition against the answer set
    pub fn evaluate(&self, answers: &AnswerSet) -> bool {
        match self {
            Condition::Always => true,
            Condition::Equals { question, value } => answers.get(question) == Some(value),
            Condition::Contains { question, text } => check_contains(answers.get(question), text),
            Condition::IncludesAll { question, options } => answers
                .get(question)
                .and_then(AnswerValue::as_choices)
                .is_some_and(|selected| options.iter().all(|o| selected.contains(o))),
            Condition::All(inner) => inner.iter().all(|c| c.evaluate(answers)),
            Condition::Any(inner) => inner.iter().any(|c| c.evaluate(answers)),
            Condition::Not(inner) => !inner.evaluate(answers),
        }
    }
}

fn check_contains(value: Option<&AnswerValue>, text: &str) -> bool {
    match value {
        Some(AnswerValue::Choice(label)) => label.contains(text),
        Some(AnswerValue::Choices(labels)) => labels.contains(text),
        Some(AnswerValue::Flag(_)) | None => false,
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => write!(f, "true"),
            Condition::Equals { question, value } => match value {
                AnswerValue::Choice(s) => write!(f, "{} == '{}'", question, s),
                AnswerValue::Flag(b) => write!(f, "{} == {}", question, b),
                AnswerValue::Choices(set) => write!(f, "{} == {:?}", question, set),
            },
            Condition::Contains { question, text } => {
                write!(f, "{} contains '{}'", question, text)
            }
            Condition::IncludesAll { question, options } => {
                write!(f, "{} includes all {:?}", question, options)
            }
            Condition::All(inner) => write_joined(f, inner, " and "),
            Condition::Any(inner) => write_joined(f, inner, " or "),
            Condition::Not(inner) => write!(f, "not ({})", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, inner: &[Condition], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, c) in inner.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers_with(pairs: Vec<(&str, AnswerValue)>) -> AnswerSet {
        let mut answers = AnswerSet::new();
        for (k, v) in pairs {
            answers.record(k, v);
        }
        answers
    }

    #[test]
    fn test_equals_is_exact() {
        let answers = answers_with(vec![("concern", AnswerValue::choice("Weight changes"))]);
        assert!(Condition::equals("concern", "Weight changes").evaluate(&answers));
        assert!(!Condition::equals("concern", "weight changes").evaluate(&answers));
        assert!(!Condition::equals("other", "Weight changes").evaluate(&answers));
    }

    #[test]
    fn test_contains_substring_on_choice() {
        let answers = answers_with(vec![(
            "frequency",
            AnswerValue::choice("Less than every 60 days (very irregular)"),
        )]);
        assert!(Condition::contains("frequency", "irregular").evaluate(&answers));
        assert!(!Condition::contains("frequency", "Irregular").evaluate(&answers));
    }

    #[test]
    fn test_contains_membership_on_choices() {
        let answers = answers_with(vec![("tags", AnswerValue::choices(["Pelvic pain"]))]);
        assert!(Condition::contains("tags", "Pelvic pain").evaluate(&answers));
        assert!(!Condition::contains("tags", "Pelvic").evaluate(&answers));
    }

    #[test]
    fn test_contains_missing_or_flag_is_false() {
        let answers = answers_with(vec![("flag", AnswerValue::Flag(true))]);
        assert!(!Condition::contains("flag", "true").evaluate(&answers));
        assert!(!Condition::contains("missing", "x").evaluate(&answers));
    }

    #[test]
    fn test_includes_all_requires_superset() {
        let answers = answers_with(vec![("s", AnswerValue::choices(["a", "b", "c"]))]);
        assert!(Condition::includes_all("s", &["a", "c"]).evaluate(&answers));
        assert!(!Condition::includes_all("s", &["a", "d"]).evaluate(&answers));
        assert!(Condition::includes_all("s", &[]).evaluate(&answers));
    }

    #[test]
    fn test_includes_all_on_single_choice_is_false() {
        let answers = answers_with(vec![("s", AnswerValue::choice("a"))]);
        assert!(!Condition::includes_all("s", &["a"]).evaluate(&answers));
    }

    #[test]
    fn test_logical_combinators() {
        let answers = answers_with(vec![("x", AnswerValue::choice("1"))]);
        let yes = Condition::equals("x", "1");
        let no = Condition::equals("x", "2");

        assert!(Condition::All(vec![yes.clone(), Condition::Always]).evaluate(&answers));
        assert!(!Condition::All(vec![yes.clone(), no.clone()]).evaluate(&answers));
        assert!(Condition::Any(vec![no.clone(), yes.clone()]).evaluate(&answers));
        assert!(Condition::Not(Box::new(no)).evaluate(&answers));
        assert!(Condition::All(vec![]).evaluate(&answers));
        assert!(!Condition::Any(vec![]).evaluate(&answers));
    }

    #[test]
    fn test_parse_yaml_condition() {
        let yaml = r#"
all:
  - equals: { question: primary_concern, value: "Weight changes" }
  - contains: { question: period_frequency, text: irregular }
  - not:
      includes_all: { question: period_symptoms, options: [a, b] }
"#;
        let cond: Condition = serde_yaml::with::singleton_map_recursive::deserialize(
            serde_yaml::Deserializer::from_str(yaml),
        )
        .unwrap();
        match &cond {
            Condition::All(inner) => assert_eq!(inner.len(), 3),
            other => panic!("Expected All, got {:?}", other),
        }
        assert_eq!(
            cond.to_string(),
            "(primary_concern == 'Weight changes' and period_frequency contains 'irregular' \
             and not (period_symptoms includes all [\"a\", \"b\"]))"
        );
    }
}
