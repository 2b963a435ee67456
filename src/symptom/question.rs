// SPDX-License-Identifier: MIT

//! Question catalog for the symptom checker
//!
//! The base sequence and every follow-up block are fixed. Option labels form
//! the closed vocabulary that rule predicates match against.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const AGE_GROUP: &str = "age_group";
pub const PRIMARY_CONCERN: &str = "primary_concern";
pub const PERIOD_FREQUENCY: &str = "period_frequency";
pub const PERIOD_SYMPTOMS: &str = "period_symptoms";
pub const DISCHARGE_SYMPTOMS: &str = "discharge_symptoms";
pub const SYMPTOM_DURATION: &str = "symptom_duration";
pub const HORMONAL_SYMPTOMS: &str = "hormonal_symptoms";
pub const CYCLE_RELATION: &str = "cycle_relation";

pub const CONCERN_IRREGULAR_PERIODS: &str = "Irregular or missed periods";
pub const CONCERN_DISCHARGE: &str = "Unusual discharge or infections";
pub const CONCERN_HORMONAL: &str = "Hormonal symptoms (acne, hair growth, mood)";

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one option
    Single,
    /// Any subset of the options
    Multiple,
    /// Yes or no
    Boolean,
}

/// A fixed question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl Question {
    fn new(id: &str, kind: QuestionKind, prompt: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            kind,
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            required: false,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether `label` is one of this question's options
    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| o == label)
    }
}

static BASE_QUESTIONS: Lazy<Vec<Question>> = Lazy::new(|| {
    vec![
        Question::new(
            AGE_GROUP,
            QuestionKind::Single,
            "What is your age group?",
            &["Under 18", "18-25", "26-35", "36-45", "46-55", "Over 55"],
        )
        .required(),
        Question::new(
            PRIMARY_CONCERN,
            QuestionKind::Single,
            "What is your primary health concern today?",
            &[
                CONCERN_IRREGULAR_PERIODS,
                "Painful periods or cramps",
                CONCERN_DISCHARGE,
                CONCERN_HORMONAL,
                "Fatigue or energy issues",
                "Weight changes",
                "Other symptoms",
            ],
        )
        .required(),
    ]
});

static IRREGULAR_PERIOD_FOLLOW_UPS: Lazy<Vec<Question>> = Lazy::new(|| {
    vec![
        Question::new(
            PERIOD_FREQUENCY,
            QuestionKind::Single,
            "How often do you get your period?",
            &[
                "Every 21-35 days (regular)",
                "Every 36-60 days (irregular)",
                "Less than every 60 days (very irregular)",
                "I haven't had a period in 3+ months",
            ],
        ),
        Question::new(
            PERIOD_SYMPTOMS,
            QuestionKind::Multiple,
            "Which symptoms do you experience? (Select all that apply)",
            &[
                "Excessive hair growth (face, chest, back)",
                "Acne or oily skin",
                "Weight gain or difficulty losing weight",
                "Hair thinning or male-pattern baldness",
                "Dark patches of skin",
                "Mood changes or depression",
            ],
        ),
    ]
});

static DISCHARGE_FOLLOW_UPS: Lazy<Vec<Question>> = Lazy::new(|| {
    vec![
        Question::new(
            DISCHARGE_SYMPTOMS,
            QuestionKind::Multiple,
            "What symptoms are you experiencing? (Select all that apply)",
            &[
                "Burning sensation when urinating",
                "Frequent urination",
                "Urgent need to urinate",
                "Cloudy or strong-smelling urine",
                "Pelvic pain",
                "Unusual vaginal discharge",
            ],
        ),
        Question::new(
            SYMPTOM_DURATION,
            QuestionKind::Single,
            "How long have you been experiencing these symptoms?",
            &["Less than 24 hours", "1-3 days", "4-7 days", "More than a week"],
        ),
    ]
});

static HORMONAL_FOLLOW_UPS: Lazy<Vec<Question>> = Lazy::new(|| {
    vec![
        Question::new(
            HORMONAL_SYMPTOMS,
            QuestionKind::Multiple,
            "Which hormonal symptoms do you experience? (Select all that apply)",
            &[
                "Severe acne, especially on jawline",
                "Excessive hair growth on face or body",
                "Hair loss or thinning",
                "Severe mood swings or irritability",
                "Depression or anxiety",
                "Difficulty concentrating",
                "Sleep problems",
            ],
        ),
        Question::new(
            CYCLE_RELATION,
            QuestionKind::Single,
            "Do these symptoms seem related to your menstrual cycle?",
            &[
                "Yes, they worsen before my period",
                "Yes, they improve after my period",
                "No clear pattern with my cycle",
                "I don't have regular periods",
            ],
        ),
    ]
});

/// The fixed opening questions every session starts with
pub fn base_questions() -> &'static [Question] {
    &BASE_QUESTIONS
}

/// Follow-up block for a primary concern; empty when the concern has none
pub fn follow_ups_for(primary_concern: &str) -> &'static [Question] {
    match primary_concern {
        CONCERN_IRREGULAR_PERIODS => &IRREGULAR_PERIOD_FOLLOW_UPS,
        CONCERN_DISCHARGE => &DISCHARGE_FOLLOW_UPS,
        CONCERN_HORMONAL => &HORMONAL_FOLLOW_UPS,
        _ => &[],
    }
}

/// Look up any catalog question by id
pub fn find(id: &str) -> Option<&'static Question> {
    BASE_QUESTIONS
        .iter()
        .chain(IRREGULAR_PERIOD_FOLLOW_UPS.iter())
        .chain(DISCHARGE_FOLLOW_UPS.iter())
        .chain(HORMONAL_FOLLOW_UPS.iter())
        .find(|q| q.id == id)
}
