// SPDX-License-Identifier: MIT

//! Ordered decision table mapping answers to an assessment
//!
//! Rules are checked in order and the first match wins. When nothing
//! matches the fallback assessment is returned, so evaluation always
//! produces a result.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::answer::AnswerSet;
use super::condition::Condition;
use super::question::{
    CONCERN_DISCHARGE, CONCERN_HORMONAL, CONCERN_IRREGULAR_PERIODS, CYCLE_RELATION,
    DISCHARGE_SYMPTOMS, HORMONAL_SYMPTOMS, PERIOD_FREQUENCY, PERIOD_SYMPTOMS, PRIMARY_CONCERN,
};
use crate::error::{FemiverseError, Result};

/// Outcome handed to the results view and the export layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub condition: String,
    /// 0-100, fixed per rule
    pub confidence: u8,
    pub explanation: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

/// A predicate plus the assessment it yields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    /// Conditions are written as single-key maps (`equals: {...}`), not YAML tags
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub when: Condition,
    pub outcome: Assessment,
}

/// An ordered rule list and its fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBook {
    pub rules: Vec<Rule>,
    pub fallback: Assessment,
}

impl RuleBook {
    /// The decision table shipped with the symptom checker
    pub fn builtin() -> Self {
        Self {
            rules: vec![pcos_rule(), uti_rule(), pmdd_rule()],
            fallback: fallback_assessment(),
        }
    }

    /// Load a rule book from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse and validate a rule book from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Self> {
        let book: RuleBook = serde_yaml::from_str(content)?;
        book.validate()?;
        Ok(book)
    }

    fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err(FemiverseError::config("rule with empty name"));
            }
            check_confidence(&rule.name, &rule.outcome)?;
        }
        check_confidence("fallback", &self.fallback)
    }

    /// First matching rule's assessment, else the fallback
    pub fn evaluate(&self, answers: &AnswerSet) -> Assessment {
        match self.matching_rule(answers) {
            Some(rule) => {
                log::info!(
                    "Rule '{}' matched with confidence {}",
                    rule.name,
                    rule.outcome.confidence
                );
                rule.outcome.clone()
            }
            None => {
                log::info!("No rule matched, using fallback assessment");
                self.fallback.clone()
            }
        }
    }

    /// The first rule whose condition holds, if any
    pub fn matching_rule(&self, answers: &AnswerSet) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.when.evaluate(answers))
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_confidence(name: &str, outcome: &Assessment) -> Result<()> {
    if outcome.confidence > 100 {
        return Err(FemiverseError::config(format!(
            "rule '{}' has confidence {} (must be 0-100)",
            name, outcome.confidence
        )));
    }
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pcos_rule() -> Rule {
    Rule {
        name: "pcos".to_string(),
        when: Condition::All(vec![
            Condition::equals(PRIMARY_CONCERN, CONCERN_IRREGULAR_PERIODS),
            Condition::contains(PERIOD_FREQUENCY, "irregular"),
            Condition::includes_all(
                PERIOD_SYMPTOMS,
                &[
                    "Excessive hair growth (face, chest, back)",
                    "Acne or oily skin",
                    "Weight gain or difficulty losing weight",
                ],
            ),
        ]),
        outcome: Assessment {
            condition: "Possible PCOS (Polycystic Ovary Syndrome)".to_string(),
            confidence: 75,
            explanation: "Based on your symptoms of irregular periods, excessive hair growth, \
                          acne, and weight changes, you may have PCOS. This is a common hormonal \
                          disorder affecting 1 in 10 women of reproductive age."
                .to_string(),
            recommendations: strings(&[
                "Track your menstrual cycle and symptoms",
                "Maintain a balanced diet with low glycemic index foods",
                "Regular exercise can help manage symptoms",
                "Consider stress management techniques",
            ]),
            next_steps: strings(&[
                "Consult a gynecologist or endocrinologist",
                "Request hormone testing (testosterone, insulin, LH/FSH)",
                "Consider a pelvic ultrasound",
                "Discuss treatment options like birth control or metformin",
            ]),
        },
    }
}

fn uti_rule() -> Rule {
    Rule {
        name: "uti".to_string(),
        when: Condition::All(vec![
            Condition::equals(PRIMARY_CONCERN, CONCERN_DISCHARGE),
            Condition::includes_all(
                DISCHARGE_SYMPTOMS,
                &["Burning sensation when urinating", "Frequent urination"],
            ),
        ]),
        outcome: Assessment {
            condition: "Possible Urinary Tract Infection (UTI)".to_string(),
            confidence: 80,
            explanation: "Your symptoms of burning during urination and frequent urination are \
                          classic signs of a UTI. This is a common bacterial infection that \
                          affects the urinary system."
                .to_string(),
            recommendations: strings(&[
                "Drink plenty of water to help flush bacteria",
                "Urinate frequently and completely empty your bladder",
                "Avoid irritants like caffeine and alcohol",
                "Practice good hygiene",
            ]),
            next_steps: strings(&[
                "See a healthcare provider for urine testing",
                "Get prescribed antibiotics if confirmed",
                "Follow up if symptoms don't improve in 2-3 days",
                "Consider preventive measures for recurrent UTIs",
            ]),
        },
    }
}

fn pmdd_rule() -> Rule {
    Rule {
        name: "pmdd".to_string(),
        when: Condition::All(vec![
            Condition::equals(PRIMARY_CONCERN, CONCERN_HORMONAL),
            Condition::includes_all(
                HORMONAL_SYMPTOMS,
                &["Severe mood swings or irritability", "Depression or anxiety"],
            ),
            Condition::equals(CYCLE_RELATION, "Yes, they worsen before my period"),
        ]),
        outcome: Assessment {
            condition: "Possible PMDD (Premenstrual Dysphoric Disorder)".to_string(),
            confidence: 70,
            explanation: "Your severe mood symptoms that worsen before your period may indicate \
                          PMDD, a severe form of PMS that significantly impacts daily life."
                .to_string(),
            recommendations: strings(&[
                "Track your symptoms and menstrual cycle",
                "Regular exercise and stress management",
                "Maintain consistent sleep schedule",
                "Consider dietary changes (reduce caffeine, sugar)",
            ]),
            next_steps: strings(&[
                "Consult with a gynecologist or psychiatrist",
                "Keep a detailed symptom diary for 2-3 cycles",
                "Discuss treatment options (SSRIs, birth control)",
                "Consider therapy or support groups",
            ]),
        },
    }
}

fn fallback_assessment() -> Assessment {
    Assessment {
        condition: "General Women's Health Concern".to_string(),
        confidence: 50,
        explanation: "Based on your symptoms, we recommend consulting with a healthcare provider \
                      for a proper evaluation. Your symptoms may require professional assessment."
            .to_string(),
        recommendations: strings(&[
            "Keep a symptom diary",
            "Note any patterns with your menstrual cycle",
            "Maintain a healthy lifestyle",
            "Don't ignore persistent symptoms",
        ]),
        next_steps: strings(&[
            "Schedule an appointment with your healthcare provider",
            "Prepare a list of all symptoms and their duration",
            "Bring any relevant medical history",
            "Ask about appropriate tests or screenings",
        ]),
    }
}
