//! Deterministic rule grading.
//!
//! Pure evaluation, no I/O, no failure path: wrong answers and
//! uninterpretable input are both data, expressed through `score` and
//! `confident`. Free-text types are declined by policy and belong to a
//! human or ML grader outside this service.

use crate::models::{AnswerKey, ProblemType};

#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    /// 0 or 1 under the current binary policy.
    pub score: u8,
    /// False when no determination could be made.
    pub confident: bool,
    pub note: Option<String>,
}

impl RuleResult {
    fn declined() -> Self {
        Self {
            score: 0,
            confident: false,
            note: None,
        }
    }
}

pub fn grade(problem_type: ProblemType, key: Option<&AnswerKey>, raw: &str) -> RuleResult {
    match (problem_type, key) {
        (ProblemType::Mcq, Some(AnswerKey::Choice { correct })) => {
            let submitted = raw.trim().to_uppercase();
            let ok = correct.iter().any(|label| *label == submitted);
            RuleResult {
                score: u8::from(ok),
                confident: true,
                note: Some(if ok { "Correct" } else { "Incorrect" }.to_string()),
            }
        }
        (ProblemType::Numeric, Some(AnswerKey::Numeric { value, tol_abs })) => {
            // Accept comma decimal separators before parsing.
            let normalized = raw.trim().replace(',', ".");
            let Ok(parsed) = normalized.parse::<f64>() else {
                return RuleResult::declined();
            };
            let ok = (parsed - value).abs() <= *tol_abs;
            RuleResult {
                score: u8::from(ok),
                confident: true,
                note: Some(if ok {
                    format!("Correct (tolerance \u{00b1}{tol_abs})")
                } else {
                    "Incorrect".to_string()
                }),
            }
        }
        // Short/essay/unknown types, a missing key, or a key that does not
        // match the declared type.
        _ => RuleResult::declined(),
    }
}
