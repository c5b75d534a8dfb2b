use serde::{Deserialize, Serialize};

pub mod answer;

/// A single workbook problem. Created and maintained by the external content
/// collaborator; read-only inside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "_id")]
    pub id: i64,
    pub chapter_id: i64,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub body: ProblemBody,
    /// Optional override of the grading strategy; falls back to `problem_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_mode: Option<ProblemType>,
    /// Never exposed through the listing surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<AnswerKey>,
}

impl Problem {
    pub fn grading_type(&self) -> ProblemType {
        self.grading_mode.unwrap_or(self.problem_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    Mcq,
    Numeric,
    Short,
    Essay,
    /// Catch-all for types this build does not know. The rule grader declines
    /// them instead of failing ingestion.
    #[serde(other)]
    Unknown,
}

/// Problem body, resolved into a sum type once at deserialization. The source
/// data carries either a bare prompt string or a structured object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProblemBody {
    Plain(String),
    Structured {
        prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        choices: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
}

impl ProblemBody {
    pub fn prompt(&self) -> &str {
        match self {
            ProblemBody::Plain(prompt) => prompt,
            ProblemBody::Structured { prompt, .. } => prompt,
        }
    }
}

/// Type-specific correctness specification. MCQ labels are stored in their
/// canonical uppercase form; submitted labels are normalized before the
/// membership check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Numeric {
        value: f64,
        /// Absolute tolerance, inclusive. Zero means exact match.
        #[serde(default)]
        tol_abs: f64,
    },
    Choice {
        correct: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_body_deserializes_from_string() {
        let body: ProblemBody = serde_json::from_value(serde_json::json!("What is 2+2?")).unwrap();
        assert!(matches!(body, ProblemBody::Plain(ref p) if p == "What is 2+2?"));
    }

    #[test]
    fn structured_body_deserializes_from_object() {
        let body: ProblemBody = serde_json::from_value(serde_json::json!({
            "prompt": "Pick one",
            "choices": ["A. first", "B. second"]
        }))
        .unwrap();
        match body {
            ProblemBody::Structured {
                prompt,
                choices,
                placeholder,
            } => {
                assert_eq!(prompt, "Pick one");
                assert_eq!(choices.unwrap().len(), 2);
                assert!(placeholder.is_none());
            }
            other => panic!("expected structured body, got {:?}", other),
        }
    }

    #[test]
    fn answer_key_variants_deserialize() {
        let choice: AnswerKey = serde_json::from_value(serde_json::json!({
            "correct": ["A"]
        }))
        .unwrap();
        assert!(matches!(choice, AnswerKey::Choice { .. }));

        let numeric: AnswerKey = serde_json::from_value(serde_json::json!({
            "value": 3.14
        }))
        .unwrap();
        match numeric {
            AnswerKey::Numeric { value, tol_abs } => {
                assert_eq!(value, 3.14);
                assert_eq!(tol_abs, 0.0);
            }
            other => panic!("expected numeric key, got {:?}", other),
        }
    }

    #[test]
    fn unknown_problem_type_is_tolerated() {
        let parsed: ProblemType = serde_json::from_value(serde_json::json!("matching")).unwrap();
        assert_eq!(parsed, ProblemType::Unknown);
    }

    #[test]
    fn grading_mode_overrides_problem_type() {
        let problem: Problem = serde_json::from_value(serde_json::json!({
            "_id": 7,
            "chapter_id": 1,
            "type": "short",
            "body": "Explain briefly",
            "grading_mode": "numeric",
            "answer_key": { "value": 10.0 }
        }))
        .unwrap();
        assert_eq!(problem.grading_type(), ProblemType::Numeric);
    }
}
